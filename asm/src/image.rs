use arch::inst::Inst;

/// Content of one memory word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Inst(Inst),
    Data(u16),
}

impl Slot {
    pub fn bits(&self) -> u16 {
        match self {
            Slot::Empty => 0,
            Slot::Inst(inst) => inst.encode(),
            Slot::Data(word) => *word,
        }
    }
}

/// Dense memory of `depth` 16-bit words. Unwritten words read as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    slots: Vec<Slot>,
    used: usize,
}

impl MemoryImage {
    pub const WIDTH: usize = 16;

    pub fn new(depth: usize) -> Self {
        MemoryImage {
            slots: vec![Slot::Empty; depth],
            used: 0,
        }
    }

    /// Each address is written at most once; the layout pass hands out distinct addresses.
    pub fn write(&mut self, addr: usize, slot: Slot) {
        debug_assert_eq!(self.slots[addr], Slot::Empty, "address {addr} written twice");
        self.slots[addr] = slot;
        self.used = self.used.max(addr + 1);
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// One past the highest written address.
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn slot(&self, addr: usize) -> Slot {
        self.slots.get(addr).copied().unwrap_or_default()
    }

    pub fn get(&self, addr: usize) -> u16 {
        self.slot(addr).bits()
    }

    pub fn words(&self) -> Vec<u16> {
        self.slots.iter().map(Slot::bits).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{inst::Src, reg::Reg};

    #[test]
    fn default_filled() {
        let mut image = MemoryImage::new(8);
        image.write(2, Slot::Inst(Inst::MV(Reg::R1, Src::Imm(5))));
        image.write(3, Slot::Data(0xBEEF));
        assert_eq!(image.depth(), 8);
        assert_eq!(image.used(), 4);
        assert_eq!(image.words(), vec![0, 0, 0x1205, 0xBEEF, 0, 0, 0, 0]);
        assert_eq!(image.get(100), 0);
    }
}
