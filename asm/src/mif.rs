use std::fmt;

use crate::image::{MemoryImage, Slot};

/// Memory Initialization File view of an image. Every address is listed.
pub struct Mif<'a>(pub &'a MemoryImage);

impl fmt::Display for Mif<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let image = self.0;
        let digits = MemoryImage::WIDTH / 4;
        writeln!(f, "WIDTH = {};", MemoryImage::WIDTH)?;
        writeln!(f, "DEPTH = {};", image.depth())?;
        writeln!(f, "ADDRESS_RADIX = HEX;")?;
        writeln!(f, "DATA_RADIX = HEX;")?;
        writeln!(f)?;
        writeln!(f, "CONTENT")?;
        writeln!(f, "BEGIN")?;
        for (addr, slot) in image.iter() {
            write!(f, "{:x}\t\t: {:0digits$x};", addr, slot.bits())?;
            match slot {
                Slot::Inst(inst) => writeln!(f, "\t\t% {} %", inst)?,
                Slot::Data(_) => writeln!(f, "\t\t% data %")?,
                Slot::Empty => writeln!(f)?,
            }
        }
        writeln!(f, "END;")
    }
}

pub fn render(image: &MemoryImage) -> String {
    Mif(image).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{
        inst::{Inst, Src},
        op::Cond,
        reg::Reg,
    };

    #[test]
    fn layout() {
        let mut image = MemoryImage::new(4);
        image.write(0, Slot::Inst(Inst::MV(Reg::R1, Src::Imm(5))));
        image.write(1, Slot::Inst(Inst::B(Cond::Always, 1)));
        image.write(2, Slot::Data(0x3F));
        let expected = "\
WIDTH = 16;
DEPTH = 4;
ADDRESS_RADIX = HEX;
DATA_RADIX = HEX;

CONTENT
BEGIN
0\t\t: 1205;\t\t% mv   r1, #0x0005 %
1\t\t: f001;\t\t% b    #0x0001 %
2\t\t: 003f;\t\t% data %
3\t\t: 0000;
END;
";
        assert_eq!(render(&image), expected);
    }
}
