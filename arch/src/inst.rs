use std::fmt;

use crate::{
    op::{Cond, OpCode},
    reg::Reg,
};

/// Largest value of the 9-bit immediate field.
pub const IMM_MAX: u16 = 0x1FF;

/// Second operand of the ALU-style instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Src {
    Reg(Reg),
    Imm(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    MV(Reg, Src),
    /// Move the byte into the top half of the register.
    MVT(Reg, u8),
    ADD(Reg, Src),
    SUB(Reg, Src),
    LD(Reg, Reg),
    ST(Reg, Reg),
    AND(Reg, Src),
    B(Cond, u16),
}

// III M XXX DDDDDDDDD
fn enc_format(op: OpCode, imm: bool, x: u16, low: u16) -> u16 {
    (u8::from(op) as u16) << 13 | (imm as u16) << 12 | (x & 0x7) << 9 | (low & IMM_MAX)
}

fn dec_format(bin: u16) -> (u8, bool, u8, u16) {
    (
        (bin >> 13) as u8,
        (bin >> 12) & 1 == 1,
        ((bin >> 9) & 0x7) as u8,
        bin & IMM_MAX,
    )
}

fn enc_src(op: OpCode, rx: Reg, src: Src) -> u16 {
    match src {
        Src::Reg(ry) => enc_format(op, false, rx.index(), ry.index()),
        Src::Imm(imm) => enc_format(op, true, rx.index(), imm),
    }
}

impl Inst {
    pub fn encode(&self) -> u16 {
        match *self {
            Inst::MV(rx, src) => enc_src(OpCode::MV, rx, src),
            Inst::MVT(rx, hi) => enc_format(OpCode::MVT, true, rx.index(), hi as u16),
            Inst::ADD(rx, src) => enc_src(OpCode::ADD, rx, src),
            Inst::SUB(rx, src) => enc_src(OpCode::SUB, rx, src),
            Inst::LD(rx, ry) => enc_format(OpCode::LD, false, rx.index(), ry.index()),
            Inst::ST(rx, ry) => enc_format(OpCode::ST, false, rx.index(), ry.index()),
            Inst::AND(rx, src) => enc_src(OpCode::AND, rx, src),
            Inst::B(cond, addr) => enc_format(OpCode::B, true, u8::from(cond) as u16, addr),
        }
    }

    /// Inverse of [`Inst::encode`]. Returns `None` for words no instruction encodes to,
    /// such as a branch with an unassigned condition code.
    pub fn decode(bin: u16) -> Option<Inst> {
        let (op, imm, x, low) = dec_format(bin);
        let op = OpCode::try_from(op).ok()?;
        let rx = Reg::try_from(x).ok()?;
        let ry = Reg::try_from((low & 0x7) as u8).ok()?;
        let src = if imm { Src::Imm(low) } else { Src::Reg(ry) };
        match op {
            OpCode::MV => Some(Inst::MV(rx, src)),
            OpCode::MVT => Some(Inst::MVT(rx, low as u8)),
            OpCode::ADD => Some(Inst::ADD(rx, src)),
            OpCode::SUB => Some(Inst::SUB(rx, src)),
            OpCode::LD => Some(Inst::LD(rx, ry)),
            OpCode::ST => Some(Inst::ST(rx, ry)),
            OpCode::AND => Some(Inst::AND(rx, src)),
            OpCode::B => Some(Inst::B(Cond::try_from(x).ok()?, low)),
        }
    }
}

impl fmt::Display for Src {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Src::Reg(r) => write!(f, "{}", r),
            Src::Imm(imm) => write!(f, "#0x{:04x}", imm),
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::MV(rx, src) => write!(f, "{:<4} {}, {}", "mv", rx, src),
            Inst::MVT(rx, hi) => write!(f, "{:<4} {}, #0x{:04x}", "mvt", rx, (*hi as u16) << 8),
            Inst::ADD(rx, src) => write!(f, "{:<4} {}, {}", "add", rx, src),
            Inst::SUB(rx, src) => write!(f, "{:<4} {}, {}", "sub", rx, src),
            Inst::LD(rx, ry) => write!(f, "{:<4} {}, [{}]", "ld", rx, ry),
            Inst::ST(rx, ry) => write!(f, "{:<4} {}, [{}]", "st", rx, ry),
            Inst::AND(rx, src) => write!(f, "{:<4} {}, {}", "and", rx, src),
            Inst::B(cond, addr) => write!(f, "{:<4} #0x{:04x}", format!("b{}", cond), addr),
        }
    }
}
