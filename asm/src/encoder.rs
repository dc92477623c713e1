use arch::{
    inst::{Inst, Src, IMM_MAX},
    op::{Cond, Mnemonic},
    reg::Reg,
};

use crate::error::Error;

/// Largest full `mvt` value: a 16-bit word with its low byte clear.
pub const MVT_MAX: u64 = 0xFF00;

/// An operand after symbol resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Reg(u32),
    Mem(u32),
    Num(u64),
}

fn reg(value: Value) -> Result<Reg, Error> {
    match value {
        Value::Reg(idx) => u8::try_from(idx)
            .ok()
            .and_then(|idx| Reg::try_from(idx).ok())
            .ok_or_else(|| Error::InvalidRegister(format!("r{}", idx))),
        _ => Err(Error::OperandType("Expected a register".to_string())),
    }
}

// ld/st accept `[rY]` as well as a bare register
fn addr_reg(value: Value) -> Result<Reg, Error> {
    match value {
        Value::Mem(idx) => reg(Value::Reg(idx)),
        _ => reg(value),
    }
}

fn imm(value: Value, max: u64, context: &'static str) -> Result<u16, Error> {
    match value {
        Value::Num(v) if v <= max => Ok(v as u16),
        Value::Num(v) => Err(Error::ImmediateRange {
            value: v,
            max,
            context,
        }),
        _ => Err(Error::OperandType("Expected an immediate value".to_string())),
    }
}

fn src(value: Value) -> Result<Src, Error> {
    match value {
        Value::Reg(_) => Ok(Src::Reg(reg(value)?)),
        Value::Num(_) => Ok(Src::Imm(imm(value, IMM_MAX as u64, "a 9-bit immediate")?)),
        Value::Mem(_) => Err(Error::OperandType(
            "`[register]` is only allowed with ld and st".to_string(),
        )),
    }
}

// Upper byte for mvt: either the byte itself or the full value with a clear low byte.
fn upper_byte(value: Value) -> Result<u8, Error> {
    match value {
        Value::Num(v) if v <= 0xFF => Ok(v as u8),
        Value::Num(v) if v <= MVT_MAX && v & 0xFF == 0 => Ok((v >> 8) as u8),
        Value::Num(v) => Err(Error::ImmediateRange {
            value: v,
            max: MVT_MAX,
            context: "the upper byte of mvt",
        }),
        _ => Err(Error::OperandType("Expected an immediate value".to_string())),
    }
}

fn args<const N: usize>(mnemonic: Mnemonic, values: &[Value]) -> Result<[Value; N], Error> {
    <[Value; N]>::try_from(values).map_err(|_| {
        Error::OperandType(format!(
            "`{}` expects {} operand(s), found {}",
            mnemonic,
            N,
            values.len()
        ))
    })
}

/// Build the instruction for `mnemonic` from resolved operands, checking operand shape
/// and field widths. `depth` bounds branch targets.
pub fn encode(mnemonic: Mnemonic, values: &[Value], depth: usize) -> Result<Inst, Error> {
    use Mnemonic::*;
    match mnemonic {
        MV | ADD | SUB | AND => {
            let [rx, y] = args(mnemonic, values)?;
            let (rx, y) = (reg(rx)?, src(y)?);
            Ok(match mnemonic {
                MV => Inst::MV(rx, y),
                ADD => Inst::ADD(rx, y),
                SUB => Inst::SUB(rx, y),
                _ => Inst::AND(rx, y),
            })
        }
        MVT => {
            let [rx, y] = args(mnemonic, values)?;
            Ok(Inst::MVT(reg(rx)?, upper_byte(y)?))
        }
        LD | ST => {
            let [rx, ry] = args(mnemonic, values)?;
            let (rx, ry) = (reg(rx)?, addr_reg(ry)?);
            Ok(match mnemonic {
                LD => Inst::LD(rx, ry),
                _ => Inst::ST(rx, ry),
            })
        }
        B | BEQ | BNE | BCC | BCS => {
            let [target] = args(mnemonic, values)?;
            let addr = imm(target, IMM_MAX as u64, "a 9-bit branch target")?;
            if addr as usize >= depth {
                return Err(Error::ImmediateRange {
                    value: addr as u64,
                    max: depth.saturating_sub(1) as u64,
                    context: "memory as a branch target",
                });
            }
            Ok(Inst::B(mnemonic.cond().unwrap_or(Cond::Always), addr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    use super::Value::{Mem, Num};

    fn r(idx: u32) -> Value {
        Value::Reg(idx)
    }

    fn bin(mnemonic: Mnemonic, values: &[Value]) -> u16 {
        encode(mnemonic, values, 256).unwrap().encode()
    }

    fn fail(mnemonic: Mnemonic, values: &[Value]) -> ErrorKind {
        encode(mnemonic, values, 256).unwrap_err().kind()
    }

    #[test]
    fn reference_encodings() {
        assert_eq!(bin(Mnemonic::MV, &[r(1), Num(5)]), 0b0001_0010_0000_0101);
        assert_eq!(bin(Mnemonic::B, &[Num(10)]), 0b1111_0000_0000_1010);
        assert_eq!(bin(Mnemonic::LD, &[r(2), Mem(3)]), 0b1000_0100_0000_0011);
        assert_eq!(bin(Mnemonic::ADD, &[r(0), r(7)]), 0x4007);
        assert_eq!(bin(Mnemonic::AND, &[r(6), Num(0x1FF)]), 0xDDFF);
        assert_eq!(bin(Mnemonic::BEQ, &[Num(3)]), 0xF203);
    }

    #[test]
    fn ld_st_take_plain_register_too() {
        assert_eq!(
            encode(Mnemonic::ST, &[r(1), r(4)], 256).unwrap(),
            Inst::ST(Reg::R1, Reg::R4)
        );
    }

    #[test]
    fn mvt_upper_byte() {
        assert_eq!(
            encode(Mnemonic::MVT, &[r(2), Num(0x1200)], 256).unwrap(),
            Inst::MVT(Reg::R2, 0x12)
        );
        assert_eq!(
            encode(Mnemonic::MVT, &[r(2), Num(0x34)], 256).unwrap(),
            Inst::MVT(Reg::R2, 0x34)
        );
        assert_eq!(fail(Mnemonic::MVT, &[r(2), Num(0x1234)]), ErrorKind::ImmediateRangeError);
        assert_eq!(fail(Mnemonic::MVT, &[r(2), Num(0x10000)]), ErrorKind::ImmediateRangeError);
        assert_eq!(fail(Mnemonic::MVT, &[r(2), r(3)]), ErrorKind::OperandTypeError);
    }

    #[test]
    fn range_checks() {
        assert_eq!(fail(Mnemonic::MV, &[r(0), Num(600)]), ErrorKind::ImmediateRangeError);
        assert_eq!(fail(Mnemonic::BNE, &[Num(512)]), ErrorKind::ImmediateRangeError);
        // inside 9 bits but past the end of memory
        assert_eq!(
            encode(Mnemonic::B, &[Num(300)], 256).unwrap_err().kind(),
            ErrorKind::ImmediateRangeError
        );
        assert_eq!(
            encode(Mnemonic::BCC, &[Num(300)], 512).unwrap(),
            Inst::B(Cond::CC, 300)
        );
    }

    #[test]
    fn shape_checks() {
        assert_eq!(fail(Mnemonic::MV, &[r(8), r(1)]), ErrorKind::InvalidRegisterError);
        assert_eq!(fail(Mnemonic::LD, &[r(1), Mem(9)]), ErrorKind::InvalidRegisterError);
        assert_eq!(fail(Mnemonic::MV, &[Num(1), r(1)]), ErrorKind::OperandTypeError);
        assert_eq!(fail(Mnemonic::ADD, &[r(1), Mem(2)]), ErrorKind::OperandTypeError);
        assert_eq!(fail(Mnemonic::LD, &[r(1), Num(2)]), ErrorKind::OperandTypeError);
        assert_eq!(fail(Mnemonic::B, &[r(1)]), ErrorKind::OperandTypeError);
        assert_eq!(fail(Mnemonic::SUB, &[r(1)]), ErrorKind::OperandTypeError);
        assert_eq!(fail(Mnemonic::B, &[Num(1), Num(2)]), ErrorKind::OperandTypeError);
    }
}
