use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

/// Opcode family, the `III` field in bits 15..13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum OpCode {
    MV,
    MVT,
    ADD,
    SUB,
    LD,
    ST,
    AND,
    B,
}

/// Branch condition, held in the `XXX` field of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Cond {
    #[strum(to_string = "")]
    Always,
    EQ,
    NE,
    CC,
    CS,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    MV,
    MVT,
    ADD,
    SUB,
    LD,
    ST,
    AND,
    B,
    BEQ,
    BNE,
    BCC,
    BCS,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("unknown instruction `{s}`")),
        }
    }

    pub fn opcode(&self) -> OpCode {
        use Mnemonic::*;
        match self {
            MV => OpCode::MV,
            MVT => OpCode::MVT,
            ADD => OpCode::ADD,
            SUB => OpCode::SUB,
            LD => OpCode::LD,
            ST => OpCode::ST,
            AND => OpCode::AND,
            B | BEQ | BNE | BCC | BCS => OpCode::B,
        }
    }

    /// Condition code for branches, `None` for every other mnemonic.
    pub fn cond(&self) -> Option<Cond> {
        use Mnemonic::*;
        match self {
            B => Some(Cond::Always),
            BEQ => Some(Cond::EQ),
            BNE => Some(Cond::NE),
            BCC => Some(Cond::CC),
            BCS => Some(Cond::CS),
            _ => None,
        }
    }
}

#[test]
fn test() {
    assert_eq!(Mnemonic::parse("mv"), Ok(Mnemonic::MV));
    assert_eq!(Mnemonic::parse("BNE"), Ok(Mnemonic::BNE));
    assert!(Mnemonic::parse("jmp").is_err());
    assert_eq!(Mnemonic::BCS.opcode(), OpCode::B);
    assert_eq!(Mnemonic::BCS.cond(), Some(Cond::CS));
    assert_eq!(Mnemonic::ADD.cond(), None);
    assert_eq!(u8::from(OpCode::AND), 6);
    assert_eq!(Cond::Always.to_string(), "");
    assert_eq!(Cond::CC.to_string(), "cc");
}
