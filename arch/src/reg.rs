use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    #[strum(to_string = "r7", serialize = "pc")]
    R7,
}

impl Reg {
    pub const PC: Reg = Reg::R7;

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn index(self) -> u16 {
        u8::from(self) as u16
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("r3"), Ok(Reg::R3));
    assert_eq!(Reg::parse("pc"), Ok(Reg::PC));
    assert_eq!(Reg::R7.to_string(), "r7");
    assert!(Reg::parse("r8").is_err());
    assert_eq!(Reg::try_from(5u8).ok(), Some(Reg::R5));
    assert!(Reg::try_from(8u8).is_err());
}
