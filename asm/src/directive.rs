use crate::{
    error::Error,
    ident::{Ident, Idents},
    parser::{Operand, Stmt, DEPTH},
};

pub const DEFAULT_DEPTH: usize = 256;
pub const MAX_DEPTH: u64 = 0x1_0000;
pub const WORD_MAX: u64 = 0xFFFF;

fn literal(operand: &Operand, directive: &str) -> Result<u64, Error> {
    match operand {
        Operand::Imm(v) => Ok(*v),
        Operand::Invalid(bad) => Err(bad.to_error()),
        _ => Err(Error::OperandType(format!(
            "`{}` expects a numeric literal",
            directive
        ))),
    }
}

fn word_value(v: u64, context: &'static str) -> Result<u16, Error> {
    if v > WORD_MAX {
        return Err(Error::ImmediateRange {
            value: v,
            max: WORD_MAX,
            context,
        });
    }
    Ok(v as u16)
}

/// `.define NAME VALUE`
pub fn define(stmt: &Stmt, idents: &mut Idents) -> Result<(), Error> {
    let [name, value] = stmt.operands.as_slice() else {
        return Err(Error::Syntax(
            "`.define` expects a name and a value".to_string(),
        ));
    };
    let Operand::Symbol(name) = name else {
        return Err(Error::OperandType(
            "`.define` expects a symbol name".to_string(),
        ));
    };
    if name == DEPTH {
        return Err(Error::Syntax(format!("`{}` is reserved", DEPTH)));
    }
    let value = word_value(literal(value, ".define")?, "a 16-bit constant")?;
    idents.define(name, Ident::Const, value, stmt.line)
}

/// `.word VALUE`
pub fn word(stmt: &Stmt) -> Result<u16, Error> {
    let [value] = stmt.operands.as_slice() else {
        return Err(Error::Syntax("`.word` expects one value".to_string()));
    };
    word_value(literal(value, ".word")?, "a 16-bit word")
}

/// `DEPTH = x`
pub fn depth(stmt: &Stmt) -> Result<usize, Error> {
    let [value] = stmt.operands.as_slice() else {
        return Err(Error::Syntax(format!("`{}` expects one value", DEPTH)));
    };
    let depth = literal(value, DEPTH)?;
    if depth == 0 || depth % 2 != 0 || depth > MAX_DEPTH {
        return Err(Error::InvalidDepth(depth));
    }
    Ok(depth as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn stmt(raw: &str) -> Stmt {
        Stmt::parse(1, raw).0.unwrap()
    }

    #[test]
    fn define_inserts_constant() {
        let mut idents = Idents::new();
        define(&stmt(".define LIMIT 0x1F"), &mut idents).unwrap();
        assert_eq!(idents.lookup("LIMIT").unwrap(), 0x1F);
        assert_eq!(idents.get("LIMIT").unwrap().kind, Ident::Const);
    }

    #[test]
    fn define_errors() {
        let mut idents = Idents::new();
        let kind = |raw: &str, idents: &mut Idents| define(&stmt(raw), idents).unwrap_err().kind();
        assert_eq!(kind(".define BIG 0x10000", &mut idents), ErrorKind::ImmediateRangeError);
        assert_eq!(kind(".define DEPTH 4", &mut idents), ErrorKind::SyntaxError);
        assert_eq!(kind(".define X", &mut idents), ErrorKind::SyntaxError);
        assert_eq!(kind(".define X Y", &mut idents), ErrorKind::OperandTypeError);
        assert_eq!(kind(".define r1 5", &mut idents), ErrorKind::OperandTypeError);
        assert!(idents.is_empty());
    }

    #[test]
    fn word_keeps_bit_pattern() {
        assert_eq!(word(&stmt(".word 0b00111111")).unwrap(), 0x003F);
        assert_eq!(word(&stmt(".word 0xFFFF")).unwrap(), 0xFFFF);
        assert_eq!(
            word(&stmt(".word 65536")).unwrap_err().kind(),
            ErrorKind::ImmediateRangeError
        );
        assert_eq!(
            word(&stmt(".word LIMIT")).unwrap_err().kind(),
            ErrorKind::OperandTypeError
        );
        assert_eq!(
            word(&stmt(".word 0x1FFFFFFFFFFFFFFFFF")).unwrap_err().kind(),
            ErrorKind::ImmediateRangeError
        );
    }

    #[test]
    fn depth_validation() {
        assert_eq!(depth(&stmt("DEPTH = 512")).unwrap(), 512);
        assert_eq!(depth(&stmt("DEPTH 2")).unwrap(), 2);
        assert_eq!(depth(&stmt("DEPTH = 65536")).unwrap(), 65536);
        for raw in ["DEPTH = 0", "DEPTH = 255", "DEPTH = 131072"] {
            assert_eq!(
                depth(&stmt(raw)).unwrap_err().kind(),
                ErrorKind::InvalidDepthError,
                "{raw}"
            );
        }
    }
}
