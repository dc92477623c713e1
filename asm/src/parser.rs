use arch::op::Mnemonic;
use std::num::{IntErrorKind, ParseIntError};

use crate::error::{Diagnostics, Error};

pub const COMMENT: &str = "//";
pub const DEPTH: &str = "DEPTH";

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub line: usize,
    pub label: Option<String>,
    pub op: Option<Operation>,
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Inst(Mnemonic),
    /// Unrecognised mnemonic. Still takes its word so later labels keep their addresses.
    Unknown(String),
    Define,
    Word,
    Depth,
}

impl Operation {
    /// Instructions and `.word` take one word of memory, everything else none.
    pub fn occupies_memory(&self) -> bool {
        matches!(
            self,
            Operation::Inst(_) | Operation::Unknown(_) | Operation::Word
        )
    }
}

impl Stmt {
    /// Parse one source line. Blank and comment-only lines give no statement.
    /// A bad label, mnemonic or operand is reported but the statement is kept.
    pub fn parse(line: usize, raw: &str) -> (Option<Stmt>, Vec<Error>) {
        let mut errs = vec![];

        let code = match raw.find(COMMENT) {
            Some(idx) => &raw[..idx],
            None => raw,
        }
        .trim();

        if code.is_empty() {
            return (None, errs);
        }

        let (label, code) = match code.split_once(':') {
            Some((head, rest)) => {
                let head = head.trim();
                let label = if !is_ident(head) {
                    errs.push(Error::Syntax(format!("Invalid label name: `{}`", head)));
                    None
                } else if head == DEPTH {
                    errs.push(Error::Syntax(format!("`{}` is reserved", DEPTH)));
                    None
                } else if parse_reg(head).is_some() {
                    errs.push(Error::Syntax(format!(
                        "Register name `{}` cannot be a label",
                        head
                    )));
                    None
                } else {
                    Some(head.to_string())
                };
                (label, rest.trim())
            }
            None => (None, code),
        };

        let mut stmt = Stmt {
            line,
            label,
            op: None,
            operands: vec![],
        };

        if code.is_empty() {
            return (Some(stmt), errs);
        }

        // DEPTH = 256, DEPTH 256
        let depth_args = code.strip_prefix(DEPTH).filter(|rest| {
            rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '=')
        });

        let args = match depth_args {
            Some(rest) => {
                let rest = rest.trim_start();
                stmt.op = Some(Operation::Depth);
                rest.strip_prefix('=').unwrap_or(rest)
            }
            None => {
                let (head, rest) = code
                    .split_once(|c: char| c.is_whitespace() || c == ',')
                    .unwrap_or((code, ""));
                stmt.op = Some(match head {
                    ".define" => Operation::Define,
                    ".word" => Operation::Word,
                    _ => match Mnemonic::parse(head) {
                        Ok(mnemonic) => Operation::Inst(mnemonic),
                        Err(msg) => {
                            errs.push(Error::Syntax(msg));
                            Operation::Unknown(head.to_string())
                        }
                    },
                });
                rest
            }
        };

        stmt.operands = args
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .map(Operand::parse)
            .collect();
        errs.extend(stmt.operands.iter().filter_map(Operand::error));

        (Some(stmt), errs)
    }

    /// True if any operand failed to parse. Those were reported with the line.
    pub fn is_malformed(&self) -> bool {
        self.operands
            .iter()
            .any(|operand| matches!(operand, Operand::Invalid(_)))
    }
}

/// Parse a whole source text. Every statement is kept, malformed or not, so the
/// address counter stays in step with the source.
pub fn parse_source(source: &str) -> (Vec<Stmt>, Diagnostics) {
    let mut stmts = vec![];
    let mut diags = Diagnostics::new();
    for (idx, raw) in source.lines().enumerate() {
        let (stmt, errs) = Stmt::parse(idx + 1, raw);
        for err in errs {
            diags.error(idx + 1, err);
        }
        stmts.extend(stmt);
    }
    (stmts, diags)
}

// ----------------------------------------------------------------------------
// Operand

/// An operand as written. Register indices are not range checked here: `r9` parses
/// and is rejected once the instruction is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(u32),
    /// `[rY]`
    Mem(u32),
    Imm(u64),
    Symbol(String),
    Invalid(BadOperand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadOperand {
    Malformed(String),
    /// Well-formed number that does not fit 64 bits.
    TooLarge(String),
}

impl BadOperand {
    pub fn to_error(&self) -> Error {
        match self {
            BadOperand::Malformed(token) => {
                Error::Syntax(format!("Cannot parse operand `{}`", token))
            }
            BadOperand::TooLarge(token) => Error::LiteralOverflow(token.clone()),
        }
    }
}

impl Operand {
    pub fn parse(s: &str) -> Operand {
        let bad = || Operand::Invalid(BadOperand::Malformed(s.to_string()));

        if let Some(inner) = s.strip_prefix('[') {
            return match inner.strip_suffix(']').and_then(parse_reg) {
                Some(idx) => Operand::Mem(idx),
                None => bad(),
            };
        }
        if let Some(idx) = parse_reg(s) {
            return Operand::Reg(idx);
        }
        let body = s.strip_prefix('#').unwrap_or(s);
        if body.starts_with(|c: char| c.is_ascii_digit()) {
            match parse_with_prefix(body) {
                Ok(v) => Operand::Imm(v),
                Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
                    Operand::Invalid(BadOperand::TooLarge(s.to_string()))
                }
                Err(_) => bad(),
            }
        } else if is_ident(body) {
            Operand::Symbol(body.to_string())
        } else {
            bad()
        }
    }

    pub fn error(&self) -> Option<Error> {
        match self {
            Operand::Invalid(bad) => Some(bad.to_error()),
            _ => None,
        }
    }
}

fn parse_reg(s: &str) -> Option<u32> {
    if s == "pc" {
        return Some(7);
    }
    let digits = s.strip_prefix('r')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

pub fn parse_with_prefix(s: &str) -> Result<u64, ParseIntError> {
    let (num, radix) = match s.get(..2) {
        Some("0b" | "0B") => (&s[2..], 2),
        Some("0o" | "0O") => (&s[2..], 8),
        Some("0x" | "0X") => (&s[2..], 16),
        _ => (s, 10),
    };
    u64::from_str_radix(num, radix)
}
