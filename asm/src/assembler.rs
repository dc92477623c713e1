use crate::{
    directive::{self, DEFAULT_DEPTH},
    encoder::{self, Value},
    error::{Diagnostic, Diagnostics, Error},
    ident::{Ident, Idents},
    image::{MemoryImage, Slot},
    parser::{parse_source, Operand, Operation, Stmt, DEPTH},
};

/// Result of pass 1. Read-only input to pass 2.
#[derive(Debug)]
pub struct Layout {
    pub idents: Idents,
    /// Reserved address per statement, parallel to the statement list.
    pub addrs: Vec<Option<usize>>,
    pub depth: usize,
    /// Final address counter.
    pub used: usize,
}

/// Parsed source together with its layout.
#[derive(Debug)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub layout: Layout,
}

// ----------------------------------------------------------------------------
// Pass 1

/// Assign addresses, collect labels and constants, apply `DEPTH`.
pub fn pass1(stmts: &[Stmt]) -> Result<Layout, Vec<Diagnostic>> {
    let mut diags = Diagnostics::new();
    let mut idents = Idents::new();
    let mut addrs = Vec::with_capacity(stmts.len());
    let mut depth: Option<usize> = None;
    let mut depth_seen = false;
    let mut pc: usize = 0;

    for stmt in stmts {
        if let Some(label) = &stmt.label {
            let defined = u16::try_from(pc)
                .map_err(|_| Error::MemoryOverflow {
                    used: pc + 1,
                    depth: depth.unwrap_or(DEFAULT_DEPTH),
                })
                .and_then(|pc| idents.define(label, Ident::Label, pc, stmt.line));
            if let Err(err) = defined {
                diags.error(stmt.line, err);
            }
        }

        // malformed operands were reported by the parser
        match &stmt.op {
            Some(Operation::Define) => {
                if !stmt.is_malformed() {
                    if let Err(err) = directive::define(stmt, &mut idents) {
                        diags.error(stmt.line, err);
                    }
                }
                addrs.push(None);
            }
            Some(Operation::Depth) => {
                if depth_seen {
                    diags.error(stmt.line, Error::DuplicateDirective(DEPTH.to_string()));
                } else {
                    depth_seen = true;
                    if !stmt.is_malformed() {
                        match directive::depth(stmt) {
                            Ok(value) => depth = Some(value),
                            Err(err) => diags.error(stmt.line, err),
                        }
                    }
                }
                addrs.push(None);
            }
            Some(Operation::Inst(_) | Operation::Unknown(_) | Operation::Word) => {
                addrs.push(Some(pc));
                pc += 1;
            }
            None => addrs.push(None),
        }
    }

    let depth = depth.unwrap_or(DEFAULT_DEPTH);
    if pc > depth {
        // blame the first statement that does not fit
        let line = stmts
            .iter()
            .zip(&addrs)
            .find(|(_, addr)| **addr == Some(depth))
            .map(|(stmt, _)| stmt.line)
            .unwrap_or_default();
        diags.error(line, Error::MemoryOverflow { used: pc, depth });
    }

    diags.finish(Layout {
        idents,
        addrs,
        depth,
        used: pc,
    })
}

// ----------------------------------------------------------------------------
// Pass 2

fn resolve(stmt: &Stmt, idents: &Idents, diags: &mut Diagnostics) -> Option<Vec<Value>> {
    let mut values = Vec::with_capacity(stmt.operands.len());
    let mut ok = true;
    for operand in &stmt.operands {
        match operand {
            Operand::Reg(idx) => values.push(Value::Reg(*idx)),
            Operand::Mem(idx) => values.push(Value::Mem(*idx)),
            Operand::Imm(v) => values.push(Value::Num(*v)),
            Operand::Symbol(name) => match idents.lookup(name) {
                Ok(v) => values.push(Value::Num(v as u64)),
                Err(err) => {
                    diags.error(stmt.line, err);
                    ok = false;
                }
            },
            Operand::Invalid(bad) => {
                diags.error(stmt.line, bad.to_error());
                ok = false;
            }
        }
    }
    ok.then_some(values)
}

/// Resolve symbols and encode every reserved word into a fresh image.
pub fn pass2(stmts: &[Stmt], layout: &Layout) -> Result<MemoryImage, Vec<Diagnostic>> {
    let mut diags = Diagnostics::new();
    let mut image = MemoryImage::new(layout.depth);

    for (stmt, addr) in stmts.iter().zip(&layout.addrs) {
        let Some(addr) = *addr else {
            continue;
        };
        let slot = match &stmt.op {
            Some(Operation::Word) => directive::word(stmt).map(Slot::Data),
            Some(Operation::Inst(mnemonic)) => {
                let Some(values) = resolve(stmt, &layout.idents, &mut diags) else {
                    continue;
                };
                encoder::encode(*mnemonic, &values, layout.depth).map(Slot::Inst)
            }
            _ => continue,
        };
        match slot {
            Ok(slot) => image.write(addr, slot),
            Err(err) => diags.error(stmt.line, err),
        }
    }

    diags.finish(image)
}

// ----------------------------------------------------------------------------
// Driver

/// Parse and run pass 1. Syntax errors and pass 1 errors are reported together.
pub fn analyze(source: &str) -> Result<Program, Vec<Diagnostic>> {
    let (stmts, mut diags) = parse_source(source);
    match pass1(&stmts) {
        Ok(layout) => diags.finish(Program { stmts, layout }),
        Err(errs) => {
            diags.extend(errs);
            Err(diags.into_vec())
        }
    }
}

/// Assemble source text into a memory image. Pass 2 only runs on a clean pass 1.
pub fn assemble(source: &str) -> Result<MemoryImage, Vec<Diagnostic>> {
    let program = analyze(source)?;
    pass2(&program.stmts, &program.layout)
}
