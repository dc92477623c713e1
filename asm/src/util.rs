use color_print::cformat;

use crate::{assembler::Program, image::MemoryImage, image::Slot};

/// One listing row per source line: `[addr] word | line: source`.
pub fn dump(source: &str, program: &Program, image: &MemoryImage) -> Vec<String> {
    let mut reserved = program
        .stmts
        .iter()
        .zip(&program.layout.addrs)
        .filter_map(|(stmt, addr)| addr.map(|addr| (stmt.line, addr)))
        .peekable();

    source
        .lines()
        .enumerate()
        .map(|(idx, raw)| {
            let line = idx + 1;
            match reserved.next_if(|(l, _)| *l == line) {
                Some((_, addr)) => {
                    let bits = match image.slot(addr) {
                        Slot::Inst(inst) => cformat!("<g>{:04X}</>", inst.encode()),
                        Slot::Data(word) => cformat!("<y>{:04X}</>", word),
                        Slot::Empty => cformat!("<r,s>!!!!</>"),
                    };
                    format!("[{:04X}] {} | {:>4}: {}", addr, bits, line, raw)
                }
                None => format!("{:11}| {:>4}: {}", "", line, raw),
            }
        })
        .collect()
}

pub fn print_dump(source: &str, program: &Program, image: &MemoryImage) {
    println!("-----------+------------------------------------------------");
    for row in dump(source, program, image) {
        println!("{}", row);
    }
    println!("-----------+------------------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{analyze, pass2};

    #[test]
    fn rows_follow_source() {
        let source = "start: mv r0, #1\n// hi\n.word 0x2A\n";
        let program = analyze(source).unwrap();
        let image = pass2(&program.stmts, &program.layout).unwrap();
        let rows = dump(source, &program, &image);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("[0000] "));
        assert!(rows[0].ends_with("   1: start: mv r0, #1"));
        assert_eq!(rows[1], format!("{:11}|    2: // hi", ""));
        assert!(rows[2].starts_with("[0001] "));
    }
}
