use color_print::{ceprintln, cprintln};
use std::process::ExitCode;
use thiserror::Error;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input assembly file
    input: String,

    /// Output MIF file (`.mif` is appended when missing)
    #[clap(default_value = "a.mif")]
    output: String,

    /// Print an address / word / source listing
    #[clap(short, long)]
    dump: bool,

    /// Write the symbol table as YAML
    #[clap(short, long, value_name = "PATH")]
    symbols: Option<String>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to serialize symbols")]
    Symbols(#[from] serde_yaml::Error),

    #[error("Could not assemble `{0}` due to {1} previous error(s)")]
    Aborted(String, usize),
}

fn output_path(output: &str) -> String {
    if output.ends_with(".mif") {
        output.to_string()
    } else {
        format!("{}.mif", output)
    }
}

/// Render the MIF text and, when asked for, the symbol table. Nothing is written
/// until both are ready.
fn render_outputs(
    program: &sbasm::Program,
    image: &sbasm::MemoryImage,
    symbols: bool,
) -> Result<(String, Option<String>), CliError> {
    let mif = sbasm::render(image);
    let yaml = if symbols {
        Some(serde_yaml::to_string(&program.layout.idents)?)
    } else {
        None
    };
    Ok((mif, yaml))
}

fn run(args: &Args) -> Result<(), CliError> {
    let source = std::fs::read_to_string(&args.input)
        .map_err(|err| CliError::FileRead(args.input.clone(), err))?;
    let lines: Vec<&str> = source.lines().collect();
    let abort = |errs: Vec<sbasm::Diagnostic>| {
        for diag in &errs {
            diag.print_diag(&args.input, &lines);
        }
        CliError::Aborted(args.input.clone(), errs.len())
    };

    println!("1. Parse Lines & Collect Symbols");
    println!("  < {}", args.input);
    let program = sbasm::analyze(&source).map_err(abort)?;
    println!(
        "  - {} words, {} symbols, depth {}",
        program.layout.used,
        program.layout.idents.len(),
        program.layout.depth
    );

    println!("2. Resolve Symbols & Encode");
    let image = sbasm::pass2(&program.stmts, &program.layout).map_err(abort)?;

    if args.dump {
        sbasm::util::print_dump(&source, &program, &image);
    }

    println!("3. Write Memory Image");
    let (mif, yaml) = render_outputs(&program, &image, args.symbols.is_some())?;
    let output = output_path(&args.output);
    println!("  > {}", output);
    std::fs::write(&output, mif).map_err(|err| CliError::FileWrite(output.clone(), err))?;

    if let (Some(path), Some(yaml)) = (&args.symbols, yaml) {
        println!("  > {}", path);
        std::fs::write(path, yaml).map_err(|err| CliError::FileWrite(path.clone(), err))?;
    }

    cprintln!("<green,bold>Finished</> {} / {} words", image.used(), image.depth());
    Ok(())
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse();
    println!("SB16 Assembler");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ceprintln!("<red,bold>error</>: {}", err);
            if let Some(source) = std::error::Error::source(&err) {
                ceprintln!("  <blue>caused by</>: {}", source);
            }
            ExitCode::FAILURE
        }
    }
}

#[test]
fn test_output_path() {
    assert_eq!(output_path("a.mif"), "a.mif");
    assert_eq!(output_path("prog"), "prog.mif");
    assert_eq!(output_path("out/prog.hex"), "out/prog.hex.mif");
}

#[test]
fn test_render_outputs() {
    let program = sbasm::analyze("start: mv r0, #1\n.define LIMIT 3\nb start\n").unwrap();
    let image = sbasm::pass2(&program.stmts, &program.layout).unwrap();

    let (mif, yaml) = render_outputs(&program, &image, false).unwrap();
    assert!(mif.starts_with("WIDTH = 16;"));
    assert!(mif.ends_with("END;\n"));
    assert_eq!(yaml, None);

    let (_, yaml) = render_outputs(&program, &image, true).unwrap();
    let yaml = yaml.unwrap();
    assert!(yaml.contains("start:"));
    assert!(yaml.contains("LIMIT:"));
}
