use color_print::ceprintln;
use strum::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Syntax(String),

    #[error("Re-defined symbol: `{0}`")]
    DuplicateSymbol(String),

    #[error("Undefined symbol: `{0}`")]
    UndefinedSymbol(String),

    #[error("Unknown register: `{0}`")]
    InvalidRegister(String),

    #[error("{0}")]
    OperandType(String),

    #[error("Value {value:#x} does not fit in {context} (max {max:#x})")]
    ImmediateRange {
        value: u64,
        max: u64,
        context: &'static str,
    },

    #[error("Literal `{0}` does not fit in 64 bits")]
    LiteralOverflow(String),

    #[error("Memory depth must be a positive multiple of 2 no larger than 65536, found {0}")]
    InvalidDepth(u64),

    #[error("Directive `{0}` may only appear once")]
    DuplicateDirective(String),

    #[error("Program needs {used} words but memory depth is {depth}")]
    MemoryOverflow { used: usize, depth: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    SyntaxError,
    DuplicateSymbolError,
    UndefinedSymbolError,
    InvalidRegisterError,
    OperandTypeError,
    ImmediateRangeError,
    InvalidDepthError,
    DuplicateDirectiveError,
    MemoryOverflowError,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::SyntaxError,
            Error::DuplicateSymbol(_) => ErrorKind::DuplicateSymbolError,
            Error::UndefinedSymbol(_) => ErrorKind::UndefinedSymbolError,
            Error::InvalidRegister(_) => ErrorKind::InvalidRegisterError,
            Error::OperandType(_) => ErrorKind::OperandTypeError,
            Error::ImmediateRange { .. } | Error::LiteralOverflow(_) => {
                ErrorKind::ImmediateRangeError
            }
            Error::InvalidDepth(_) => ErrorKind::InvalidDepthError,
            Error::DuplicateDirective(_) => ErrorKind::DuplicateDirectiveError,
            Error::MemoryOverflow { .. } => ErrorKind::MemoryOverflowError,
        }
    }

    /// Attach the 1-based source line the error came from.
    pub fn at(self, line: usize) -> Diagnostic {
        Diagnostic { line, error: self }
    }
}

// ----------------------------------------------------------------------------
// Diagnostic

#[derive(Debug)]
pub struct Diagnostic {
    line: usize,
    error: Error,
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Print with file location and the offending source line.
    pub fn print_diag(&self, file: &str, lines: &[&str]) {
        ceprintln!("<red,bold>error[{}]</>: {}", self.kind(), self.error);
        ceprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        ceprintln!("      <blue>|</>");
        let content = lines.get(self.line.wrapping_sub(1)).copied().unwrap_or("");
        ceprintln!(" <blue>{:>4} |</> {}", self.line, content);
        ceprintln!("      <blue>|</>");
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind(), self.error)
    }
}

// ----------------------------------------------------------------------------
// Diagnostics

/// Errors collected over one phase. A phase keeps going after an error so every
/// problem in it is reported together.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.0.push(diag);
    }

    pub fn error(&mut self, line: usize, error: Error) {
        self.push(error.at(line));
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        self.0.extend(diags);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All recorded diagnostics, ordered by line.
    pub fn into_vec(mut self) -> Vec<Diagnostic> {
        self.0.sort_by_key(|d| d.line);
        self.0
    }

    /// Close the phase: `value` if nothing was recorded, all diagnostics otherwise.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<Diagnostic>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.into_vec())
        }
    }
}
