//! Two-pass assembler for the SB 16-bit instruction set.
//!
//! Source text goes through [`assemble`] into a [`MemoryImage`], which [`render`]
//! turns into a Memory Initialization File.

pub mod assembler;
pub mod directive;
pub mod encoder;
pub mod error;
pub mod ident;
pub mod image;
pub mod mif;
pub mod parser;
pub mod util;

pub use assembler::{analyze, assemble, pass1, pass2, Layout, Program};
pub use error::{Diagnostic, Error, ErrorKind};
pub use image::MemoryImage;
pub use mif::render;
