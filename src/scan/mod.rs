//! Source tree scanning.
//!
//! Files are selected with discovery globs, split into logical lines by a
//! lightweight lexer, and mined for import statements and class definitions.
//! The analysis is purely syntactic: no name resolution or type inference is
//! attempted, so dynamically constructed imports are invisible.
//!
//! - [`discovery`] - glob-based file selection
//! - [`lexer`] - logical lines, comment and string stripping
//! - [`imports`] - import statement normalisation
//! - [`classes`] - class definitions and their direct members
//! - [`graph`] - the per-file [`ImportGraph`]

pub mod classes;
pub mod discovery;
pub mod graph;
pub mod imports;
pub mod lexer;

pub use classes::{find_classes, ClassDef};
pub use discovery::{discover, relative_path};
pub use graph::{parse_source, FileImports, ImportGraph, ImportGraphScanner};
pub use imports::{extract_imports, ImportedModule};
pub use lexer::{logical_lines, LexError, LogicalLine};
