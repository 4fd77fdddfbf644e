//! Repository parsing and chunking pipeline.
//!
//! Turns a source tree into a [`model::ParsedRepository`]: per-file language
//! identification, extracted declarations with line provenance, and
//! bounded-size content chunks for downstream indexing.
//!
//! Control flow: [`walker`] → [`languages`] → {[`python`] | [`generic`]} →
//! [`chunker`]. Every component returns a fully-formed value; per-file
//! failures are carried on [`model::ParsedFile::error`] instead of aborting
//! the walk.

pub mod chunker;
pub mod generic;
pub mod languages;
pub mod model;
pub mod python;
pub mod walker;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while parsing a repository.
///
/// Only [`ParseError::PathNotFound`] aborts a repository walk; the other
/// kinds are recovered per file and recorded on that file's result.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("repository path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub use languages::Language;
pub use model::{
    Chunk, ClassInfo, FunctionInfo, ImportInfo, ImportKind, ParsedFile, ParsedRepository,
};
pub use walker::RepoParser;
