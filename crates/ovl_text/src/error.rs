//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`ovl_stream::Error`]
    #[error(transparent)]
    StreamError(#[from] ovl_stream::Error),

    /// Escape sequence other than `\\`, `\r` or `\n`
    #[error("unrecognized escape sequence {0:?}")]
    InvalidEscape(String),

    /// Line has no `=` between name and text
    #[error("missing '=' between name and text")]
    MissingSeparator,

    /// Value after `!` is not an integer
    #[error("invalid extra integer {value:?}")]
    InvalidExtraInt {
        /// The text that failed to parse
        value: String,
        /// Parser error
        #[source]
        source: std::num::ParseIntError,
    },

    /// A sidecar line could not be parsed
    #[error("invalid entry on line {line}")]
    Line {
        /// One-based line number
        line: usize,
        /// What was wrong with the line
        #[source]
        source: Box<Error>,
    },

    /// The archive could not be read or rebuilt
    #[error("unable to process archive")]
    Archive(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
