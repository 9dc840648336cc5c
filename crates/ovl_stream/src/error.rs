//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// fewer bytes remain than the read requires
    #[error("unexpected end of stream reading {requested} bytes at offset {offset:#x}")]
    EndOfStream {
        /// Cursor position when the read started
        offset: u64,
        /// Number of bytes the read needed
        requested: usize,
    },

    /// offset-indirected access beyond the end of the stream
    #[error("offset {offset:#x} is out of bounds for a stream of {size} bytes")]
    OffsetOutOfBounds {
        /// Requested absolute offset
        offset: u64,
        /// Size of the stream at the time of the request
        size: u64,
    },

    /// a byte that is not ASCII was found while decoding a string
    #[error("invalid ascii byte {byte:#04x} at offset {offset:#x}")]
    InvalidAscii {
        /// Position of the offending byte
        offset: u64,
        /// The offending byte
        byte: u8,
    },

    /// a character that is not ASCII was passed to a string writer
    #[error("character {0:?} cannot be encoded as ascii")]
    NonAscii(char),

    /// tags are exactly four ascii characters
    #[error("invalid tag {0:?}")]
    InvalidTag(String),

    /// string does not fit into a fixed-length field
    #[error("string of {length} bytes does not fit into {max} bytes")]
    StringTooLong {
        /// Length of the string
        length: usize,
        /// Size of the field
        max: usize,
    },

    /// the compressed sub-stream could not be inflated
    #[error("unable to decompress data at offset {offset:#x}")]
    Decompression {
        /// Cursor position where the compressed data started
        offset: u64,
        /// Error reported by the decoder
        #[source]
        source: std::io::Error,
    },

    /// {0} cannot be represented by the packed encoding
    #[error("{0} cannot be represented by the packed encoding")]
    ValueOutOfRange(f32),

    /// alignment must be non-zero
    #[error("alignment must be non-zero")]
    InvalidAlignment,

    /// the stream has been closed
    #[error("stream is closed")]
    Closed,

    /// the stream is not backed by an in-memory buffer
    #[error("stream is not backed by an in-memory buffer")]
    NotBuffered,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
