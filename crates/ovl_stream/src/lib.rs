//! This library provides the binary stream used to read and rewrite **OVL** archives.
//!
//! # Binary Stream
//!
//! A [`Stream`] wraps an in-memory buffer or a file and exposes it as a cursor-addressed
//! sequence of fields. Archive parsers use it to read headers, follow absolute offsets to
//! substructures stored out of order, and decode the compact numeric encodings of the format.
//!
//! ## Construction
//!
//! | Constructor                    | Backing                  | Notes                                      |
//! |--------------------------------|--------------------------|--------------------------------------------|
//! | [`Stream::new`]                | Empty buffer             | Extract the result with [`Stream::into_bytes`] |
//! | [`Stream::from_bytes`]         | Buffer                   | Wraps the given bytes                      |
//! | [`Stream::open`]               | Buffer                   | Whole file read into memory                |
//! | [`Stream::create`]             | File (write)             | Must be [`Stream::close`]d                 |
//! | [`Stream::from_reader`]        | Buffer                   | Copies the remaining bytes, drops the reader |
//! | [`Stream::from_read_handle`]   | Buffer or File (read)    | [`StreamOptions::copy_handle`] opts out of copying |
//! | [`Stream::from_write_handle`]  | File (write)             | Must be [`Stream::close`]d                 |
//!
//! ## Scalars
//!
//! All multi-byte values are little-endian.
//!
//! | Kind            | Width (bytes) | Read / Peek / Write                         |
//! |-----------------|---------------|---------------------------------------------|
//! | `i8` / `u8`     | 1             | `read_i8`, `peek_i8`, `write_i8`, ...       |
//! | `i16` / `u16`   | 2             | `read_u16`, `peek_u16`, `write_u16`, ...    |
//! | `i32` / `u32`   | 4             | `read_u32`, `peek_u32`, `write_u32`, ...    |
//! | `i64` / `u64`   | 8             | `read_u64`, `peek_u64`, `write_u64`, ...    |
//! | `f16` (IEEE)    | 2             | `read_f16`, `peek_f16`, `write_f16`         |
//! | `f32` / `f64`   | 4 / 8         | `read_f32`, `peek_f64`, `write_f32`, ...    |
//!
//! Several adjacent fields can be decoded at once with [`Stream::read_many`] and a slice of
//! [`ScalarKind`].
//!
//! ## Packed Vector
//!
//! Three components packed into one little-endian `u64`, starting from the low bits:
//!
//! | Bits    | Field                               |
//! |---------|-------------------------------------|
//! | 0..20   | X magnitude                         |
//! | 20      | X sign (0 subtracts `0x100000`)     |
//! | 21..41  | Y magnitude                         |
//! | 41      | Y sign                              |
//! | 42..62  | Z magnitude                         |
//! | 62      | Z sign                              |
//!
//! Each folded component `v` is dequantized as `(v + 512.5) / 2048`.
//!
//! ## Packed Half
//!
//! A little-endian `u16` with the top bit as sign and the low 15 bits as magnitude. A clear
//! sign bit subtracts `32768` from the magnitude and the result is divided by `2048`. This is
//! not IEEE-754 binary16, which is available separately through [`Stream::read_f16`].
//!
//! ## Compressed Sub-streams
//!
//! [`Stream::unzip`] inflates every byte from the cursor to the end (a zlib-wrapped deflate
//! block) into a new, independent stream.
//!

pub mod compression;
pub mod error;
pub mod packed;
pub mod read;
pub mod stream;
pub mod types;
pub mod write;

pub use error::{Error, Result};
pub use packed::{decode_packed_half, decode_packed_vector, encode_packed_half, encode_packed_vector};
pub use stream::{PositionGuard, Stream, StreamOptions, StreamState};
pub use types::{Scalar, ScalarKind};
