//! # Localization Sidecar Format
//!
//! This crate reads and writes the plain-text files used to edit the localization tables of
//! **OVL** archives. Extracting an archive writes every localization record to a sidecar file
//! next to it (`<archive>.txt`); repacking reads the sidecar back and rebuilds the archive.
//!
//! ## File Structure
//!
//! The sidecar is UTF-8 text with one record per line:
//!
//! ```text
//! name[!extra_int]=text
//! ```
//!
//! | Field      | Description                                                         |
//! |------------|---------------------------------------------------------------------|
//! | name       | Record name, everything before the first `=` (and before the last `!`) |
//! | extra_int  | Optional signed integer stored alongside some records               |
//! | text       | Escaped record text                                                 |
//!
//! ### Escapes
//!
//! | Character        | Escaped as |
//! |------------------|------------|
//! | `\`              | `\\`       |
//! | carriage return  | `\r`       |
//! | newline          | `\n`       |
//!
//! Any other escape sequence is rejected when reading.
//!
//! ## Additional Information
//!
//! - **File Extension**: the archive path with `.txt` appended
//! - **Line Endings**: `\n` when writing, `\n` or `\r\n` when reading
//! - Empty lines are skipped
//!

pub mod archive;
pub mod error;
pub mod escape;
pub mod read;
pub mod types;
pub mod write;

pub use archive::{extract, repack, LocalizationArchive};
pub use error::{Error, Result};
pub use types::{LocalizationEntry, LocalizationTable};
pub use write::sidecar_path;
