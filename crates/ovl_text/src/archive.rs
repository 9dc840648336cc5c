//! Extract and repack drivers for archives carrying a localization table.

use ovl_stream::Stream;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::{
    error::{Error, Result},
    types::{LocalizationEntry, LocalizationTable},
};

/// An archive format that stores localization records
///
/// The archive parser lives outside this crate; implementing this trait is enough to run
/// [`extract`] and [`repack`] on it.
pub trait LocalizationArchive: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parse the archive from the start of `stream`
    fn read(stream: &mut Stream) -> core::result::Result<Self, Self::Error>;

    /// Serialize the archive into `stream`
    fn write(&self, stream: &mut Stream) -> core::result::Result<(), Self::Error>;

    /// Every localization record, in archive order
    fn localization_entries(&self) -> Vec<LocalizationEntry>;

    /// Replace the localization records
    fn update_localization_entries(&mut self, entries: LocalizationTable);
}

fn archive_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> Error {
    Error::Archive(Box::new(err))
}

/// Write the localization records of `archive` to its sidecar, returning the sidecar path
#[instrument(err)]
pub fn extract<A: LocalizationArchive>(archive: &Path) -> Result<PathBuf> {
    let mut stream = Stream::open(archive)?;
    let parsed = A::read(&mut stream).map_err(archive_error)?;

    let table = LocalizationTable::new(parsed.localization_entries());
    info!(entries = table.len(), "extracting localization");
    table.save(archive)
}

/// Apply the sidecar of `archive` to it and overwrite the archive, returning the number of
/// records written
///
/// The archive is rebuilt in memory first so a failed rebuild leaves the file untouched.
#[instrument(err)]
pub fn repack<A: LocalizationArchive>(archive: &Path) -> Result<usize> {
    let table = LocalizationTable::load(archive)?;
    let count = table.len();

    let mut parsed = {
        let mut stream = Stream::open(archive)?;
        A::read(&mut stream).map_err(archive_error)?
    };
    parsed.update_localization_entries(table);

    let mut rebuilt = Stream::new();
    parsed.write(&mut rebuilt).map_err(archive_error)?;

    let mut output = Stream::create(archive)?;
    output.write_bytes(&rebuilt.into_bytes()?)?;
    output.close()?;

    info!(entries = count, "repacked localization");
    Ok(count)
}
