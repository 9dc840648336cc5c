//! Writing sidecar files

use std::{
    ffi::OsString,
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::{
    error::Result,
    escape::escape,
    types::{LocalizationEntry, LocalizationTable},
};

/// The sidecar path for an archive: the archive path with `.txt` appended
///
/// ```
/// use std::path::Path;
///
/// let path = ovl_text::sidecar_path(Path::new("Main.ovl"));
/// assert_eq!(path, Path::new("Main.ovl.txt"));
/// ```
pub fn sidecar_path(archive: &Path) -> PathBuf {
    let mut path = OsString::from(archive.as_os_str());
    path.push(".txt");
    PathBuf::from(path)
}

impl fmt::Display for LocalizationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(extra) = self.extra_int {
            write!(f, "!{extra}")?;
        }
        write!(f, "={}", escape(&self.text))
    }
}

impl LocalizationTable {
    /// Write one line per entry
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for entry in self.iter() {
            writeln!(writer, "{entry}")?;
        }
        Ok(())
    }

    /// Write the sidecar that belongs to `archive`, returning its path
    #[instrument(skip(self), err)]
    pub fn save(&self, archive: &Path) -> Result<PathBuf> {
        let path = sidecar_path(archive);

        let mut writer = BufWriter::new(File::create(&path)?);
        self.write(&mut writer)?;
        writer.flush()?;

        debug!(path = %path.display(), entries = self.len(), "saved sidecar");
        Ok(path)
    }
}
