use ovl_stream::Stream;
use ovl_text::{
    extract, repack, sidecar_path, LocalizationArchive, LocalizationEntry, LocalizationTable,
};
use pretty_assertions::assert_eq;
use std::{fs, path::Path};
use tempfile::TempDir;
use thiserror::Error;
use tracing_test::traced_test;

/// Minimal archive: a header, a record table of offsets and a string pool
///
/// ```text
/// "LOCL" u32:count
/// count * { u32:name_offset u8:has_extra i64:extra u32:text_offset }
/// pool: names as C strings, texts as u32:length + UTF-8
/// ```
#[derive(Debug, PartialEq)]
struct ToyArchive {
    version: u32,
    entries: Vec<LocalizationEntry>,
}

#[derive(Error, Debug)]
enum ToyError {
    #[error(transparent)]
    Stream(#[from] ovl_stream::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("unexpected tag {0:?}")]
    BadTag(String),
}

const RECORD_SIZE: u64 = 17;

fn read_text(stream: &mut Stream) -> ovl_stream::Result<Vec<u8>> {
    let length = stream.read_u32()?;
    stream.read_bytes(length as usize)
}

impl LocalizationArchive for ToyArchive {
    type Error = ToyError;

    fn read(stream: &mut Stream) -> Result<Self, ToyError> {
        let tag = stream.read_tag()?;
        if tag != "LOCL" {
            return Err(ToyError::BadTag(tag));
        }
        let version = stream.read_u32()?;
        let count = stream.read_u32()?;

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name_offset = stream.read_u32()?;
            let has_extra = stream.read_u8()? != 0;
            let extra = stream.read_i64()?;
            let text_offset = stream.read_u32()?;

            let name = stream.read_from_offset(name_offset.into(), Stream::read_cstring)?;
            let text = stream.read_from_offset(text_offset.into(), read_text)?;
            entries.push(LocalizationEntry {
                name,
                extra_int: has_extra.then_some(extra),
                text: String::from_utf8(text)?,
            });
        }

        Ok(ToyArchive { version, entries })
    }

    fn write(&self, stream: &mut Stream) -> Result<(), ToyError> {
        stream.write_tag("LOCL")?;
        stream.write_u32(self.version)?;
        stream.write_u32(self.entries.len() as u32)?;

        let table = stream.tell()?;
        stream.fill(RECORD_SIZE * self.entries.len() as u64)?;

        for (i, entry) in self.entries.iter().enumerate() {
            let record = table + RECORD_SIZE * i as u64;

            let name_offset = stream.tell()? as u32;
            stream.write_ascii(&entry.name, true)?;
            let text_offset = stream.tell()? as u32;
            stream.write_u32(entry.text.len() as u32)?;
            stream.write_bytes(entry.text.as_bytes())?;

            stream.write_to_offset(record, Stream::write_u32, name_offset, false)?;
            stream.write_to_offset(record + 4, Stream::write_u8, entry.extra_int.is_some() as u8, false)?;
            stream.write_to_offset(record + 5, Stream::write_i64, entry.extra_int.unwrap_or(0), false)?;
            stream.write_to_offset(record + 13, Stream::write_u32, text_offset, false)?;
        }

        Ok(())
    }

    fn localization_entries(&self) -> Vec<LocalizationEntry> {
        self.entries.clone()
    }

    fn update_localization_entries(&mut self, entries: LocalizationTable) {
        self.entries = entries.into_iter().collect();
    }
}

fn toy_archive() -> ToyArchive {
    ToyArchive {
        version: 19,
        entries: vec![
            LocalizationEntry::new("greeting".into(), Some(3), "Hello\nWorld".into()),
            LocalizationEntry::new("path".into(), None, "C:\\games\r\n".into()),
            LocalizationEntry::new("empty".into(), Some(-1), String::new()),
        ],
    }
}

fn write_archive(path: &Path, archive: &ToyArchive) -> Result<(), ToyError> {
    let mut stream = Stream::create(path)?;
    archive.write(&mut stream)?;
    stream.close()?;
    Ok(())
}

fn read_archive(path: &Path) -> Result<ToyArchive, ToyError> {
    let mut stream = Stream::open(path)?;
    ToyArchive::read(&mut stream)
}

#[test]
fn toy_archive_round_trips() -> Result<(), ToyError> {
    let archive = toy_archive();

    let mut stream = Stream::new();
    archive.write(&mut stream)?;
    stream.seek(std::io::SeekFrom::Start(0))?;

    assert_eq!(ToyArchive::read(&mut stream)?, archive);
    Ok(())
}

#[traced_test]
#[test]
fn extract_writes_sidecar() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("Main.ovl");
    write_archive(&path, &toy_archive())?;

    let sidecar = extract::<ToyArchive>(&path)?;
    assert_eq!(sidecar, sidecar_path(&path));
    assert_eq!(
        fs::read_to_string(&sidecar)?,
        "greeting!3=Hello\\nWorld\npath=C:\\\\games\\r\\n\nempty!-1=\n"
    );

    // extraction leaves the archive alone
    assert_eq!(read_archive(&path)?, toy_archive());
    Ok(())
}

#[traced_test]
#[test]
fn repack_applies_sidecar() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("Main.ovl");
    write_archive(&path, &toy_archive())?;

    extract::<ToyArchive>(&path)?;
    let sidecar = sidecar_path(&path);
    let edited = fs::read_to_string(&sidecar)?
        .replace("Hello\\nWorld", "Hallo\\nWelt")
        .replace("empty!-1=", "empty!42=now filled");
    fs::write(&sidecar, edited)?;

    assert_eq!(repack::<ToyArchive>(&path)?, 3);

    let repacked = read_archive(&path)?;
    assert_eq!(repacked.version, 19);
    assert_eq!(
        repacked.entries,
        vec![
            LocalizationEntry::new("greeting".into(), Some(3), "Hallo\nWelt".into()),
            LocalizationEntry::new("path".into(), None, "C:\\games\r\n".into()),
            LocalizationEntry::new("empty".into(), Some(42), "now filled".into()),
        ]
    );
    Ok(())
}

#[test]
fn repack_rejects_broken_sidecar() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("Main.ovl");
    write_archive(&path, &toy_archive())?;
    let before = fs::read(&path)?;

    fs::write(sidecar_path(&path), "greeting!3=fine\nbroken line\n")?;

    assert!(matches!(
        repack::<ToyArchive>(&path),
        Err(ovl_text::error::Error::Line { line: 2, .. })
    ));
    assert_eq!(fs::read(&path)?, before);
    Ok(())
}

#[test]
fn extract_reports_archive_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("Bad.ovl");
    fs::write(&path, b"NOPE\0\0\0\0")?;

    assert!(matches!(
        extract::<ToyArchive>(&path),
        Err(ovl_text::error::Error::Archive(_))
    ));
    assert!(!sidecar_path(&path).exists());
    Ok(())
}

#[test]
fn missing_sidecar() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("Main.ovl");
    write_archive(&path, &toy_archive())?;

    assert!(matches!(
        LocalizationTable::load(&path),
        Err(ovl_text::error::Error::IOError(_))
    ));
    assert!(matches!(
        repack::<ToyArchive>(&path),
        Err(ovl_text::error::Error::IOError(_))
    ));
    Ok(())
}
