//! Parsing sidecar files

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    escape::unescape,
    types::{LocalizationEntry, LocalizationTable},
    write::sidecar_path,
};

impl FromStr for LocalizationEntry {
    type Err = Error;

    /// Parse one `name[!extra_int]=text` line
    ///
    /// The name ends at the first `=`, so names cannot contain one. The extra integer
    /// starts after the last `!` of the name.
    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        let (name, text) = line.split_once('=').ok_or(Error::MissingSeparator)?;

        let (name, extra_int) = match name.rsplit_once('!') {
            Some((name, extra)) => {
                let value = extra
                    .trim()
                    .parse::<i64>()
                    .map_err(|source| Error::InvalidExtraInt {
                        value: extra.to_owned(),
                        source,
                    })?;
                (name, Some(value))
            }
            None => (name, None),
        };

        Ok(LocalizationEntry {
            name: name.to_owned(),
            extra_int,
            text: unescape(text)?,
        })
    }
}

impl LocalizationTable {
    /// Parse every line of a sidecar, skipping empty lines
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                trace!(line = index + 1, "skipping empty line");
                continue;
            }

            let entry = line
                .parse::<LocalizationEntry>()
                .map_err(|source| Error::Line {
                    line: index + 1,
                    source: Box::new(source),
                })?;
            entries.push(entry);
        }
        Ok(Self::new(entries))
    }

    /// Load the sidecar that belongs to `archive`
    #[instrument(err)]
    pub fn load(archive: &Path) -> Result<Self> {
        let path = sidecar_path(archive);
        let table = Self::read(BufReader::new(File::open(&path)?))?;
        debug!(path = %path.display(), entries = table.len(), "loaded sidecar");
        Ok(table)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::types::{LocalizationEntry, LocalizationTable};

    #[test]
    fn parse_entry_with_extra_int() -> Result<()> {
        let entry: LocalizationEntry = r"greeting!3=Hello\nWorld".parse()?;
        assert_eq!(
            entry,
            LocalizationEntry::new("greeting".into(), Some(3), "Hello\nWorld".into())
        );
        Ok(())
    }

    #[test]
    fn parse_entry_edge_cases() -> Result<()> {
        // only the first '=' separates
        let entry: LocalizationEntry = "formula=a=b".parse()?;
        assert_eq!(entry.name, "formula");
        assert_eq!(entry.text, "a=b");

        // the last '!' of the name starts the integer
        let entry: LocalizationEntry = "wow!!-12=".parse()?;
        assert_eq!(entry.name, "wow!");
        assert_eq!(entry.extra_int, Some(-12));
        assert_eq!(entry.text, "");

        // '!' inside the text is text
        let entry: LocalizationEntry = "shout=hey!".parse()?;
        assert_eq!(entry.name, "shout");
        assert_eq!(entry.extra_int, None);
        assert_eq!(entry.text, "hey!");

        Ok(())
    }

    #[test]
    fn parse_entry_errors() {
        assert!(matches!(
            "no separator".parse::<LocalizationEntry>(),
            Err(Error::MissingSeparator)
        ));
        assert!(matches!(
            "name!abc=text".parse::<LocalizationEntry>(),
            Err(Error::InvalidExtraInt { value, .. }) if value == "abc"
        ));
        assert!(matches!(
            r"name=bad\q".parse::<LocalizationEntry>(),
            Err(Error::InvalidEscape(_))
        ));
    }

    #[traced_test]
    #[test]
    fn read_table() -> Result<()> {
        let data = "a=1\r\n\nb!7=two\\nlines\n\r\nc=\n";
        let table = LocalizationTable::read(data.as_bytes())?;

        assert_eq!(
            table,
            LocalizationTable::new(vec![
                LocalizationEntry::new("a".into(), None, "1".into()),
                LocalizationEntry::new("b".into(), Some(7), "two\nlines".into()),
                LocalizationEntry::new("c".into(), None, "".into()),
            ])
        );
        Ok(())
    }

    #[test]
    fn read_table_reports_line() {
        let data = "a=1\n\nbroken\n";
        assert!(matches!(
            LocalizationTable::read(data.as_bytes()),
            Err(Error::Line { line: 3, source }) if matches!(*source, Error::MissingSeparator)
        ));
    }
}
