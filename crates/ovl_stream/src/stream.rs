//! The binary stream, its construction and cursor control
//!

use bon::Builder;
use std::{
    fmt,
    fs::File,
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    mem,
    ops::{Deref, DerefMut},
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// Options applied when adopting a caller-supplied read handle
///
/// ```
/// use ovl_stream::StreamOptions;
///
/// let options = StreamOptions::builder().copy_handle(false).build();
/// assert!(!options.copy_handle);
/// ```
#[derive(Debug, Clone, Copy, Builder)]
pub struct StreamOptions {
    /// Copy the remaining contents of the handle into memory and release the handle
    #[builder(default = true)]
    pub copy_handle: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Lifecycle of the resource behind a [`Stream`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamState {
    /// Backed by an owned in-memory buffer
    Buffered,

    /// Reading directly from an adopted file handle
    ReadingFile,

    /// Writing to a file handle which is released by [`Stream::close`]
    WritingFile,

    /// The file handle has been released
    Closed,
}

pub(crate) enum Backing {
    Buffer(Cursor<Vec<u8>>),
    File(File),
}

impl Read for Backing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Backing::Buffer(c) => c.read(buf),
            Backing::File(f) => f.read(buf),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        match self {
            Backing::Buffer(c) => c.read_exact(buf),
            Backing::File(f) => f.read_exact(buf),
        }
    }
}

impl Write for Backing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Backing::Buffer(c) => c.write(buf),
            Backing::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Backing::Buffer(c) => c.flush(),
            Backing::File(f) => f.flush(),
        }
    }
}

impl Seek for Backing {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Backing::Buffer(c) => c.seek(pos),
            Backing::File(f) => f.seek(pos),
        }
    }
}

/// Cursor-addressed access to a byte buffer or file
///
/// ```
/// # fn doit() -> ovl_stream::Result<()>
/// # {
/// use ovl_stream::Stream;
///
/// let mut stream = Stream::new();
/// stream.write_tag("FRES")?;
/// stream.write_u32(0x24)?;
///
/// stream.seek(std::io::SeekFrom::Start(0))?;
/// assert_eq!(stream.read_tag()?, "FRES");
/// assert_eq!(stream.read_u32()?, 0x24);
/// assert!(!stream.has_remaining()?);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct Stream {
    backing: Backing,
    state: StreamState,
}

impl Stream {
    /// Start with an empty in-memory buffer
    pub fn new() -> Stream {
        Stream::from_bytes(Vec::new())
    }

    /// Wrap a byte sequence in an in-memory buffer, with the cursor at the start
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Stream {
        Stream {
            backing: Backing::Buffer(Cursor::new(bytes.into())),
            state: StreamState::Buffered,
        }
    }

    /// Read a whole file into memory. The file handle is released before returning.
    #[instrument(skip_all, err)]
    pub fn open(path: impl AsRef<Path>) -> Result<Stream> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), size = data.len(), "buffered file");

        Ok(Stream::from_bytes(data))
    }

    /// Create (or truncate) a file for writing
    #[instrument(skip_all, err)]
    pub fn create(path: impl AsRef<Path>) -> Result<Stream> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "opened file for writing");

        Ok(Stream::from_write_handle(file))
    }

    /// Copy the remaining contents of a reader into memory, dropping the reader afterwards
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Stream> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        Ok(Stream::from_bytes(data))
    }

    /// Adopt a file handle opened for reading
    ///
    /// By default the remaining contents are copied into memory and the handle is released.
    /// With [`StreamOptions::copy_handle`] unset the handle is read from directly.
    pub fn from_read_handle(file: File, options: StreamOptions) -> Result<Stream> {
        if options.copy_handle {
            return Stream::from_reader(file);
        }

        Ok(Stream {
            backing: Backing::File(file),
            state: StreamState::ReadingFile,
        })
    }

    /// Adopt a file handle opened for writing
    pub fn from_write_handle(file: File) -> Stream {
        Stream {
            backing: Backing::File(file),
            state: StreamState::WritingFile,
        }
    }

    /// The lifecycle state of the underlying resource
    pub fn state(&self) -> StreamState {
        self.state
    }

    pub(crate) fn backing(&mut self) -> Result<&mut Backing> {
        match self.state {
            StreamState::Closed => Err(Error::Closed),
            _ => Ok(&mut self.backing),
        }
    }

    fn backing_io(&mut self) -> io::Result<&mut Backing> {
        match self.state {
            StreamState::Closed => Err(io::Error::other("stream is closed")),
            _ => Ok(&mut self.backing),
        }
    }

    /// Current cursor offset
    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.backing()?.stream_position()?)
    }

    /// Move the cursor relative to the start, the current position or the end
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.backing()?.seek(pos)?)
    }

    /// Move the cursor backwards
    pub fn rewind(&mut self, amount: u64) -> Result<u64> {
        self.seek(SeekFrom::Current(-relative(amount)?))
    }

    /// Move the cursor forwards
    pub fn skip(&mut self, amount: u64) -> Result<u64> {
        self.seek(SeekFrom::Current(relative(amount)?))
    }

    /// Total length of the underlying sequence. The cursor is left untouched.
    pub fn size(&mut self) -> Result<u64> {
        let backing = self.backing()?;
        let current = backing.stream_position()?;
        let end = backing.seek(SeekFrom::End(0))?;
        backing.seek(SeekFrom::Start(current))?;

        Ok(end)
    }

    /// Whether the cursor is before the end of the stream
    pub fn has_remaining(&mut self) -> Result<bool> {
        Ok(self.tell()? < self.size()?)
    }

    /// Save the cursor, restoring it when the returned guard is dropped
    ///
    /// The guard dereferences to the stream, so any operation can run through it. The saved
    /// position is restored on every exit path, including early returns and errors.
    ///
    /// ```
    /// # fn doit() -> ovl_stream::Result<()>
    /// # {
    /// let mut stream = ovl_stream::Stream::from_bytes(vec![1, 0, 2, 0]);
    /// {
    ///     let mut scope = stream.scoped_position()?;
    ///     scope.skip(2)?;
    ///     assert_eq!(scope.read_u16()?, 2);
    /// }
    /// assert_eq!(stream.tell()?, 0);
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    pub fn scoped_position(&mut self) -> Result<PositionGuard<'_>> {
        let position = self.tell()?;
        Ok(PositionGuard {
            stream: self,
            position,
        })
    }

    /// Run `f` and restore the cursor afterwards, whatever `f` returned
    pub fn with_position_saved<T>(&mut self, f: impl FnOnce(&mut Stream) -> Result<T>) -> Result<T> {
        let mut guard = self.scoped_position()?;
        let result = f(&mut *guard);
        drop(guard);

        result
    }

    /// Flush and release the file handle of a stream opened for writing.
    ///
    /// Has no effect on any other stream.
    #[instrument(skip(self), err)]
    pub fn close(&mut self) -> Result<()> {
        if self.state != StreamState::WritingFile {
            return Ok(());
        }

        let backing = mem::replace(&mut self.backing, Backing::Buffer(Cursor::default()));
        self.state = StreamState::Closed;

        if let Backing::File(mut file) = backing {
            file.flush()?;
            debug!("released file handle");
        }

        Ok(())
    }

    /// Unwrap and return the in-memory buffer
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match (self.state, self.backing) {
            (StreamState::Closed, _) => Err(Error::Closed),
            (_, Backing::Buffer(cursor)) => Ok(cursor.into_inner()),
            (_, Backing::File(_)) => Err(Error::NotBuffered),
        }
    }

    /// Borrow the in-memory buffer, if this stream has one
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match (&self.state, &self.backing) {
            (StreamState::Buffered, Backing::Buffer(cursor)) => Some(cursor.get_ref()),
            _ => None,
        }
    }
}

fn relative(amount: u64) -> io::Result<i64> {
    i64::try_from(amount).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))
}

impl Default for Stream {
    fn default() -> Self {
        Stream::new()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.state, &self.backing) {
            (StreamState::Closed, _) => write!(f, "<Stream closed>"),
            (_, Backing::Buffer(cursor)) => {
                write!(f, "<Stream {}/{}>", cursor.position(), cursor.get_ref().len())
            }
            (_, Backing::File(file)) => {
                let mut handle = file;
                match (handle.stream_position(), file.metadata()) {
                    (Ok(position), Ok(metadata)) => {
                        write!(f, "<Stream {}/{}>", position, metadata.len())
                    }
                    _ => write!(f, "<Stream file>"),
                }
            }
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.backing_io()?.read(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.backing_io()?.read_exact(buf)
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.backing_io()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.backing_io()?.flush()
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.backing_io()?.seek(pos)
    }
}

/// Saved cursor position, restored on drop
///
/// Created by [`Stream::scoped_position`].
pub struct PositionGuard<'a> {
    stream: &'a mut Stream,
    position: u64,
}

impl PositionGuard<'_> {
    /// The position which will be restored
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl Deref for PositionGuard<'_> {
    type Target = Stream;

    fn deref(&self) -> &Stream {
        self.stream
    }
}

impl DerefMut for PositionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Stream {
        self.stream
    }
}

impl Drop for PositionGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.stream.seek(SeekFrom::Start(self.position)) {
            warn!(position = self.position, %err, "unable to restore stream position");
        }
    }
}
