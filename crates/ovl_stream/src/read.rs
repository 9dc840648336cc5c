//! Reading typed values from a [`Stream`]
//!

use binrw::{BinRead, Endian};
use byteorder::{LittleEndian, ReadBytesExt};
use half::f16;
use std::io::{self, Read, SeekFrom};
use tracing::trace;

use crate::{
    error::{Error, Result},
    stream::{Backing, Stream},
    types::{Scalar, ScalarKind},
};

/// Number of bytes returned by [`Stream::preview`]
pub const PREVIEW_SIZE: usize = 256;

macro_rules! read_scalar {
    ($($read:ident, $peek:ident, $ty:ty, $width:literal, $body:expr;)*) => {$(
        #[doc = concat!("Read a `", stringify!($ty), "`, advancing the cursor by ", stringify!($width), " bytes")]
        pub fn $read(&mut self) -> Result<$ty> {
            self.read_checked($width, $body)
        }

        #[doc = concat!("Read a `", stringify!($ty), "` without moving the cursor")]
        pub fn $peek(&mut self) -> Result<$ty> {
            self.with_position_saved(Stream::$read)
        }
    )*};
}

impl Stream {
    /// Run a fixed-width read, turning a short read into [`Error::EndOfStream`].
    ///
    /// The cursor is left where the read started when it fails.
    fn read_checked<T>(
        &mut self,
        width: usize,
        read: impl FnOnce(&mut Backing) -> io::Result<T>,
    ) -> Result<T> {
        let offset = self.tell()?;
        let result = read(self.backing()?);
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                self.seek(SeekFrom::Start(offset))?;
                Err(Error::EndOfStream {
                    offset,
                    requested: width,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    read_scalar! {
        read_i8, peek_i8, i8, 1, |r: &mut Backing| r.read_i8();
        read_u8, peek_u8, u8, 1, |r: &mut Backing| r.read_u8();
        read_i16, peek_i16, i16, 2, |r: &mut Backing| r.read_i16::<LittleEndian>();
        read_u16, peek_u16, u16, 2, |r: &mut Backing| r.read_u16::<LittleEndian>();
        read_i32, peek_i32, i32, 4, |r: &mut Backing| r.read_i32::<LittleEndian>();
        read_u32, peek_u32, u32, 4, |r: &mut Backing| r.read_u32::<LittleEndian>();
        read_i64, peek_i64, i64, 8, |r: &mut Backing| r.read_i64::<LittleEndian>();
        read_u64, peek_u64, u64, 8, |r: &mut Backing| r.read_u64::<LittleEndian>();
        read_f16, peek_f16, f16, 2, |r: &mut Backing| r.read_u16::<LittleEndian>().map(f16::from_bits);
        read_f32, peek_f32, f32, 4, |r: &mut Backing| r.read_f32::<LittleEndian>();
        read_f64, peek_f64, f64, 8, |r: &mut Backing| r.read_f64::<LittleEndian>();
    }

    /// Read a single value of the given kind
    pub fn read_scalar(&mut self, kind: ScalarKind) -> Result<Scalar> {
        Ok(match kind {
            ScalarKind::I8 => self.read_i8()?.into(),
            ScalarKind::U8 => self.read_u8()?.into(),
            ScalarKind::I16 => self.read_i16()?.into(),
            ScalarKind::U16 => self.read_u16()?.into(),
            ScalarKind::I32 => self.read_i32()?.into(),
            ScalarKind::U32 => self.read_u32()?.into(),
            ScalarKind::I64 => self.read_i64()?.into(),
            ScalarKind::U64 => self.read_u64()?.into(),
            ScalarKind::F16 => self.read_f16()?.into(),
            ScalarKind::F32 => self.read_f32()?.into(),
            ScalarKind::F64 => self.read_f64()?.into(),
        })
    }

    /// Read a single value of the given kind without moving the cursor
    pub fn peek_scalar(&mut self, kind: ScalarKind) -> Result<Scalar> {
        self.with_position_saved(|s| s.read_scalar(kind))
    }

    /// Read a run of adjacent fields
    ///
    /// Either every field is read or, when the stream is too short, none is and the cursor
    /// stays put.
    ///
    /// ```
    /// # fn doit() -> ovl_stream::Result<()>
    /// # {
    /// use ovl_stream::{Scalar, ScalarKind, Stream};
    ///
    /// let mut stream = Stream::from_bytes(vec![1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0x80, 0x3F]);
    /// let fields = stream.read_many(&[ScalarKind::U32, ScalarKind::U32, ScalarKind::F32])?;
    /// assert_eq!(fields, vec![Scalar::U32(1), Scalar::U32(2), Scalar::F32(1.0)]);
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    pub fn read_many(&mut self, format: &[ScalarKind]) -> Result<Vec<Scalar>> {
        let width = ScalarKind::total_width(format);
        self.ensure_remaining(width)?;

        format.iter().map(|kind| self.read_scalar(*kind)).collect()
    }

    /// Read a run of adjacent fields without moving the cursor
    pub fn peek_many(&mut self, format: &[ScalarKind]) -> Result<Vec<Scalar>> {
        self.with_position_saved(|s| s.read_many(format))
    }

    fn ensure_remaining(&mut self, width: usize) -> Result<()> {
        let offset = self.tell()?;
        let remaining = self.size()?.saturating_sub(offset);
        if remaining < width as u64 {
            return Err(Error::EndOfStream {
                offset,
                requested: width,
            });
        }

        Ok(())
    }

    /// Read exactly `length` bytes
    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        self.ensure_remaining(length)?;

        let mut buffer = vec![0u8; length];
        self.backing()?.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read every byte from the cursor to the end
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.backing()?.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Up to [`PREVIEW_SIZE`] upcoming bytes, leaving the cursor in place
    pub fn preview(&mut self) -> Result<Vec<u8>> {
        self.with_position_saved(|s| {
            let mut buffer = Vec::with_capacity(PREVIEW_SIZE);
            s.backing()?
                .take(PREVIEW_SIZE as u64)
                .read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    }

    /// Read a fixed-length ASCII string, stripping trailing NUL bytes
    pub fn read_ascii(&mut self, length: usize) -> Result<String> {
        let offset = self.tell()?;
        let bytes = self.read_bytes(length)?;

        let text = decode_ascii(offset, bytes)?;
        Ok(text.trim_end_matches('\0').to_owned())
    }

    /// Read a NUL-terminated ASCII string. The terminator is consumed but not returned.
    pub fn read_cstring(&mut self) -> Result<String> {
        let offset = self.tell()?;

        let mut text = String::new();
        loop {
            let byte = self.read_u8()?;
            if byte == b'\0' {
                break;
            }
            if !byte.is_ascii() {
                return Err(Error::InvalidAscii {
                    offset: offset + text.len() as u64,
                    byte,
                });
            }
            text.push(char::from(byte));
        }

        Ok(text)
    }

    /// Read a four-character code
    pub fn read_tag(&mut self) -> Result<String> {
        self.read_ascii(4)
    }

    /// Read a four-character code without moving the cursor
    pub fn peek_tag(&mut self) -> Result<String> {
        self.with_position_saved(Stream::read_tag)
    }

    /// Run `reader` at an absolute offset, then return to the current position
    ///
    /// Fails with [`Error::OffsetOutOfBounds`] without touching the cursor when `offset` is
    /// beyond the end of the stream. The cursor is restored even when `reader` fails.
    ///
    /// ```
    /// # fn doit() -> ovl_stream::Result<()>
    /// # {
    /// use ovl_stream::Stream;
    ///
    /// let mut stream = Stream::from_bytes(b"\x08\0\0\0\0\0\0\0name\0".to_vec());
    /// let offset = stream.read_u32()?;
    /// let name = stream.read_from_offset(offset.into(), Stream::read_cstring)?;
    ///
    /// assert_eq!(name, "name");
    /// assert_eq!(stream.tell()?, 4);
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    pub fn read_from_offset<T>(
        &mut self,
        offset: u64,
        reader: impl FnOnce(&mut Stream) -> Result<T>,
    ) -> Result<T> {
        let size = self.size()?;
        if offset > size {
            return Err(Error::OffsetOutOfBounds { offset, size });
        }

        trace!(offset, "reading from offset");
        self.with_position_saved(|s| {
            s.seek(SeekFrom::Start(offset))?;
            reader(s)
        })
    }

    /// Read a little-endian [`binrw`] structure at the cursor
    pub fn read_struct<T>(&mut self) -> Result<T>
    where
        T: BinRead,
        for<'a> T::Args<'a>: Default,
    {
        Ok(T::read_options(self, Endian::Little, Default::default())?)
    }
}

fn decode_ascii(offset: u64, bytes: Vec<u8>) -> Result<String> {
    if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(Error::InvalidAscii {
            offset: offset + position as u64,
            byte: bytes[position],
        });
    }

    Ok(bytes.into_iter().map(char::from).collect())
}
