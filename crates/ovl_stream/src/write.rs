//! Writing typed values to a [`Stream`]
//!
//! Writes overwrite the bytes at the cursor and extend the stream when they run past its
//! end. The stream is never truncated.

use binrw::{BinWrite, Endian};
use byteorder::{LittleEndian, WriteBytesExt};
use half::f16;
use std::io::{self, Read, SeekFrom, Write};
use tracing::trace;

use crate::{
    error::{Error, Result},
    stream::Stream,
    types::Scalar,
};

macro_rules! write_scalar {
    ($($write:ident, $ty:ty, |$w:ident, $v:ident| $body:expr;)*) => {$(
        #[doc = concat!("Write a `", stringify!($ty), "` and advance the cursor past it")]
        pub fn $write(&mut self, $v: $ty) -> Result<()> {
            let $w = self.backing()?;
            Ok($body?)
        }
    )*};
}

impl Stream {
    write_scalar! {
        write_i8, i8, |w, v| w.write_i8(v);
        write_u8, u8, |w, v| w.write_u8(v);
        write_i16, i16, |w, v| w.write_i16::<LittleEndian>(v);
        write_u16, u16, |w, v| w.write_u16::<LittleEndian>(v);
        write_i32, i32, |w, v| w.write_i32::<LittleEndian>(v);
        write_u32, u32, |w, v| w.write_u32::<LittleEndian>(v);
        write_i64, i64, |w, v| w.write_i64::<LittleEndian>(v);
        write_u64, u64, |w, v| w.write_u64::<LittleEndian>(v);
        write_f16, f16, |w, v| w.write_u16::<LittleEndian>(v.to_bits());
        write_f32, f32, |w, v| w.write_f32::<LittleEndian>(v);
        write_f64, f64, |w, v| w.write_f64::<LittleEndian>(v);
    }

    /// Write a single value using its own width
    pub fn write_scalar(&mut self, value: Scalar) -> Result<()> {
        match value {
            Scalar::I8(v) => self.write_i8(v),
            Scalar::U8(v) => self.write_u8(v),
            Scalar::I16(v) => self.write_i16(v),
            Scalar::U16(v) => self.write_u16(v),
            Scalar::I32(v) => self.write_i32(v),
            Scalar::U32(v) => self.write_u32(v),
            Scalar::I64(v) => self.write_i64(v),
            Scalar::U64(v) => self.write_u64(v),
            Scalar::F16(v) => self.write_f16(v),
            Scalar::F32(v) => self.write_f32(v),
            Scalar::F64(v) => self.write_f64(v),
        }
    }

    /// Write a run of adjacent fields
    pub fn write_many(&mut self, values: &[Scalar]) -> Result<()> {
        values.iter().try_for_each(|value| self.write_scalar(*value))
    }

    /// Write raw bytes at the cursor
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        Ok(self.backing()?.write_all(data)?)
    }

    /// Write `amount` zero bytes
    pub fn fill(&mut self, amount: u64) -> Result<()> {
        io::copy(&mut io::repeat(0).take(amount), self.backing()?)?;
        Ok(())
    }

    /// Pad with zero bytes until `cursor - base` is a multiple of `alignment`
    ///
    /// Returns the number of bytes written.
    pub fn align(&mut self, alignment: u64, base: u64) -> Result<u64> {
        if alignment == 0 {
            return Err(Error::InvalidAlignment);
        }

        let distance = i128::from(self.tell()?) - i128::from(base);
        let remainder = distance.rem_euclid(i128::from(alignment)) as u64;
        if remainder == 0 {
            return Ok(0);
        }

        let padding = alignment - remainder;
        self.fill(padding)?;
        Ok(padding)
    }

    /// Write every character of `text` as one ASCII byte, optionally followed by a NUL
    pub fn write_ascii(&mut self, text: &str, zero_terminated: bool) -> Result<()> {
        ensure_ascii(text)?;

        self.write_bytes(text.as_bytes())?;
        if zero_terminated {
            self.write_u8(0)?;
        }
        Ok(())
    }

    /// Write `text` into a fixed-length field, padding the rest with NUL bytes
    pub fn write_ascii_padded(&mut self, text: &str, length: usize) -> Result<()> {
        ensure_ascii(text)?;
        if text.len() > length {
            return Err(Error::StringTooLong {
                length: text.len(),
                max: length,
            });
        }

        self.write_bytes(text.as_bytes())?;
        self.fill((length - text.len()) as u64)
    }

    /// Write a four-character code
    pub fn write_tag(&mut self, tag: &str) -> Result<()> {
        if tag.len() != 4 || !tag.is_ascii() {
            return Err(Error::InvalidTag(tag.to_owned()));
        }

        self.write_bytes(tag.as_bytes())
    }

    /// Run `writer` with `value` at an absolute offset, then return to the current position
    ///
    /// An offset beyond the end of the stream fails with [`Error::OffsetOutOfBounds`] unless
    /// `fill_to_target` is set, in which case the write extends the stream and the gap reads
    /// back as zero bytes.
    ///
    /// ```
    /// # fn doit() -> ovl_stream::Result<()>
    /// # {
    /// use ovl_stream::Stream;
    ///
    /// let mut stream = Stream::new();
    /// stream.write_u32(0)?; // placeholder
    /// stream.write_ascii("payload", true)?;
    ///
    /// let end = stream.tell()?;
    /// stream.write_to_offset(0, Stream::write_u32, end as u32, false)?;
    ///
    /// assert_eq!(stream.tell()?, end);
    /// assert_eq!(&stream.as_bytes().unwrap()[..4], &[12, 0, 0, 0]);
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    pub fn write_to_offset<T, V>(
        &mut self,
        offset: u64,
        writer: impl FnOnce(&mut Stream, V) -> Result<T>,
        value: V,
        fill_to_target: bool,
    ) -> Result<T> {
        let size = self.size()?;
        if offset > size && !fill_to_target {
            return Err(Error::OffsetOutOfBounds { offset, size });
        }

        trace!(offset, fill_to_target, "writing to offset");
        self.with_position_saved(|s| {
            s.seek(SeekFrom::Start(offset))?;
            writer(s, value)
        })
    }

    /// Write a little-endian [`binrw`] structure at the cursor
    pub fn write_struct<T>(&mut self, value: &T) -> Result<()>
    where
        T: BinWrite,
        for<'a> T::Args<'a>: Default,
    {
        Ok(value.write_options(self, Endian::Little, Default::default())?)
    }
}

fn ensure_ascii(text: &str) -> Result<()> {
    match text.chars().find(|c| !c.is_ascii()) {
        Some(c) => Err(Error::NonAscii(c)),
        None => Ok(()),
    }
}
