//! Compact fixed-point encodings: packed vectors and packed halves.

use crate::{
    error::{Error, Result},
    stream::Stream,
};

const COMPONENT_BITS: u32 = 20;
const COMPONENT_MASK: u64 = (1 << COMPONENT_BITS) - 1;
const COMPONENT_STRIDE: u32 = COMPONENT_BITS + 1;
const COMPONENT_BIAS: i64 = 1 << COMPONENT_BITS;

const VECTOR_SCALE: f64 = 2048.0;
const VECTOR_OFFSET: f64 = 512.5;

const HALF_MASK: u16 = 0x7FFF;
const HALF_BIAS: i32 = 0x8000;
const HALF_SCALE: f32 = 2048.0;

/// Decode the three components of a packed vector
///
/// ```
/// assert_eq!(ovl_stream::decode_packed_vector(0), [-511.749755859375; 3]);
/// ```
pub fn decode_packed_vector(mut bits: u64) -> [f32; 3] {
    let mut components = [0.0; 3];
    for component in components.iter_mut() {
        let mut value = (bits & COMPONENT_MASK) as i64;
        bits >>= COMPONENT_BITS;
        let sign = bits & 1;
        bits >>= 1;

        if sign == 0 {
            value -= COMPONENT_BIAS;
        }
        *component = ((value as f64 + VECTOR_OFFSET) / VECTOR_SCALE) as f32;
    }
    components
}

/// Encode three components as a packed vector, rounding to the nearest step of `1/2048`
pub fn encode_packed_vector(components: [f32; 3]) -> Result<u64> {
    let mut bits = 0u64;
    for (i, component) in components.into_iter().enumerate() {
        let value = (f64::from(component) * VECTOR_SCALE - VECTOR_OFFSET).round();
        if !(-COMPONENT_BIAS as f64..COMPONENT_BIAS as f64).contains(&value) {
            return Err(Error::ValueOutOfRange(component));
        }

        let value = value as i64;
        let field = if value >= 0 {
            value as u64 | 1 << COMPONENT_BITS
        } else {
            (value + COMPONENT_BIAS) as u64
        };
        bits |= field << (COMPONENT_STRIDE * i as u32);
    }
    Ok(bits)
}

/// Decode a packed half
///
/// This is a 15-bit fixed-point value, not IEEE-754 binary16.
pub fn decode_packed_half(bits: u16) -> f32 {
    let mut value = i32::from(bits & HALF_MASK);
    if bits >> 15 == 0 {
        value -= HALF_BIAS;
    }
    value as f32 / HALF_SCALE
}

/// Encode a packed half, rounding to the nearest step of `1/2048`
pub fn encode_packed_half(value: f32) -> Result<u16> {
    let scaled = (value * HALF_SCALE).round();
    if !(-HALF_BIAS as f32..HALF_BIAS as f32).contains(&scaled) {
        return Err(Error::ValueOutOfRange(value));
    }

    let scaled = scaled as i32;
    Ok(if scaled >= 0 {
        scaled as u16 | 0x8000
    } else {
        (scaled + HALF_BIAS) as u16
    })
}

impl Stream {
    /// Read an 8-byte packed vector
    pub fn read_packed_vector(&mut self) -> Result<[f32; 3]> {
        self.read_u64().map(decode_packed_vector)
    }

    /// Read a 2-byte packed half
    pub fn read_packed_half(&mut self) -> Result<f32> {
        self.read_u16().map(decode_packed_half)
    }

    /// Write an 8-byte packed vector
    pub fn write_packed_vector(&mut self, components: [f32; 3]) -> Result<()> {
        let bits = encode_packed_vector(components)?;
        self.write_u64(bits)
    }

    /// Write a 2-byte packed half
    pub fn write_packed_half(&mut self, value: f32) -> Result<()> {
        let bits = encode_packed_half(value)?;
        self.write_u16(bits)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::SeekFrom;

    use crate::error::{Error, Result};
    use crate::packed::{
        decode_packed_half, decode_packed_vector, encode_packed_half, encode_packed_vector,
    };
    use crate::stream::Stream;

    const STEP: f32 = 1.0 / 2048.0;

    #[test]
    fn zero_word_is_not_zero_vector() {
        let expected = (-1048576.0 + 512.5) / 2048.0;
        assert_eq!(decode_packed_vector(0), [expected; 3]);
        assert_eq!(expected, -511.749755859375);
    }

    #[test]
    fn sign_bits_select_positive_range() {
        // magnitude 0 with the sign bit set for every component
        let bits = 1 << 20 | 1 << 41 | 1 << 62;
        assert_eq!(decode_packed_vector(bits), [512.5 / 2048.0; 3]);
    }

    #[test]
    fn components_are_independent() {
        #[rustfmt::skip]
        let bits = (0x1_00001u64)            // x: +1
            | (0x0_FFFFFu64 << 21)            // y: -1
            | (0x1_00800u64 << 42);           // z: +2048

        let [x, y, z] = decode_packed_vector(bits);
        assert_eq!(x, 513.5 / 2048.0);
        assert_eq!(y, 511.5 / 2048.0);
        assert_eq!(z, 2560.5 / 2048.0);
    }

    #[test]
    fn origin_round_trips_within_a_step() -> Result<()> {
        let bits = encode_packed_vector([0.0; 3])?;
        for component in decode_packed_vector(bits) {
            assert!(component.abs() <= STEP, "{component}");
        }
        Ok(())
    }

    #[test]
    fn vector_round_trips() -> Result<()> {
        let input = [12.25, -300.0, 0.5];
        let bits = encode_packed_vector(input)?;
        let output = decode_packed_vector(bits);

        for (a, b) in input.iter().zip(output) {
            assert!((a - b).abs() <= STEP, "{a} != {b}");
        }
        Ok(())
    }

    #[test]
    fn vector_out_of_range() {
        assert!(matches!(
            encode_packed_vector([0.0, 600.0, 0.0]),
            Err(Error::ValueOutOfRange(v)) if v == 600.0
        ));
    }

    #[test]
    fn packed_half_values() {
        assert_eq!(decode_packed_half(0x8000), 0.0);
        assert_eq!(decode_packed_half(0x8800), 1.0);
        assert_eq!(decode_packed_half(0xFFFF), 32767.0 / 2048.0);
        assert_eq!(decode_packed_half(0x7FFF), -1.0 / 2048.0);
        assert_eq!(decode_packed_half(0x0000), -16.0);
    }

    #[test]
    fn packed_half_round_trips() -> Result<()> {
        for value in [0.0, 1.0, -1.0, 15.5, -16.0, 7.3] {
            let decoded = decode_packed_half(encode_packed_half(value)?);
            assert!((decoded - value).abs() <= STEP / 2.0, "{value} != {decoded}");
        }
        assert!(encode_packed_half(16.0).is_err());
        Ok(())
    }

    #[test]
    fn stream_codecs() -> Result<()> {
        let mut stream = Stream::new();
        stream.write_packed_vector([1.0, 2.0, 3.0])?;
        stream.write_packed_half(-0.5)?;
        assert_eq!(stream.size()?, 10);

        stream.seek(SeekFrom::Start(0))?;
        let [x, y, z] = stream.read_packed_vector()?;
        assert!((x - 1.0).abs() <= STEP);
        assert!((y - 2.0).abs() <= STEP);
        assert!((z - 3.0).abs() <= STEP);
        assert_eq!(stream.read_packed_half()?, -0.5);
        assert!(!stream.has_remaining()?);

        Ok(())
    }
}
