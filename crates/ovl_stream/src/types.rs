//! Scalar type codes used to describe runs of adjacent fields.

use half::f16;

/// The type of a single fixed-width field
///
/// A slice of kinds describes several adjacent fields, read together with
/// [`crate::Stream::read_many`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// IEEE-754 binary16
    F16,
    F32,
    F64,
}

impl ScalarKind {
    /// Encoded width in bytes
    pub const fn width(self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 | ScalarKind::F16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }

    /// Combined width of a run of fields
    pub fn total_width(format: &[ScalarKind]) -> usize {
        format.iter().map(|kind| kind.width()).sum()
    }
}

/// A decoded fixed-width value
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Scalar {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F16(f16),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// The type code of this value
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::F16(_) => ScalarKind::F16,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
        }
    }

    /// Widen an integer value, `None` for floats or negative values
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Scalar::I8(v) => u64::try_from(v).ok(),
            Scalar::U8(v) => Some(v.into()),
            Scalar::I16(v) => u64::try_from(v).ok(),
            Scalar::U16(v) => Some(v.into()),
            Scalar::I32(v) => u64::try_from(v).ok(),
            Scalar::U32(v) => Some(v.into()),
            Scalar::I64(v) => u64::try_from(v).ok(),
            Scalar::U64(v) => Some(v),
            Scalar::F16(_) | Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }

    /// Widen any value to a double
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::I8(v) => v.into(),
            Scalar::U8(v) => v.into(),
            Scalar::I16(v) => v.into(),
            Scalar::U16(v) => v.into(),
            Scalar::I32(v) => v.into(),
            Scalar::U32(v) => v.into(),
            Scalar::I64(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::F16(v) => v.into(),
            Scalar::F32(v) => v.into(),
            Scalar::F64(v) => v,
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                Scalar::$variant(value)
            }
        }
    )*};
}

scalar_from! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f16 => F16,
    f32 => F32,
    f64 => F64,
}
