use std::fmt;

use crate::ScalarType;

/// A single decoded number, tagged with the width it was declared with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl ScalarValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::I8(_) => ScalarType::I8,
            ScalarValue::U8(_) => ScalarType::U8,
            ScalarValue::I16(_) => ScalarType::I16,
            ScalarValue::U16(_) => ScalarType::U16,
            ScalarValue::I32(_) => ScalarType::I32,
            ScalarValue::U32(_) => ScalarType::U32,
            ScalarValue::F32(_) => ScalarType::F32,
            ScalarValue::F64(_) => ScalarType::F64,
        }
    }

    pub fn is_integral(&self) -> bool {
        self.scalar_type().is_integral()
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            ScalarValue::I8(v) => v as f64,
            ScalarValue::U8(v) => v as f64,
            ScalarValue::I16(v) => v as f64,
            ScalarValue::U16(v) => v as f64,
            ScalarValue::I32(v) => v as f64,
            ScalarValue::U32(v) => v as f64,
            ScalarValue::F32(v) => v as f64,
            ScalarValue::F64(v) => v,
        }
    }

    /// Integer value of an integral scalar. Floating point values yield `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ScalarValue::I8(v) => Some(v as i64),
            ScalarValue::U8(v) => Some(v as i64),
            ScalarValue::I16(v) => Some(v as i64),
            ScalarValue::U16(v) => Some(v as i64),
            ScalarValue::I32(v) => Some(v as i64),
            ScalarValue::U32(v) => Some(v as i64),
            ScalarValue::F32(_) | ScalarValue::F64(_) => None,
        }
    }

    /// Interpret the value as a count or index: integral and non-negative.
    pub fn to_index(&self) -> Option<usize> {
        self.as_i64().and_then(|v| usize::try_from(v).ok())
    }

    /// Encode `len` using `count_type`, failing when it does not fit.
    pub fn from_len(count_type: ScalarType, len: usize) -> Option<Self> {
        Some(match count_type {
            ScalarType::I8 => ScalarValue::I8(i8::try_from(len).ok()?),
            ScalarType::U8 => ScalarValue::U8(u8::try_from(len).ok()?),
            ScalarType::I16 => ScalarValue::I16(i16::try_from(len).ok()?),
            ScalarType::U16 => ScalarValue::U16(u16::try_from(len).ok()?),
            ScalarType::I32 => ScalarValue::I32(i32::try_from(len).ok()?),
            ScalarType::U32 => ScalarValue::U32(u32::try_from(len).ok()?),
            ScalarType::F32 => ScalarValue::F32(len as f32),
            ScalarType::F64 => ScalarValue::F64(len as f64),
        })
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::I8(v) => write!(f, "{v}"),
            ScalarValue::U8(v) => write!(f, "{v}"),
            ScalarValue::I16(v) => write!(f, "{v}"),
            ScalarValue::U16(v) => write!(f, "{v}"),
            ScalarValue::I32(v) => write!(f, "{v}"),
            ScalarValue::U32(v) => write!(f, "{v}"),
            ScalarValue::F32(v) => write!(f, "{v}"),
            ScalarValue::F64(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<$ty> for ScalarValue {
                fn from(v: $ty) -> Self {
                    ScalarValue::$variant(v)
                }
            }

            impl From<$ty> for PropertyValue {
                fn from(v: $ty) -> Self {
                    PropertyValue::Scalar(ScalarValue::$variant(v))
                }
            }
        )*
    };
}

impl_from_scalar!(i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32, u32 => U32, f32 => F32, f64 => F64);

/// The value of one property in one record.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
}

impl PropertyValue {
    pub fn is_list(&self) -> bool {
        matches!(self, PropertyValue::List(_))
    }

    /// Number of scalars held: 1 for a scalar, the list length otherwise.
    pub fn len(&self) -> usize {
        match self {
            PropertyValue::Scalar(_) => 1,
            PropertyValue::List(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<ScalarValue> {
        self.iter().next().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScalarValue> {
        match self {
            PropertyValue::Scalar(value) => std::slice::from_ref(value).iter(),
            PropertyValue::List(values) => values.iter(),
        }
    }

    pub fn as_scalar(&self) -> Option<ScalarValue> {
        match self {
            PropertyValue::Scalar(value) => Some(*value),
            PropertyValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ScalarValue]> {
        match self {
            PropertyValue::Scalar(_) => None,
            PropertyValue::List(values) => Some(values),
        }
    }
}

impl From<ScalarValue> for PropertyValue {
    fn from(value: ScalarValue) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl<T: Into<ScalarValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Scalar(value) => write!(f, "{value}"),
            PropertyValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One decoded element instance. Values are stored in property declaration
/// order; names are resolved through the owning element's definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: Vec<PropertyValue>,
}

impl Record {
    pub fn new(values: Vec<PropertyValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[PropertyValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&PropertyValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn push(&mut self, value: PropertyValue) {
        self.values.push(value);
    }
}

impl FromIterator<PropertyValue> for Record {
    fn from_iter<I: IntoIterator<Item = PropertyValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
