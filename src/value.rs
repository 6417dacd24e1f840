//! The scalar type tag and the tagged union of values a series may carry.

use std::fmt;

/// The seven scalar types a measurement series may hold.
///
/// Fixed at [`crate::schema::MeasurementSchema`] construction; mixing types
/// within one series is forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    Binary,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScalarType::Bool => "BOOL",
            ScalarType::Int32 => "INT32",
            ScalarType::Int64 => "INT64",
            ScalarType::Float => "FLOAT",
            ScalarType::Double => "DOUBLE",
            ScalarType::Decimal => "DECIMAL",
            ScalarType::Binary => "BINARY",
        };
        f.write_str(s)
    }
}

/// A fixed-point decimal value: an unscaled integer plus a scale.
///
/// This is the representation most columnar formats (Parquet, Arrow) use
/// for a DECIMAL logical type; see DESIGN.md for why it was chosen here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal {
    pub unscaled: i128,
    pub scale: u8,
}

impl Decimal {
    pub fn new(unscaled: i128, scale: u8) -> Self {
        Self { unscaled, scale }
    }
}

/// One point's value, tagged by [`ScalarType`].
///
/// A sum type over the seven scalars, collapsing what would otherwise be
/// seven overloaded `write` entry points into a single dispatch point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Binary(Vec<u8>),
}

impl Value {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Value::Bool(_) => ScalarType::Bool,
            Value::Int32(_) => ScalarType::Int32,
            Value::Int64(_) => ScalarType::Int64,
            Value::Float(_) => ScalarType::Float,
            Value::Double(_) => ScalarType::Double,
            Value::Decimal(_) => ScalarType::Decimal,
            Value::Binary(_) => ScalarType::Binary,
        }
    }
}

/// Page-level encoding strategy, selected from [`crate::schema::MeasurementSchema`]'s
/// `time_encoder_spec` / `value_encoder_spec`.
///
/// Low-level encoders are out of scope for this crate; `PageEncoder` (see
/// [`crate::page`]) ships one concrete implementation per variant here, not
/// a pluggable registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingSpec {
    /// Zigzag-varint deltas for INT32/INT64 time and value streams, fixed
    /// big-endian width for FLOAT/DOUBLE, length-prefixed raw bytes for
    /// BINARY, a single byte for BOOL.
    #[default]
    Plain,
    /// Same as `Plain`, except INT32/INT64 value streams are additionally
    /// delta-encoded against the previous value before zigzag-varint.
    DeltaVarint,
    /// Accepted for forward compatibility with schemas written by other
    /// tools; falls back to `Plain` behavior (logged once) since this
    /// crate does not implement run-length encoding.
    Rle,
}
