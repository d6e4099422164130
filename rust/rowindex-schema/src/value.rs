//! Cell values as handed over by the storage engine, and the index values the
//! mappers turn them into.

use std::{cmp::Ordering, fmt, net::IpAddr};

use chrono::{DateTime, TimeZone, Utc};
use rowindex_core::NativeValue;
use serde::{Deserialize, Deserializer, de};
use uuid::Uuid;

/// A runtime column value.
///
/// Query literals deserialize into the JSON-representable subset: strings,
/// booleans, integers (as `Int64`) and floating point numbers (as `Float64`).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Inet(IpAddr),
    Timestamp(DateTime<Utc>),
}

impl CellValue {
    /// Short name of the runtime representation, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Int32(_) => "int",
            CellValue::Int64(_) => "bigint",
            CellValue::Float32(_) => "float",
            CellValue::Float64(_) => "double",
            CellValue::Boolean(_) => "boolean",
            CellValue::Bytes(_) => "bytes",
            CellValue::Uuid(_) => "uuid",
            CellValue::Inet(_) => "inet",
            CellValue::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a decoded column value. Composite values have no cell
    /// representation and yield `None`.
    pub fn from_native(value: NativeValue) -> Option<CellValue> {
        Some(match value {
            NativeValue::Text(v) => CellValue::Text(v),
            NativeValue::Int32(v) => CellValue::Int32(v),
            NativeValue::Int64(v) => CellValue::Int64(v),
            NativeValue::Float32(v) => CellValue::Float32(v),
            NativeValue::Float64(v) => CellValue::Float64(v),
            NativeValue::Boolean(v) => CellValue::Boolean(v),
            NativeValue::Bytes(v) => CellValue::Bytes(v),
            NativeValue::Timestamp(millis) => {
                CellValue::Timestamp(Utc.timestamp_millis_opt(millis).single()?)
            }
            NativeValue::Uuid(v) => CellValue::Uuid(v),
            NativeValue::Inet(v) => CellValue::Inet(v),
            NativeValue::Composite(_) => return None,
        })
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(v) => f.write_str(v),
            CellValue::Int32(v) => write!(f, "{v}"),
            CellValue::Int64(v) => write!(f, "{v}"),
            CellValue::Float32(v) => write!(f, "{v}"),
            CellValue::Float64(v) => write!(f, "{v}"),
            CellValue::Boolean(v) => write!(f, "{v}"),
            CellValue::Bytes(v) => f.write_str(&hex::encode(v)),
            CellValue::Uuid(v) => write!(f, "{}", v.hyphenated()),
            CellValue::Inet(v) => write!(f, "{v}"),
            CellValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for CellValue {
                fn from(value: $ty) -> Self {
                    CellValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    String => Text,
    &str => Text,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    bool => Boolean,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    Uuid => Uuid,
    IpAddr => Inet,
    DateTime<Utc> => Timestamp,
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(CellValue::Text(s)),
            serde_json::Value::Bool(b) => Ok(CellValue::Boolean(b)),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(CellValue::Int64(v))
                } else if let Some(v) = n.as_f64() {
                    Ok(CellValue::Float64(v))
                } else {
                    Err(de::Error::custom(format!("unrepresentable number {n}")))
                }
            }
            other => Err(de::Error::custom(format!(
                "expected a scalar value, found {other}"
            ))),
        }
    }
}

/// The value a mapper stores in, or looks up from, the index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexValue {
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl IndexValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            IndexValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, IndexValue::Text(_))
    }

    /// Orders two values of the same variant. Text compares by code point,
    /// floats by IEEE total order. Mixed variants are incomparable.
    pub fn compare(&self, other: &IndexValue) -> Option<Ordering> {
        match (self, other) {
            (IndexValue::Text(a), IndexValue::Text(b)) => Some(a.cmp(b)),
            (IndexValue::Int32(a), IndexValue::Int32(b)) => Some(a.cmp(b)),
            (IndexValue::Int64(a), IndexValue::Int64(b)) => Some(a.cmp(b)),
            (IndexValue::Float32(a), IndexValue::Float32(b)) => Some(a.total_cmp(b)),
            (IndexValue::Float64(a), IndexValue::Float64(b)) => Some(a.total_cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Text(v) => f.write_str(v),
            IndexValue::Int32(v) => write!(f, "{v}"),
            IndexValue::Int64(v) => write!(f, "{v}"),
            IndexValue::Float32(v) => write!(f, "{v}"),
            IndexValue::Float64(v) => write!(f, "{v}"),
        }
    }
}
