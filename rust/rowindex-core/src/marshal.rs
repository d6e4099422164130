//! Native storage-engine types and their comparators.
//!
//! Clustering keys are stored by the storage engine as opaque byte strings whose
//! order is defined by a type-specific comparator, not by byte-lexicographic
//! order. Signed integers (two's complement, big endian), floats and composite
//! keys (length-prefixed components with an end-of-component marker) all sort
//! differently as raw bytes than they do natively. Every comparison in the
//! mapping core therefore goes through [`NativeComparator::compare`], which
//! decodes both sides first.

use std::{cmp::Ordering, fmt, net::IpAddr};

use rowindex_common::{Result, error::Error};
use uuid::Uuid;

/// Total order over the storage engine's serialized values.
///
/// Implementations must be consistent with equality and must sort empty
/// values first.
pub trait NativeComparator: Send + Sync + fmt::Debug {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering;

    /// Human readable type name, used in log and error messages.
    fn name(&self) -> String;
}

/// The storage engine's native column types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    Ascii,
    Utf8,
    Int32,
    Long,
    Float,
    Double,
    Boolean,
    Bytes,
    /// Milliseconds since the Unix epoch, 8 bytes big endian.
    Timestamp,
    Uuid,
    Inet,
    /// Multi-component key; each component is `u16` length, bytes, end-of-component byte.
    Composite(Vec<NativeType>),
    /// Inverts the order of the wrapped type (descending clustering columns).
    Reversed(Box<NativeType>),
}

/// A decoded native value.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Timestamp(i64),
    Uuid(Uuid),
    Inet(IpAddr),
    /// Components of a composite value; `None` is an empty component.
    Composite(Vec<Option<NativeValue>>),
}

impl NativeType {
    pub fn name(&self) -> String {
        match self {
            NativeType::Ascii => "AsciiType".to_string(),
            NativeType::Utf8 => "UTF8Type".to_string(),
            NativeType::Int32 => "Int32Type".to_string(),
            NativeType::Long => "LongType".to_string(),
            NativeType::Float => "FloatType".to_string(),
            NativeType::Double => "DoubleType".to_string(),
            NativeType::Boolean => "BooleanType".to_string(),
            NativeType::Bytes => "BytesType".to_string(),
            NativeType::Timestamp => "TimestampType".to_string(),
            NativeType::Uuid => "UUIDType".to_string(),
            NativeType::Inet => "InetAddressType".to_string(),
            NativeType::Composite(types) => {
                let names: Vec<String> = types.iter().map(NativeType::name).collect();
                format!("CompositeType({})", names.join(","))
            }
            NativeType::Reversed(inner) => format!("ReversedType({})", inner.name()),
        }
    }

    /// Strips any [`NativeType::Reversed`] wrappers.
    pub fn base(&self) -> &NativeType {
        match self {
            NativeType::Reversed(inner) => inner.base(),
            other => other,
        }
    }

    fn is_fixed_width(&self) -> bool {
        matches!(
            self,
            NativeType::Int32
                | NativeType::Long
                | NativeType::Float
                | NativeType::Double
                | NativeType::Boolean
                | NativeType::Timestamp
                | NativeType::Uuid
                | NativeType::Inet
        )
    }

    /// Decodes a serialized value.
    ///
    /// An empty buffer decodes to `None` for fixed-width types and composites,
    /// and to an empty value for text and blob types.
    pub fn compose(&self, bytes: &[u8]) -> Result<Option<NativeValue>> {
        if bytes.is_empty() && (self.is_fixed_width() || matches!(self, NativeType::Composite(_)))
        {
            return Ok(None);
        }
        let value = match self {
            NativeType::Ascii => {
                if !bytes.is_ascii() {
                    return Err(self.malformed("non-ASCII bytes"));
                }
                NativeValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            NativeType::Utf8 => match std::str::from_utf8(bytes) {
                Ok(text) => NativeValue::Text(text.to_string()),
                Err(_) => return Err(self.malformed("invalid UTF-8")),
            },
            NativeType::Int32 => NativeValue::Int32(i32::from_be_bytes(self.fixed(bytes)?)),
            NativeType::Long => NativeValue::Int64(i64::from_be_bytes(self.fixed(bytes)?)),
            NativeType::Float => NativeValue::Float32(f32::from_be_bytes(self.fixed(bytes)?)),
            NativeType::Double => NativeValue::Float64(f64::from_be_bytes(self.fixed(bytes)?)),
            NativeType::Boolean => {
                let [byte] = self.fixed::<1>(bytes)?;
                NativeValue::Boolean(byte != 0)
            }
            NativeType::Bytes => NativeValue::Bytes(bytes.to_vec()),
            NativeType::Timestamp => {
                NativeValue::Timestamp(i64::from_be_bytes(self.fixed(bytes)?))
            }
            NativeType::Uuid => NativeValue::Uuid(Uuid::from_bytes(self.fixed(bytes)?)),
            NativeType::Inet => match bytes.len() {
                4 => NativeValue::Inet(IpAddr::from(self.fixed::<4>(bytes)?)),
                16 => NativeValue::Inet(IpAddr::from(self.fixed::<16>(bytes)?)),
                _ => return Err(self.malformed("expected 4 or 16 bytes")),
            },
            NativeType::Composite(types) => {
                let mut components = Vec::new();
                let mut cursor = ComponentCursor::new(bytes);
                while let Some(component) = cursor.next_component() {
                    let (component, _eoc) = component.map_err(|_| self.malformed("truncated component"))?;
                    let ty = types
                        .get(components.len())
                        .ok_or_else(|| self.malformed("too many components"))?;
                    components.push(ty.compose(component)?);
                }
                NativeValue::Composite(components)
            }
            NativeType::Reversed(inner) => return inner.compose(bytes),
        };
        Ok(Some(value))
    }

    /// Serializes a value; the inverse of [`NativeType::compose`].
    pub fn decompose(&self, value: &NativeValue) -> Result<Vec<u8>> {
        let bytes = match (self, value) {
            (NativeType::Ascii | NativeType::Utf8, NativeValue::Text(text)) => {
                if matches!(self, NativeType::Ascii) && !text.is_ascii() {
                    return Err(self.mismatch(value));
                }
                text.as_bytes().to_vec()
            }
            (NativeType::Int32, NativeValue::Int32(v)) => v.to_be_bytes().to_vec(),
            (NativeType::Long, NativeValue::Int64(v)) => v.to_be_bytes().to_vec(),
            (NativeType::Float, NativeValue::Float32(v)) => v.to_be_bytes().to_vec(),
            (NativeType::Double, NativeValue::Float64(v)) => v.to_be_bytes().to_vec(),
            (NativeType::Boolean, NativeValue::Boolean(v)) => vec![u8::from(*v)],
            (NativeType::Bytes, NativeValue::Bytes(v)) => v.clone(),
            (NativeType::Timestamp, NativeValue::Timestamp(v)) => v.to_be_bytes().to_vec(),
            (NativeType::Uuid, NativeValue::Uuid(v)) => v.as_bytes().to_vec(),
            (NativeType::Inet, NativeValue::Inet(IpAddr::V4(v))) => v.octets().to_vec(),
            (NativeType::Inet, NativeValue::Inet(IpAddr::V6(v))) => v.octets().to_vec(),
            (NativeType::Composite(types), NativeValue::Composite(components)) => {
                if components.len() > types.len() {
                    return Err(self.mismatch(value));
                }
                let mut bytes = Vec::new();
                for (ty, component) in types.iter().zip(components) {
                    let encoded = match component {
                        Some(component) => ty.decompose(component)?,
                        None => Vec::new(),
                    };
                    let len = u16::try_from(encoded.len())
                        .map_err(|_| self.malformed("component longer than 65535 bytes"))?;
                    bytes.extend_from_slice(&len.to_be_bytes());
                    bytes.extend_from_slice(&encoded);
                    bytes.push(0);
                }
                bytes
            }
            (NativeType::Reversed(inner), value) => return inner.decompose(value),
            _ => return Err(self.mismatch(value)),
        };
        Ok(bytes)
    }

    fn fixed<const N: usize>(&self, bytes: &[u8]) -> Result<[u8; N]> {
        bytes
            .try_into()
            .map_err(|_| self.malformed(&format!("expected {N} bytes, found {}", bytes.len())))
    }

    fn malformed(&self, message: &str) -> Error {
        Error::invalid_value(self.name(), message)
    }

    fn mismatch(&self, value: &NativeValue) -> Error {
        Error::invalid_value(self.name(), format!("cannot serialize {value:?}"))
    }
}

impl NativeComparator for NativeType {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        if left.is_empty() || right.is_empty() {
            return (!left.is_empty()).cmp(&!right.is_empty());
        }
        match self {
            NativeType::Reversed(inner) => inner.compare(right, left),
            NativeType::Composite(types) => compare_composite(types, left, right),
            _ => match (self.compose(left), self.compose(right)) {
                (Ok(l), Ok(r)) => compare_optional(l.as_ref(), r.as_ref()),
                (Err(_), Ok(_)) => Ordering::Less,
                (Ok(_), Err(_)) => Ordering::Greater,
                // Both malformed: keep the order total.
                (Err(_), Err(_)) => left.cmp(right),
            },
        }
    }

    fn name(&self) -> String {
        NativeType::name(self)
    }
}

impl NativeValue {
    /// Native ordering between two decoded values of the same type.
    pub fn native_cmp(&self, other: &NativeValue) -> Ordering {
        match (self, other) {
            (NativeValue::Text(l), NativeValue::Text(r)) => l.as_bytes().cmp(r.as_bytes()),
            (NativeValue::Int32(l), NativeValue::Int32(r)) => l.cmp(r),
            (NativeValue::Int64(l), NativeValue::Int64(r)) => l.cmp(r),
            (NativeValue::Float32(l), NativeValue::Float32(r)) => l.total_cmp(r),
            (NativeValue::Float64(l), NativeValue::Float64(r)) => l.total_cmp(r),
            (NativeValue::Boolean(l), NativeValue::Boolean(r)) => l.cmp(r),
            (NativeValue::Bytes(l), NativeValue::Bytes(r)) => l.cmp(r),
            (NativeValue::Timestamp(l), NativeValue::Timestamp(r)) => l.cmp(r),
            (NativeValue::Uuid(l), NativeValue::Uuid(r)) => compare_uuids(l, r),
            (NativeValue::Inet(l), NativeValue::Inet(r)) => l.cmp(r),
            (NativeValue::Composite(l), NativeValue::Composite(r)) => {
                for (l, r) in l.iter().zip(r) {
                    match compare_optional(l.as_ref(), r.as_ref()) {
                        Ordering::Equal => (),
                        non_eq => return non_eq,
                    }
                }
                l.len().cmp(&r.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            NativeValue::Text(_) => 0,
            NativeValue::Int32(_) => 1,
            NativeValue::Int64(_) => 2,
            NativeValue::Float32(_) => 3,
            NativeValue::Float64(_) => 4,
            NativeValue::Boolean(_) => 5,
            NativeValue::Bytes(_) => 6,
            NativeValue::Timestamp(_) => 7,
            NativeValue::Uuid(_) => 8,
            NativeValue::Inet(_) => 9,
            NativeValue::Composite(_) => 10,
        }
    }
}

fn compare_optional(left: Option<&NativeValue>, right: Option<&NativeValue>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(l), Some(r)) => l.native_cmp(r),
    }
}

/// Orders by version, then by embedded timestamp for time-based UUIDs, then by bytes.
fn compare_uuids(left: &Uuid, right: &Uuid) -> Ordering {
    let ord = left.get_version_num().cmp(&right.get_version_num());
    if ord != Ordering::Equal {
        return ord;
    }
    if left.get_version_num() == 1 {
        let ord = uuid_v1_timestamp(left).cmp(&uuid_v1_timestamp(right));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.as_bytes().cmp(right.as_bytes())
}

fn uuid_v1_timestamp(uuid: &Uuid) -> u64 {
    let b = uuid.as_bytes();
    let time_low = u64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
    let time_mid = u64::from(u16::from_be_bytes([b[4], b[5]]));
    let time_hi = u64::from(u16::from_be_bytes([b[6], b[7]]) & 0x0fff);
    (time_hi << 48) | (time_mid << 32) | time_low
}

fn compare_composite(types: &[NativeType], left: &[u8], right: &[u8]) -> Ordering {
    let mut l = ComponentCursor::new(left);
    let mut r = ComponentCursor::new(right);
    let mut index = 0;
    loop {
        match (l.next_component(), r.next_component()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Ok((lv, leoc))), Some(Ok((rv, reoc)))) => {
                let ty = types.get(index).unwrap_or(&NativeType::Bytes);
                let ord = ty.compare(lv, rv);
                if ord != Ordering::Equal {
                    return ord;
                }
                // Slice bounds mark the end-of-component byte as -1 or 1.
                let ord = (leoc as i8).signum().cmp(&(reoc as i8).signum());
                if ord != Ordering::Equal {
                    return ord;
                }
                index += 1;
            }
            (Some(Err(())), Some(Err(()))) => return l.rest().cmp(r.rest()),
            (Some(Err(())), Some(Ok(_))) => return Ordering::Less,
            (Some(Ok(_)), Some(Err(()))) => return Ordering::Greater,
        }
    }
}

/// Walks the components of a composite value.
struct ComponentCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ComponentCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }

    /// Returns the next `(component, end_of_component)` pair, `Err` when truncated.
    fn next_component(&mut self) -> Option<std::result::Result<(&'a [u8], u8), ()>> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        if rest.len() < 2 {
            return Some(Err(()));
        }
        let len = usize::from(u16::from_be_bytes([rest[0], rest[1]]));
        if rest.len() < 2 + len + 1 {
            return Some(Err(()));
        }
        let component = &rest[2..2 + len];
        let eoc = rest[2 + len];
        self.pos += 2 + len + 1;
        Some(Ok((component, eoc)))
    }
}
