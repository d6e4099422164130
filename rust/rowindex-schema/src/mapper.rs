//! Cell mappers.
//!
//! A [`CellMapper`] converts the values of one column into index values, both
//! when a row is written and when a query literal for the column is
//! translated. The two paths share the same conversion, so a cell written as
//! `42` is found by a query for `"42"`.

use std::{fmt, net::IpAddr};

use rowindex_common::{error::Error, result::Result};
use rowindex_core::NativeType;
use rowindex_text::Analyzer;
use uuid::Uuid;

use crate::{
    date::DatePattern,
    value::{CellValue, IndexValue},
};

pub const DEFAULT_BOOST: f32 = 1.0;

/// The kinds of search condition a mapper may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Match,
    Range,
    Prefix,
    Wildcard,
    Phrase,
    Fuzzy,
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::Match => "match",
            ConditionKind::Range => "range",
            ConditionKind::Prefix => "prefix",
            ConditionKind::Wildcard => "wildcard",
            ConditionKind::Phrase => "phrase",
            ConditionKind::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of column mappings.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalType {
    /// Tokenized text. `analyzer` is `None` when the schema default applies.
    Text { analyzer: Option<String>, boost: f32 },
    /// Exact, untokenized text.
    String { boost: f32 },
    Integer { boost: f32 },
    Long { boost: f32 },
    Float { boost: f32 },
    Double { boost: f32 },
    Date { pattern: DatePattern },
    Bytes,
    Boolean,
    Uuid,
    Inet,
}

impl LogicalType {
    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::Text { .. } => "text",
            LogicalType::String { .. } => "string",
            LogicalType::Integer { .. } => "integer",
            LogicalType::Long { .. } => "long",
            LogicalType::Float { .. } => "float",
            LogicalType::Double { .. } => "double",
            LogicalType::Date { .. } => "date",
            LogicalType::Bytes => "bytes",
            LogicalType::Boolean => "boolean",
            LogicalType::Uuid => "uuid",
            LogicalType::Inet => "inet",
        }
    }

    pub fn boost(&self) -> f32 {
        match self {
            LogicalType::Text { boost, .. }
            | LogicalType::String { boost }
            | LogicalType::Integer { boost }
            | LogicalType::Long { boost }
            | LogicalType::Float { boost }
            | LogicalType::Double { boost } => *boost,
            _ => DEFAULT_BOOST,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::Integer { .. }
                | LogicalType::Long { .. }
                | LogicalType::Float { .. }
                | LogicalType::Double { .. }
                | LogicalType::Date { .. }
        )
    }
}

/// A field produced for the index. Fields are indexed, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexableField {
    pub name: String,
    pub value: IndexValue,
    pub boost: f32,
    pub tokenized: bool,
}

/// One term of a field and its token position within the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTerm {
    pub position: u32,
    pub value: IndexValue,
}

impl FieldTerm {
    pub fn new(position: u32, value: IndexValue) -> FieldTerm {
        FieldTerm { position, value }
    }
}

impl From<IndexValue> for FieldTerm {
    fn from(value: IndexValue) -> FieldTerm {
        FieldTerm::new(0, value)
    }
}

/// Converts the values of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMapper {
    logical_type: LogicalType,
    analyzer: Analyzer,
}

impl CellMapper {
    /// Creates a mapper. `default_analyzer` applies to text mappers that do
    /// not name their own analyzer; every other type uses the keyword
    /// analyzer.
    ///
    /// # Errors
    /// Fails when a text mapper names an unknown analyzer.
    pub fn new(logical_type: LogicalType, default_analyzer: &Analyzer) -> Result<CellMapper> {
        let analyzer = match &logical_type {
            LogicalType::Text {
                analyzer: Some(name),
                ..
            } => rowindex_text::create_analyzer(name)?,
            LogicalType::Text { analyzer: None, .. } => default_analyzer.clone(),
            _ => Analyzer::keyword(),
        };
        let boost = logical_type.boost();
        if boost <= 0.0 {
            log::warn!(
                "{} mapper configured with non-positive boost {boost}",
                logical_type.name()
            );
        }
        Ok(CellMapper {
            logical_type,
            analyzer,
        })
    }

    pub fn text() -> CellMapper {
        CellMapper {
            logical_type: LogicalType::Text {
                analyzer: None,
                boost: DEFAULT_BOOST,
            },
            analyzer: Analyzer::standard(),
        }
    }

    pub fn string() -> CellMapper {
        Self::keyword(LogicalType::String {
            boost: DEFAULT_BOOST,
        })
    }

    pub fn integer() -> CellMapper {
        Self::keyword(LogicalType::Integer {
            boost: DEFAULT_BOOST,
        })
    }

    pub fn long() -> CellMapper {
        Self::keyword(LogicalType::Long {
            boost: DEFAULT_BOOST,
        })
    }

    pub fn float() -> CellMapper {
        Self::keyword(LogicalType::Float {
            boost: DEFAULT_BOOST,
        })
    }

    pub fn double() -> CellMapper {
        Self::keyword(LogicalType::Double {
            boost: DEFAULT_BOOST,
        })
    }

    pub fn date() -> CellMapper {
        Self::keyword(LogicalType::Date {
            pattern: DatePattern::default(),
        })
    }

    pub fn bytes() -> CellMapper {
        Self::keyword(LogicalType::Bytes)
    }

    pub fn boolean() -> CellMapper {
        Self::keyword(LogicalType::Boolean)
    }

    pub fn uuid() -> CellMapper {
        Self::keyword(LogicalType::Uuid)
    }

    pub fn inet() -> CellMapper {
        Self::keyword(LogicalType::Inet)
    }

    fn keyword(logical_type: LogicalType) -> CellMapper {
        CellMapper {
            logical_type,
            analyzer: Analyzer::keyword(),
        }
    }

    pub fn logical_type(&self) -> &LogicalType {
        &self.logical_type
    }

    /// The mapper type name used in schemas and error messages.
    pub fn name(&self) -> &'static str {
        self.logical_type.name()
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn boost(&self) -> f32 {
        self.logical_type.boost()
    }

    pub fn is_tokenized(&self) -> bool {
        matches!(self.logical_type, LogicalType::Text { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.logical_type.is_numeric()
    }

    pub fn supports(&self, condition: ConditionKind) -> bool {
        match self.logical_type {
            LogicalType::Text { .. } => true,
            _ => matches!(condition, ConditionKind::Match | ConditionKind::Range),
        }
    }

    /// Whether columns of `native_type` can be mapped by this mapper.
    pub fn supports_native(&self, native_type: &NativeType) -> bool {
        use NativeType as N;
        let native = native_type.base();
        let textual = matches!(native, N::Ascii | N::Utf8);
        match self.logical_type {
            LogicalType::Text { .. } | LogicalType::String { .. } => {
                !matches!(native, N::Bytes | N::Composite(_) | N::Reversed(_))
            }
            LogicalType::Integer { .. }
            | LogicalType::Long { .. }
            | LogicalType::Float { .. }
            | LogicalType::Double { .. } => {
                textual || matches!(native, N::Int32 | N::Long | N::Float | N::Double)
            }
            LogicalType::Date { .. } => {
                textual
                    || matches!(
                        native,
                        N::Int32 | N::Long | N::Float | N::Double | N::Timestamp
                    )
            }
            LogicalType::Bytes => textual || matches!(native, N::Bytes),
            LogicalType::Boolean => textual || matches!(native, N::Boolean),
            LogicalType::Uuid => textual || matches!(native, N::Uuid),
            LogicalType::Inet => textual || matches!(native, N::Inet),
        }
    }

    /// Converts a stored cell value.
    ///
    /// # Errors
    /// [`Error::invalid_value`] when the runtime representation is not accepted
    /// by this mapper, [`Error::parse`] when a string cannot be parsed.
    pub fn index_value(&self, name: &str, value: &CellValue) -> Result<IndexValue> {
        match &self.logical_type {
            LogicalType::Text { .. } | LogicalType::String { .. } => to_text(name, value),
            LogicalType::Integer { .. } => to_i32(name, value).map(IndexValue::Int32),
            LogicalType::Long { .. } => to_i64(name, value).map(IndexValue::Int64),
            LogicalType::Float { .. } => to_f32(name, value).map(IndexValue::Float32),
            LogicalType::Double { .. } => to_f64(name, value).map(IndexValue::Float64),
            LogicalType::Date { pattern } => to_date(name, value, pattern).map(IndexValue::Int64),
            LogicalType::Bytes => to_hex(name, value).map(IndexValue::Text),
            LogicalType::Boolean => to_boolean(name, value).map(IndexValue::Text),
            LogicalType::Uuid => to_uuid(name, value).map(IndexValue::Text),
            LogicalType::Inet => to_inet(name, value).map(IndexValue::Text),
        }
    }

    /// Converts a query literal. Agrees with [`CellMapper::index_value`].
    pub fn query_value(&self, name: &str, value: &CellValue) -> Result<IndexValue> {
        self.index_value(name, value)
    }

    /// The terms a cell contributes to the index, with their positions.
    ///
    /// Tokenized mappers analyze the converted text and keep the gaps left by
    /// removed tokens; every other mapper contributes its single index value
    /// at position 0.
    pub fn terms(&self, name: &str, value: &CellValue) -> Result<Vec<FieldTerm>> {
        let value = self.index_value(name, value)?;
        match value {
            IndexValue::Text(text) if self.is_tokenized() => Ok(self
                .analyzer
                .analyze_positions(&text)
                .into_iter()
                .map(|(position, term)| FieldTerm::new(position, IndexValue::Text(term)))
                .collect()),
            other => Ok(vec![FieldTerm::from(other)]),
        }
    }

    /// Builds the index field for a cell. Absent cells produce no field.
    pub fn field(&self, name: &str, value: Option<&CellValue>) -> Result<Option<IndexableField>> {
        let Some(value) = value else {
            return Ok(None);
        };
        Ok(Some(IndexableField {
            name: name.to_string(),
            value: self.index_value(name, value)?,
            boost: self.boost(),
            tokenized: self.is_tokenized(),
        }))
    }
}

fn unsupported(name: &str, expected: &str, value: &CellValue) -> Error {
    Error::invalid_value(
        name,
        format!("expected {expected}, found {} value", value.kind_name()),
    )
}

fn to_text(name: &str, value: &CellValue) -> Result<IndexValue> {
    match value {
        CellValue::Bytes(_) => Err(unsupported(name, "a textual value", value)),
        other => Ok(IndexValue::Text(other.to_string())),
    }
}

/// Parses a numeric literal, preferring integers so large values keep their
/// precision.
enum Numeric {
    Integer(i64),
    Float(f64),
}

fn parse_numeric(name: &str, text: &str) -> Result<Numeric> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(Numeric::Integer(v));
    }
    match trimmed.parse::<f64>() {
        Ok(v) => Ok(Numeric::Float(v)),
        Err(_) => Err(Error::parse(name, text, None)),
    }
}

fn truncate_to_i64(name: &str, v: f64, min: i64, max: i64) -> Result<i64> {
    let t = v.trunc();
    if !t.is_finite() || t < min as f64 || t > max as f64 {
        return Err(Error::invalid_value(
            name,
            format!("{v} is out of range [{min}, {max}]"),
        ));
    }
    Ok(t as i64)
}

fn to_i32(name: &str, value: &CellValue) -> Result<i32> {
    let wide = match value {
        CellValue::Int32(v) => return Ok(*v),
        CellValue::Int64(v) => *v,
        CellValue::Float32(v) => truncate_to_i64(name, *v as f64, i32::MIN as i64, i32::MAX as i64)?,
        CellValue::Float64(v) => truncate_to_i64(name, *v, i32::MIN as i64, i32::MAX as i64)?,
        CellValue::Text(s) => match parse_numeric(name, s)? {
            Numeric::Integer(v) => v,
            Numeric::Float(v) => truncate_to_i64(name, v, i32::MIN as i64, i32::MAX as i64)?,
        },
        other => return Err(unsupported(name, "a numeric value", other)),
    };
    i32::try_from(wide).map_err(|_| {
        Error::invalid_value(name, format!("{wide} is out of range for an integer"))
    })
}

fn to_i64(name: &str, value: &CellValue) -> Result<i64> {
    match value {
        CellValue::Int32(v) => Ok(*v as i64),
        CellValue::Int64(v) => Ok(*v),
        CellValue::Float32(v) => truncate_to_i64(name, *v as f64, i64::MIN, i64::MAX),
        CellValue::Float64(v) => truncate_to_i64(name, *v, i64::MIN, i64::MAX),
        CellValue::Text(s) => match parse_numeric(name, s)? {
            Numeric::Integer(v) => Ok(v),
            Numeric::Float(v) => truncate_to_i64(name, v, i64::MIN, i64::MAX),
        },
        other => Err(unsupported(name, "a numeric value", other)),
    }
}

fn to_f64(name: &str, value: &CellValue) -> Result<f64> {
    match value {
        CellValue::Int32(v) => Ok(*v as f64),
        CellValue::Int64(v) => Ok(*v as f64),
        CellValue::Float32(v) => Ok(*v as f64),
        CellValue::Float64(v) => Ok(*v),
        CellValue::Text(s) => match parse_numeric(name, s)? {
            Numeric::Integer(v) => Ok(v as f64),
            Numeric::Float(v) => Ok(v),
        },
        other => Err(unsupported(name, "a numeric value", other)),
    }
}

fn to_f32(name: &str, value: &CellValue) -> Result<f32> {
    if let CellValue::Float32(v) = value {
        return Ok(*v);
    }
    let wide = to_f64(name, value)?;
    let narrow = wide as f32;
    if wide.is_finite() && !narrow.is_finite() {
        return Err(Error::invalid_value(
            name,
            format!("{wide} is out of range for a float"),
        ));
    }
    Ok(narrow)
}

fn to_date(name: &str, value: &CellValue, pattern: &DatePattern) -> Result<i64> {
    match value {
        CellValue::Timestamp(v) => Ok(v.timestamp_millis()),
        CellValue::Int32(v) => Ok(*v as i64),
        CellValue::Int64(v) => Ok(*v),
        CellValue::Float32(v) => truncate_to_i64(name, *v as f64, i64::MIN, i64::MAX),
        CellValue::Float64(v) => truncate_to_i64(name, *v, i64::MIN, i64::MAX),
        CellValue::Text(s) => pattern
            .parse_millis(s)
            .or_else(|| s.trim().parse::<i64>().ok())
            .ok_or_else(|| Error::parse(name, s.as_str(), Some(pattern.as_str()))),
        other => Err(unsupported(name, "a date value", other)),
    }
}

fn to_hex(name: &str, value: &CellValue) -> Result<String> {
    match value {
        CellValue::Bytes(v) => Ok(hex::encode(v)),
        CellValue::Text(s) => normalize_hex(s)
            .map_err(|e| Error::invalid_value(name, format!("malformed hex {s:?}: {e}"))),
        other => Err(unsupported(name, "a bytes value", other)),
    }
}

/// Strips an optional `0x` prefix and re-encodes the digits in lower case.
fn normalize_hex(text: &str) -> std::result::Result<String, hex::FromHexError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).map(hex::encode)
}

fn to_boolean(name: &str, value: &CellValue) -> Result<String> {
    match value {
        CellValue::Boolean(v) => Ok(v.to_string()),
        CellValue::Text(s) if s.eq_ignore_ascii_case("true") => Ok("true".to_string()),
        CellValue::Text(s) if s.eq_ignore_ascii_case("false") => Ok("false".to_string()),
        CellValue::Text(s) => Err(Error::parse(name, s.as_str(), None)),
        other => Err(unsupported(name, "a boolean value", other)),
    }
}

fn to_uuid(name: &str, value: &CellValue) -> Result<String> {
    let uuid = match value {
        CellValue::Uuid(v) => *v,
        CellValue::Text(s) => Uuid::parse_str(s).map_err(|_| Error::parse(name, s.as_str(), None))?,
        other => return Err(unsupported(name, "a uuid value", other)),
    };
    Ok(uuid.hyphenated().to_string())
}

fn to_inet(name: &str, value: &CellValue) -> Result<String> {
    let addr = match value {
        CellValue::Inet(v) => *v,
        CellValue::Text(s) => s
            .parse::<IpAddr>()
            .map_err(|_| Error::parse(name, s.as_str(), None))?,
        other => return Err(unsupported(name, "an inet value", other)),
    };
    Ok(addr.to_string())
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_integer_accepted_forms() {
        let m = CellMapper::integer();
        let v = |c: CellValue| m.index_value("f", &c);
        assert_eq!(v(CellValue::Int32(3)).unwrap(), IndexValue::Int32(3));
        assert_eq!(v(CellValue::Int64(-3)).unwrap(), IndexValue::Int32(-3));
        assert_eq!(v(CellValue::Float64(3.9)).unwrap(), IndexValue::Int32(3));
        assert_eq!(v(CellValue::Float32(-3.9)).unwrap(), IndexValue::Int32(-3));
        assert_eq!(v("42".into()).unwrap(), IndexValue::Int32(42));
        assert_eq!(v("42.7".into()).unwrap(), IndexValue::Int32(42));

        assert!(v(CellValue::Int64(i64::from(i32::MAX) + 1)).unwrap_err().is_invalid_value());
        assert!(v(CellValue::Float64(f64::NAN)).unwrap_err().is_invalid_value());
        assert!(v(CellValue::Boolean(true)).unwrap_err().is_invalid_value());
        assert!(v("forty".into()).unwrap_err().is_parse());
    }

    #[test]
    fn test_long_keeps_precision() {
        let m = CellMapper::long();
        assert_eq!(
            m.index_value("f", &CellValue::from("9007199254740993")).unwrap(),
            IndexValue::Int64(9_007_199_254_740_993)
        );
        assert!(
            m.index_value("f", &CellValue::Float64(1e300))
                .unwrap_err()
                .is_invalid_value()
        );
    }

    #[test]
    fn test_float_and_double() {
        let f = CellMapper::float();
        assert_eq!(
            f.index_value("f", &CellValue::Float64(2.5)).unwrap(),
            IndexValue::Float32(2.5)
        );
        assert_eq!(
            f.index_value("f", &CellValue::from("0.25")).unwrap(),
            IndexValue::Float32(0.25)
        );
        assert!(f.index_value("f", &CellValue::Float64(1e300)).is_err());

        let d = CellMapper::double();
        assert_eq!(
            d.index_value("f", &CellValue::Int32(7)).unwrap(),
            IndexValue::Float64(7.0)
        );
        assert!(d.index_value("f", &CellValue::Bytes(vec![1])).is_err());
    }

    #[test]
    fn test_date() {
        let m = CellMapper::date();
        let ts = Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap();
        let expected = IndexValue::Int64(86_400_000);
        assert_eq!(m.index_value("d", &ts.into()).unwrap(), expected);
        assert_eq!(m.index_value("d", &"1970/01/02".into()).unwrap(), expected);
        assert_eq!(
            m.index_value("d", &"1970/01/02 00:00:00".into()).unwrap(),
            expected
        );
        assert_eq!(m.index_value("d", &"86400000".into()).unwrap(), expected);
        assert_eq!(m.index_value("d", &CellValue::Float64(86_400_000.9)).unwrap(), expected);
    }

    #[test]
    fn test_date_parse_error_names_pattern() {
        let pattern = DatePattern::new("yyyy").unwrap();
        let m = CellMapper::new(LogicalType::Date { pattern }, &Analyzer::standard()).unwrap();
        let err = m.index_value("d", &"abcd".into()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("yyyy"), "{err}");
    }

    #[test]
    fn test_terms_keep_positions() {
        let m = CellMapper::text();
        let terms = m.terms("t", &"quick the fox".into()).unwrap();
        assert_eq!(
            terms,
            vec![
                FieldTerm::new(0, IndexValue::Text("quick".into())),
                FieldTerm::new(2, IndexValue::Text("fox".into())),
            ]
        );
        assert_eq!(
            CellMapper::integer().terms("i", &CellValue::Int32(7)).unwrap(),
            vec![FieldTerm::new(0, IndexValue::Int32(7))]
        );
    }

    #[test]
    fn test_bytes() {
        let m = CellMapper::bytes();
        let hex = |s: &str| m.index_value("b", &s.into());
        assert_eq!(hex("0xF1").unwrap(), IndexValue::Text("f1".into()));
        assert_eq!(hex("f1").unwrap(), hex("0xF1").unwrap());
        assert!(hex("f").unwrap_err().is_invalid_value());
        assert!(hex("0xzz").unwrap_err().is_invalid_value());
        assert_eq!(hex("0XDEADbeef").unwrap(), IndexValue::Text("deadbeef".into()));
        assert_eq!(hex("").unwrap(), IndexValue::Text(String::new()));
        assert_eq!(
            m.index_value("b", &CellValue::Bytes(vec![0xde, 0xad])).unwrap(),
            IndexValue::Text("dead".into())
        );
        assert!(m.index_value("b", &CellValue::Int32(1)).unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_text_families() {
        let s = CellMapper::string();
        assert_eq!(
            s.index_value("s", &CellValue::Int32(5)).unwrap(),
            IndexValue::Text("5".into())
        );
        assert!(s.index_value("s", &CellValue::Bytes(vec![])).is_err());

        let b = CellMapper::boolean();
        assert_eq!(b.index_value("b", &"TRUE".into()).unwrap(), IndexValue::Text("true".into()));
        assert!(b.index_value("b", &"yes".into()).unwrap_err().is_parse());

        let u = CellMapper::uuid();
        assert_eq!(
            u.index_value("u", &"550E8400-E29B-41D4-A716-446655440000".into())
                .unwrap(),
            IndexValue::Text("550e8400-e29b-41d4-a716-446655440000".into())
        );

        let i = CellMapper::inet();
        assert_eq!(
            i.index_value("i", &CellValue::Inet(Ipv4Addr::LOCALHOST.into())).unwrap(),
            IndexValue::Text("127.0.0.1".into())
        );
        assert_eq!(i.index_value("i", &"::1".into()).unwrap(), IndexValue::Text("::1".into()));
        assert!(i.index_value("i", &"300.0.0.1".into()).unwrap_err().is_parse());
    }

    #[test]
    fn test_round_trip_through_display() {
        let cases = [
            (CellMapper::integer(), CellValue::Int32(-17)),
            (CellMapper::long(), CellValue::Int64(1 << 40)),
            (CellMapper::float(), CellValue::Float32(1.25)),
            (CellMapper::double(), CellValue::Float64(-0.125)),
            (CellMapper::date(), CellValue::Int64(1_390_817_700_000)),
            (CellMapper::bytes(), CellValue::Bytes(vec![0xf1, 0x00])),
        ];
        for (mapper, cell) in cases {
            let indexed = mapper.index_value("f", &cell).unwrap();
            let queried = mapper
                .query_value("f", &CellValue::Text(indexed.to_string()))
                .unwrap();
            assert_eq!(indexed, queried, "{}", mapper.name());
        }
    }

    #[test]
    fn test_field_and_boost() {
        let m = CellMapper::integer();
        assert_eq!(m.field("f", None).unwrap(), None);
        let field = m.field("f", Some(&CellValue::Int32(1))).unwrap().unwrap();
        assert_eq!(field.boost, 1.0);
        assert!(!field.tokenized);

        let m = CellMapper::new(LogicalType::Long { boost: 0.0 }, &Analyzer::standard()).unwrap();
        assert_eq!(m.boost(), 0.0);
        assert!(CellMapper::text().field("t", Some(&"a".into())).unwrap().unwrap().tokenized);
    }

    #[test]
    fn test_analyzers() {
        let simple = Analyzer::simple();
        let text = CellMapper::new(
            LogicalType::Text {
                analyzer: None,
                boost: 1.0,
            },
            &simple,
        )
        .unwrap();
        assert_eq!(text.analyzer(), &simple);

        let text = CellMapper::new(
            LogicalType::Text {
                analyzer: Some("keyword".into()),
                boost: 1.0,
            },
            &simple,
        )
        .unwrap();
        assert!(text.analyzer().is_keyword());
        assert!(CellMapper::integer().analyzer().is_keyword());

        assert!(
            CellMapper::new(
                LogicalType::Text {
                    analyzer: Some("klingon".into()),
                    boost: 1.0,
                },
                &simple,
            )
            .is_err()
        );
    }

    #[test]
    fn test_supported_conditions_and_native_types() {
        assert!(CellMapper::text().supports(ConditionKind::Fuzzy));
        assert!(CellMapper::string().supports(ConditionKind::Range));
        assert!(!CellMapper::string().supports(ConditionKind::Prefix));
        assert!(!CellMapper::integer().supports(ConditionKind::Wildcard));

        assert!(CellMapper::integer().supports_native(&NativeType::Utf8));
        assert!(!CellMapper::integer().supports_native(&NativeType::Timestamp));
        assert!(CellMapper::date().supports_native(&NativeType::Timestamp));
        assert!(
            CellMapper::bytes().supports_native(&NativeType::Reversed(Box::new(NativeType::Bytes)))
        );
        assert!(!CellMapper::text().supports_native(&NativeType::Bytes));
    }
}
