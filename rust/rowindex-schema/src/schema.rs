//! Index schema: which columns are indexed and how.
//!
//! A schema is described in JSON:
//!
//! ```json
//! {
//!     "default_analyzer": "standard",
//!     "fields": {
//!         "name":   {"type": "text", "analyzer": "simple"},
//!         "age":    {"type": "integer", "boost": 2.0},
//!         "born":   {"type": "date", "pattern": "yyyy-MM-dd"},
//!         "avatar": {"type": "bytes"}
//!     }
//! }
//! ```
//!
//! Field names are case sensitive. Once built, a schema is immutable and may be
//! shared between threads.

use std::{collections::BTreeMap, sync::Arc};

use ahash::AHashMap;
use rowindex_common::{error::Error, result::Result};
use rowindex_core::{NativeComparator, metadata::TableMetadata};
use rowindex_text::{Analyzer, create_analyzer};
use serde_json::{Map, Value};

use crate::{
    clustering::ClusteringKeyMapper,
    date::DatePattern,
    document::Document,
    mapper::{CellMapper, DEFAULT_BOOST, LogicalType},
    value::CellValue,
};

/// Field name reported for errors that are not tied to one field.
const ROOT: &str = "<schema>";

#[derive(Debug, Clone)]
pub struct Schema {
    default_analyzer: Analyzer,
    mappers: AHashMap<String, CellMapper>,
    clustering_key: Option<ClusteringKeyMapper>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parses a schema from its JSON description.
    ///
    /// # Errors
    /// A schema error naming the offending field and option for unknown types,
    /// unknown options, ill-typed options and unknown analyzers, and a schema
    /// error against the root for invalid JSON or a missing `fields` object.
    pub fn from_json(json: &str) -> Result<Schema> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| Error::schema(ROOT, "", format!("invalid JSON: {e}")))?;
        let Value::Object(root) = root else {
            return Err(Error::schema(ROOT, "", "expected a JSON object"));
        };

        let mut default_analyzer = None;
        let mut fields = None;
        for (key, value) in &root {
            match key.as_str() {
                "default_analyzer" => {
                    let name = expect_str(ROOT, key, value)?;
                    default_analyzer = Some(
                        create_analyzer(name).map_err(|e| Error::schema(ROOT, key, e.to_string()))?,
                    );
                }
                "fields" => match value {
                    Value::Object(map) => fields = Some(map),
                    _ => return Err(Error::schema(ROOT, key, "expected an object")),
                },
                _ => return Err(Error::schema(ROOT, key, "unknown option")),
            }
        }
        let Some(fields) = fields else {
            return Err(Error::schema(ROOT, "fields", "missing"));
        };

        let mut builder = SchemaBuilder::default();
        if let Some(analyzer) = default_analyzer {
            builder = builder.default_analyzer(analyzer);
        }
        for (name, definition) in fields {
            let logical_type = parse_field(name, definition)?;
            builder = builder.field(name, logical_type);
        }
        builder.build()
    }

    pub fn default_analyzer(&self) -> &Analyzer {
        &self.default_analyzer
    }

    /// Looks up the mapper of a field.
    ///
    /// # Errors
    /// A validation error when the field is not part of the schema.
    pub fn mapper(&self, field: &str) -> Result<&CellMapper> {
        self.mappers
            .get(field)
            .ok_or_else(|| Error::validation(format!("no mapper found for field '{field}'")))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.mappers.contains_key(field)
    }

    /// The mapped field names, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mappers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks every mapped field against the table definition.
    ///
    /// # Errors
    /// A schema error when a field has no column, or when the column's native
    /// type cannot be converted by the field's mapper.
    pub fn validate(&self, table: &TableMetadata) -> Result<()> {
        let mut mappers: Vec<(&str, &CellMapper)> =
            self.mappers.iter().map(|(k, v)| (k.as_str(), v)).collect();
        mappers.sort_unstable_by_key(|(name, _)| *name);
        for (name, mapper) in mappers {
            let column = table.column(name).ok_or_else(|| {
                Error::schema(
                    name,
                    "type",
                    format!(
                        "no column named '{name}' in table {}.{}",
                        table.keyspace(),
                        table.table()
                    ),
                )
            })?;
            if !mapper.supports_native(&column.native_type) {
                return Err(Error::schema(
                    name,
                    "type",
                    format!(
                        "{} mapper does not support column type {}",
                        mapper.name(),
                        column.native_type.name()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Attaches the clustering key mapper ordering rows with `comparator`.
    pub fn with_clustering_key(mut self, comparator: impl NativeComparator + 'static) -> Schema {
        self.clustering_key = Some(ClusteringKeyMapper::new(Arc::new(comparator)));
        self
    }

    pub fn clustering_key(&self) -> Option<&ClusteringKeyMapper> {
        self.clustering_key.as_ref()
    }

    /// Builds the index document of one row.
    ///
    /// Columns without a mapper are ignored, as are absent cells. The clustering
    /// key field is added when both a key and a clustering key mapper exist.
    pub fn document<'a>(
        &self,
        cells: impl IntoIterator<Item = (&'a str, Option<&'a CellValue>)>,
        clustering_key: Option<&[u8]>,
    ) -> Result<Document> {
        let mut document = Document::default();
        for (name, value) in cells {
            let Some(mapper) = self.mappers.get(name) else {
                continue;
            };
            if let Some(field) = mapper.field(name, value)? {
                document.add(field);
            }
        }
        if let (Some(mapper), Some(key)) = (&self.clustering_key, clustering_key) {
            document.add(mapper.field(key));
        }
        Ok(document)
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    default_analyzer: Option<Analyzer>,
    fields: BTreeMap<String, LogicalType>,
}

impl SchemaBuilder {
    pub fn default_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.default_analyzer = Some(analyzer);
        self
    }

    pub fn field(mut self, name: impl Into<String>, logical_type: LogicalType) -> Self {
        self.fields.insert(name.into(), logical_type);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let default_analyzer = self.default_analyzer.unwrap_or_else(Analyzer::standard);
        let mut mappers = AHashMap::with_capacity(self.fields.len());
        for (name, logical_type) in self.fields {
            let mapper = CellMapper::new(logical_type, &default_analyzer)
                .map_err(|e| Error::schema(name.as_str(), "analyzer", e.to_string()))?;
            mappers.insert(name, mapper);
        }
        Ok(Schema {
            default_analyzer,
            mappers,
            clustering_key: None,
        })
    }
}

fn expect_str<'v>(field: &str, option: &str, value: &'v Value) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| Error::schema(field, option, format!("expected a string, found {value}")))
}

fn parse_field(name: &str, definition: &Value) -> Result<LogicalType> {
    let Value::Object(options) = definition else {
        return Err(Error::schema(name, "", "expected an object"));
    };
    let type_name = match options.get("type") {
        Some(value) => expect_str(name, "type", value)?,
        None => return Err(Error::schema(name, "type", "missing")),
    };

    let allowed: &[&str] = match type_name {
        "text" => &["analyzer", "boost"],
        "string" | "integer" | "long" | "float" | "double" => &["boost"],
        "date" => &["pattern"],
        "bytes" | "boolean" | "uuid" | "inet" => &[],
        other => {
            return Err(Error::schema(name, "type", format!("unknown type '{other}'")));
        }
    };
    if let Some(unknown) = options
        .keys()
        .find(|k| k.as_str() != "type" && !allowed.contains(&k.as_str()))
    {
        return Err(Error::schema(
            name,
            unknown.as_str(),
            format!("unknown option for {type_name} mapper"),
        ));
    }

    let boost = parse_boost(name, options)?;
    Ok(match type_name {
        "text" => {
            let analyzer = match options.get("analyzer") {
                Some(value) => {
                    let analyzer = expect_str(name, "analyzer", value)?;
                    create_analyzer(analyzer)
                        .map_err(|e| Error::schema(name, "analyzer", e.to_string()))?;
                    Some(analyzer.to_string())
                }
                None => None,
            };
            LogicalType::Text { analyzer, boost }
        }
        "string" => LogicalType::String { boost },
        "integer" => LogicalType::Integer { boost },
        "long" => LogicalType::Long { boost },
        "float" => LogicalType::Float { boost },
        "double" => LogicalType::Double { boost },
        "date" => {
            let pattern = match options.get("pattern") {
                Some(value) => DatePattern::new(expect_str(name, "pattern", value)?)
                    .map_err(|e| Error::schema(name, "pattern", e.to_string()))?,
                None => DatePattern::default(),
            };
            LogicalType::Date { pattern }
        }
        "bytes" => LogicalType::Bytes,
        "boolean" => LogicalType::Boolean,
        "uuid" => LogicalType::Uuid,
        _ => LogicalType::Inet,
    })
}

fn parse_boost(name: &str, options: &Map<String, Value>) -> Result<f32> {
    match options.get("boost") {
        None => Ok(DEFAULT_BOOST),
        Some(value) => value
            .as_f64()
            .map(|b| b as f32)
            .ok_or_else(|| Error::schema(name, "boost", format!("expected a number, found {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use rowindex_core::{
        NativeType,
        metadata::{ColumnKind, TableMetadata},
    };
    use rowindex_text::AnalyzerKind;

    use super::*;
    use crate::value::IndexValue;

    const JSON: &str = r#"{
        "default_analyzer": "simple",
        "fields": {
            "name": {"type": "text"},
            "bio": {"type": "text", "analyzer": "standard", "boost": 2},
            "code": {"type": "string"},
            "age": {"type": "integer", "boost": 0.5},
            "born": {"type": "date", "pattern": "yyyy-MM-dd"},
            "avatar": {"type": "bytes"}
        }
    }"#;

    fn schema_err(json: &str) -> (String, String) {
        let err = Schema::from_json(json).unwrap_err();
        match err.into_kind() {
            rowindex_common::error::ErrorKind::Schema { field, option, .. } => (field, option),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_from_json() {
        let schema = Schema::from_json(JSON).unwrap();
        assert_eq!(
            schema.fields(),
            vec!["age", "avatar", "bio", "born", "code", "name"]
        );
        assert_eq!(schema.default_analyzer().kind(), AnalyzerKind::Simple);
        assert_eq!(schema.mapper("name").unwrap().analyzer().kind(), AnalyzerKind::Simple);
        assert_eq!(schema.mapper("bio").unwrap().analyzer().kind(), AnalyzerKind::Standard);
        assert_eq!(schema.mapper("bio").unwrap().boost(), 2.0);
        assert_eq!(schema.mapper("code").unwrap().boost(), 1.0);
        assert_eq!(schema.mapper("age").unwrap().boost(), 0.5);
        assert_eq!(
            schema
                .mapper("born")
                .unwrap()
                .index_value("born", &"1970-01-02".into())
                .unwrap(),
            IndexValue::Int64(86_400_000)
        );
    }

    #[test]
    fn test_unknown_field_is_validation_error() {
        let schema = Schema::from_json(JSON).unwrap();
        assert!(schema.mapper("Name").unwrap_err().is_validation());
        assert!(schema.contains("name"));
    }

    #[test]
    fn test_schema_errors_name_field_and_option() {
        assert_eq!(
            schema_err(r#"{"fields": {"a": {"type": "blob"}}}"#),
            ("a".into(), "type".into())
        );
        assert_eq!(
            schema_err(r#"{"fields": {"a": {"type": "integer", "analyzer": "simple"}}}"#),
            ("a".into(), "analyzer".into())
        );
        assert_eq!(
            schema_err(r#"{"fields": {"a": {"type": "text", "analyzer": "klingon"}}}"#),
            ("a".into(), "analyzer".into())
        );
        assert_eq!(
            schema_err(r#"{"fields": {"a": {"type": "long", "boost": "high"}}}"#),
            ("a".into(), "boost".into())
        );
        assert_eq!(
            schema_err(r#"{"fields": {"a": {"type": "date", "pattern": "QQ"}}}"#),
            ("a".into(), "pattern".into())
        );
        assert_eq!(schema_err(r#"{"fields": {"a": {}}}"#), ("a".into(), "type".into()));
        assert_eq!(schema_err(r#"{"default_analyzer": "standard"}"#).1, "fields");
        assert_eq!(schema_err(r#"{"fields": {}, "extra": 1}"#).1, "extra");
        assert!(Schema::from_json("{not json").unwrap_err().is_schema());
    }

    #[test]
    fn test_validate_against_table() {
        let table = TableMetadata::new("ks", "users")
            .with_column("name", NativeType::Utf8, ColumnKind::Regular)
            .with_column("age", NativeType::Int32, ColumnKind::Regular);

        let schema = Schema::builder()
            .field("name", LogicalType::Text { analyzer: None, boost: 1.0 })
            .field("age", LogicalType::Integer { boost: 1.0 })
            .build()
            .unwrap();
        schema.validate(&table).unwrap();

        let schema = Schema::builder()
            .field("age", LogicalType::Boolean)
            .build()
            .unwrap();
        assert!(schema.validate(&table).unwrap_err().is_schema());

        let schema = Schema::builder().field("email", LogicalType::Inet).build().unwrap();
        assert!(schema.validate(&table).unwrap_err().is_schema());
    }

    #[test]
    fn test_document() {
        let schema = Schema::from_json(JSON)
            .unwrap()
            .with_clustering_key(NativeType::Int32);
        let name = CellValue::from("Alice Smith");
        let age = CellValue::Int32(30);
        let other = CellValue::Int32(1);
        let document = schema
            .document(
                [
                    ("name", Some(&name)),
                    ("age", Some(&age)),
                    ("code", None),
                    ("unmapped", Some(&other)),
                ],
                Some(&[0u8, 0, 0, 7][..]),
            )
            .unwrap();

        let names: Vec<&str> = document.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "_clustering_key"]);
        assert_eq!(document.fields()[1].boost, 0.5);
        assert_eq!(
            document.fields()[2].value,
            IndexValue::Text("00000007".into())
        );

        let bad = CellValue::Boolean(true);
        assert!(schema.document([("age", Some(&bad))], None).is_err());
    }
}
