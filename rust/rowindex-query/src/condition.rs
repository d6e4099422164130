//! Search conditions as submitted by clients.
//!
//! Conditions arrive as JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "match", "field": "name", "value": "alice"}
//! {"type": "range", "field": "age", "lower": 18, "include_lower": true}
//! {"type": "fuzzy", "field": "name", "value": "alcie", "max_edits": 1}
//! ```

use rowindex_common::{error::Error, result::Result};
use rowindex_schema::{CellValue, ConditionKind, DEFAULT_BOOST};
use serde::Deserialize;

fn default_max_edits() -> u32 {
    2
}

fn default_max_expansions() -> u32 {
    50
}

fn default_transpositions() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum Condition {
    Match {
        #[serde(default)]
        field: String,
        #[serde(default)]
        value: Option<CellValue>,
        #[serde(default)]
        boost: Option<f32>,
    },
    Range {
        #[serde(default)]
        field: String,
        #[serde(default)]
        lower: Option<CellValue>,
        #[serde(default)]
        upper: Option<CellValue>,
        #[serde(default)]
        include_lower: bool,
        #[serde(default)]
        include_upper: bool,
        #[serde(default)]
        boost: Option<f32>,
    },
    Prefix {
        #[serde(default)]
        field: String,
        #[serde(default)]
        value: Option<CellValue>,
        #[serde(default)]
        boost: Option<f32>,
    },
    Wildcard {
        #[serde(default)]
        field: String,
        #[serde(default)]
        value: Option<CellValue>,
        #[serde(default)]
        boost: Option<f32>,
    },
    Phrase {
        #[serde(default)]
        field: String,
        #[serde(default)]
        values: Vec<Option<CellValue>>,
        #[serde(default)]
        slop: u32,
        #[serde(default)]
        boost: Option<f32>,
    },
    Fuzzy {
        #[serde(default)]
        field: String,
        #[serde(default)]
        value: Option<CellValue>,
        #[serde(default = "default_max_edits")]
        max_edits: u32,
        #[serde(default)]
        prefix_length: u32,
        #[serde(default = "default_max_expansions")]
        max_expansions: u32,
        #[serde(default = "default_transpositions")]
        transpositions: bool,
        #[serde(default)]
        boost: Option<f32>,
    },
}

impl Condition {
    pub fn from_json(json: &str) -> Result<Condition> {
        serde_json::from_str(json).map_err(|e| Error::json("condition", e))
    }

    pub fn matching(field: impl Into<String>, value: impl Into<CellValue>) -> Condition {
        Condition::Match {
            field: field.into(),
            value: Some(value.into()),
            boost: None,
        }
    }

    pub fn range(
        field: impl Into<String>,
        lower: Option<CellValue>,
        upper: Option<CellValue>,
        include_lower: bool,
        include_upper: bool,
    ) -> Condition {
        Condition::Range {
            field: field.into(),
            lower,
            upper,
            include_lower,
            include_upper,
            boost: None,
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<CellValue>) -> Condition {
        Condition::Prefix {
            field: field.into(),
            value: Some(value.into()),
            boost: None,
        }
    }

    pub fn wildcard(field: impl Into<String>, value: impl Into<CellValue>) -> Condition {
        Condition::Wildcard {
            field: field.into(),
            value: Some(value.into()),
            boost: None,
        }
    }

    /// A phrase; `None` entries leave a gap at their position.
    pub fn phrase(field: impl Into<String>, values: Vec<Option<CellValue>>, slop: u32) -> Condition {
        Condition::Phrase {
            field: field.into(),
            values,
            slop,
            boost: None,
        }
    }

    /// A fuzzy condition with the default edit settings.
    pub fn fuzzy(field: impl Into<String>, value: impl Into<CellValue>) -> Condition {
        Condition::Fuzzy {
            field: field.into(),
            value: Some(value.into()),
            max_edits: default_max_edits(),
            prefix_length: 0,
            max_expansions: default_max_expansions(),
            transpositions: default_transpositions(),
            boost: None,
        }
    }

    pub fn with_boost(mut self, value: f32) -> Condition {
        match &mut self {
            Condition::Match { boost, .. }
            | Condition::Range { boost, .. }
            | Condition::Prefix { boost, .. }
            | Condition::Wildcard { boost, .. }
            | Condition::Phrase { boost, .. }
            | Condition::Fuzzy { boost, .. } => *boost = Some(value),
        }
        self
    }

    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::Match { .. } => ConditionKind::Match,
            Condition::Range { .. } => ConditionKind::Range,
            Condition::Prefix { .. } => ConditionKind::Prefix,
            Condition::Wildcard { .. } => ConditionKind::Wildcard,
            Condition::Phrase { .. } => ConditionKind::Phrase,
            Condition::Fuzzy { .. } => ConditionKind::Fuzzy,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Condition::Match { field, .. }
            | Condition::Range { field, .. }
            | Condition::Prefix { field, .. }
            | Condition::Wildcard { field, .. }
            | Condition::Phrase { field, .. }
            | Condition::Fuzzy { field, .. } => field,
        }
    }

    /// The condition's boost, [`DEFAULT_BOOST`] when unset.
    pub fn boost(&self) -> f32 {
        let boost = match self {
            Condition::Match { boost, .. }
            | Condition::Range { boost, .. }
            | Condition::Prefix { boost, .. }
            | Condition::Wildcard { boost, .. }
            | Condition::Phrase { boost, .. }
            | Condition::Fuzzy { boost, .. } => boost,
        };
        boost.unwrap_or(DEFAULT_BOOST)
    }
}

/// A search: an optional relevance-scored query plus an optional filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Search {
    #[serde(default)]
    pub query: Option<Condition>,
    #[serde(default)]
    pub filter: Option<Condition>,
}

impl Search {
    pub fn from_json(json: &str) -> Result<Search> {
        serde_json::from_str(json).map_err(|e| Error::json("search", e))
    }

    /// Whether results must be ordered by relevance rather than storage order.
    pub fn uses_relevance(&self) -> bool {
        self.query.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let condition = Condition::from_json(r#"{"type": "fuzzy", "field": "f", "value": "x"}"#)
            .unwrap();
        assert_eq!(condition, Condition::fuzzy("f", "x"));
        assert_eq!(condition.boost(), 1.0);
        assert_eq!(condition.kind(), ConditionKind::Fuzzy);

        let condition = Condition::from_json(r#"{"type": "range", "field": "f"}"#).unwrap();
        assert_eq!(condition, Condition::range("f", None, None, false, false));
    }

    #[test]
    fn test_parse_variants() {
        let condition = Condition::from_json(
            r#"{"type": "phrase", "field": "f", "values": ["a", null, "c"], "slop": 1, "boost": 2.5}"#,
        )
        .unwrap();
        assert_eq!(
            condition,
            Condition::phrase("f", vec![Some("a".into()), None, Some("c".into())], 1)
                .with_boost(2.5)
        );

        let condition =
            Condition::from_json(r#"{"type": "match", "field": "age", "value": 42}"#).unwrap();
        assert_eq!(condition, Condition::matching("age", 42i64));

        let condition = Condition::from_json(r#"{"type": "match", "value": "x"}"#).unwrap();
        assert_eq!(condition.field(), "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Condition::from_json(r#"{"type": "regexp", "field": "f"}"#).is_err());
        assert!(Condition::from_json(r#"{"type": "match", "field": "f", "value": [1]}"#).is_err());
    }

    #[test]
    fn test_search() {
        let search = Search::from_json(
            r#"{"filter": {"type": "prefix", "field": "name", "value": "al"}}"#,
        )
        .unwrap();
        assert!(!search.uses_relevance());
        assert_eq!(search.filter, Some(Condition::prefix("name", "al")));

        let search =
            Search::from_json(r#"{"query": {"type": "match", "field": "n", "value": "a"}}"#)
                .unwrap();
        assert!(search.uses_relevance());
        assert!(Search::from_json("{}").unwrap().query.is_none());
    }
}
