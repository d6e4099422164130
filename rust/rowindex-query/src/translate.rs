//! Translation of conditions into index queries.
//!
//! Translation is pure: the same condition against the same schema always
//! yields an equal query. Literals go through the field's mapper exactly as
//! indexed values do, then through the field's analyzer where the query kind
//! works on analyzed terms (match, phrase).

use rowindex_common::{error::Error, result::Result, verify_request};
use rowindex_schema::{CellMapper, CellValue, IndexValue, Schema};
use rowindex_text::Analyzed;

use crate::{
    condition::{Condition, Search},
    query::{IndexQuery, QueryClause},
};

/// Upper bound on fuzzy edits, as supported by automaton-based engines.
pub const MAX_FUZZY_EDITS: u32 = 2;

/// Builds the index query for `condition`.
///
/// # Errors
/// - validation errors for a blank field name, a missing or blank value, an
///   unknown field and malformed fuzzy or phrase settings
/// - [`Error::unsupported_operation`] when the field's mapper does not support
///   the condition kind
/// - conversion errors from the field's mapper
/// - [`Error::empty_analysis`] when a match value is discarded by the analyzer
pub fn build_query(condition: &Condition, schema: &Schema) -> Result<IndexQuery> {
    let field = condition.field();
    verify_request!(!field.trim().is_empty(), "field name required");
    match condition {
        Condition::Match { value, .. }
        | Condition::Prefix { value, .. }
        | Condition::Wildcard { value, .. }
        | Condition::Fuzzy { value, .. } => {
            verify_request!(value.as_ref().is_some_and(is_present), "field value required");
        }
        Condition::Phrase { values, .. } => {
            verify_request!(
                values.iter().flatten().any(is_present),
                "phrase values required"
            );
        }
        Condition::Range { lower, upper, .. } => {
            verify_request!(
                [lower, upper].into_iter().flatten().all(is_present),
                "range bounds must not be blank"
            );
        }
    }

    let mapper = schema.mapper(field)?;
    let kind = condition.kind();
    if !mapper.supports(kind) {
        return Err(Error::unsupported_operation(kind.name(), mapper.name()));
    }

    let clause = match condition {
        Condition::Match { value, .. } => {
            let value = required(value)?;
            match mapper.query_value(field, value)? {
                IndexValue::Text(text) => QueryClause::Term(single_term(mapper, field, &text)?),
                numeric => QueryClause::NumericRange {
                    lower: Some(numeric.clone()),
                    upper: Some(numeric),
                    include_lower: true,
                    include_upper: true,
                },
            }
        }
        Condition::Range {
            lower,
            upper,
            include_lower,
            include_upper,
            ..
        } => {
            let lower = bound(mapper, field, lower.as_ref())?;
            let upper = bound(mapper, field, upper.as_ref())?;
            if mapper.is_numeric() {
                QueryClause::NumericRange {
                    lower,
                    upper,
                    include_lower: *include_lower,
                    include_upper: *include_upper,
                }
            } else {
                QueryClause::TermRange {
                    lower: lower.map(|v| v.to_string()),
                    upper: upper.map(|v| v.to_string()),
                    include_lower: *include_lower,
                    include_upper: *include_upper,
                }
            }
        }
        Condition::Prefix { value, .. } => QueryClause::Prefix(raw_text(mapper, field, value)?),
        Condition::Wildcard { value, .. } => QueryClause::Wildcard(raw_text(mapper, field, value)?),
        Condition::Fuzzy {
            value,
            max_edits,
            prefix_length,
            max_expansions,
            transpositions,
            ..
        } => {
            verify_request!(
                *max_edits <= MAX_FUZZY_EDITS,
                "max_edits must be between 0 and 2"
            );
            verify_request!(*max_expansions > 0, "max_expansions must be positive");
            QueryClause::Fuzzy {
                term: raw_text(mapper, field, value)?,
                max_edits: *max_edits,
                prefix_length: *prefix_length,
                max_expansions: *max_expansions,
                transpositions: *transpositions,
            }
        }
        Condition::Phrase { values, slop, .. } => {
            let mut terms = Vec::with_capacity(values.len());
            for (position, value) in values.iter().enumerate() {
                let Some(value) = value else {
                    continue;
                };
                let text = mapper.query_value(field, value)?.to_string();
                match mapper.analyzer().analyze_single(&text) {
                    Analyzed::Term(term) => terms.push((position as u32, term)),
                    Analyzed::Empty => {}
                    Analyzed::Many(_) => {
                        return Err(Error::validation(format!(
                            "phrase value '{text}' for field '{field}' produces too many terms"
                        )));
                    }
                }
            }
            if terms.is_empty() {
                return Err(Error::empty_analysis(field, format!("{values:?}")));
            }
            QueryClause::Phrase {
                terms,
                slop: *slop,
            }
        }
    };

    let query = IndexQuery::new(field, clause, condition.boost() * mapper.boost());
    log::debug!("built query {query} from {kind} condition");
    Ok(query)
}

/// The queries of a search: the relevance-scored query and the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQueries {
    pub query: Option<IndexQuery>,
    pub filter: Option<IndexQuery>,
}

impl Search {
    /// Translates both parts of the search.
    pub fn build(&self, schema: &Schema) -> Result<SearchQueries> {
        Ok(SearchQueries {
            query: self
                .query
                .as_ref()
                .map(|c| build_query(c, schema))
                .transpose()?,
            filter: self
                .filter
                .as_ref()
                .map(|c| build_query(c, schema))
                .transpose()?,
        })
    }

    /// Checks that the search can be translated against `schema`.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        self.build(schema).map(|_| ())
    }
}

fn is_present(value: &CellValue) -> bool {
    value.as_text().is_none_or(|s| !s.trim().is_empty())
}

fn required(value: &Option<CellValue>) -> Result<&CellValue> {
    value
        .as_ref()
        .ok_or_else(|| Error::validation("field value required"))
}

fn bound(mapper: &CellMapper, field: &str, value: Option<&CellValue>) -> Result<Option<IndexValue>> {
    value.map(|v| mapper.query_value(field, v)).transpose()
}

fn raw_text(mapper: &CellMapper, field: &str, value: &Option<CellValue>) -> Result<String> {
    Ok(mapper.query_value(field, required(value)?)?.to_string())
}

fn single_term(mapper: &CellMapper, field: &str, text: &str) -> Result<String> {
    match mapper.analyzer().analyze_single(text) {
        Analyzed::Term(term) => Ok(term),
        Analyzed::Empty => Err(Error::empty_analysis(field, text)),
        Analyzed::Many(terms) => Err(Error::validation(format!(
            "value '{text}' for field '{field}' produces too many terms: {terms:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::from_json(
            r#"{"fields": {
                "name": {"type": "text"},
                "code": {"type": "string", "boost": 2},
                "age": {"type": "integer", "boost": 0.5},
                "born": {"type": "date"},
                "avatar": {"type": "bytes"}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_match_numeric_is_point_range() {
        let query = build_query(&Condition::matching("age", "42"), &schema()).unwrap();
        assert_eq!(
            query.clause,
            QueryClause::NumericRange {
                lower: Some(IndexValue::Int32(42)),
                upper: Some(IndexValue::Int32(42)),
                include_lower: true,
                include_upper: true,
            }
        );
        assert_eq!(query.boost, 0.5);
    }

    #[test]
    fn test_match_text_is_analyzed() {
        let schema = schema();
        let query = build_query(&Condition::matching("name", "Alice"), &schema).unwrap();
        assert_eq!(query.clause, QueryClause::Term("alice".into()));
        assert_eq!(query.boost, 1.0);

        let query = build_query(&Condition::matching("code", "AbC-1"), &schema).unwrap();
        assert_eq!(query.clause, QueryClause::Term("AbC-1".into()));
        assert_eq!(query.boost, 2.0);

        let err = build_query(&Condition::matching("name", "the"), &schema).unwrap_err();
        assert!(err.is_empty_analysis());
        let err = build_query(&Condition::matching("name", "alice smith"), &schema).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation_comes_first() {
        let schema = schema();
        assert!(build_query(&Condition::matching("", "x"), &schema).unwrap_err().is_validation());
        assert!(build_query(&Condition::matching("  ", "x"), &schema).unwrap_err().is_validation());
        assert!(build_query(&Condition::matching("name", "  "), &schema).unwrap_err().is_validation());
        assert!(build_query(&Condition::matching("nope", "x"), &schema).unwrap_err().is_validation());
        let missing = Condition::Match {
            field: "name".into(),
            value: None,
            boost: None,
        };
        assert!(build_query(&missing, &schema).unwrap_err().is_validation());
        // A blank value is rejected before the unsupported prefix on integers
        assert!(build_query(&Condition::prefix("age", ""), &schema).unwrap_err().is_validation());
    }

    #[test]
    fn test_unsupported_conditions() {
        let schema = schema();
        let err = build_query(&Condition::prefix("age", "4"), &schema).unwrap_err();
        assert!(err.is_unsupported_operation());
        assert!(err.to_string().contains("integer"));
        assert!(build_query(&Condition::fuzzy("code", "abc"), &schema)
            .unwrap_err()
            .is_unsupported_operation());
        assert!(build_query(&Condition::wildcard("avatar", "f*"), &schema)
            .unwrap_err()
            .is_unsupported_operation());
    }

    #[test]
    fn test_ranges() {
        let schema = schema();
        let query = build_query(
            &Condition::range("born", Some("2014/01/01".into()), None, true, false),
            &schema,
        )
        .unwrap();
        assert_eq!(
            query.clause,
            QueryClause::NumericRange {
                lower: Some(IndexValue::Int64(1_388_534_400_000)),
                upper: None,
                include_lower: true,
                include_upper: false,
            }
        );

        // Text ranges use the raw value, not the analyzed one
        let query = build_query(
            &Condition::range("name", Some("Alice".into()), Some("Bob".into()), false, true),
            &schema,
        )
        .unwrap();
        assert_eq!(
            query.clause,
            QueryClause::TermRange {
                lower: Some("Alice".into()),
                upper: Some("Bob".into()),
                include_lower: false,
                include_upper: true,
            }
        );

        let query = build_query(
            &Condition::range("avatar", Some("0xAB".into()), None, false, false),
            &schema,
        )
        .unwrap();
        assert!(matches!(query.clause, QueryClause::TermRange { lower: Some(ref l), .. } if l == "ab"));
    }

    #[test]
    fn test_blank_range_bounds_rejected() {
        let schema = schema();
        let blank_lower = Condition::range("code", Some("   ".into()), None, true, false);
        assert!(build_query(&blank_lower, &schema).unwrap_err().is_validation());

        let empty_upper = Condition::range("age", Some(18i32.into()), Some("".into()), true, true);
        assert!(build_query(&empty_upper, &schema).unwrap_err().is_validation());

        // Blank bounds are rejected before the field is looked up
        let unknown = Condition::range("nope", Some("".into()), None, false, false);
        assert!(build_query(&unknown, &schema).unwrap_err().to_string().contains("blank"));

        // Absent bounds stay unbounded
        let open = Condition::range("age", None, None, false, false);
        assert!(build_query(&open, &schema).is_ok());
    }

    #[test]
    fn test_phrase_keeps_gaps() {
        let schema = schema();
        let condition = Condition::phrase(
            "name",
            vec![Some("Quick".into()), None, Some("Fox".into()), Some("the".into())],
            1,
        );
        let query = build_query(&condition, &schema).unwrap();
        assert_eq!(
            query.clause,
            QueryClause::Phrase {
                terms: vec![(0, "quick".into()), (2, "fox".into())],
                slop: 1,
            }
        );

        // A phrase written like the indexed text matches it without slop
        let condition = Condition::phrase(
            "name",
            vec![Some("quick".into()), Some("the".into()), Some("fox".into())],
            0,
        );
        let query = build_query(&condition, &schema).unwrap();
        let mapper = schema.mapper("name").unwrap();
        assert!(query.matches(&mapper.terms("name", &"Quick the Fox".into()).unwrap()));
        assert!(!query.matches(&mapper.terms("name", &"quick fox".into()).unwrap()));

        let condition = Condition::phrase("name", vec![Some("the".into())], 0);
        assert!(build_query(&condition, &schema).unwrap_err().is_empty_analysis());
        let condition = Condition::phrase("name", vec![None], 0);
        assert!(build_query(&condition, &schema).unwrap_err().is_validation());
    }

    #[test]
    fn test_fuzzy_settings() {
        let schema = schema();
        let query = build_query(&Condition::fuzzy("name", "Alcie"), &schema).unwrap();
        assert_eq!(
            query.clause,
            QueryClause::Fuzzy {
                term: "Alcie".into(),
                max_edits: 2,
                prefix_length: 0,
                max_expansions: 50,
                transpositions: true,
            }
        );
        let condition =
            Condition::from_json(r#"{"type": "fuzzy", "field": "name", "value": "a", "max_edits": 3}"#)
                .unwrap();
        assert!(build_query(&condition, &schema).unwrap_err().is_validation());
    }

    #[test]
    fn test_boosts_multiply() {
        let schema = schema();
        let query = build_query(&Condition::matching("age", 1i32).with_boost(4.0), &schema).unwrap();
        assert_eq!(query.boost, 2.0);
    }

    #[test]
    fn test_search_build() {
        let schema = schema();
        let search = Search::from_json(
            r#"{"query": {"type": "match", "field": "name", "value": "alice"},
                "filter": {"type": "range", "field": "age", "lower": 18}}"#,
        )
        .unwrap();
        let queries = search.build(&schema).unwrap();
        assert_eq!(queries.query.unwrap().clause, QueryClause::Term("alice".into()));
        assert!(queries.filter.is_some());

        let search = Search::from_json(r#"{"filter": {"type": "prefix", "field": "age", "value": "1"}}"#)
            .unwrap();
        assert!(search.validate(&schema).unwrap_err().is_unsupported_operation());
    }
}
