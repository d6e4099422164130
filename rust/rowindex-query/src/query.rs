//! Index queries produced by the translator.
//!
//! An [`IndexQuery`] is engine-neutral: it names the field, the boost and one
//! [`QueryClause`]. [`IndexQuery::matches`] evaluates a query against the terms
//! one document holds for the field, which is how the in-memory segment and
//! the tests execute queries.

use std::{cmp::Ordering, fmt};

use regex::Regex;
use rowindex_schema::{FieldTerm, IndexValue};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    /// Exact term.
    Term(String),
    /// Lexicographic range over untokenized text.
    TermRange {
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    },
    NumericRange {
        lower: Option<IndexValue>,
        upper: Option<IndexValue>,
        include_lower: bool,
        include_upper: bool,
    },
    Prefix(String),
    /// `*` matches any sequence, `?` any single character.
    Wildcard(String),
    /// Terms with their relative positions.
    Phrase { terms: Vec<(u32, String)>, slop: u32 },
    Fuzzy {
        term: String,
        max_edits: u32,
        prefix_length: u32,
        max_expansions: u32,
        transpositions: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    pub field: String,
    pub boost: f32,
    pub clause: QueryClause,
}

impl IndexQuery {
    pub fn new(field: impl Into<String>, clause: QueryClause, boost: f32) -> IndexQuery {
        IndexQuery {
            field: field.into(),
            boost,
            clause,
        }
    }

    /// Evaluates the query against one document.
    ///
    /// `terms` are the document's terms for [`IndexQuery::field`] with their
    /// positions, as produced by the field's mapper.
    pub fn matches(&self, terms: &[FieldTerm]) -> bool {
        let texts = || terms.iter().filter_map(|t| t.value.as_text());
        match &self.clause {
            QueryClause::Term(term) => texts().any(|t| t == term),
            QueryClause::TermRange {
                lower,
                upper,
                include_lower,
                include_upper,
            } => texts().any(|t| {
                within(
                    lower.as_deref().map(|l| t.cmp(l)),
                    upper.as_deref().map(|u| t.cmp(u)),
                    *include_lower,
                    *include_upper,
                )
            }),
            QueryClause::NumericRange {
                lower,
                upper,
                include_lower,
                include_upper,
            } => terms.iter().map(|t| &t.value).filter(|v| v.is_numeric()).any(|v| {
                let to_lower = match lower {
                    Some(l) => match v.compare(l) {
                        Some(ord) => Some(ord),
                        None => return false,
                    },
                    None => None,
                };
                let to_upper = match upper {
                    Some(u) => match v.compare(u) {
                        Some(ord) => Some(ord),
                        None => return false,
                    },
                    None => None,
                };
                within(to_lower, to_upper, *include_lower, *include_upper)
            }),
            QueryClause::Prefix(prefix) => texts().any(|t| t.starts_with(prefix.as_str())),
            QueryClause::Wildcard(pattern) => match wildcard_regex(pattern) {
                Some(regex) => texts().any(|t| regex.is_match(t)),
                None => false,
            },
            QueryClause::Fuzzy {
                term,
                max_edits,
                prefix_length,
                transpositions,
                ..
            } => texts().any(|t| {
                fuzzy_matches(term, t, *max_edits, *prefix_length as usize, *transpositions)
            }),
            QueryClause::Phrase { terms: phrase, slop } => phrase_matches(phrase, terms, *slop),
        }
    }
}

fn within(
    to_lower: Option<Ordering>,
    to_upper: Option<Ordering>,
    include_lower: bool,
    include_upper: bool,
) -> bool {
    let lower_ok = match to_lower {
        None => true,
        Some(Ordering::Greater) => true,
        Some(Ordering::Equal) => include_lower,
        Some(Ordering::Less) => false,
    };
    let upper_ok = match to_upper {
        None => true,
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => include_upper,
        Some(Ordering::Greater) => false,
    };
    lower_ok && upper_ok
}

fn wildcard_regex(pattern: &str) -> Option<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("^(?s:");
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push_str(")$");
    Regex::new(&source).ok()
}

/// Edit distance between `a` and `b` over characters, counting an adjacent
/// transposition as one edit when `transpositions` is set.
fn edit_distance(a: &[char], b: &[char], transpositions: bool) -> usize {
    let width = b.len() + 1;
    let mut rows = vec![vec![0usize; width]; a.len() + 1];
    for (j, cell) in rows[0].iter_mut().enumerate() {
        *cell = j;
    }
    for i in 1..=a.len() {
        rows[i][0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (rows[i - 1][j] + 1)
                .min(rows[i][j - 1] + 1)
                .min(rows[i - 1][j - 1] + cost);
            if transpositions && i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(rows[i - 2][j - 2] + 1);
            }
            rows[i][j] = best;
        }
    }
    rows[a.len()][b.len()]
}

fn fuzzy_matches(
    query: &str,
    candidate: &str,
    max_edits: u32,
    prefix_length: usize,
    transpositions: bool,
) -> bool {
    let query: Vec<char> = query.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();
    let prefix = prefix_length.min(query.len());
    if candidate.len() < prefix || candidate[..prefix] != query[..prefix] {
        return false;
    }
    let (query, candidate) = (&query[prefix..], &candidate[prefix..]);
    if query.len().abs_diff(candidate.len()) > max_edits as usize {
        return false;
    }
    edit_distance(query, candidate, transpositions) <= max_edits as usize
}

/// Sloppy phrase matching: for each possible anchor position, every phrase term
/// is matched to its nearest occurrence and the total displacement must not
/// exceed `slop`.
fn phrase_matches(phrase: &[(u32, String)], terms: &[FieldTerm], slop: u32) -> bool {
    let Some((first_offset, first_term)) = phrase.first() else {
        return false;
    };
    occurrences(terms, first_term).any(|p| {
        let anchor = p - *first_offset as i64;
        let mut displacement = 0i64;
        for (offset, term) in &phrase[1..] {
            let expected = anchor + *offset as i64;
            match occurrences(terms, term).map(|q| (q - expected).abs()).min() {
                Some(d) => displacement += d,
                None => return false,
            }
        }
        displacement <= slop as i64
    })
}

fn occurrences<'a>(terms: &'a [FieldTerm], term: &'a str) -> impl Iterator<Item = i64> + 'a {
    terms
        .iter()
        .filter(move |t| t.value.as_text() == Some(term))
        .map(|t| i64::from(t.position))
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        fn bound<T: fmt::Display>(b: &Option<T>) -> String {
            b.as_ref().map_or_else(|| "*".to_string(), T::to_string)
        }
        match &self.clause {
            QueryClause::Term(t) => write!(f, "{field}:{t}")?,
            QueryClause::TermRange {
                lower,
                upper,
                include_lower,
                include_upper,
            } => write!(
                f,
                "{field}:{}{} TO {}{}",
                if *include_lower { '[' } else { '{' },
                bound(lower),
                bound(upper),
                if *include_upper { ']' } else { '}' }
            )?,
            QueryClause::NumericRange {
                lower,
                upper,
                include_lower,
                include_upper,
            } => write!(
                f,
                "{field}:{}{} TO {}{}",
                if *include_lower { '[' } else { '{' },
                bound(lower),
                bound(upper),
                if *include_upper { ']' } else { '}' }
            )?,
            QueryClause::Prefix(p) => write!(f, "{field}:{p}*")?,
            QueryClause::Wildcard(w) => write!(f, "{field}:{w}")?,
            QueryClause::Phrase { terms, slop } => {
                let words: Vec<&str> = terms.iter().map(|(_, t)| t.as_str()).collect();
                write!(f, "{field}:\"{}\"~{slop}", words.join(" "))?
            }
            QueryClause::Fuzzy { term, max_edits, .. } => write!(f, "{field}:{term}~{max_edits}")?,
        }
        if self.boost != 1.0 {
            write!(f, "^{}", self.boost)?;
        }
        Ok(())
    }
}
