//! Analyzers: a tokenizer followed by token filters.
//!
//! An analyzer is bound to a field by the schema and is applied twice: once when a
//! column value is indexed and once when a query literal for that field is
//! translated. Both sides must see identical terms.

use std::fmt;

use rowindex_common::{Result, error::Error};

use crate::tokenizers::{Tokenizer, TokenizerKind, TokenizerType};

/// Stop words removed by the standard analyzer.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    /// The whole value is a single, case-sensitive term.
    Keyword,
    /// Unicode words, lower-cased.
    Simple,
    /// Unicode words, lower-cased, English stop words removed.
    Standard,
}

impl TryFrom<&str> for AnalyzerKind {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "keyword" => Ok(AnalyzerKind::Keyword),
            "simple" => Ok(AnalyzerKind::Simple),
            "standard" => Ok(AnalyzerKind::Standard),
            _ => Err(Error::invalid_arg(
                "analyzer",
                format!("Unrecognized analyzer: {name}"),
            )),
        }
    }
}

impl AnalyzerKind {
    pub const fn name(&self) -> &'static str {
        match self {
            AnalyzerKind::Keyword => "keyword",
            AnalyzerKind::Simple => "simple",
            AnalyzerKind::Standard => "standard",
        }
    }
}

/// Result of analyzing a literal that is expected to produce a single term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analyzed {
    /// Every token was discarded.
    Empty,
    Term(String),
    /// More than one token was produced.
    Many(Vec<String>),
}

/// A tokenizer plus the case-folding and stop word filters applied to its output.
#[derive(Clone)]
pub struct Analyzer {
    kind: AnalyzerKind,
    tokenizer: TokenizerType,
    lowercase: bool,
    stop_words: &'static [&'static str],
}

impl Analyzer {
    /// The identity analyzer used by every exact-match mapper.
    pub fn keyword() -> Analyzer {
        Analyzer {
            kind: AnalyzerKind::Keyword,
            tokenizer: TokenizerType::from(TokenizerKind::Keyword),
            lowercase: false,
            stop_words: &[],
        }
    }

    pub fn simple() -> Analyzer {
        Analyzer {
            kind: AnalyzerKind::Simple,
            tokenizer: TokenizerType::from(TokenizerKind::UnicodeWord),
            lowercase: true,
            stop_words: &[],
        }
    }

    pub fn standard() -> Analyzer {
        Analyzer {
            kind: AnalyzerKind::Standard,
            tokenizer: TokenizerType::from(TokenizerKind::UnicodeWord),
            lowercase: true,
            stop_words: ENGLISH_STOP_WORDS,
        }
    }

    pub fn kind(&self) -> AnalyzerKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == AnalyzerKind::Keyword
    }

    /// Produces the terms for `input`, in position order.
    pub fn analyze(&self, input: &str) -> Vec<String> {
        self.analyze_positions(input)
            .into_iter()
            .map(|(_, term)| term)
            .collect()
    }

    /// Produces the terms for `input` with their token positions.
    ///
    /// A removed stop word still occupies its position, so later terms keep
    /// their distance from earlier ones.
    pub fn analyze_positions(&self, input: &str) -> Vec<(u32, String)> {
        self.tokenizer
            .tokenize(input)
            .zip(0u32..)
            .filter_map(|(token, position)| {
                let term = if self.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                };
                (!self.stop_words.contains(&term.as_str())).then_some((position, term))
            })
            .collect()
    }

    /// Analyzes a query literal that must reduce to exactly one term.
    pub fn analyze_single(&self, input: &str) -> Analyzed {
        let mut terms = self.analyze(input);
        match terms.len() {
            0 => Analyzed::Empty,
            1 => Analyzed::Term(terms.remove(0)),
            _ => Analyzed::Many(terms),
        }
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("kind", &self.kind)
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl PartialEq for Analyzer {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Creates an analyzer from its configuration name.
///
/// # Errors
/// Returns [`Error::invalid_arg`] for unknown names.
pub fn create_analyzer(name: &str) -> Result<Analyzer> {
    Ok(match AnalyzerKind::try_from(name)? {
        AnalyzerKind::Keyword => Analyzer::keyword(),
        AnalyzerKind::Simple => Analyzer::simple(),
        AnalyzerKind::Standard => Analyzer::standard(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_analyzer() {
        assert_eq!(create_analyzer("keyword").unwrap().kind(), AnalyzerKind::Keyword);
        assert_eq!(create_analyzer("simple").unwrap().kind(), AnalyzerKind::Simple);
        assert_eq!(create_analyzer("standard").unwrap().name(), "standard");
        assert!(create_analyzer("org.apache.lucene.Whatever").is_err());
    }

    #[test]
    fn test_keyword_is_identity() {
        let analyzer = Analyzer::keyword();
        assert_eq!(analyzer.analyze("Hello World"), vec!["Hello World"]);
        assert_eq!(analyzer.analyze(""), Vec::<String>::new());
        assert!(analyzer.is_keyword());
    }

    #[test]
    fn test_standard_lowercases_and_drops_stop_words() {
        let analyzer = Analyzer::standard();
        assert_eq!(
            analyzer.analyze("The QUICK brown fox, and the dog"),
            vec!["quick", "brown", "fox", "dog"]
        );
        assert_eq!(
            analyzer.analyze_positions("The QUICK brown fox, and the dog"),
            vec![
                (1, "quick".to_string()),
                (2, "brown".to_string()),
                (3, "fox".to_string()),
                (6, "dog".to_string()),
            ]
        );
        assert_eq!(analyzer.analyze_single("the"), Analyzed::Empty);
        assert_eq!(analyzer.analyze_single("  Fox! "), Analyzed::Term("fox".into()));
        assert_eq!(
            analyzer.analyze_single("red fox"),
            Analyzed::Many(vec!["red".into(), "fox".into()])
        );
    }

    #[test]
    fn test_simple_keeps_stop_words() {
        let analyzer = Analyzer::simple();
        assert_eq!(analyzer.analyze("The End"), vec!["the", "end"]);
    }
}
