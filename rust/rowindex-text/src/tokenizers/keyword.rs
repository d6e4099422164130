//! The whole value as a single term.

use super::{TermLimits, Tokenizer, TokenizerKind};

/// Emits the input unchanged, case and punctuation included.
///
/// Exact-match mappers rely on this, so by default terms are never cut:
/// two long values sharing a prefix must stay distinct. Empty input yields
/// nothing.
#[derive(Debug, Clone, Default)]
pub struct KeywordTokenizer {
    limits: Option<TermLimits>,
}

impl KeywordTokenizer {
    pub fn new() -> KeywordTokenizer {
        KeywordTokenizer { limits: None }
    }

    pub fn with_limits(limits: TermLimits) -> KeywordTokenizer {
        KeywordTokenizer {
            limits: Some(limits),
        }
    }
}

impl Tokenizer for KeywordTokenizer {
    type TokenIter<'a> = std::option::IntoIter<&'a str>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a> {
        self.limits().apply(input).into_iter()
    }

    fn kind(&self) -> TokenizerKind {
        TokenizerKind::Keyword
    }

    fn limits(&self) -> TermLimits {
        self.limits.unwrap_or_else(TermLimits::unbounded)
    }
}
