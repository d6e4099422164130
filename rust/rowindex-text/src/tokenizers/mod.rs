//! Tokenizers split a raw column value into candidate terms.
//!
//! They are the first stage of an [`Analyzer`](crate::Analyzer); case folding
//! and stop word removal happen afterwards. Terms are borrowed slices of the
//! input.

pub mod keyword;
pub mod unicode_word;

pub use keyword::KeywordTokenizer;
pub use unicode_word::UnicodeWordTokenizer;

/// Longest word term, in bytes, emitted by the word tokenizer.
pub const DEFAULT_MAX_TERM_LENGTH: usize = 255;

/// Shortest term, in bytes, emitted by any tokenizer.
pub const DEFAULT_MIN_TERM_LENGTH: usize = 1;

pub trait Tokenizer: Send + Sync {
    type TokenIter<'a>: Iterator<Item = &'a str>
    where
        Self: 'a;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a>;

    fn kind(&self) -> TokenizerKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn limits(&self) -> TermLimits;
}

/// Byte length bounds applied to every candidate term.
///
/// Candidates shorter than `min` are dropped. Candidates longer than `max` are
/// cut back to the last character boundary that fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermLimits {
    pub min: usize,
    pub max: usize,
}

impl TermLimits {
    pub const fn new(min: usize, max: usize) -> TermLimits {
        TermLimits { min, max }
    }

    /// No upper bound, for terms that must keep the whole value.
    pub const fn unbounded() -> TermLimits {
        TermLimits::new(DEFAULT_MIN_TERM_LENGTH, usize::MAX)
    }

    pub fn apply<'a>(&self, candidate: &'a str) -> Option<&'a str> {
        if candidate.is_empty() || candidate.len() < self.min {
            return None;
        }
        if candidate.len() <= self.max {
            return Some(candidate);
        }
        let cut = (0..=self.max)
            .rev()
            .find(|i| candidate.is_char_boundary(*i))
            .unwrap_or(0);
        Some(&candidate[..cut])
    }
}

impl Default for TermLimits {
    fn default() -> TermLimits {
        TermLimits::new(DEFAULT_MIN_TERM_LENGTH, DEFAULT_MAX_TERM_LENGTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
    Keyword,
    UnicodeWord,
}

impl TokenizerKind {
    pub const fn name(&self) -> &'static str {
        match self {
            TokenizerKind::Keyword => "keyword",
            TokenizerKind::UnicodeWord => "unicode-word",
        }
    }
}

/// A tokenizer chosen at runtime.
#[derive(Debug, Clone)]
pub enum TokenizerType {
    Keyword(KeywordTokenizer),
    UnicodeWord(UnicodeWordTokenizer),
}

impl From<TokenizerKind> for TokenizerType {
    fn from(kind: TokenizerKind) -> TokenizerType {
        match kind {
            TokenizerKind::Keyword => TokenizerType::Keyword(KeywordTokenizer::new()),
            TokenizerKind::UnicodeWord => TokenizerType::UnicodeWord(UnicodeWordTokenizer::new()),
        }
    }
}

impl Tokenizer for TokenizerType {
    type TokenIter<'a> = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a> {
        match self {
            TokenizerType::Keyword(t) => Box::new(t.tokenize(input)),
            TokenizerType::UnicodeWord(t) => Box::new(t.tokenize(input)),
        }
    }

    fn kind(&self) -> TokenizerKind {
        match self {
            TokenizerType::Keyword(_) => TokenizerKind::Keyword,
            TokenizerType::UnicodeWord(_) => TokenizerKind::UnicodeWord,
        }
    }

    fn limits(&self) -> TermLimits {
        match self {
            TokenizerType::Keyword(t) => t.limits(),
            TokenizerType::UnicodeWord(t) => t.limits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_from_kind() {
        let keyword = TokenizerType::from(TokenizerKind::Keyword);
        assert_eq!(keyword.name(), "keyword");
        assert_eq!(keyword.limits(), TermLimits::unbounded());

        let words = TokenizerType::from(TokenizerKind::UnicodeWord);
        assert_eq!(words.kind(), TokenizerKind::UnicodeWord);
        assert_eq!(words.tokenize("a-b c").collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_limits_cut_on_char_boundaries() {
        let limits = TermLimits::default();
        let long = "z".repeat(400);
        assert_eq!(limits.apply(&long).map(str::len), Some(DEFAULT_MAX_TERM_LENGTH));

        // Each of these characters takes three bytes
        let limits = TermLimits::new(1, 7);
        assert_eq!(limits.apply("日本語テキスト"), Some("日本"));

        let limits = TermLimits::new(3, 10);
        assert_eq!(limits.apply("ab"), None);
        assert_eq!(limits.apply(""), None);
        assert_eq!(TermLimits::unbounded().apply(&long), Some(long.as_str()));
    }
}
