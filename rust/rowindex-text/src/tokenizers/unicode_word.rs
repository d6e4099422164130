//! Words as maximal runs of alphanumeric characters.

use std::str::Split;

use super::{TermLimits, Tokenizer, TokenizerKind};

/// Splits on every character that is not alphanumeric in the Unicode sense.
///
/// Digits belong to words, so `"2024年"` is one term while `"3-4"` is two.
/// Emoji and punctuation only separate.
#[derive(Debug, Clone, Default)]
pub struct UnicodeWordTokenizer {
    limits: TermLimits,
}

impl UnicodeWordTokenizer {
    pub fn new() -> UnicodeWordTokenizer {
        UnicodeWordTokenizer::default()
    }

    pub fn with_limits(limits: TermLimits) -> UnicodeWordTokenizer {
        UnicodeWordTokenizer { limits }
    }
}

fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

pub struct Words<'a> {
    pieces: Split<'a, fn(char) -> bool>,
    limits: TermLimits,
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let limits = self.limits;
        self.pieces.by_ref().find_map(|piece| limits.apply(piece))
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    type TokenIter<'a> = Words<'a>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Words<'a> {
        Words {
            pieces: input.split(is_separator as fn(char) -> bool),
            limits: self.limits,
        }
    }

    fn kind(&self) -> TokenizerKind {
        TokenizerKind::UnicodeWord
    }

    fn limits(&self) -> TermLimits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokenizer: &UnicodeWordTokenizer, input: &str) -> Vec<String> {
        tokenizer.tokenize(input).map(str::to_string).collect()
    }

    #[test]
    fn test_splits_on_non_alphanumerics() {
        let tokenizer = UnicodeWordTokenizer::new();
        assert_eq!(
            words(&tokenizer, "Ships in 3-4 days, free!"),
            vec!["Ships", "in", "3", "4", "days", "free"]
        );
        assert!(words(&tokenizer, "").is_empty());
        assert!(words(&tokenizer, "--- ... ;;").is_empty());
        assert_eq!(words(&tokenizer, "crème brûlée"), vec!["crème", "brûlée"]);
        assert_eq!(tokenizer.name(), "unicode-word");
    }

    #[test]
    fn test_scripts_and_symbols() {
        let tokenizer = UnicodeWordTokenizer::new();
        assert_eq!(
            words(&tokenizer, "Привет 世界 2024年 Straße"),
            vec!["Привет", "世界", "2024年", "Straße"]
        );
        assert_eq!(words(&tokenizer, "good 🙂 night"), vec!["good", "night"]);
    }

    #[test]
    fn test_limits_skip_and_cut() {
        let tokenizer = UnicodeWordTokenizer::with_limits(TermLimits::new(1, 4));
        assert_eq!(words(&tokenizer, "ant hippo"), vec!["ant", "hipp"]);

        // A short word mid-stream is skipped, not the end of the stream
        let tokenizer = UnicodeWordTokenizer::with_limits(TermLimits::new(3, 64));
        assert_eq!(words(&tokenizer, "go to the big zoo"), vec!["the", "big", "zoo"]);
    }
}
