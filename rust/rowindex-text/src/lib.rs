//! Text analysis for indexed columns.
//!
//! This crate provides the analyzers that turn text values into index terms.
//! The same analyzer must be applied when a value is indexed and when a query
//! literal for that field is translated, otherwise terms will not line up.
//!
//! # Available Analyzers
//!
//! - **Keyword** (`"keyword"`): the whole value is a single, case-sensitive term
//! - **Simple** (`"simple"`): Unicode words, lower-cased
//! - **Standard** (`"standard"`): Unicode words, lower-cased, English stop words removed
//!
//! # Quick Start
//!
//! ```rust
//! use rowindex_text::create_analyzer;
//!
//! let analyzer = create_analyzer("standard").unwrap();
//! let terms = analyzer.analyze("The Quick brown fox");
//! assert_eq!(terms, vec!["quick", "brown", "fox"]);
//! ```

mod analyzer;
mod tokenizers;

pub use analyzer::{Analyzed, Analyzer, AnalyzerKind, ENGLISH_STOP_WORDS, create_analyzer};
pub use tokenizers::{TermLimits, Tokenizer, TokenizerKind, TokenizerType};
