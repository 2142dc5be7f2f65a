//! Text collaborators feeding the n-gram tables.
//!
//! The model only needs two things from raw text: sentences, and tokens
//! within a sentence. Both are behind traits so callers can plug their own
//! segmentation; [`RuleSplitter`] and [`WordTokenizer`] are the defaults.

use std::collections::HashSet;

use crate::model::count_table::Token;

/// Rule-based sentence splitter.
pub mod splitter;

/// Word and punctuation tokenizer.
pub mod tokenizer;

pub use splitter::RuleSplitter;
pub use tokenizer::WordTokenizer;

/// Splits raw text into sentences.
pub trait SentenceSplitter {
	/// Returns the sentences of `text` in order, trimmed and non-empty.
	fn split(&self, text: &str) -> Vec<String>;
}

/// Splits one sentence into tokens.
pub trait Tokenizer {
	/// Returns the tokens of `sentence` in order, punctuation apart from
	/// words.
	fn tokenize(&self, sentence: &str) -> Vec<Token>;
}

/// Abbreviations whose period neither ends a sentence nor stands alone as a
/// token.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
	"Dr.", "Mr.", "Mrs.", "Ms.", "Gov.", "Capt.", "Cmdr.", "Lt.", "Pfc.", "Sgt.", "Rev.", "Ste.",
	"Ala.", "Tex.", "Col.", "Gen.", "Sen.", "St.", "Co.", "Jr.", "Sr.", "Inc.", "Ltd.", "Corp.",
	"Mt.", "Ave.", "Univ.", "U.S.", "D.C.", "p.m.", "a.m.", "i.e.", "e.g.", "vs.",
];

/// Case-insensitive set of abbreviations.
///
/// Entries are stored lowercase without their final period, so `"Mr."`,
/// `"mr."` and `"MR"` all name the same abbreviation.
#[derive(Clone, Debug)]
pub struct Abbreviations {
	entries: HashSet<String>,
}

impl Abbreviations {
	pub fn new<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			entries: entries.into_iter().map(|e| Self::normalize(e.as_ref())).collect(),
		}
	}

	fn normalize(word: &str) -> String {
		word.strip_suffix('.').unwrap_or(word).to_lowercase()
	}

	/// True if `word` is a known abbreviation written with its final period.
	pub fn matches(&self, word: &str) -> bool {
		word.ends_with('.') && self.entries.contains(&Self::normalize(word))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Default for Abbreviations {
	fn default() -> Self {
		Self::new(DEFAULT_ABBREVIATIONS)
	}
}
