use std::borrow::Borrow;
use std::collections::HashMap;

use crate::error::{NGramError, NGramResult};

/// A single token: a word, a punctuation mark or a quote glyph.
pub type Token = String;

/// An ordered, fixed-length sequence of tokens.
///
/// Two n-grams are equal iff every position matches. An `NGram` can be looked
/// up in a [`CountTable`] through a plain `&[Token]` slice.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NGram(Vec<Token>);

impl NGram {
	pub fn tokens(&self) -> &[Token] {
		&self.0
	}

	/// Leading `n - 1` tokens.
	pub fn context(&self) -> &[Token] {
		&self.0[..self.0.len().saturating_sub(1)]
	}

	/// Trailing token, the one predicted from [`NGram::context`].
	pub fn next(&self) -> Option<&Token> {
		self.0.last()
	}
}

impl Borrow<[Token]> for NGram {
	fn borrow(&self) -> &[Token] {
		&self.0
	}
}

impl<S: AsRef<str>> From<&[S]> for NGram {
	fn from(tokens: &[S]) -> Self {
		Self(tokens.iter().map(|t| t.as_ref().to_owned()).collect())
	}
}

/// Occurrence counts of every n-gram of a fixed order `n`.
///
/// # Responsibilities
/// - Accumulate window counts from token streams (training)
/// - Expose counts read-only to the generation side
/// - Merge with another table of the same order (parallel training)
///
/// # Invariants
/// - `n` is always >= 2 and never changes
/// - Every stored key has exactly `n` tokens and a count >= 1
/// - Iteration follows first-insertion order of the keys
#[derive(Clone, Debug)]
pub struct CountTable {
	/// Order of the table (number of tokens per n-gram)
	n: usize,

	/// Position of each n-gram in `entries`
	index: HashMap<NGram, usize>,

	/// N-grams and their counts, in first-insertion order
	entries: Vec<(NGram, usize)>,
}

impl CountTable {
	/// Creates an empty table of order `n`.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidOrder`] if `n < 2`.
	pub fn new(n: usize) -> NGramResult<Self> {
		if n < 2 {
			return Err(NGramError::InvalidOrder(n));
		}
		Ok(Self { n, index: HashMap::new(), entries: Vec::new() })
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sum of all counts, i.e. the number of windows seen so far.
	pub fn total(&self) -> usize {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	/// Count of an n-gram, 0 when it was never observed.
	pub fn get<S: AsRef<str>>(&self, ngram: &[S]) -> usize {
		let key: Vec<Token> = ngram.iter().map(|t| t.as_ref().to_owned()).collect();
		self.index
			.get(key.as_slice())
			.map_or(0, |&i| self.entries[i].1)
	}

	/// Iterates over `(ngram, count)` in first-insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&NGram, usize)> {
		self.entries.iter().map(|(ngram, count)| (ngram, *count))
	}

	/// Counts every contiguous window of length `n` in `tokens`.
	///
	/// A stream of `len` tokens holds `len - n + 1` windows. Streams shorter
	/// than `n` hold none and leave the table untouched.
	pub fn update(&mut self, tokens: &[Token]) {
		if tokens.len() < self.n {
			return;
		}
		for window in tokens.windows(self.n) {
			self.add(window, 1);
		}
	}

	/// Adds `count` occurrences of `window`.
	fn add(&mut self, window: &[Token], count: usize) {
		match self.index.get(window) {
			Some(&i) => self.entries[i].1 += count,
			None => {
				let ngram = NGram(window.to_vec());
				self.index.insert(ngram.clone(), self.entries.len());
				self.entries.push((ngram, count));
			}
		}
	}

	/// Merges another table into this one.
	///
	/// # Notes
	/// - Counts of matching n-grams are summed.
	/// - N-grams unknown to `self` are appended in `other`'s order.
	///
	/// # Errors
	/// Returns [`NGramError::OrderMismatch`] if the orders differ.
	pub fn merge(&mut self, other: &Self) -> NGramResult<()> {
		if self.n != other.n {
			return Err(NGramError::OrderMismatch { expected: self.n, actual: other.n });
		}
		for (ngram, count) in &other.entries {
			self.add(ngram.tokens(), *count);
		}
		Ok(())
	}
}
