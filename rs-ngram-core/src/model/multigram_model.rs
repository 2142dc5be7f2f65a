use std::collections::BTreeMap;
use std::path::Path;
use std::thread;

use log::{debug, info};

use super::count_table::{CountTable, Token};
use crate::error::{NGramError, NGramResult};
use crate::io::read_file;
use crate::text::{SentenceSplitter, Tokenizer};

/// Orders trained by default: bigrams up to five-grams.
pub const DEFAULT_ORDERS: [usize; 4] = [2, 3, 4, 5];

/// Count tables of several orders trained side by side on the same corpus.
///
/// This struct manages:
/// - `tables`: a map from order `n` to its [`CountTable`].
/// - `sentences`: how many token streams were fed in.
///
/// Each table only ever sees whole sentences, so no n-gram spans a sentence
/// boundary.
#[derive(Clone, Debug)]
pub struct MultiGramModel {
	tables: BTreeMap<usize, CountTable>,
	sentences: usize,
}

impl MultiGramModel {
	/// Creates empty tables for every requested order.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidOrder`] if any order is below 2.
	pub fn new(orders: &[usize]) -> NGramResult<Self> {
		let mut tables = BTreeMap::new();
		for &n in orders {
			tables.insert(n, CountTable::new(n)?);
		}
		Ok(Self { tables, sentences: 0 })
	}

	/// Trained orders, ascending.
	pub fn orders(&self) -> Vec<usize> {
		self.tables.keys().copied().collect()
	}

	/// Number of token streams fed so far.
	pub fn sentence_count(&self) -> usize {
		self.sentences
	}

	/// Table of order `n`.
	///
	/// # Errors
	/// Returns [`NGramError::MissingOrder`] if `n` was not requested.
	pub fn table(&self, n: usize) -> NGramResult<&CountTable> {
		self.tables.get(&n).ok_or(NGramError::MissingOrder(n))
	}

	/// Iterates over `(n, table)` by ascending order.
	pub fn tables(&self) -> impl Iterator<Item = (usize, &CountTable)> {
		self.tables.iter().map(|(n, table)| (*n, table))
	}

	/// Feeds one tokenized sentence to every table.
	///
	/// Tables whose order exceeds the sentence length are left unchanged.
	pub fn add_sentence(&mut self, tokens: &[Token]) {
		for table in self.tables.values_mut() {
			table.update(tokens);
		}
		self.sentences += 1;
	}

	/// Merges another model into this one.
	///
	/// # Behavior
	/// - Tables of matching order are merged; missing ones are cloned.
	/// - Sentence counts are summed.
	pub fn merge(&mut self, other: &Self) -> NGramResult<()> {
		for (n, table) in &other.tables {
			if let Some(existing) = self.tables.get_mut(n) {
				existing.merge(table)?;
			} else {
				self.tables.insert(*n, table.clone());
			}
		}
		self.sentences += other.sentences;
		Ok(())
	}

	/// Tokenizes `sentences` and trains every order, in parallel.
	///
	/// # Behavior
	/// - Splits the sentences into chunks (CPU cores * factor).
	/// - Spawns scoped threads, each building a partial model for its chunk.
	/// - Merges the partial models in chunk order.
	///
	/// # Notes
	/// Merging in chunk order reproduces the insertion order of a sequential
	/// run, so the result is identical to feeding every sentence one by one.
	pub fn from_sentences<T>(sentences: &[String], tokenizer: &T, orders: &[usize]) -> NGramResult<Self>
	where
		T: Tokenizer + Sync,
	{
		let mut final_model = Self::new(orders)?;
		if sentences.is_empty() {
			return Ok(final_model);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = sentences.len().div_ceil(chunks);

		let partial_models: Vec<NGramResult<Self>> = thread::scope(|scope| {
			let handles: Vec<_> = sentences
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || -> NGramResult<Self> {
						let mut partial_model = Self::new(orders)?;
						for sentence in chunk {
							partial_model.add_sentence(&tokenizer.tokenize(sentence));
						}
						Ok(partial_model)
					})
				})
				.collect();

			handles
				.into_iter()
				.map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
				.collect()
		});

		for partial_model in partial_models {
			final_model.merge(&partial_model?)?;
		}

		debug!(
			"trained orders {:?} on {} sentences in chunks of {}",
			final_model.orders(),
			final_model.sentences,
			chunk_size
		);
		Ok(final_model)
	}

	/// Splits a raw text into sentences, then trains as [`Self::from_sentences`].
	pub fn from_text<S, T>(text: &str, splitter: &S, tokenizer: &T, orders: &[usize]) -> NGramResult<Self>
	where
		S: SentenceSplitter,
		T: Tokenizer + Sync,
	{
		let sentences = splitter.split(text);
		Self::from_sentences(&sentences, tokenizer, orders)
	}

	/// Reads a corpus file and trains every order on it.
	pub fn from_file<P, S, T>(path: P, splitter: &S, tokenizer: &T, orders: &[usize]) -> NGramResult<Self>
	where
		P: AsRef<Path>,
		S: SentenceSplitter,
		T: Tokenizer + Sync,
	{
		let text = read_file(&path)?;
		let model = Self::from_text(&text, splitter, tokenizer, orders)?;
		info!(
			"loaded {} sentences from {}",
			model.sentences,
			path.as_ref().display()
		);
		Ok(model)
	}
}
