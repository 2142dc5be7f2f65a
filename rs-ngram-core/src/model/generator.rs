use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::conditional_model::ConditionalModel;
use super::count_table::{CountTable, Token};
use super::formatter::Formatter;
use super::prediction_input::PredictionInput;
use crate::error::{NGramError, NGramResult};

/// Why the sampling loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
	/// The current context has no entry in the model.
	DeadEnd,
	/// A sentence-final token was drawn.
	NaturalEnd,
	/// `max_length` iterations ran without reaching a sentence end.
	MaxLengthReached,
}

/// Raw output of the sampling loop, before punctuation enforcement and text
/// assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
	/// Seed context followed by every drawn token.
	pub tokens: Vec<Token>,
	pub termination: Termination,
}

/// Sentence generator over count tables.
///
/// # Responsibilities
/// - Derive the conditional model of a table (rebuilt on every call)
/// - Choose or validate the starting context
/// - Draw tokens by weighted sampling until a stop condition
/// - Force terminal punctuation and assemble the final text
///
/// The table is never mutated, so any number of generators can read the same
/// finished table.
#[derive(Debug)]
pub struct Generator {
	formatter: Formatter,
	rng: StdRng,
}

impl Generator {
	/// Creates a generator seeded from the operating system.
	///
	/// # Errors
	/// Returns an error if the formatter patterns fail to compile.
	pub fn new() -> NGramResult<Self> {
		Ok(Self::with_parts(Formatter::new()?, StdRng::from_os_rng()))
	}

	/// Creates a reproducible generator: equal seeds and equal tables give
	/// equal sentences.
	pub fn seeded(seed: u64) -> NGramResult<Self> {
		Ok(Self::with_parts(Formatter::new()?, StdRng::seed_from_u64(seed)))
	}

	fn with_parts(formatter: Formatter, rng: StdRng) -> Self {
		Self { formatter, rng }
	}

	/// Runs the sampling loop without finalizing.
	///
	/// # Returns
	/// - `Ok(None)` if the model has no contexts (empty table, or every
	///   stream was shorter than `n`).
	/// - `Ok(Some(sample))` otherwise.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidSeedLength`] if `seed` does not hold
	/// exactly `n - 1` tokens.
	///
	/// # Behavior
	/// - Without a seed, the first context is picked uniformly among the
	///   model's contexts.
	/// - Each iteration looks the context up, draws the next token with
	///   probability proportional to its count, appends it, stops on a
	///   sentence-final token and otherwise slides the context to the last
	///   `n - 1` tokens.
	pub fn sample(
		&mut self,
		table: &CountTable,
		seed: Option<&[Token]>,
		max_length: usize,
	) -> NGramResult<Option<Sample>> {
		let model = ConditionalModel::from_count_table(table);
		if model.is_empty() {
			debug!("{}-gram model has no contexts, nothing to generate", table.order());
			return Ok(None);
		}

		let prefix_size = model.order() - 1;
		let mut context: Vec<Token> = match seed {
			Some(seed) if seed.len() != prefix_size => {
				return Err(NGramError::InvalidSeedLength {
					n: model.order(),
					expected: prefix_size,
					actual: seed.len(),
				});
			}
			Some(seed) => seed.to_vec(),
			None => match model.random_context(&mut self.rng) {
				Some(context) => context.to_vec(),
				None => return Ok(None),
			},
		};

		let mut tokens = context.clone();
		let mut termination = Termination::MaxLengthReached;

		for _ in 0..max_length {
			let Some(state) = model.get(&context) else {
				termination = Termination::DeadEnd;
				break;
			};
			let Some(next) = state.predict(&mut self.rng) else {
				termination = Termination::DeadEnd;
				break;
			};
			trace!("{:?} -> {:?}", context, next);

			let next = next.to_owned();
			let is_final = self.formatter.is_sentence_final(&next);
			tokens.push(next);
			if is_final {
				termination = Termination::NaturalEnd;
				break;
			}

			context = tokens[tokens.len() - prefix_size..].to_vec();
		}

		debug!(
			"{}-gram sample of {} tokens ended with {:?}",
			model.order(),
			tokens.len(),
			termination
		);
		Ok(Some(Sample { tokens, termination }))
	}

	/// Generates one finished sentence.
	///
	/// Returns an empty string when the model has no contexts. A sentence
	/// that does not end in terminal punctuation gets a trailing `.`.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidSeedLength`] if `seed` does not hold
	/// exactly `n - 1` tokens.
	pub fn generate(
		&mut self,
		table: &CountTable,
		seed: Option<&[Token]>,
		max_length: usize,
	) -> NGramResult<String> {
		match self.sample(table, seed, max_length)? {
			Some(sample) => Ok(self.finalize(sample.tokens)),
			None => Ok(String::new()),
		}
	}

	/// Generates one sentence from a [`PredictionInput`].
	pub fn predict(&mut self, table: &CountTable, input: &PredictionInput) -> NGramResult<String> {
		self.generate(table, input.start_seed.tokens(), input.max_length)
	}

	/// Enforces terminal punctuation and assembles the text.
	fn finalize(&self, mut tokens: Vec<Token>) -> String {
		let terminated = tokens
			.last()
			.is_some_and(|last| self.formatter.is_sentence_final(last));
		if !terminated {
			tokens.push(".".to_owned());
		}
		self.formatter.assemble(&tokens)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use regex::Regex;

	fn tokens(s: &str) -> Vec<Token> {
		s.split_whitespace().map(str::to_owned).collect()
	}

	fn table(n: usize, streams: &[&str]) -> CountTable {
		let mut table = CountTable::new(n).unwrap();
		for stream in streams {
			table.update(&tokens(stream));
		}
		table
	}

	#[test]
	fn single_path_model_is_deterministic() {
		let table = table(2, &["the cat sat ."]);
		let mut generator = Generator::seeded(0).unwrap();

		let seed = tokens("the");
		assert_eq!(generator.generate(&table, Some(&seed), 10).unwrap(), "The cat sat.");

		let sample = generator.sample(&table, Some(&seed), 10).unwrap().unwrap();
		assert_eq!(sample.tokens, tokens("the cat sat ."));
		assert_eq!(sample.termination, Termination::NaturalEnd);
	}

	#[test]
	fn dead_end_seed_gets_forced_period() {
		let table = table(2, &["a b"]);
		let mut generator = Generator::seeded(0).unwrap();
		let seed = tokens("b");

		let sample = generator.sample(&table, Some(&seed), 25).unwrap().unwrap();
		assert_eq!(sample.termination, Termination::DeadEnd);
		assert_eq!(sample.tokens, tokens("b"));
		assert_eq!(generator.generate(&table, Some(&seed), 25).unwrap(), "B.");
	}

	#[test]
	fn empty_table_yields_empty_string() {
		let empty = CountTable::new(2).unwrap();
		let mut generator = Generator::seeded(0).unwrap();
		assert_eq!(generator.generate(&empty, None, 25).unwrap(), "");

		let short = table(4, &["not enough", "tokens"]);
		assert_eq!(generator.generate(&short, None, 25).unwrap(), "");
		assert_eq!(generator.sample(&short, None, 25).unwrap(), None);
	}

	#[test]
	fn wrong_seed_length_is_rejected() {
		let table = table(3, &["a b c d ."]);
		let mut generator = Generator::seeded(0).unwrap();

		let err = generator.generate(&table, Some(&tokens("a")), 25).unwrap_err();
		assert!(matches!(
			err,
			NGramError::InvalidSeedLength { n: 3, expected: 2, actual: 1 }
		));
		assert!(generator.generate(&table, Some(&tokens("a b c")), 25).is_err());
	}

	#[test]
	fn max_length_bounds_the_loop() {
		let table = table(2, &["a b a b a b"]);
		let mut generator = Generator::seeded(0).unwrap();
		let seed = tokens("a");

		let sample = generator.sample(&table, Some(&seed), 3).unwrap().unwrap();
		assert_eq!(sample.termination, Termination::MaxLengthReached);
		assert_eq!(sample.tokens, tokens("a b a b"));
		assert_eq!(generator.generate(&table, Some(&seed), 3).unwrap(), "A b a b.");
	}

	#[test]
	fn zero_max_length_returns_the_seed() {
		let table = table(2, &["hello world ."]);
		let mut generator = Generator::seeded(0).unwrap();
		assert_eq!(generator.generate(&table, Some(&tokens("hello")), 0).unwrap(), "Hello.");
	}

	#[test]
	fn closing_quote_after_period_ends_sentence() {
		let table = table(2, &["he said .\" later"]);
		let mut generator = Generator::seeded(0).unwrap();

		let sample = generator.sample(&table, Some(&tokens("he")), 25).unwrap().unwrap();
		assert_eq!(sample.termination, Termination::NaturalEnd);
		assert_eq!(generator.generate(&table, Some(&tokens("he")), 25).unwrap(), "He said.\"");
	}

	#[test]
	fn quote_artifacts_are_normalized_in_output() {
		let table = table(2, &["`` go '' , she said ."]);
		let mut generator = Generator::seeded(0).unwrap();
		assert_eq!(
			generator.generate(&table, Some(&tokens("``")), 25).unwrap(),
			"\"go\", she said."
		);
	}

	#[test]
	fn random_start_uses_a_model_context() {
		let table = table(2, &["the cat sat ."]);
		let mut generator = Generator::seeded(11).unwrap();
		for _ in 0..20 {
			let sentence = generator.generate(&table, None, 25).unwrap();
			assert!(
				["The cat sat.", "Cat sat.", "Sat."].contains(&sentence.as_str()),
				"unexpected sentence {sentence}"
			);
		}
	}

	#[test]
	fn same_seed_same_sentences() {
		let table = table(2, &[
			"the cat sat on the mat .",
			"the dog sat on the cat .",
			"a dog ran to the mat !",
		]);
		let mut left = Generator::seeded(99).unwrap();
		let mut right = Generator::seeded(99).unwrap();
		for _ in 0..10 {
			assert_eq!(
				left.generate(&table, None, 25).unwrap(),
				right.generate(&table, None, 25).unwrap()
			);
		}
	}

	#[test]
	fn predict_follows_the_input() {
		let table = table(2, &["the cat sat ."]);
		let mut generator = Generator::seeded(0).unwrap();
		let input = PredictionInput::default().with_seed(tokens("cat"));
		assert_eq!(generator.predict(&table, &input).unwrap(), "Cat sat.");
	}

	#[test]
	fn table_is_left_untouched() {
		let table = table(2, &["x y z ."]);
		let before: Vec<_> = table.iter().map(|(ng, c)| (ng.clone(), c)).collect();
		let mut generator = Generator::seeded(5).unwrap();
		for _ in 0..5 {
			generator.generate(&table, None, 25).unwrap();
		}
		let after: Vec<_> = table.iter().map(|(ng, c)| (ng.clone(), c)).collect();
		assert_eq!(before, after);
	}

	proptest! {
		#[test]
		fn prop_sentences_end_in_terminal_punctuation(
			streams in proptest::collection::vec(
				proptest::collection::vec(
					prop::sample::select(vec!["a", "b", "c", ".", "!", "?", "\"", "''", "``", ","]),
					0..12,
				),
				0..5,
			),
			n in 2usize..4,
			seed in any::<u64>(),
		) {
			let mut table = CountTable::new(n).unwrap();
			for stream in &streams {
				let stream: Vec<Token> = stream.iter().map(|t| t.to_string()).collect();
				table.update(&stream);
			}

			let terminal = Regex::new(r#"[.!?]["']?$"#).unwrap();
			let mut generator = Generator::seeded(seed).unwrap();
			let sentence = generator.generate(&table, None, 25).unwrap();
			prop_assert!(sentence.is_empty() || terminal.is_match(&sentence), "{}", sentence);
		}
	}
}
