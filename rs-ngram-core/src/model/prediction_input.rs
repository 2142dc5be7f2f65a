use serde::{Deserialize, Serialize};

use super::count_table::Token;

/// Default number of sampling iterations for bigram and trigram models.
pub const MAX_LENGTH_STANDARD: usize = 25;

/// Default number of sampling iterations for higher orders, whose contexts
/// are sparser and need more room to reach a sentence end.
pub const MAX_LENGTH_EXTENDED: usize = 100;

/// Strategy used to select the starting context of a sentence.
///
/// # Variants
/// - `Random`: pick a context uniformly among those of the model.
/// - `Custom(tokens)`: start from the given tokens, which must hold exactly
///   `n - 1` tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartSeed {
	#[default]
	Random,
	Custom(Vec<Token>),
}

impl StartSeed {
	/// Seed tokens, `None` for a random start.
	pub fn tokens(&self) -> Option<&[Token]> {
		match self {
			StartSeed::Random => None,
			StartSeed::Custom(tokens) => Some(tokens.as_slice()),
		}
	}
}

/// Input parameters for generating one sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionInput {
	/// Upper bound on sampling iterations.
	pub max_length: usize,

	/// How the first context is chosen.
	#[serde(default)]
	pub start_seed: StartSeed,
}

impl PredictionInput {
	/// Default input for a model of order `n`.
	///
	/// Orders above 3 get [`MAX_LENGTH_EXTENDED`] iterations, the others
	/// [`MAX_LENGTH_STANDARD`].
	pub fn for_order(n: usize) -> Self {
		let max_length = if n > 3 { MAX_LENGTH_EXTENDED } else { MAX_LENGTH_STANDARD };
		Self { max_length, start_seed: StartSeed::Random }
	}

	pub fn with_seed(mut self, seed: Vec<Token>) -> Self {
		self.start_seed = StartSeed::Custom(seed);
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = max_length;
		self
	}
}

impl Default for PredictionInput {
	fn default() -> Self {
		Self { max_length: MAX_LENGTH_STANDARD, start_seed: StartSeed::Random }
	}
}
