use thiserror::Error;

/// Errors raised by the n-gram library.
///
/// Most degenerate inputs (empty corpus, streams shorter than `n`, dead-end
/// contexts) are not errors: they yield no counts or an empty sentence.
#[derive(Error, Debug)]
pub enum NGramError {
	/// Caller-supplied seed does not hold exactly `n - 1` tokens.
	#[error("seed must have length {expected} for a {n}-gram model, got {actual}")]
	InvalidSeedLength { n: usize, expected: usize, actual: usize },

	#[error("n must be >= 2, got {0}")]
	InvalidOrder(usize),

	#[error("order mismatch: expected {expected}, got {actual}")]
	OrderMismatch { expected: usize, actual: usize },

	#[error("no table trained for order {0}")]
	MissingOrder(usize),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid pattern: {0}")]
	Regex(#[from] regex::Error),
}

pub type NGramResult<T> = Result<T, NGramError>;
