use std::collections::HashMap;

use rand::Rng;

use super::count_table::Token;

/// Represents a context in a conditional model.
///
/// A `State` corresponds to a fixed (n-1)-token context (`key`) and stores
/// every observed next token together with how often it followed the context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition counts while the model is derived
/// - Draw the next token with probability proportional to its count
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition count is strictly positive
/// - Transitions keep the order in which their token was first seen
#[derive(Clone, Debug)]
pub struct State {
	/// Identifier of the state (n-1 token context).
	key: Vec<Token>,
	/// Outgoing transitions in first-insertion order.
	/// Example: [("cat", 42), ("dog", 3)]
	transitions: Vec<(Token, usize)>,
	/// Position of each next token in `transitions`.
	positions: HashMap<Token, usize>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(key: &[Token]) -> Self {
		Self {
			key: key.to_vec(),
			transitions: Vec::new(),
			positions: HashMap::new(),
		}
	}

	pub fn key(&self) -> &[Token] {
		&self.key
	}

	/// Records `count` occurrences of a transition toward `next`.
	///
	/// - If the transition already exists, its count is increased.
	/// - Otherwise, a new transition is appended with `count`.
	pub fn add_transition(&mut self, next: &str, count: usize) {
		match self.positions.get(next) {
			Some(&i) => self.transitions[i].1 += count,
			None => {
				self.positions.insert(next.to_owned(), self.transitions.len());
				self.transitions.push((next.to_owned(), count));
			}
		}
	}

	/// Iterates over `(next_token, count)` in first-insertion order.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Count of a single transition, 0 when never observed.
	pub fn count(&self, next: &str) -> usize {
		self.positions.get(next).map_or(0, |&i| self.transitions[i].1)
	}

	/// Sum of all transition counts.
	pub fn total(&self) -> usize {
		self.transitions.iter().map(|(_, count)| count).sum()
	}

	/// Selects the token whose cumulative count first reaches `draw`.
	///
	/// `draw` is expected in `1..=total`. Tokens are walked in insertion
	/// order, so equal-weight ties resolve to the earlier token.
	/// Returns `None` when `draw` is out of range.
	pub fn select(&self, draw: usize) -> Option<&str> {
		let mut cumulative = 0;
		for (token, count) in &self.transitions {
			cumulative += count;
			if draw <= cumulative {
				return Some(token.as_str());
			}
		}
		None
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// Draws an integer uniformly in `1..=total` and hands it to
	/// [`State::select`].
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total = self.total();
		if total == 0 {
			return None;
		}
		self.select(rng.random_range(1..=total))
	}
}
