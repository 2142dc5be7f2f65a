use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::count_table::{CountTable, Token};
use super::state::State;

/// Next-token distributions keyed by (n-1)-token contexts.
///
/// Derived from a [`CountTable`] without loss: every n-gram with count `c`
/// adds `c` to the transition `context -> next` of its state. The sum of a
/// state's transitions therefore equals the sum of the counts of all n-grams
/// sharing that context.
///
/// # Invariants
/// - Each context has exactly `n - 1` tokens
/// - Contexts and their transitions keep first-insertion order of the table
#[derive(Clone, Debug)]
pub struct ConditionalModel {
	/// Order of the source table
	n: usize,

	/// Position of each context in `states`
	index: HashMap<Vec<Token>, usize>,

	/// One state per context, in first-insertion order
	states: Vec<State>,
}

impl ConditionalModel {
	/// Builds the conditional model of a count table.
	///
	/// All keys of `table` have length `table.order()` by construction.
	/// The table is only read.
	pub fn from_count_table(table: &CountTable) -> Self {
		let mut model = Self {
			n: table.order(),
			index: HashMap::new(),
			states: Vec::new(),
		};

		for (ngram, count) in table.iter() {
			let Some(next) = ngram.next() else { continue };
			let context = ngram.context();

			let position = match model.index.get(context) {
				Some(&i) => i,
				None => {
					model.index.insert(context.to_vec(), model.states.len());
					model.states.push(State::new(context));
					model.states.len() - 1
				}
			};
			model.states[position].add_transition(next, count);
		}

		model
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Returns the state of a context, `None` for a dead end.
	pub fn get(&self, context: &[Token]) -> Option<&State> {
		self.index.get(context).map(|&i| &self.states[i])
	}

	/// Iterates over all contexts in first-insertion order.
	pub fn contexts(&self) -> impl Iterator<Item = &[Token]> {
		self.states.iter().map(State::key)
	}

	/// Sum of next-token counts for a context, 0 when unknown.
	pub fn total_for(&self, context: &[Token]) -> usize {
		self.get(context).map_or(0, State::total)
	}

	/// Picks a context uniformly at random.
	///
	/// Returns `None` if the model has no contexts.
	pub fn random_context<R: Rng>(&self, rng: &mut R) -> Option<&[Token]> {
		self.states.choose(rng).map(State::key)
	}
}
