use super::{Abbreviations, SentenceSplitter};

/// Characters that may trail a sentence-final mark, as in `Stop!"` or `end.)`.
const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']', '}'];

/// Splits text on sentence-final punctuation.
///
/// Whitespace runs (line breaks included) collapse to one space. A sentence
/// ends after a word whose last mark is `.`, `!` or `?` (closing quotes and
/// brackets allowed after it), unless the word is a known abbreviation or a
/// single-letter initial such as `J.`.
#[derive(Clone, Debug, Default)]
pub struct RuleSplitter {
	abbreviations: Abbreviations,
}

impl RuleSplitter {
	pub fn new(abbreviations: Abbreviations) -> Self {
		Self { abbreviations }
	}

	fn ends_sentence(&self, word: &str) -> bool {
		let core = word.trim_end_matches(CLOSERS);
		if core.ends_with('!') || core.ends_with('?') {
			return true;
		}
		if !core.ends_with('.') {
			return false;
		}
		!(self.abbreviations.matches(core) || is_initial(core))
	}
}

/// `J.` or `R.`: one letter followed by a period.
fn is_initial(word: &str) -> bool {
	let mut chars = word.chars();
	matches!(
		(chars.next(), chars.next(), chars.next()),
		(Some(letter), Some('.'), None) if letter.is_alphabetic()
	)
}

impl SentenceSplitter for RuleSplitter {
	fn split(&self, text: &str) -> Vec<String> {
		let mut sentences = Vec::new();
		let mut current: Vec<&str> = Vec::new();

		for word in text.split_whitespace() {
			current.push(word);
			if self.ends_sentence(word) {
				sentences.push(current.join(" "));
				current.clear();
			}
		}
		if !current.is_empty() {
			sentences.push(current.join(" "));
		}

		sentences
	}
}
