use super::{Abbreviations, Tokenizer};
use crate::model::count_table::Token;
use crate::model::formatter::{CLOSE_QUOTE, OPEN_QUOTE};

/// Characters joining two word parts: `don't`, `well-known`, `3.14`.
const JOINERS: &[char] = &['\'', '’', '-', '.'];

/// Brackets after which a straight double quote opens a quotation.
const OPENERS: &[char] = &['(', '[', '{'];

/// Splits a sentence into words and punctuation marks.
///
/// # Behavior
/// - Words are runs of alphanumeric characters, possibly joined by an
///   apostrophe, a hyphen or a period with letters or digits on both sides.
/// - Known abbreviations keep their period (`Mr.`, `U.S.`).
/// - Double quotes become the raw artifacts `` `` `` (opening) and `''`
///   (closing); curly quotes are mapped the same way. A straight quote
///   standing alone alternates between opening and closing.
/// - Other punctuation is one token per run of the same character, so `...`
///   and `--` stay whole.
#[derive(Clone, Debug, Default)]
pub struct WordTokenizer {
	abbreviations: Abbreviations,
}

impl WordTokenizer {
	pub fn new(abbreviations: Abbreviations) -> Self {
		Self { abbreviations }
	}

	/// Tokenizes one whitespace-free chunk.
	///
	/// `quoting` tracks whether a quotation is open across chunks. It decides
	/// the direction of a straight quote standing alone between spaces.
	fn tokenize_chunk(&self, chunk: &str, quoting: &mut bool, tokens: &mut Vec<Token>) {
		if self.abbreviations.matches(chunk) && chunk.chars().all(|c| c.is_alphanumeric() || c == '.') {
			tokens.push(chunk.to_owned());
			return;
		}

		let chars: Vec<char> = chunk.chars().collect();
		let mut i = 0;
		while i < chars.len() {
			let c = chars[i];

			if c.is_alphanumeric() {
				let start = i;
				i += 1;
				while i < chars.len() {
					let joined = JOINERS.contains(&chars[i])
						&& chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());
					if chars[i].is_alphanumeric() || joined {
						i += 1;
					} else {
						break;
					}
				}
				tokens.push(chars[start..i].iter().collect());
				continue;
			}

			match c {
				'"' => {
					let opening = match i.checked_sub(1).map(|p| chars[p]) {
						Some(prev) => OPENERS.contains(&prev),
						None if chars.len() > 1 => true,
						None => !*quoting,
					};
					*quoting = opening;
					let quote = if opening { OPEN_QUOTE } else { CLOSE_QUOTE };
					tokens.push(quote.to_owned());
					i += 1;
				}
				'“' => {
					*quoting = true;
					tokens.push(OPEN_QUOTE.to_owned());
					i += 1;
				}
				'”' => {
					*quoting = false;
					tokens.push(CLOSE_QUOTE.to_owned());
					i += 1;
				}
				_ => {
					let start = i;
					while i < chars.len() && chars[i] == c {
						i += 1;
					}
					tokens.push(chars[start..i].iter().collect());
				}
			}
		}
	}
}

impl Tokenizer for WordTokenizer {
	fn tokenize(&self, sentence: &str) -> Vec<Token> {
		let mut tokens = Vec::new();
		let mut quoting = false;
		for chunk in sentence.split_whitespace() {
			self.tokenize_chunk(chunk, &mut quoting, &mut tokens);
		}
		tokens
	}
}
