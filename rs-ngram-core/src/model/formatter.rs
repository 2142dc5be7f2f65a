use regex::Regex;

use super::count_table::Token;
use crate::error::NGramResult;

/// Canonical double-quote glyph emitted in generated text.
pub const QUOTE: &str = "\"";

/// Raw opening-quote artifact produced by the word tokenizer.
pub const OPEN_QUOTE: &str = "``";

/// Raw closing-quote artifact produced by the word tokenizer.
pub const CLOSE_QUOTE: &str = "''";

/// Whether the last quote seen opened or closed a quotation.
///
/// Tracked while normalizing quotes. Both states currently emit the same
/// canonical glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QuoteState {
	#[default]
	Outside,
	Inside,
}

/// Deterministic post-processing of generated token sequences.
///
/// Owns every pattern it needs, compiled once at construction, so several
/// formatters can coexist without sharing state.
///
/// # Responsibilities
/// - Recognize sentence-final tokens (`.`, `!`, `?`, optionally followed by a
///   closing quote)
/// - Collapse quote artifacts into the canonical `"`
/// - Join tokens into readable text (punctuation spacing, capitalization)
#[derive(Clone, Debug)]
pub struct Formatter {
	sentence_final: Regex,
	space_before_punctuation: Regex,
	space_after_quote: Regex,
	space_before_quote: Regex,
	leftover_quotes: Regex,
	multiple_spaces: Regex,
}

impl Formatter {
	pub fn new() -> NGramResult<Self> {
		Ok(Self {
			sentence_final: Regex::new(r#"^[.?!]["']?$"#)?,
			space_before_punctuation: Regex::new(r"\s+([,.;:?!])")?,
			space_after_quote: Regex::new(r#""\s+"#)?,
			space_before_quote: Regex::new(r#"\s+""#)?,
			leftover_quotes: Regex::new(r"``|''")?,
			multiple_spaces: Regex::new(r"\s{2,}")?,
		})
	}

	/// True for `.`, `!`, `?`, each optionally followed by `"` or `'`.
	pub fn is_sentence_final(&self, token: &str) -> bool {
		self.sentence_final.is_match(token)
	}

	/// Replaces every quote artifact (`` `` ``, `''`, `"`) by the canonical
	/// `"`, keeping its position. Other tokens are left untouched.
	pub fn normalize_quotes(&self, tokens: &[Token]) -> Vec<Token> {
		let mut state = QuoteState::default();
		tokens
			.iter()
			.map(|token| match token.as_str() {
				OPEN_QUOTE => {
					state = QuoteState::Inside;
					QUOTE.to_owned()
				}
				CLOSE_QUOTE => {
					state = QuoteState::Outside;
					QUOTE.to_owned()
				}
				QUOTE => {
					state = match state {
						QuoteState::Outside => QuoteState::Inside,
						QuoteState::Inside => QuoteState::Outside,
					};
					QUOTE.to_owned()
				}
				_ => token.clone(),
			})
			.collect()
	}

	/// Cleans up spacing and capitalization of already joined text.
	///
	/// Stray quote artifacts, including ones stuck to a word, are first turned
	/// into `"`, then, in order:
	/// 1. no whitespace before `, . ; : ? !`
	/// 2. no whitespace after `"`
	/// 3. no whitespace before `"`
	/// 4. runs of whitespace collapsed to one space
	/// 5. first character upper-cased if it is lowercase
	///
	/// Running it on its own output changes nothing.
	pub fn tidy(&self, text: &str) -> String {
		let text = self.leftover_quotes.replace_all(text, QUOTE);
		let text = self.space_before_punctuation.replace_all(&text, "$1");
		let text = self.space_after_quote.replace_all(&text, QUOTE);
		let text = self.space_before_quote.replace_all(&text, QUOTE);
		let text = self.multiple_spaces.replace_all(&text, " ");
		capitalize_first(&text)
	}

	/// Turns a token sequence into a finished sentence.
	pub fn assemble(&self, tokens: &[Token]) -> String {
		let tokens = self.normalize_quotes(tokens);
		self.tidy(&tokens.join(" "))
	}
}

/// Upper-cases the first character when it is lowercase.
fn capitalize_first(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
		_ => text.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	fn formatter() -> Formatter {
		Formatter::new().unwrap()
	}

	fn tokens(s: &str) -> Vec<Token> {
		s.split_whitespace().map(str::to_owned).collect()
	}

	#[rstest]
	#[case(".", true)]
	#[case("!", true)]
	#[case("?", true)]
	#[case(".\"", true)]
	#[case("?'", true)]
	#[case("..", false)]
	#[case(",", false)]
	#[case("end.", false)]
	#[case("\"", false)]
	#[case("", false)]
	fn detects_sentence_final_tokens(#[case] token: &str, #[case] expected: bool) {
		assert_eq!(formatter().is_sentence_final(token), expected);
	}

	#[test]
	fn quote_artifacts_become_canonical() {
		let normalized = formatter().normalize_quotes(&tokens("`` hi '' she said \" ok \""));
		assert_eq!(normalized, tokens("\" hi \" she said \" ok \""));
	}

	#[rstest]
	#[case("the cat sat .", "The cat sat.")]
	#[case("well , yes ; no : maybe ? sure !", "Well, yes; no: maybe? sure!")]
	#[case("he said \" hello \" .", "He said\"hello\".")]
	#[case("a    b", "A b")]
	#[case("Already fine.", "Already fine.")]
	#[case("", "")]
	#[case("élan vital .", "Élan vital.")]
	#[case("`` quoted '' .", "\"quoted\".")]
	#[case("say ''hi'' now .", "Say\"hi\"now.")]
	fn tidies_joined_text(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(formatter().tidy(input), expected);
	}

	#[test]
	fn assembles_tokens_into_sentence() {
		let f = formatter();
		assert_eq!(f.assemble(&tokens("b .")), "B.");
		assert_eq!(f.assemble(&tokens("`` run '' , he said .")), "\"run\", he said.");
	}

	proptest! {
		#[test]
		fn prop_tidy_is_idempotent(
			words in proptest::collection::vec(
				prop::sample::select(vec!["the", "cat", ",", ".", "?", "\"", "``", "''", "  ", "ok", ";"]),
				0..20,
			)
		) {
			let f = formatter();
			let once = f.tidy(&words.join(" "));
			let twice = f.tidy(&once);
			prop_assert_eq!(once, twice);
		}
	}
}
