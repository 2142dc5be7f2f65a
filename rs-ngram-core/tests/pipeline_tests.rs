use std::fs;

use regex::Regex;
use rs_ngram_core::model::conditional_model::ConditionalModel;
use rs_ngram_core::model::multigram_model::{DEFAULT_ORDERS, MultiGramModel};
use rs_ngram_core::model::prediction_input::PredictionInput;
use rs_ngram_core::text::{RuleSplitter, SentenceSplitter, Tokenizer, WordTokenizer};
use rs_ngram_core::{CountTable, Generator, NGramError, Token};

const CORPUS: &str = "In my younger and more vulnerable years my father gave me some advice. \
	\"Whenever you feel like criticizing anyone,\" he told me, \"just remember that all the \
	people in this world haven't had the advantages that you've had.\" He didn't say any more, \
	but we've always been unusually communicative in a reserved way. Mr. Gatsby smiled. \
	Was it a dream? It was not!";

fn tokens(s: &str) -> Vec<Token> {
	s.split_whitespace().map(str::to_owned).collect()
}

#[test]
fn concrete_bigram_scenario() {
	let mut table = CountTable::new(2).unwrap();
	table.update(&tokens("the cat sat ."));

	assert_eq!(table.get(&["the", "cat"]), 1);
	assert_eq!(table.get(&["cat", "sat"]), 1);
	assert_eq!(table.get(&["sat", "."]), 1);

	let model = ConditionalModel::from_count_table(&table);
	assert_eq!(model.get(&tokens("the")).unwrap().count("cat"), 1);
	assert_eq!(model.get(&tokens("cat")).unwrap().count("sat"), 1);
	assert_eq!(model.get(&tokens("sat")).unwrap().count("."), 1);

	let mut generator = Generator::new().unwrap();
	let sentence = generator.generate(&table, Some(&tokens("the")), 10).unwrap();
	assert_eq!(sentence, "The cat sat.");
}

#[test]
fn dead_end_scenario() {
	let mut table = CountTable::new(2).unwrap();
	table.update(&tokens("a b"));

	let mut generator = Generator::new().unwrap();
	assert_eq!(generator.generate(&table, Some(&tokens("b")), 25).unwrap(), "B.");
}

#[test]
fn seed_validation_scenario() {
	let mut table = CountTable::new(3).unwrap();
	table.update(&tokens("a b c ."));

	let mut generator = Generator::new().unwrap();
	let err = generator.generate(&table, Some(&tokens("a")), 25).unwrap_err();
	assert!(matches!(err, NGramError::InvalidSeedLength { expected: 2, actual: 1, .. }));
	assert_eq!(
		err.to_string(),
		"seed must have length 2 for a 3-gram model, got 1"
	);
}

#[test]
fn empty_table_scenario() {
	let table = CountTable::new(2).unwrap();
	let mut generator = Generator::new().unwrap();
	assert_eq!(generator.generate(&table, None, 25).unwrap(), "");
}

#[test]
fn corpus_pipeline_generates_sentences_for_every_order() {
	let splitter = RuleSplitter::default();
	let tokenizer = WordTokenizer::default();

	let sentences = splitter.split(CORPUS);
	assert_eq!(sentences.len(), 6);
	assert_eq!(sentences[3], "Mr. Gatsby smiled.");

	let model = MultiGramModel::from_text(CORPUS, &splitter, &tokenizer, &DEFAULT_ORDERS).unwrap();
	assert_eq!(model.sentence_count(), 6);

	let terminal = Regex::new(r#"[.!?]["']?$"#).unwrap();
	let mut generator = Generator::seeded(2024).unwrap();
	for (n, table) in model.tables() {
		let expected_total: usize = sentences
			.iter()
			.map(|s| tokenizer.tokenize(s).len().saturating_sub(n - 1))
			.sum();
		assert_eq!(table.total(), expected_total, "order {n}");

		let input = PredictionInput::for_order(n);
		for _ in 0..10 {
			let sentence = generator.predict(table, &input).unwrap();
			assert!(terminal.is_match(&sentence), "order {n}: {sentence}");
			assert!(!sentence.contains("``") && !sentence.contains("''"), "{sentence}");
			assert!(!sentence.contains(" ."), "{sentence}");
		}
	}
}

#[test]
fn corpus_file_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("tiny.txt");
	fs::write(&path, "The cat sat.\nThe cat ran!\n").unwrap();

	let model = MultiGramModel::from_file(
		&path,
		&RuleSplitter::default(),
		&WordTokenizer::default(),
		&[2, 3],
	)
	.unwrap();

	let bigrams = model.table(2).unwrap();
	assert_eq!(bigrams.get(&["The", "cat"]), 2);
	assert_eq!(bigrams.get(&["sat", "."]), 1);

	let mut generator = Generator::seeded(1).unwrap();
	let sentence = generator
		.generate(model.table(3).unwrap(), Some(&tokens("The cat")), 25)
		.unwrap();
	assert!(sentence == "The cat sat." || sentence == "The cat ran!", "{sentence}");
}

#[test]
fn missing_corpus_is_an_io_error() {
	let result = MultiGramModel::from_file(
		"does/not/exist.txt",
		&RuleSplitter::default(),
		&WordTokenizer::default(),
		&DEFAULT_ORDERS,
	);
	assert!(matches!(result, Err(NGramError::Io(_))));
}
