use std::path::PathBuf;

use clap::Parser;
use log::info;

use rs_ngram_core::Generator;
use rs_ngram_core::io::read_file;
use rs_ngram_core::model::multigram_model::{DEFAULT_ORDERS, MultiGramModel};
use rs_ngram_core::model::prediction_input::PredictionInput;
use rs_ngram_core::text::{RuleSplitter, SentenceSplitter, WordTokenizer};

/// Train n-gram models on a corpus and print generated sentences.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Corpus text file
    #[arg(default_value = "data/sample.txt")]
    corpus: PathBuf,

    /// Orders to train, comma separated
    #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_ORDERS)]
    orders: Vec<usize>,

    /// Sentences generated per order
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Sampling iterations (defaults to 25 for n <= 3, 100 above)
    #[arg(short, long)]
    max_length: Option<usize>,

    /// Start context, space separated, for every order whose n - 1 matches
    #[arg(short, long)]
    start: Option<String>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print every numbered corpus sentence before generating
    #[arg(long, default_value_t = false)]
    echo: bool,
}

/// Wraps a label in a green ANSI highlight.
fn colored(text: &str) -> String {
    format!("\x1b[6;30;42m{}\x1b[0m", text)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let splitter = RuleSplitter::default();
    let tokenizer = WordTokenizer::default();

    // Split once so the sentences can be echoed and trained on
    let text = read_file(&cli.corpus)?;
    let sentences = splitter.split(&text);
    println!("Processed {} sentences from {}", sentences.len(), cli.corpus.display());

    if cli.echo {
        for (idx, sentence) in sentences.iter().enumerate() {
            println!("Sentence {:03} ----------------------------", idx + 1);
            println!("{}", sentence);
            println!();
        }
    }

    let model = MultiGramModel::from_sentences(&sentences, &tokenizer, &cli.orders)?;
    info!("trained orders {:?}", model.orders());

    let mut generator = match cli.seed {
        Some(seed) => Generator::seeded(seed)?,
        None => Generator::new()?,
    };

    let start: Option<Vec<String>> = cli
        .start
        .as_deref()
        .map(|s| s.split_whitespace().map(str::to_owned).collect());

    for (n, table) in model.tables() {
        let mut input = PredictionInput::for_order(n);
        if let Some(max_length) = cli.max_length {
            input = input.with_max_length(max_length);
        }
        // A start context only fits the order it was written for
        if let Some(start) = start.as_ref().filter(|s| s.len() == n - 1) {
            input = input.with_seed(start.clone());
        }

        println!(
            "\n==== Example: Generating a random sentence {} ===\n",
            colored(&format!("({}-gram)", n))
        );
        for _ in 0..cli.count {
            println!("{}", generator.predict(table, &input)?);
        }
    }

    Ok(())
}
