use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use rs_ngram_core::io::{get_filename, list_files, normalize_folder};
use rs_ngram_core::model::multigram_model::{DEFAULT_ORDERS, MultiGramModel};
use rs_ngram_core::model::prediction_input::{MAX_LENGTH_EXTENDED, PredictionInput};
use rs_ngram_core::text::{RuleSplitter, WordTokenizer};
use rs_ngram_core::{Generator, NGramError};

/// Extension of corpus files in the data directory
const CORPUS_EXTENSION: &str = "txt";

/// Largest `max_length` a client may ask for. Generation holds the state
/// lock for the whole sampling loop.
const MAX_LENGTH_LIMIT: usize = MAX_LENGTH_EXTENDED * 10;

/// Command line configuration of the server
#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP front-end for n-gram sentence generation", long_about = None)]
struct ServerConfig {
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Directory holding `.txt` corpora
	#[arg(long, default_value = "./data")]
	data_dir: String,
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	n: Option<usize>,
	max_length: Option<usize>,
	seed: Option<String> // space separated tokens, random start if absent
}

#[derive(Deserialize)]
struct CorpusQuery {
	name: Option<String>
}

/// Size of one trained table, as reported by `/v1/stats`
#[derive(Serialize)]
struct TableStats {
	distinct: usize,
	total: usize,
}

/// A corpus trained for every default order
struct LoadedCorpus {
	name: String,
	model: MultiGramModel,
}

struct SharedData {
	data_dir: PathBuf,
	corpus: Option<LoadedCorpus>,
	generator: Generator,
}

impl GenerateParams {
	/// Builds the prediction input for a model of order `n`.
	fn prediction_input(&self, n: usize) -> PredictionInput {
		let mut input = PredictionInput::for_order(n);
		if let Some(max_length) = self.max_length {
			input = input.with_max_length(max_length);
		}
		if let Some(seed) = &self.seed {
			input = input.with_seed(seed.split_whitespace().map(str::to_owned).collect());
		}
		input
	}
}

/// Generates one sentence with the table of order `n` of the loaded corpus.
fn generate_response(data: &Mutex<SharedData>, n: usize, input: &PredictionInput) -> HttpResponse {
	if input.max_length > MAX_LENGTH_LIMIT {
		return HttpResponse::BadRequest()
			.body(format!("max_length must be at most {}, got {}", MAX_LENGTH_LIMIT, input.max_length));
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let SharedData { corpus, generator, .. } = &mut *shared_data;

	let Some(corpus) = corpus else {
		return HttpResponse::BadRequest().body("No corpus loaded");
	};

	match corpus.model.table(n).and_then(|table| generator.predict(table, input)) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => error_response(e),
	}
}

/// Maps a library error to an HTTP response.
fn error_response(error: NGramError) -> HttpResponse {
	match &error {
		NGramError::InvalidSeedLength { .. } | NGramError::MissingOrder(_) | NGramError::InvalidOrder(_) => {
			HttpResponse::BadRequest().body(error.to_string())
		}
		NGramError::Io(io) if io.kind() == ErrorKind::NotFound => HttpResponse::NotFound().body(error.to_string()),
		_ => {
			warn!("request failed: {error}");
			HttpResponse::InternalServerError().body(error.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one sentence from the loaded corpus with the table of order `n`
/// (2 by default). Returns the sentence as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let n = query.n.unwrap_or(2);
	generate_response(&data, n, &query.prediction_input(n))
}

/// HTTP POST endpoint `/v1/generate/{n}`
///
/// Same as `GET /v1/generate` with the prediction input sent as a JSON body,
/// e.g. `{"max_length": 25, "start_seed": {"Custom": ["The", "cat"]}}`.
#[post("/v1/generate/{n}")]
async fn post_generated(
	data: web::Data<Mutex<SharedData>>,
	n: web::Path<usize>,
	input: web::Json<PredictionInput>,
) -> impl Responder {
	generate_response(&data, n.into_inner(), &input)
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let names: std::io::Result<Vec<String>> = list_files(&data_dir, CORPUS_EXTENSION)
		.and_then(|files| files.iter().map(get_filename).collect());
	match names {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[get("/v1/loaded_corpus")]
async fn get_loaded_corpus(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match &shared_data.corpus {
		Some(corpus) => HttpResponse::Ok().body(corpus.name.clone()),
		None => HttpResponse::Ok().body(""),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(corpus) = &shared_data.corpus else {
		return HttpResponse::BadRequest().body("No corpus loaded");
	};

	let stats: BTreeMap<usize, TableStats> = corpus
		.model
		.tables()
		.map(|(n, table)| (n, TableStats { distinct: table.len(), total: table.total() }))
		.collect();
	HttpResponse::Ok().json(stats)
}

/// HTTP PUT endpoint `/v1/load_corpus`
///
/// Trains every default order on `<data_dir>/<name>.txt` and replaces the
/// currently loaded corpus. Only one corpus is loaded at a time.
#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	if name.contains(['/', '\\']) || name.starts_with('.') {
		return HttpResponse::BadRequest().body("Invalid corpus name");
	}

	let path = match data.lock() {
		Ok(m) => m.data_dir.join(format!("{}.{}", name, CORPUS_EXTENSION)),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	// Train outside the lock, generation keeps serving the previous corpus
	let model = match MultiGramModel::from_file(&path, &RuleSplitter::default(), &WordTokenizer::default(), &DEFAULT_ORDERS) {
		Ok(m) => m,
		Err(e) => return error_response(e),
	};
	info!("corpus '{}' trained on {} sentences", name, model.sentence_count());

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.corpus = Some(LoadedCorpus { name, model });

	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// Registers every endpoint on a service config.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(post_generated)
		.service(get_corpora)
		.service(put_corpus)
		.service(get_loaded_corpus)
		.service(get_stats);
}

/// Main entry point for the server.
///
/// Wraps the shared state in a `Mutex` and starts an Actix-web HTTP server.
/// No corpus is loaded at start; call `/v1/load_corpus` first.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
	let config = ServerConfig::parse();

	let generator = Generator::new().map_err(std::io::Error::other)?;
	let shared_data = SharedData {
		data_dir: normalize_folder(&config.data_dir),
		corpus: None,
		generator,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.configure(configure)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
