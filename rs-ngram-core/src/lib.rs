//! N-gram language model over tokenized sentences.
//!
//! This crate provides a small statistical text generator including:
//! - Token n-gram counting for any order `n >= 2`
//! - Conditional next-token distributions keyed by (n-1)-token contexts
//! - Weighted random sentence generation with reproducible seeding
//! - Deterministic post-processing (quotes, punctuation spacing, capitalization)
//! - Default sentence splitting and tokenizing collaborators
//!
//! Computation and presentation are kept apart: every operation returns data
//! and callers decide how corpora are loaded and sentences are shown.

/// Core n-gram models and generation logic.
pub mod model;

/// Sentence splitting and tokenizing.
pub mod text;

/// I/O utilities (corpus loading, directory listing).
pub mod io;

/// Error type shared by the whole crate.
pub mod error;

pub use error::{NGramError, NGramResult};
pub use model::count_table::{CountTable, NGram, Token};
pub use model::generator::Generator;
