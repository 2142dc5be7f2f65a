//! Top-level module for the n-gram language model.
//!
//! This module provides:
//! - N-gram occurrence counting (`CountTable`)
//! - Context to next-token distributions (`ConditionalModel`, `State`)
//! - Weighted sentence generation (`Generator`)
//! - Post-processing of generated tokens (`Formatter`)
//! - Several orders trained side by side (`MultiGramModel`)
//! - Generation parameters (`PredictionInput`)

/// N-gram counts of a fixed order.
///
/// Handles token stream ingestion, window counting and table merging.
pub mod count_table;

/// Conditional model derived from a count table.
///
/// Groups n-gram counts by their (n-1)-token context.
pub mod conditional_model;

/// Sentence generation over a count table.
///
/// Exposes the sampling loop, its termination reasons and the finished text.
pub mod generator;

/// Quote normalization, sentence-final detection and text assembly.
pub mod formatter;

/// Count tables of several orders trained on the same corpus.
///
/// Supports parallel training and merging.
pub mod multigram_model;

/// Generation parameters: start seed and iteration bound.
pub mod prediction_input;

/// Internal representation of a single context.
///
/// Tracks outgoing transitions and supports weighted random sampling.
pub mod state;
