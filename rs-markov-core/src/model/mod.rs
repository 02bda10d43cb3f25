//! Word-level Markov chain.
//!
//! - Interned tokens and the sentinel (`token`)
//! - The sliding prefix window (`prefix`)
//! - The prefix-keyed state table (`state_table`)
//! - Streaming construction (`builder`) into a frozen model (`markov_model`)
//! - Lazy generation (`generator`) driven by reservoir sampling (`sampling`)
//!   over an explicit random source (`random`)

/// Build-time parameters: order and token length limits.
pub mod config;

/// Interned token pool and the `NON_WORD` sentinel.
pub mod token;

/// Fixed-size window over the most recent tokens, also used as state key.
pub mod prefix;

/// A single state: one prefix and its suffix occurrences.
///
/// Not exposed publicly.
mod state;

/// Hash table from prefix to state, with index-linked chains.
pub mod state_table;

/// Random sources: seeded, time-seeded and scripted.
pub mod random;

/// One-pass uniform selection over streams of unknown length.
pub mod sampling;

/// Streaming model construction and sentence-start selection.
pub mod builder;

/// The frozen model and its statistics.
pub mod markov_model;

/// Lazy sequence generation from a model.
pub mod generator;
