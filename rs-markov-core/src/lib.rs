//! Word-level Markov chain text generation.
//!
//! This crate builds an order-N Markov chain over whitespace-delimited tokens
//! and generates pseudo-random text that statistically resembles the input:
//! - Interned tokens, prefix windows and a prefix-keyed state table
//! - One-pass construction with a reservoir-sampled sentence start
//! - Lazy generation with uniform reservoir sampling over observed suffixes
//! - A whitespace token reader over arbitrary bytes
//!
//! ```
//! use rs_markov_core::model::builder::build;
//! use rs_markov_core::model::config::ChainConfig;
//! use rs_markov_core::model::random::SeededRandom;
//!
//! let mut rng = SeededRandom::from_seed(42);
//! let source = "The cat sat. The dog ran.".split_whitespace().map(Ok::<_, std::io::Error>);
//! let model = build(ChainConfig::default(), source, &mut rng).unwrap();
//! let text: Vec<&str> = model.generate(3, &mut rng).collect();
//! assert_eq!(text[0], "The");
//! ```

/// Markov chain model, construction and generation.
pub mod model;

/// Token reading (input opening, whitespace splitting, length limits).
pub mod io;
