use std::io;

use super::config::ChainConfig;
use super::markov_model::{MarkovModel, ModelStats};
use super::prefix::Prefix;
use super::random::RandomSource;
use super::sampling::Reservoir;
use super::state_table::StateTable;
use super::token::{TokenPool, NON_WORD};

/// True for a token that likely opens a sentence.
fn starts_sentence(token: &str) -> bool {
	token.as_bytes().first().is_some_and(u8::is_ascii_uppercase)
}

/// Streaming construction of a `MarkovModel`.
///
/// Tokens are fed one at a time; each one is recorded as a suffix of the
/// current window, then slides into it. Meanwhile a reservoir keeps one
/// uniformly chosen window whose oldest token is capitalized, used as the
/// default starting point of generation.
///
/// `finish` consumes the builder, so a model can no longer change once
/// generation is possible.
pub struct Builder {
	config: ChainConfig,
	tokens: TokenPool,
	table: StateTable,
	window: Prefix,
	start: Reservoir<Prefix>,
	consumed: usize,
}

impl Builder {
	pub fn new(config: ChainConfig) -> Self {
		let window = Prefix::new(config.order());
		Self {
			config,
			tokens: TokenPool::new(),
			table: StateTable::new(),
			window,
			start: Reservoir::new(),
			consumed: 0,
		}
	}

	/// Records `token` after the current window, then advances the window.
	///
	/// Draws one random number when the advanced window starts with a
	/// capitalized token.
	pub fn feed<R: RandomSource + ?Sized>(&mut self, token: &str, rng: &mut R) {
		let id = self.tokens.intern(token);
		let state = self.table.lookup_or_create(&self.tokens, &self.window);
		self.table.append_suffix(state, id);
		self.window.advance(id);
		self.consumed += 1;

		if starts_sentence(self.tokens.text(self.window.first())) {
			let window = &self.window;
			self.start.offer_with(rng, || window.clone());
		}
	}

	/// Feeds every token of `source`.
	///
	/// # Errors
	/// Stops at and returns the first error yielded by the source.
	pub fn feed_all<I, T, R>(&mut self, source: I, rng: &mut R) -> io::Result<()>
	where
		I: IntoIterator<Item = io::Result<T>>,
		T: AsRef<str>,
		R: RandomSource + ?Sized,
	{
		for token in source {
			self.feed(token?.as_ref(), rng);
		}
		Ok(())
	}

	/// Number of tokens fed so far.
	pub fn consumed(&self) -> usize {
		self.consumed
	}

	/// Terminates the chain and freezes it into a model.
	///
	/// The sentinel is recorded after the last window, so the state reached
	/// after the final token can end generation. The starting prefix is the
	/// sampled sentence start, or the boundary prefix if none was seen.
	pub fn finish(mut self) -> MarkovModel {
		let state = self.table.lookup_or_create(&self.tokens, &self.window);
		self.table.append_suffix(state, NON_WORD);
		self.window.advance(NON_WORD);

		let stats = ModelStats {
			config: self.config.clone(),
			tokens_read: self.consumed,
			distinct_tokens: self.tokens.len(),
			states: self.table.len(),
			suffixes: self.table.suffix_count(),
			buckets: self.table.bucket_count(),
			start_candidates: self.start.seen(),
		};
		log::debug!(
			"model built: {} tokens, {} distinct, {} states, {} start candidates",
			stats.tokens_read, stats.distinct_tokens, stats.states, stats.start_candidates
		);

		let order = self.config.order();
		let start = self.start.into_chosen().unwrap_or_else(|| Prefix::new(order));
		MarkovModel::new(self.tokens, self.table, start, stats)
	}
}

/// Builds a model from a token source in one pass.
///
/// # Errors
/// Returns the first I/O error of the source; no partial model is produced.
pub fn build<I, T, R>(config: ChainConfig, source: I, rng: &mut R) -> io::Result<MarkovModel>
where
	I: IntoIterator<Item = io::Result<T>>,
	T: AsRef<str>,
	R: RandomSource + ?Sized,
{
	let mut builder = Builder::new(config);
	builder.feed_all(source, rng)?;
	Ok(builder.finish())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::random::ScriptedRandom;

	fn words(text: &str) -> impl Iterator<Item = io::Result<&str>> {
		text.split_whitespace().map(Ok)
	}

	#[test]
	fn capitalized_detection() {
		assert!(starts_sentence("The"));
		assert!(!starts_sentence("the"));
		assert!(!starts_sentence("\n"));
		assert!(!starts_sentence(""));
		assert!(!starts_sentence("Élan"));
	}

	#[test]
	fn empty_input_has_only_the_terminator() {
		let mut rng = ScriptedRandom::new([]);
		let model = build(ChainConfig::default(), words(""), &mut rng).unwrap();
		assert_eq!(model.stats().states, 1);
		assert_eq!(model.stats().suffixes, 1);
		assert!(model.start_prefix().is_boundary());
		assert_eq!(model.suffixes(&[None, None]), Some(vec![None]));
	}

	#[test]
	fn single_token() {
		let mut rng = ScriptedRandom::new([]);
		let model = build(ChainConfig::default(), words("Hello"), &mut rng).unwrap();
		assert_eq!(model.stats().states, 2);
		assert_eq!(model.suffixes(&[None, None]), Some(vec![Some("Hello")]));
		assert_eq!(model.suffixes(&[None, Some("Hello")]), Some(vec![None]));
		// The only capitalized token never becomes the oldest slot of a window.
		assert_eq!(model.stats().start_candidates, 0);
		assert!(model.start_prefix().is_boundary());
	}

	#[test]
	fn start_prefix_is_reservoir_sampled() {
		let text = "The cat sat. The dog ran.";

		let mut rng = ScriptedRandom::new([0, 1]);
		let model = build(ChainConfig::default(), words(text), &mut rng).unwrap();
		assert_eq!(model.stats().start_candidates, 2);
		assert_eq!(model.prefix_words(model.start_prefix()), vec![Some("The"), Some("cat")]);

		let mut rng = ScriptedRandom::new([0, 0]);
		let model = build(ChainConfig::default(), words(text), &mut rng).unwrap();
		assert_eq!(model.prefix_words(model.start_prefix()), vec![Some("The"), Some("dog")]);
		assert_eq!(rng.remaining(), 0);
	}

	#[test]
	fn duplicate_suffixes_are_kept() {
		let mut rng = ScriptedRandom::new([]);
		let model = build(ChainConfig::new(1).unwrap(), words("a b a b a c"), &mut rng).unwrap();
		let mut after_a = model.suffixes(&[Some("a")]).unwrap();
		after_a.sort();
		assert_eq!(after_a, vec![Some("b"), Some("b"), Some("c")]);
		assert_eq!(model.suffixes(&[Some("c")]), Some(vec![None]));
		assert_eq!(model.stats().suffixes, 7);
	}

	#[test]
	fn source_errors_abort_the_build() {
		let source = vec![
			Ok("one".to_owned()),
			Err(io::Error::new(io::ErrorKind::UnexpectedEof, "broken pipe")),
			Ok("two".to_owned()),
		];
		let mut rng = ScriptedRandom::new([]);
		let err = build(ChainConfig::default(), source, &mut rng).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
	}

	#[test]
	fn incremental_feeding() {
		let mut rng = ScriptedRandom::new([]);
		let mut builder = Builder::new(ChainConfig::default());
		builder.feed("x", &mut rng);
		builder.feed("y", &mut rng);
		assert_eq!(builder.consumed(), 2);
		let model = builder.finish();
		assert_eq!(model.stats().tokens_read, 2);
		assert_eq!(model.suffixes(&[Some("x"), Some("y")]), Some(vec![None]));
	}
}
