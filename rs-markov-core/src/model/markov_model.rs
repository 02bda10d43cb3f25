use serde::Serialize;

use super::config::ChainConfig;
use super::generator::Generator;
use super::prefix::Prefix;
use super::random::RandomSource;
use super::state_table::{StateId, StateTable, Suffixes};
use super::token::{TokenId, TokenPool, NON_WORD};

/// Summary of a built model.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ModelStats {
	/// Configuration the model was built with.
	pub config: ChainConfig,
	/// Tokens read from the source.
	pub tokens_read: usize,
	/// Distinct real tokens.
	pub distinct_tokens: usize,
	/// Distinct prefixes.
	pub states: usize,
	/// Suffix occurrences, terminator included.
	pub suffixes: usize,
	/// Buckets of the state table.
	pub buckets: usize,
	/// Windows that qualified as a sentence start.
	pub start_candidates: usize,
}

/// A frozen word-level Markov chain.
///
/// Owns the token pool and the state table produced by a `Builder`, plus the
/// starting prefix sampled during the build. Nothing can be added once the
/// model exists; any number of generations can read it.
///
/// # Invariants
/// - Every prefix reachable from the starting prefix through recorded
///   suffixes has a state, until the sentinel is reached
/// - The sentinel is a suffix of the state following the last input token
#[derive(Debug)]
pub struct MarkovModel {
	tokens: TokenPool,
	table: StateTable,
	start: Prefix,
	stats: ModelStats,
}

impl MarkovModel {
	pub(crate) fn new(tokens: TokenPool, table: StateTable, start: Prefix, stats: ModelStats) -> Self {
		Self { tokens, table, start, stats }
	}

	/// Number of tokens in a prefix.
	pub fn order(&self) -> usize {
		self.start.order()
	}

	pub fn stats(&self) -> &ModelStats {
		&self.stats
	}

	/// The prefix generation starts from by default.
	pub fn start_prefix(&self) -> &Prefix {
		&self.start
	}

	/// Text of a real token, `None` for the sentinel.
	pub fn word(&self, id: TokenId) -> Option<&str> {
		self.tokens.word(id)
	}

	pub(crate) fn text(&self, id: TokenId) -> &str {
		self.tokens.text(id)
	}

	/// Looks up the state of `prefix`. Never creates one.
	pub fn lookup(&self, prefix: &Prefix) -> Option<StateId> {
		self.table.lookup(&self.tokens, prefix.as_slice())
	}

	/// Streams the suffixes of a state.
	pub fn state_suffixes(&self, state: StateId) -> Suffixes<'_> {
		self.table.suffixes(state)
	}

	/// Builds a prefix from words, `None` standing for the sentinel.
	///
	/// Returns `None` if the length differs from the order or a word was
	/// never seen.
	pub fn prefix(&self, words: &[Option<&str>]) -> Option<Prefix> {
		if words.len() != self.order() {
			return None;
		}
		let ids = words
			.iter()
			.map(|word| match word {
				Some(w) => self.tokens.get(w),
				None => Some(NON_WORD),
			})
			.collect::<Option<Vec<_>>>()?;
		Some(Prefix::from_ids(&ids))
	}

	/// Words of a prefix, `None` for sentinel slots.
	pub fn prefix_words(&self, prefix: &Prefix) -> Vec<Option<&str>> {
		prefix.as_slice().iter().map(|id| self.word(*id)).collect()
	}

	/// Suffixes recorded after the given words, in insertion order.
	pub fn suffixes(&self, words: &[Option<&str>]) -> Option<Vec<Option<&str>>> {
		let state = self.lookup(&self.prefix(words)?)?;
		Some(self.table.suffixes(state).map(|id| self.word(id)).collect())
	}

	/// Iterates over every state as `(prefix, suffixes)`.
	pub fn states(&self) -> impl Iterator<Item = (&Prefix, &[TokenId])> {
		self.table.iter()
	}

	/// Renders a prefix for diagnostics.
	pub(crate) fn describe(&self, prefix: &Prefix) -> String {
		let words: Vec<&str> = prefix
			.as_slice()
			.iter()
			.map(|id| self.word(*id).unwrap_or("<NONWORD>"))
			.collect();
		format!("({})", words.join(", "))
	}

	/// Generates from the sampled starting prefix.
	///
	/// See `Generator` for the emitted sequence.
	pub fn generate<'m, 'r, R>(&'m self, max_tokens: usize, rng: &'r mut R) -> Generator<'m, 'r, R>
	where
		R: RandomSource + ?Sized,
	{
		self.generate_from(self.start.clone(), max_tokens, rng)
	}

	/// Generates from an explicit starting prefix.
	///
	/// # Panics
	/// Iterating panics if `start` (or a prefix reached from it) has no state,
	/// i.e. the prefix never occurred in the training text.
	pub fn generate_from<'m, 'r, R>(&'m self, start: Prefix, max_tokens: usize, rng: &'r mut R) -> Generator<'m, 'r, R>
	where
		R: RandomSource + ?Sized,
	{
		debug_assert_eq!(start.order(), self.order(), "prefix order mismatch");
		Generator::new(self, start, max_tokens, rng)
	}
}
