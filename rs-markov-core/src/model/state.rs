use super::prefix::Prefix;
use super::state_table::StateId;
use super::token::TokenId;

/// Represents a state of the chain.
///
/// A `State` corresponds to one exact prefix and stores every token observed
/// right after it, once per occurrence.
///
/// ## Invariants
/// - `suffixes` is never empty once the builder has appended to the state
/// - Duplicate suffixes are kept: a token seen k times out of n is sampled
///   with probability k/n
#[derive(Clone, Debug)]
pub(crate) struct State {
	/// Identifier of the state.
	prefix: Prefix,
	/// Cached prefix hash, reused when the table grows.
	hash: u32,
	/// Next state in the same bucket.
	next: Option<StateId>,
	/// Observed suffixes in insertion order. The order carries no meaning.
	suffixes: Vec<TokenId>,
}

impl State {
	/// Creates a new state with no suffix.
	pub(crate) fn new(prefix: Prefix, hash: u32, next: Option<StateId>) -> Self {
		Self { prefix, hash, next, suffixes: Vec::new() }
	}

	/// Records one occurrence of `token` after this prefix.
	pub(crate) fn add_suffix(&mut self, token: TokenId) {
		self.suffixes.push(token);
	}

	pub(crate) fn prefix(&self) -> &Prefix {
		&self.prefix
	}

	pub(crate) fn hash(&self) -> u32 {
		self.hash
	}

	pub(crate) fn next(&self) -> Option<StateId> {
		self.next
	}

	pub(crate) fn set_next(&mut self, next: Option<StateId>) {
		self.next = next;
	}

	pub(crate) fn suffixes(&self) -> &[TokenId] {
		&self.suffixes
	}
}
