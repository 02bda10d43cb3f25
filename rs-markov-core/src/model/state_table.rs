use std::iter::Copied;
use std::slice::Iter;

use super::prefix::Prefix;
use super::state::State;
use super::token::{TokenId, TokenPool};

/// Number of buckets of a fresh table.
pub const INITIAL_BUCKETS: usize = 4096;

/// Average chain length that triggers a doubling of the bucket array.
const MAX_LOAD: usize = 2;

/// Handle of a state inside a `StateTable`.
///
/// Handles are indexes into the table's arena and never move: growing the
/// bucket array relinks chains but keeps every state where it is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StateId(usize);

/// Iterator over the suffixes of one state, in insertion order.
pub type Suffixes<'a> = Copied<Iter<'a, TokenId>>;

/// Hash table from prefix to state.
///
/// States live in a single arena. Buckets hold the head of an index-linked
/// chain; lookup hashes the prefix text with the token pool and walks the
/// chain comparing token ids.
///
/// # Invariants
/// - At most one state per distinct prefix
/// - Every state is reachable from exactly one bucket
/// - States are never removed
#[derive(Debug)]
pub struct StateTable {
	heads: Vec<Option<StateId>>,
	states: Vec<State>,
	suffix_count: usize,
}

impl StateTable {
	/// Creates an empty table with `INITIAL_BUCKETS` buckets.
	pub fn new() -> Self {
		Self::with_buckets(INITIAL_BUCKETS)
	}

	/// Creates an empty table with a given initial bucket count (at least 1).
	pub fn with_buckets(buckets: usize) -> Self {
		Self {
			heads: vec![None; buckets.max(1)],
			states: Vec::new(),
			suffix_count: 0,
		}
	}

	fn bucket(&self, hash: u32) -> usize {
		hash as usize % self.heads.len()
	}

	fn find(&self, prefix: &[TokenId], hash: u32) -> Option<StateId> {
		let mut cursor = self.heads[self.bucket(hash)];
		while let Some(id) = cursor {
			let state = &self.states[id.0];
			if state.prefix().as_slice() == prefix {
				return Some(id);
			}
			cursor = state.next();
		}
		None
	}

	/// Returns the state recorded for `prefix`, if any.
	pub fn lookup(&self, tokens: &TokenPool, prefix: &[TokenId]) -> Option<StateId> {
		self.find(prefix, tokens.prefix_hash(prefix))
	}

	/// Returns the state recorded for `prefix`, creating an empty one on miss.
	pub fn lookup_or_create(&mut self, tokens: &TokenPool, prefix: &Prefix) -> StateId {
		let hash = tokens.prefix_hash(prefix.as_slice());
		if let Some(id) = self.find(prefix.as_slice(), hash) {
			return id;
		}

		if self.states.len() >= self.heads.len() * MAX_LOAD {
			self.grow();
		}

		let id = StateId(self.states.len());
		let bucket = self.bucket(hash);
		self.states.push(State::new(prefix.clone(), hash, self.heads[bucket]));
		self.heads[bucket] = Some(id);
		id
	}

	/// Adds one occurrence of `token` to the suffixes of `state`.
	pub fn append_suffix(&mut self, state: StateId, token: TokenId) {
		self.states[state.0].add_suffix(token);
		self.suffix_count += 1;
	}

	/// Streams the suffixes of `state`.
	pub fn suffixes(&self, state: StateId) -> Suffixes<'_> {
		self.states[state.0].suffixes().iter().copied()
	}

	pub fn prefix(&self, state: StateId) -> &Prefix {
		self.states[state.0].prefix()
	}

	/// Iterates over every state as `(prefix, suffixes)`.
	pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &[TokenId])> {
		self.states.iter().map(|state| (state.prefix(), state.suffixes()))
	}

	/// Number of states.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Total number of suffix occurrences over all states.
	pub fn suffix_count(&self) -> usize {
		self.suffix_count
	}

	pub fn bucket_count(&self) -> usize {
		self.heads.len()
	}

	/// Doubles the bucket array and relinks every chain.
	fn grow(&mut self) {
		let buckets = self.heads.len() * 2;
		log::trace!("growing state table: {} -> {} buckets ({} states)", self.heads.len(), buckets, self.states.len());

		self.heads = vec![None; buckets];
		for index in 0..self.states.len() {
			let bucket = self.states[index].hash() as usize % buckets;
			self.states[index].set_next(self.heads[bucket]);
			self.heads[bucket] = Some(StateId(index));
		}
	}
}

impl Default for StateTable {
	fn default() -> Self {
		Self::new()
	}
}
