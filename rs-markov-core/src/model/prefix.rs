use super::token::{TokenId, NON_WORD};

/// Fixed-size window over the most recent tokens.
///
/// A `Prefix` is both the sliding window used while reading or generating and
/// the key of a state. Two prefixes are equal iff every slot holds the same
/// token. The number of slots (the model order) never changes after creation.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Prefix {
	slots: Box<[TokenId]>,
}

impl Prefix {
	/// Creates the boundary prefix: `order` sentinel slots.
	pub fn new(order: usize) -> Self {
		debug_assert!(order >= 1, "prefix order must be >= 1");
		Self { slots: vec![NON_WORD; order].into_boxed_slice() }
	}

	/// Builds a prefix from explicit token ids.
	pub fn from_ids(ids: &[TokenId]) -> Self {
		debug_assert!(!ids.is_empty(), "prefix order must be >= 1");
		Self { slots: ids.into() }
	}

	/// Slides the window: drops the oldest token and stores `token` last.
	pub fn advance(&mut self, token: TokenId) {
		self.slots.rotate_left(1);
		if let Some(last) = self.slots.last_mut() {
			*last = token;
		}
	}

	/// Returns a copy of this prefix advanced by `token`.
	pub fn advanced(&self, token: TokenId) -> Self {
		let mut next = self.clone();
		next.advance(token);
		next
	}

	pub fn order(&self) -> usize {
		self.slots.len()
	}

	/// Oldest token of the window.
	pub fn first(&self) -> TokenId {
		self.slots[0]
	}

	pub fn as_slice(&self) -> &[TokenId] {
		&self.slots
	}

	/// True while no real token has entered the window.
	pub fn is_boundary(&self) -> bool {
		self.slots.iter().all(|id| *id == NON_WORD)
	}
}
