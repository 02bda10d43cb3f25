use std::collections::HashMap;
use std::sync::Arc;

/// Identifier of an interned token.
///
/// Ids are dense indexes into a `TokenPool` and stay valid for the whole
/// lifetime of the pool. Two ids are equal iff their texts are equal, so
/// prefix and suffix comparisons never touch the token bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TokenId(usize);

/// The reserved boundary token.
///
/// Fills the prefix window before the first real token and terminates
/// generation once sampled. It is never returned by `TokenPool::intern`,
/// whatever text is interned.
pub const NON_WORD: TokenId = TokenId(0);

/// Text used when the sentinel has to be rendered (logs, panics).
const NON_WORD_TEXT: &str = "\n";

/// Multiplier of the polynomial string hash.
const HASH_MULTIPLIER: u32 = 31;

/// Polynomial hash of a single token.
///
/// `value` is `sum(b_i * 31^(len-1-i))` and `scale` is `31^len`, both
/// wrapping. Keeping the scale lets a prefix hash be combined token by token
/// with the same result as hashing the concatenated bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct TokenHash {
	value: u32,
	scale: u32,
}

impl TokenHash {
	fn of(text: &str) -> Self {
		let mut value: u32 = 0;
		let mut scale: u32 = 1;
		for b in text.bytes() {
			value = value.wrapping_mul(HASH_MULTIPLIER).wrapping_add(b as u32);
			scale = scale.wrapping_mul(HASH_MULTIPLIER);
		}
		Self { value, scale }
	}

	/// Appends this token to a running hash `h`.
	pub(crate) fn combine(self, h: u32) -> u32 {
		h.wrapping_mul(self.scale).wrapping_add(self.value)
	}
}

/// Interned string pool owning the text of every token seen by a model.
///
/// Tokens are never mutated or freed individually; they live as long as the
/// pool, which itself lives as long as the model. Each text is allocated
/// once and shared between the id-indexed list and the lookup map.
#[derive(Debug)]
pub struct TokenPool {
	texts: Vec<Arc<str>>,
	hashes: Vec<TokenHash>,
	ids: HashMap<Arc<str>, TokenId>,
}

impl TokenPool {
	/// Creates a pool containing only the sentinel.
	pub fn new() -> Self {
		Self {
			texts: vec![NON_WORD_TEXT.into()],
			hashes: vec![TokenHash::of(NON_WORD_TEXT)],
			ids: HashMap::new(),
		}
	}

	/// Returns the id of `text`, storing it first if it was never seen.
	pub fn intern(&mut self, text: &str) -> TokenId {
		if let Some(id) = self.ids.get(text) {
			return *id;
		}
		let id = TokenId(self.texts.len());
		let shared: Arc<str> = Arc::from(text);
		self.hashes.push(TokenHash::of(text));
		self.texts.push(Arc::clone(&shared));
		self.ids.insert(shared, id);
		id
	}

	/// Returns the id of an already interned token.
	pub fn get(&self, text: &str) -> Option<TokenId> {
		self.ids.get(text).copied()
	}

	/// Returns the text of a token.
	///
	/// The sentinel renders as a newline, which cannot appear inside a
	/// whitespace-delimited token.
	pub fn text(&self, id: TokenId) -> &str {
		&self.texts[id.0]
	}

	/// Returns the text of a real token, `None` for the sentinel.
	pub fn word(&self, id: TokenId) -> Option<&str> {
		if id == NON_WORD { None } else { Some(self.text(id)) }
	}

	/// Hash of a whole prefix, equal to the polynomial hash of the
	/// concatenated token bytes.
	pub(crate) fn prefix_hash(&self, prefix: &[TokenId]) -> u32 {
		prefix.iter().fold(0, |h, id| self.hashes[id.0].combine(h))
	}

	/// Number of distinct real tokens.
	pub fn len(&self) -> usize {
		self.texts.len() - 1
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for TokenPool {
	fn default() -> Self {
		Self::new()
	}
}
