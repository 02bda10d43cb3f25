use serde::Serialize;

/// Default number of tokens in a prefix.
pub const DEFAULT_ORDER: usize = 2;

/// Default maximum token length, in bytes.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 99;

/// What the token reader does with a word longer than `max_token_len`.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
	/// Cut the word into successive tokens of at most `max_token_len` bytes.
	#[default]
	Split,
	/// Keep the first `max_token_len` bytes and drop the rest of the word.
	Truncate,
}

/// Build-time parameters of a chain.
///
/// # Invariants
/// - `order >= 1`
/// - `max_token_len >= 1`
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChainConfig {
	/// Number of tokens in a prefix.
	order: usize,

	/// Maximum token length in bytes.
	max_token_len: usize,

	/// Policy for oversized words.
	pub overflow: Overflow,
}

impl ChainConfig {
	/// Creates a configuration of the given order with default token limits.
	///
	/// # Errors
	/// Returns an error if `order` is 0.
	pub fn new(order: usize) -> Result<Self, String> {
		let mut config = Self::default();
		config.set_order(order)?;
		Ok(config)
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn max_token_len(&self) -> usize {
		self.max_token_len
	}

	/// Sets the prefix length.
	///
	/// # Errors
	/// Returns an error if `order` is 0.
	pub fn set_order(&mut self, order: usize) -> Result<(), String> {
		if order < 1 {
			return Err("Order must be >= 1".to_owned());
		}
		self.order = order;
		Ok(())
	}

	/// Sets the maximum token length in bytes.
	///
	/// # Errors
	/// Returns an error if `max_token_len` is 0.
	pub fn set_max_token_len(&mut self, max_token_len: usize) -> Result<(), String> {
		if max_token_len < 1 {
			return Err("Maximum token length must be >= 1".to_owned());
		}
		self.max_token_len = max_token_len;
		Ok(())
	}
}

impl Default for ChainConfig {
	fn default() -> Self {
		Self {
			order: DEFAULT_ORDER,
			max_token_len: DEFAULT_MAX_TOKEN_LEN,
			overflow: Overflow::Split,
		}
	}
}
