use super::markov_model::MarkovModel;
use super::prefix::Prefix;
use super::random::RandomSource;
use super::sampling::pick_uniform;
use super::token::NON_WORD;

/// Lazy token generation over a `MarkovModel`.
///
/// Yields, in order:
/// 1. the real tokens of the starting prefix (sentinel slots are skipped),
/// 2. up to `max_tokens` sampled tokens.
///
/// Each step looks up the state of the current window, picks one suffix
/// uniformly over its occurrences (one draw per occurrence), and stops for
/// good when that suffix is the sentinel. The sentinel is never yielded.
///
/// # Panics
/// `next` panics if the current window has no state, or a state without
/// suffixes. A model produced by `Builder::finish` always has a non-empty
/// state for every window reachable from its own starting prefix.
pub struct Generator<'m, 'r, R: ?Sized> {
	model: &'m MarkovModel,
	rng: &'r mut R,
	window: Prefix,
	/// Next slot of the starting prefix to yield.
	leading: usize,
	/// Tokens that may still be sampled.
	remaining: usize,
	finished: bool,
}

impl<'m, 'r, R: RandomSource + ?Sized> Generator<'m, 'r, R> {
	pub(crate) fn new(model: &'m MarkovModel, start: Prefix, max_tokens: usize, rng: &'r mut R) -> Self {
		Self {
			model,
			rng,
			window: start,
			leading: 0,
			remaining: max_tokens,
			finished: false,
		}
	}

	/// Current window, i.e. the last `order` tokens.
	pub fn window(&self) -> &Prefix {
		&self.window
	}

	/// True once the sentinel was sampled.
	pub fn terminated(&self) -> bool {
		self.finished
	}
}

impl<'m, 'r, R: RandomSource + ?Sized> Iterator for Generator<'m, 'r, R> {
	type Item = &'m str;

	fn next(&mut self) -> Option<&'m str> {
		let model = self.model;
		while self.leading < self.window.order() {
			let id = self.window.as_slice()[self.leading];
			self.leading += 1;
			if let Some(word) = model.word(id) {
				return Some(word);
			}
		}

		if self.finished || self.remaining == 0 {
			return None;
		}
		self.remaining -= 1;

		let state = match model.lookup(&self.window) {
			Some(state) => state,
			None => panic!("no state recorded for prefix {}", model.describe(&self.window)),
		};

		match pick_uniform(model.state_suffixes(state), &mut *self.rng) {
			Some(NON_WORD) => {
				log::debug!("generation reached the terminator");
				self.finished = true;
				None
			}
			Some(id) => {
				self.window.advance(id);
				Some(model.text(id))
			}
			None => panic!("state for prefix {} has no suffix", model.describe(&self.window)),
		}
	}
}
