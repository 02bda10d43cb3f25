use super::random::RandomSource;

/// One-item reservoir over a stream of unknown length.
///
/// The k-th offered item replaces the current choice with probability 1/k
/// (one draw in `[0, k)`, hit on 0). After any number of offers the choice is
/// uniform over everything offered, without counting or storing the stream.
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
	seen: usize,
	chosen: Option<T>,
}

impl<T> Reservoir<T> {
	pub fn new() -> Self {
		Self { seen: 0, chosen: None }
	}

	/// Offers `item`. Returns true if it became the current choice.
	pub fn offer<R: RandomSource + ?Sized>(&mut self, rng: &mut R, item: T) -> bool {
		self.offer_with(rng, || item)
	}

	/// Like `offer`, but only builds the item when it is kept.
	pub fn offer_with<R, F>(&mut self, rng: &mut R, make: F) -> bool
	where
		R: RandomSource + ?Sized,
		F: FnOnce() -> T,
	{
		self.seen += 1;
		if rng.below(self.seen) == 0 {
			self.chosen = Some(make());
			return true;
		}
		false
	}

	/// Number of items offered so far.
	pub fn seen(&self) -> usize {
		self.seen
	}

	pub fn chosen(&self) -> Option<&T> {
		self.chosen.as_ref()
	}

	pub fn into_chosen(self) -> Option<T> {
		self.chosen
	}
}

impl<T> Default for Reservoir<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Picks one item uniformly from `items` in a single pass.
///
/// Draws exactly one random number per item. Returns `None` for an empty
/// stream.
pub fn pick_uniform<I, R>(items: I, rng: &mut R) -> Option<I::Item>
where
	I: IntoIterator,
	R: RandomSource + ?Sized,
{
	let mut reservoir = Reservoir::new();
	for item in items {
		reservoir.offer(rng, item);
	}
	reservoir.into_chosen()
}
