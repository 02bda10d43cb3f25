use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed integers.
///
/// Build and generation draw all their randomness from one explicitly passed
/// source, so swapping it for a `ScriptedRandom` makes both fully
/// reproducible.
pub trait RandomSource {
	/// Returns an integer uniformly distributed in `[0, bound)`.
	///
	/// `bound` is always >= 1.
	fn below(&mut self, bound: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
	fn below(&mut self, bound: usize) -> usize {
		(**self).below(bound)
	}
}

/// Pseudo-random source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
	rng: StdRng,
	seed: u64,
}

impl SeededRandom {
	/// Creates a reproducible source.
	pub fn from_seed(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed), seed }
	}

	/// Creates a source seeded with the wall clock, in milliseconds.
	///
	/// Successive runs started within the same second still get distinct
	/// seeds.
	pub fn from_time() -> Self {
		let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
		let seed = now.as_secs().wrapping_mul(1000).wrapping_add(now.subsec_millis() as u64);
		log::debug!("seeding random source from time: {seed}");
		Self::from_seed(seed)
	}

	/// The seed this source was created with.
	pub fn seed(&self) -> u64 {
		self.seed
	}
}

impl RandomSource for SeededRandom {
	fn below(&mut self, bound: usize) -> usize {
		self.rng.random_range(0..bound)
	}
}

/// Source replaying a fixed sequence of draws.
///
/// Each draw is reduced modulo the requested bound, so a draw of 0 is always
/// a "hit" for reservoir sampling.
///
/// # Panics
/// `below` panics once the script is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
	draws: VecDeque<usize>,
	consumed: usize,
}

impl ScriptedRandom {
	pub fn new<I: IntoIterator<Item = usize>>(draws: I) -> Self {
		Self { draws: draws.into_iter().collect(), consumed: 0 }
	}

	/// Number of draws taken so far.
	pub fn consumed(&self) -> usize {
		self.consumed
	}

	/// Number of draws left.
	pub fn remaining(&self) -> usize {
		self.draws.len()
	}
}

impl RandomSource for ScriptedRandom {
	fn below(&mut self, bound: usize) -> usize {
		let draw = match self.draws.pop_front() {
			Some(draw) => draw,
			None => panic!("scripted random source exhausted after {} draws", self.consumed),
		};
		self.consumed += 1;
		draw % bound
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scripted_draws_are_reduced() {
		let mut rng = ScriptedRandom::new([7, 3, 0]);
		assert_eq!(rng.below(1), 0);
		assert_eq!(rng.below(2), 1);
		assert_eq!(rng.below(5), 0);
		assert_eq!(rng.consumed(), 3);
		assert_eq!(rng.remaining(), 0);
	}

	#[test]
	#[should_panic(expected = "exhausted")]
	fn scripted_source_panics_when_empty() {
		let mut rng = ScriptedRandom::new([]);
		rng.below(3);
	}

	#[test]
	fn seeded_source_is_reproducible_and_bounded() {
		let mut a = SeededRandom::from_seed(1234);
		let mut b = SeededRandom::from_seed(1234);
		for bound in 1..200 {
			let x = a.below(bound);
			assert!(x < bound);
			assert_eq!(x, b.below(bound));
		}
		assert_eq!(a.seed(), 1234);
	}

	#[test]
	fn mutable_reference_is_a_source() {
		fn draw<R: RandomSource>(mut rng: R) -> usize {
			rng.below(10)
		}
		let mut rng = ScriptedRandom::new([4]);
		assert_eq!(draw(&mut rng), 4);
		assert_eq!(rng.consumed(), 1);
	}
}
