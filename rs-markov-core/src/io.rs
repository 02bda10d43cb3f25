use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::model::config::{ChainConfig, Overflow};

/// Opens the training input: a file when a path is given, stdin otherwise.
pub fn open_input<P: AsRef<Path>>(path: Option<P>) -> io::Result<Box<dyn BufRead>> {
	match path {
		Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
		None => Ok(Box::new(io::stdin().lock())),
	}
}

/// Whitespace as understood by C's `isspace` in the "C" locale.
fn is_space(b: u8) -> bool {
	matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

/// Length of the longest prefix of `bytes` that does not end inside a UTF-8
/// sequence.
///
/// Returns 0 when `bytes` is the beginning of a single character still
/// waiting for its continuation bytes. Invalid sequences are never held back.
fn complete_len(bytes: &[u8]) -> usize {
	let len = bytes.len();
	for back in 1..=len.min(4) {
		let b = bytes[len - back];
		if b & 0xC0 == 0x80 {
			continue;
		}
		let width = match b {
			0xC0..=0xDF => 2,
			0xE0..=0xEF => 3,
			0xF0..=0xF7 => 4,
			_ => 1,
		};
		return if width > back { len - back } else { len };
	}
	len
}

/// Streams whitespace-delimited tokens from arbitrary bytes.
///
/// - Words are separated by ASCII whitespace; runs of whitespace yield nothing.
/// - Each token is decoded as UTF-8, invalid sequences being replaced by U+FFFD.
/// - A word reaching the configured limit is split or truncated (see
///   `Overflow`) as soon as the limit is hit, never inside a UTF-8 character.
///   A character wider than the limit is kept whole.
///
/// At most `max_token_len + 3` bytes are buffered, whatever the word length.
/// Read errors are yielded once and do not end the stream by themselves.
pub struct WhitespaceTokens<R> {
	reader: R,
	max_len: usize,
	overflow: Overflow,
	/// Start of the next piece of a split word.
	carry: Vec<u8>,
	/// Discarding the rest of a truncated word.
	skipping: bool,
}

impl<R: BufRead> WhitespaceTokens<R> {
	pub fn new(reader: R, config: &ChainConfig) -> Self {
		Self {
			reader,
			max_len: config.max_token_len(),
			overflow: config.overflow,
			carry: Vec::new(),
			skipping: false,
		}
	}

	/// Reads the bytes of the next token, `None` at end of input.
	fn read_piece(&mut self) -> io::Result<Option<Vec<u8>>> {
		let mut word = std::mem::take(&mut self.carry);
		loop {
			let buf = match self.reader.fill_buf() {
				Ok(buf) => buf,
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e),
			};
			if buf.is_empty() {
				self.skipping = false;
				return Ok(if word.is_empty() { None } else { Some(word) });
			}

			let mut consumed = 0;
			let mut piece = None;
			for &b in buf {
				consumed += 1;
				if is_space(b) {
					self.skipping = false;
					if !word.is_empty() {
						piece = Some(std::mem::take(&mut word));
						break;
					}
				} else if !self.skipping {
					word.push(b);
					if word.len() < self.max_len {
						continue;
					}
					let cut = complete_len(&word);
					if cut == 0 {
						continue;
					}
					let tail = word.split_off(cut);
					match self.overflow {
						Overflow::Split => self.carry = tail,
						Overflow::Truncate => self.skipping = true,
					}
					log::trace!("token cut at {} bytes ({:?})", cut, self.overflow);
					piece = Some(std::mem::take(&mut word));
					break;
				}
			}
			self.reader.consume(consumed);
			if piece.is_some() {
				return Ok(piece);
			}
		}
	}
}

impl<R: BufRead> Iterator for WhitespaceTokens<R> {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.read_piece() {
			Ok(Some(bytes)) => Some(Ok(String::from_utf8_lossy(&bytes).into_owned())),
			Ok(None) => None,
			Err(e) => Some(Err(e)),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Read;

	use super::*;

	fn tokens(input: &[u8], config: &ChainConfig) -> Vec<String> {
		WhitespaceTokens::new(input, config)
			.collect::<io::Result<Vec<_>>>()
			.unwrap()
	}

	fn config(max_token_len: usize, overflow: Overflow) -> ChainConfig {
		let mut config = ChainConfig::default();
		config.set_max_token_len(max_token_len).unwrap();
		config.overflow = overflow;
		config
	}

	#[test]
	fn splits_on_any_whitespace() {
		let words = tokens(b"  The cat\tsat.\r\n\nThe\x0bdog\x0cran.  ", &ChainConfig::default());
		assert_eq!(words, vec!["The", "cat", "sat.", "The", "dog", "ran."]);
	}

	#[test]
	fn empty_and_blank_input() {
		assert!(tokens(b"", &ChainConfig::default()).is_empty());
		assert!(tokens(b" \n\t ", &ChainConfig::default()).is_empty());
	}

	#[test]
	fn words_across_buffer_refills() {
		let text = "alpha beta gamma delta ".repeat(50);
		let reader = BufReader::with_capacity(7, text.as_bytes());
		let words: Vec<String> = WhitespaceTokens::new(reader, &ChainConfig::default())
			.collect::<io::Result<_>>()
			.unwrap();
		assert_eq!(words.len(), 200);
		assert_eq!(&words[..4], &["alpha", "beta", "gamma", "delta"]);
	}

	#[test]
	fn oversized_word_is_split() {
		let words = tokens(b"abcdefgh ij", &config(3, Overflow::Split));
		assert_eq!(words, vec!["abc", "def", "gh", "ij"]);
	}

	#[test]
	fn oversized_word_is_truncated() {
		let words = tokens(b"abcdefgh ij", &config(3, Overflow::Truncate));
		assert_eq!(words, vec!["abc", "ij"]);
	}

	#[test]
	fn endless_word_is_cut_without_buffering_it() {
		struct Counting<R> {
			inner: R,
			read: usize,
		}
		impl<R: io::Read> io::Read for Counting<R> {
			fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
				let n = self.inner.read(buf)?;
				self.read += n;
				Ok(n)
			}
		}

		for overflow in [Overflow::Truncate, Overflow::Split] {
			let reader = BufReader::with_capacity(16, Counting { inner: io::repeat(b'a'), read: 0 });
			let mut tokens = WhitespaceTokens::new(reader, &config(3, overflow));
			assert_eq!(tokens.next().unwrap().unwrap(), "aaa");
			assert!(tokens.carry.len() < 3);
			assert_eq!(tokens.reader.get_ref().read, 16);
		}

		let reader = BufReader::new(io::repeat(b'a'));
		let pieces: Vec<String> = WhitespaceTokens::new(reader, &config(3, Overflow::Split))
			.take(1000)
			.collect::<io::Result<_>>()
			.unwrap();
		assert!(pieces.iter().all(|p| p == "aaa"));
	}

	#[test]
	fn long_truncated_word_is_skipped() {
		let input = io::repeat(b'a').take(1 << 20).chain(&b" bb"[..]);
		let mut tokens = WhitespaceTokens::new(BufReader::new(input), &config(3, Overflow::Truncate));
		assert_eq!(tokens.next().unwrap().unwrap(), "aaa");
		assert!(tokens.carry.is_empty());
		assert_eq!(tokens.next().unwrap().unwrap(), "bb");
		assert!(tokens.next().is_none());
	}

	#[test]
	fn exact_length_word_is_not_followed_by_an_empty_piece() {
		let words = tokens(b"abc de", &config(3, Overflow::Split));
		assert_eq!(words, vec!["abc", "de"]);
		let words = tokens(b"abc de", &config(3, Overflow::Truncate));
		assert_eq!(words, vec!["abc", "de"]);
	}

	#[test]
	fn split_carries_a_partial_character() {
		// "é" starts at byte 2 and would end at byte 4, past the limit of 3.
		let words = tokens("abé".as_bytes(), &config(3, Overflow::Split));
		assert_eq!(words, vec!["ab", "é"]);
		let words = tokens("abé x".as_bytes(), &config(3, Overflow::Truncate));
		assert_eq!(words, vec!["ab", "x"]);
	}

	#[test]
	fn cuts_respect_utf8() {
		// "é" is two bytes: a 3-byte limit cannot take "aé" plus the next "é".
		let words = tokens("aéé".as_bytes(), &config(3, Overflow::Split));
		assert_eq!(words, vec!["aé", "é"]);

		// A character wider than the limit is kept whole.
		let words = tokens("€x".as_bytes(), &config(1, Overflow::Split));
		assert_eq!(words, vec!["€", "x"]);
	}

	#[test]
	fn invalid_bytes_are_replaced() {
		let words = tokens(b"ok \xff\xfe bad", &ChainConfig::default());
		assert_eq!(words, vec!["ok".to_owned(), "\u{fffd}\u{fffd}".to_owned(), "bad".to_owned()]);
	}
}
