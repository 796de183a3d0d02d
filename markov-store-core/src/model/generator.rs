use rand::Rng;
use tracing::warn;

use super::markov_model::MarkovModel;
use super::triple::{Triple, TripleQuery};
use super::walker::pick_random;
use crate::error::MarkovResult;
use crate::store::DocumentStore;

/// Direction of a random walk over the triples.
///
/// Tokens are accumulated in walk order: a backward walk stores them
/// right to left and is reversed once finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
	Forwards,
	Backwards,
}

impl Direction {
	/// Query for the first triple: `w1 = word` forwards, `w3 = word` backwards.
	fn seed<'a>(self, word: &'a str, tag: Option<&'a str>) -> TripleQuery<'a> {
		match self {
			Direction::Forwards => TripleQuery::new().w1(word).tag(tag),
			Direction::Backwards => TripleQuery::new().w3(word).tag(tag),
		}
	}

	/// The five tokens of `triple` in walk order.
	fn window(self, triple: Triple) -> [String; 5] {
		let Triple { w1, p1, w2, p2, w3 } = triple;
		match self {
			Direction::Forwards => [w1, p1, w2, p2, w3],
			Direction::Backwards => [w3, p2, w2, p1, w1],
		}
	}

	/// Query for the triple continuing the last three tokens (`tail`).
	fn continuation<'a>(self, tail: &'a [String], tag: Option<&'a str>) -> TripleQuery<'a> {
		let query = match self {
			Direction::Forwards => TripleQuery::new().w1(&tail[0]).p1(&tail[1]),
			Direction::Backwards => TripleQuery::new().w3(&tail[0]).p2(&tail[1]),
		};
		query.w2(&tail[2]).tag(tag)
	}

	/// The two tokens a continuation triple adds.
	fn extension(self, triple: Triple) -> [String; 2] {
		match self {
			Direction::Forwards => [triple.p2, triple.w3],
			Direction::Backwards => [triple.p1, triple.w1],
		}
	}
}

impl<S: DocumentStore> MarkovModel<S> {
	/// Walks the chain from `seed` until an empty boundary word is drawn.
	///
	/// Returns the tokens in walk order, `None` if no triple matches the seed.
	///
	/// # Notes
	/// - A missing continuation (records deleted while walking) ends the walk.
	/// - The walk also ends after `max_steps` continuations.
	fn walk<R: Rng>(&self, direction: Direction, seed: &str, tag: Option<&str>, rng: &mut R) -> MarkovResult<Option<Vec<String>>> {
		let Some(first) = pick_random(&self.store, &direction.seed(seed, tag), rng)? else {
			return Ok(None);
		};

		let mut tokens = direction.window(first.triple).to_vec();
		let mut steps = 0;

		while tokens.last().is_some_and(|word| !word.is_empty()) {
			if steps >= self.config.max_steps() {
				warn!("Walk stopped after {} steps (seed: {:?}, tag: {:?})", steps, seed, tag);
				break;
			}
			steps += 1;

			let tail = &tokens[tokens.len() - 3..];
			let query = direction.continuation(tail, tag);
			match pick_random(&self.store, &query, rng)? {
				Some(next) => tokens.extend(direction.extension(next.triple)),
				None => {
					warn!("No continuation for {:?} (tag: {:?}), walk truncated", tail, tag);
					break;
				}
			}
		}

		Ok(Some(tokens))
	}

	/// Generates a text starting with the word `start` (`""` = start of text).
	///
	/// Returns `None` if no triple has `w1 = start` (empty corpus, unknown
	/// word, or nothing tagged with `tag`).
	pub fn generate_forwards<R: Rng>(&self, start: &str, tag: Option<&str>, rng: &mut R) -> MarkovResult<Option<String>> {
		let tokens = self.walk(Direction::Forwards, start, tag, rng)?;
		Ok(tokens.map(|tokens| tokens.concat()))
	}

	/// Generates a text ending with the word `end` (`""` = end of text).
	///
	/// Returns `None` if no triple has `w3 = end`.
	pub fn generate_backwards<R: Rng>(&self, end: &str, tag: Option<&str>, rng: &mut R) -> MarkovResult<Option<String>> {
		let tokens = self.walk(Direction::Backwards, end, tag, rng)?;
		Ok(tokens.map(|tokens| tokens.into_iter().rev().collect()))
	}

	/// Generates a text around the word `mid`.
	///
	/// The backward walk ending at `mid` is joined with the forward walk
	/// starting at `mid`, the latter without its leading `mid`.
	///
	/// - no backward walk: the text starts right after `mid`
	/// - no forward walk: the text ends with the backward walk
	///
	/// Returns `None` only if both sides are empty.
	pub fn generate_from_mid<R: Rng>(&self, mid: &str, tag: Option<&str>, rng: &mut R) -> MarkovResult<Option<String>> {
		let left = self.generate_backwards(mid, tag, rng)?.unwrap_or_default();
		let right = match self.generate_forwards(mid, tag, rng)? {
			Some(text) => text.get(mid.len()..).unwrap_or_default().to_owned(),
			None => String::new(),
		};

		if left.is_empty() && right.is_empty() {
			Ok(None)
		} else {
			Ok(Some(left + &right))
		}
	}

	/// Generates up to `limit` texts seeded by the rarest words of `text`.
	///
	/// Slot `i` uses the `i`-th least common word of `text` as midpoint; once
	/// the known words run out, the remaining slots generate from the start of
	/// text. Slots yielding nothing are skipped.
	///
	/// The least common words are looked up now; the texts are generated
	/// lazily while iterating. Each call draws new texts.
	pub fn generate_multiple_from_least_common<'m, 'r, R: Rng>(
		&'m self,
		text: &str,
		limit: usize,
		tag: Option<&str>,
		rng: &'r mut R,
	) -> MarkovResult<LeastCommonGenerations<'m, 'r, S, R>> {
		let seeds = self.least_common_words(text, limit)?;
		Ok(LeastCommonGenerations {
			model: self,
			rng,
			seeds: seeds.into_iter(),
			remaining: limit,
			tag: tag.map(str::to_owned),
			failed: false,
		})
	}
}

/// Lazy sequence of texts returned by `generate_multiple_from_least_common`.
///
/// Yields at most `limit` items. A store error is yielded once, then the
/// sequence ends.
pub struct LeastCommonGenerations<'m, 'r, S, R> {
	model: &'m MarkovModel<S>,
	rng: &'r mut R,
	seeds: std::vec::IntoIter<String>,
	remaining: usize,
	tag: Option<String>,
	failed: bool,
}

impl<S: DocumentStore, R: Rng> Iterator for LeastCommonGenerations<'_, '_, S, R> {
	type Item = MarkovResult<String>;

	fn next(&mut self) -> Option<Self::Item> {
		while self.remaining > 0 && !self.failed {
			self.remaining -= 1;

			let tag = self.tag.as_deref();
			let generated = match self.seeds.next() {
				Some(seed) => self.model.generate_from_mid(&seed, tag, self.rng),
				None => self.model.generate_forwards("", tag, self.rng),
			};

			match generated {
				Ok(Some(text)) => return Some(Ok(text)),
				Ok(None) => continue,
				Err(e) => {
					self.failed = true;
					return Some(Err(e));
				}
			}
		}
		None
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, Some(if self.failed { 0 } else { self.remaining }))
	}
}
