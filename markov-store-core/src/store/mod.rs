//! Document store collaborator.
//!
//! The Markov model never keeps triples in memory: every insertion,
//! deletion and lookup goes through a [`DocumentStore`]. Implementations must
//! make each method an atomic single-document operation; the model performs
//! no locking of its own.

use crate::error::MarkovResult;
use crate::model::triple::{Triple, TripleQuery, TripleRecord, WordRecord};

/// In-process store, optionally persisted as a snapshot file.
pub mod memory;

/// Number of records held by a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
	pub words: usize,
	pub triples: usize,
}

/// Operations the Markov model needs from its backing store.
///
/// Two logical collections are involved:
/// - `words`: `{word, count}`, unique on `word`
/// - `triples`: `{w1, p1, w2, p2, w3, count, tags}`, unique on the five fields
pub trait DocumentStore: Send + Sync {
	/// Adds 1 to the count of `word`, creating the record if absent.
	///
	/// Returns the count after the update.
	fn increment_word(&self, word: &str) -> MarkovResult<i64>;

	/// Subtracts 1 from the count of `word`.
	///
	/// Returns the count after the update, `None` if the word is unknown
	/// (no record is created).
	fn decrement_word(&self, word: &str) -> MarkovResult<Option<i64>>;

	/// Deletes the record of `word` if its count is below 1.
	fn remove_word_if_depleted(&self, word: &str) -> MarkovResult<bool>;

	fn get_word(&self, word: &str) -> MarkovResult<Option<WordRecord>>;

	/// Returns up to `limit` known records among `words`, ascending by count.
	///
	/// Duplicated and unknown words are ignored.
	fn least_common(&self, words: &[String], limit: usize) -> MarkovResult<Vec<WordRecord>>;

	/// Adds 1 to the count of `triple`, creating it with empty tags if absent.
	///
	/// If `tag` is set, its sub-count is incremented in the same atomic update
	/// (created at 1 if absent). Returns the record after the update.
	fn increment_triple(&self, triple: &Triple, tag: Option<&str>) -> MarkovResult<TripleRecord>;

	/// Subtracts 1 from the count of `triple`.
	///
	/// If `tag` is set and present on the record, its sub-count is decremented
	/// in the same atomic update. Returns the record after the update, `None`
	/// if the triple is unknown (no record is created).
	fn decrement_triple(&self, triple: &Triple, tag: Option<&str>) -> MarkovResult<Option<TripleRecord>>;

	/// Deletes `triple` (tags included) if its count is below 1.
	fn remove_triple_if_depleted(&self, triple: &Triple) -> MarkovResult<bool>;

	/// Removes the `tag` entry of `triple` if its sub-count is below 1.
	fn prune_tag(&self, triple: &Triple, tag: &str) -> MarkovResult<bool>;

	fn get_triple(&self, triple: &Triple) -> MarkovResult<Option<TripleRecord>>;

	/// Returns every record matching `query`, ascending by count.
	fn find_triples(&self, query: &TripleQuery) -> MarkovResult<Vec<TripleRecord>>;

	fn stats(&self) -> MarkovResult<StoreStats>;
}
