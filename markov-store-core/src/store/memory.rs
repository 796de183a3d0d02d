use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{DocumentStore, StoreStats};
use crate::error::{MarkovError, MarkovResult};
use crate::model::triple::{Triple, TripleQuery, TripleRecord, WordRecord};

/// Hash indices over the word fields of stored triples.
///
/// Only point lookups are supported. Separators are not indexed: every
/// walker query constrains at least one word.
#[derive(Debug, Default)]
struct TripleIndex {
	w1: HashMap<String, HashSet<Triple>>,
	w2: HashMap<String, HashSet<Triple>>,
	w3: HashMap<String, HashSet<Triple>>,
}

impl TripleIndex {
	fn insert(&mut self, triple: &Triple) {
		self.w1.entry(triple.w1.clone()).or_default().insert(triple.clone());
		self.w2.entry(triple.w2.clone()).or_default().insert(triple.clone());
		self.w3.entry(triple.w3.clone()).or_default().insert(triple.clone());
	}

	fn remove(&mut self, triple: &Triple) {
		for (field, key) in [(&mut self.w1, &triple.w1), (&mut self.w2, &triple.w2), (&mut self.w3, &triple.w3)] {
			if let Some(set) = field.get_mut(key) {
				set.remove(triple);
				if set.is_empty() {
					field.remove(key);
				}
			}
		}
	}

	/// Returns the smallest indexed candidate set for `query`.
	///
	/// - `None`: no word constraint is set, a full scan is needed
	/// - `Some(empty)`: a constrained word is unknown, nothing can match
	fn candidates(&self, query: &TripleQuery) -> Option<Vec<&Triple>> {
		let mut smallest: Option<&HashSet<Triple>> = None;
		for (constraint, field) in [(query.w1, &self.w1), (query.w2, &self.w2), (query.w3, &self.w3)] {
			let Some(word) = constraint else {
				continue;
			};
			match field.get(word) {
				None => return Some(Vec::new()),
				Some(set) if smallest.is_none_or(|current| set.len() < current.len()) => smallest = Some(set),
				Some(_) => (),
			}
		}
		smallest.map(|set| set.iter().collect())
	}
}

/// Snapshot-able content of a `MemoryStore`.
#[derive(Serialize, Deserialize, Debug, Default)]
struct Collections {
	words: HashMap<String, i64>,
	triples: HashMap<Triple, TripleRecord>,
	#[serde(skip)]
	index: TripleIndex,
}

impl Collections {
	fn rebuild_index(&mut self) {
		let mut index = TripleIndex::default();
		for triple in self.triples.keys() {
			index.insert(triple);
		}
		self.index = index;
	}
}

/// Thread-safe in-process `DocumentStore`.
///
/// Every trait method runs under a single lock acquisition, which makes it
/// atomic with respect to the other methods.
///
/// The content can be persisted with `save` and restored with `load` or
/// `open` (compact `postcard` encoding). Indices are rebuilt on load.
#[derive(Debug, Default)]
pub struct MemoryStore {
	collections: RwLock<Collections>,
}

impl MemoryStore {
	/// Returns an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a store from a snapshot if the file exists, otherwise returns an
	/// empty store (which will be written on the first `save`).
	pub fn open<P: AsRef<Path>>(path: P) -> MarkovResult<Self> {
		if path.as_ref().exists() {
			Self::load(path)
		} else {
			info!("No snapshot at {}, starting empty", path.as_ref().display());
			Ok(Self::new())
		}
	}

	/// Loads a store from a snapshot file.
	pub fn load<P: AsRef<Path>>(path: P) -> MarkovResult<Self> {
		let bytes = std::fs::read(&path)?;
		let mut collections: Collections = postcard::from_bytes(&bytes)?;
		collections.rebuild_index();
		info!(
			"Loaded snapshot {} ({} words, {} triples)",
			path.as_ref().display(),
			collections.words.len(),
			collections.triples.len()
		);
		Ok(Self { collections: RwLock::new(collections) })
	}

	/// Writes the whole store to a snapshot file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> MarkovResult<()> {
		let bytes = {
			let collections = self.read()?;
			postcard::to_stdvec(&*collections)?
		};
		std::fs::write(&path, bytes)?;
		info!("Saved snapshot {}", path.as_ref().display());
		Ok(())
	}

	fn read(&self) -> MarkovResult<RwLockReadGuard<'_, Collections>> {
		self.collections.read().map_err(|_| MarkovError::Store("Store lock poisoned".to_owned()))
	}

	fn write(&self) -> MarkovResult<RwLockWriteGuard<'_, Collections>> {
		self.collections.write().map_err(|_| MarkovError::Store("Store lock poisoned".to_owned()))
	}
}

impl DocumentStore for MemoryStore {
	fn increment_word(&self, word: &str) -> MarkovResult<i64> {
		let mut collections = self.write()?;
		let count = collections.words.entry(word.to_owned()).or_insert(0);
		*count += 1;
		Ok(*count)
	}

	fn decrement_word(&self, word: &str) -> MarkovResult<Option<i64>> {
		let mut collections = self.write()?;
		Ok(collections.words.get_mut(word).map(|count| {
			*count -= 1;
			*count
		}))
	}

	fn remove_word_if_depleted(&self, word: &str) -> MarkovResult<bool> {
		let mut collections = self.write()?;
		let depleted = collections.words.get(word).is_some_and(|count| *count < 1);
		if depleted {
			collections.words.remove(word);
		}
		Ok(depleted)
	}

	fn get_word(&self, word: &str) -> MarkovResult<Option<WordRecord>> {
		let collections = self.read()?;
		Ok(collections.words.get(word).map(|count| WordRecord { word: word.to_owned(), count: *count }))
	}

	fn least_common(&self, words: &[String], limit: usize) -> MarkovResult<Vec<WordRecord>> {
		let collections = self.read()?;
		let unique: HashSet<&String> = words.iter().collect();
		let mut records: Vec<WordRecord> = unique
			.into_iter()
			.filter_map(|word| {
				collections.words.get(word).map(|count| WordRecord { word: word.clone(), count: *count })
			})
			.collect();

		records.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.word.cmp(&b.word)));
		records.truncate(limit);
		Ok(records)
	}

	fn increment_triple(&self, triple: &Triple, tag: Option<&str>) -> MarkovResult<TripleRecord> {
		let mut collections = self.write()?;
		let Collections { triples, index, .. } = &mut *collections;

		let record = triples.entry(triple.clone()).or_insert_with(|| {
			index.insert(triple);
			TripleRecord::new(triple.clone())
		});

		record.count += 1;
		if let Some(tag) = tag {
			*record.tags.entry(tag.to_owned()).or_insert(0) += 1;
		}
		Ok(record.clone())
	}

	fn decrement_triple(&self, triple: &Triple, tag: Option<&str>) -> MarkovResult<Option<TripleRecord>> {
		let mut collections = self.write()?;
		let Some(record) = collections.triples.get_mut(triple) else {
			return Ok(None);
		};

		record.count -= 1;
		if let Some(sub_count) = tag.and_then(|tag| record.tags.get_mut(tag)) {
			*sub_count -= 1;
		}
		Ok(Some(record.clone()))
	}

	fn remove_triple_if_depleted(&self, triple: &Triple) -> MarkovResult<bool> {
		let mut collections = self.write()?;
		let depleted = collections.triples.get(triple).is_some_and(|record| record.count < 1);
		if depleted {
			collections.triples.remove(triple);
			collections.index.remove(triple);
		}
		Ok(depleted)
	}

	fn prune_tag(&self, triple: &Triple, tag: &str) -> MarkovResult<bool> {
		let mut collections = self.write()?;
		let Some(record) = collections.triples.get_mut(triple) else {
			return Ok(false);
		};
		let depleted = record.tags.get(tag).is_some_and(|sub_count| *sub_count < 1);
		if depleted {
			record.tags.remove(tag);
		}
		Ok(depleted)
	}

	fn get_triple(&self, triple: &Triple) -> MarkovResult<Option<TripleRecord>> {
		let collections = self.read()?;
		Ok(collections.triples.get(triple).cloned())
	}

	fn find_triples(&self, query: &TripleQuery) -> MarkovResult<Vec<TripleRecord>> {
		let collections = self.read()?;

		let mut records: Vec<TripleRecord> = match collections.index.candidates(query) {
			Some(candidates) => candidates
				.into_iter()
				.filter_map(|triple| collections.triples.get(triple))
				.filter(|record| query.matches(record))
				.cloned()
				.collect(),
			None => collections.triples.values().filter(|record| query.matches(record)).cloned().collect(),
		};

		// Hash order is not stable across runs
		records.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.triple.cmp(&b.triple)));
		Ok(records)
	}

	fn stats(&self) -> MarkovResult<StoreStats> {
		let collections = self.read()?;
		Ok(StoreStats { words: collections.words.len(), triples: collections.triples.len() })
	}
}
