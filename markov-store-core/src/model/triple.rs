use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A 5-token window `(w1, p1, w2, p2, w3)` over tokenized text.
///
/// `w1`, `w2` and `w3` are words, `p1` and `p2` the separators between them.
/// An empty word is the boundary token marking the start or end of a text.
///
/// Identity is the exact equality of all five fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
	pub w1: String,
	pub p1: String,
	pub w2: String,
	pub p2: String,
	pub w3: String,
}

impl Triple {
	pub fn new(w1: &str, p1: &str, w2: &str, p2: &str, w3: &str) -> Self {
		Self {
			w1: w1.to_owned(),
			p1: p1.to_owned(),
			w2: w2.to_owned(),
			p2: p2.to_owned(),
			w3: w3.to_owned(),
		}
	}

	/// Builds a triple from a 5-token slice.
	///
	/// Returns `None` if the slice does not hold exactly five tokens.
	pub fn from_window(window: &[&str]) -> Option<Self> {
		match window {
			[w1, p1, w2, p2, w3] => Some(Self::new(w1, p1, w2, p2, w3)),
			_ => None,
		}
	}
}

/// Persisted state of a triple.
///
/// ## Invariants
/// - `count >= 1` for every stored record (depleted records are removed)
/// - every tag sub-count is `>= 1` while present
/// - tag sub-counts do not have to sum to `count`: untagged insertions only
///   bump `count`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TripleRecord {
	pub triple: Triple,
	pub count: i64,
	pub tags: BTreeMap<String, i64>,
}

impl TripleRecord {
	/// Empty record, only valid until the store applies its first increment.
	pub(crate) fn new(triple: Triple) -> Self {
		Self { triple, count: 0, tags: BTreeMap::new() }
	}

	/// Sub-count of `tag`, `None` if the record was never tagged with it.
	pub fn tag_count(&self, tag: &str) -> Option<i64> {
		self.tags.get(tag).copied()
	}

	/// Weight of this record in a random draw.
	///
	/// - untagged draws use the global `count`
	/// - tagged draws use the tag sub-count (0 when the tag is missing)
	pub fn weight(&self, tag: Option<&str>) -> i64 {
		match tag {
			None => self.count,
			Some(tag) => self.tag_count(tag).unwrap_or(0),
		}
	}
}

/// Persisted frequency of a word seen in the middle (`w2`) position.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
	pub word: String,
	pub count: i64,
}

/// Partial-match constraints used to look up candidate triples.
///
/// Unset fields match anything. When `tag` is set, only records that carry
/// an entry for that tag match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TripleQuery<'a> {
	pub w1: Option<&'a str>,
	pub p1: Option<&'a str>,
	pub w2: Option<&'a str>,
	pub p2: Option<&'a str>,
	pub w3: Option<&'a str>,
	pub tag: Option<&'a str>,
}

impl<'a> TripleQuery<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn w1(mut self, w1: &'a str) -> Self {
		self.w1 = Some(w1);
		self
	}

	pub fn p1(mut self, p1: &'a str) -> Self {
		self.p1 = Some(p1);
		self
	}

	pub fn w2(mut self, w2: &'a str) -> Self {
		self.w2 = Some(w2);
		self
	}

	pub fn p2(mut self, p2: &'a str) -> Self {
		self.p2 = Some(p2);
		self
	}

	pub fn w3(mut self, w3: &'a str) -> Self {
		self.w3 = Some(w3);
		self
	}

	pub fn tag(mut self, tag: Option<&'a str>) -> Self {
		self.tag = tag;
		self
	}

	/// Checks a stored record against every set constraint.
	pub fn matches(&self, record: &TripleRecord) -> bool {
		let triple = &record.triple;
		let fields = [
			(self.w1, &triple.w1),
			(self.p1, &triple.p1),
			(self.w2, &triple.w2),
			(self.p2, &triple.p2),
			(self.w3, &triple.w3),
		];
		let fields_match = fields
			.into_iter()
			.all(|(constraint, value)| constraint.is_none_or(|c| c == value.as_str()));

		fields_match && self.tag.is_none_or(|tag| record.tags.contains_key(tag))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_matches_partial_fields_and_tag_presence() {
		let mut record = TripleRecord::new(Triple::new("a", " ", "b", "", ""));
		record.count = 2;

		assert!(TripleQuery::new().matches(&record));
		assert!(TripleQuery::new().w1("a").w2("b").matches(&record));
		assert!(!TripleQuery::new().w1("b").matches(&record));
		assert!(TripleQuery::new().w3("").matches(&record));
		assert!(!TripleQuery::new().tag(Some("x")).matches(&record));

		record.tags.insert("x".to_owned(), 1);
		assert!(TripleQuery::new().w1("a").tag(Some("x")).matches(&record));
	}

	#[test]
	fn weight_follows_tag_selection() {
		let mut record = TripleRecord::new(Triple::new("", "", "a", "", ""));
		record.count = 4;
		record.tags.insert("t".to_owned(), 3);

		assert_eq!(record.weight(None), 4);
		assert_eq!(record.weight(Some("t")), 3);
		assert_eq!(record.weight(Some("missing")), 0);
	}
}
