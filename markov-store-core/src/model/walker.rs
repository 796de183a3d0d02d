use rand::Rng;
use tracing::debug;

use super::triple::{TripleQuery, TripleRecord};
use crate::error::MarkovResult;
use crate::store::DocumentStore;

/// Draws one record with probability proportional to its weight.
///
/// Weights come from `TripleRecord::weight`: the global count, or the tag
/// sub-count for tagged draws. Records with a non-positive weight are
/// never drawn (a stale tag entry cannot bias the walk).
///
/// This method performs:
/// - an O(n) scan to sum the weights
/// - a cumulative subtraction to select a bucket
///
/// Returns `None` if no record has a positive weight.
pub fn weighted_choice<R: Rng>(records: Vec<TripleRecord>, tag: Option<&str>, rng: &mut R) -> Option<TripleRecord> {
	let total: i64 = records.iter().map(|record| record.weight(tag).max(0)).sum();
	if total <= 0 {
		return None;
	}

	let mut r = rng.random_range(0..total);
	for record in records {
		let weight = record.weight(tag).max(0);
		if r < weight {
			return Some(record);
		}
		r -= weight;
	}

	// Unreachable: r < total
	None
}

/// Fetches every triple matching `query` and draws one of them.
///
/// Returns `Ok(None)` when nothing matches, which callers read both as
/// "empty corpus" and "no continuation".
pub fn pick_random<S, R>(store: &S, query: &TripleQuery, rng: &mut R) -> MarkovResult<Option<TripleRecord>>
where
	S: DocumentStore + ?Sized,
	R: Rng,
{
	let candidates = store.find_triples(query)?;
	debug!("{} candidates for {:?}", candidates.len(), query);
	Ok(weighted_choice(candidates, query.tag, rng))
}
