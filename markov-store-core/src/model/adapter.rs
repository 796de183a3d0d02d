//! Count bookkeeping of a single triple.
//!
//! Each call is a short sequence of atomic store operations. A record whose
//! count drops below 1 is deleted right away, so no depleted record lingers.

use super::triple::Triple;
use crate::error::MarkovResult;
use crate::store::DocumentStore;

/// Records one occurrence of `triple`.
///
/// - the triple count is incremented (record created if absent)
/// - the frequency of its middle word is incremented
/// - if `tag` is set, the tag sub-count is incremented too
pub fn insert_triple<S>(store: &S, triple: &Triple, tag: Option<&str>) -> MarkovResult<()>
where
	S: DocumentStore + ?Sized,
{
	store.increment_word(&triple.w2)?;
	store.increment_triple(triple, tag)?;
	Ok(())
}

/// Forgets one occurrence of `triple`.
///
/// Unknown words and triples are left alone (nothing is created). When
/// the triple survives and `tag` is one of its tags, the tag sub-count is
/// decremented and the entry dropped once depleted. Other tags are never
/// touched.
pub fn delete_triple<S>(store: &S, triple: &Triple, tag: Option<&str>) -> MarkovResult<()>
where
	S: DocumentStore + ?Sized,
{
	if store.decrement_word(&triple.w2)?.is_some_and(|count| count < 1) {
		store.remove_word_if_depleted(&triple.w2)?;
	}

	let Some(record) = store.decrement_triple(triple, tag)? else {
		return Ok(());
	};

	if record.count < 1 {
		store.remove_triple_if_depleted(triple)?;
	} else if let Some(tag) = tag {
		if record.tag_count(tag).is_some_and(|sub_count| sub_count < 1) {
			store.prune_tag(triple, tag)?;
		}
	}
	Ok(())
}
