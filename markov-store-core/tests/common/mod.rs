#![allow(dead_code)] // Not every test file uses every helper

use markov_store_core::{DocumentStore, MarkovModel, MemoryStore, Triple, TripleQuery, TripleRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn empty_model() -> MarkovModel<MemoryStore> {
	MarkovModel::new(MemoryStore::new())
}

/// Model pre-filled with untagged texts.
pub fn model_with(texts: &[&str]) -> MarkovModel<MemoryStore> {
	let model = empty_model();
	for text in texts {
		model.insert_text(text, None).unwrap();
	}
	model
}

pub fn rng(seed: u64) -> StdRng {
	StdRng::seed_from_u64(seed)
}

pub fn record(model: &MarkovModel<MemoryStore>, triple: &Triple) -> Option<TripleRecord> {
	model.store().get_triple(triple).unwrap()
}

pub fn word_count(model: &MarkovModel<MemoryStore>, word: &str) -> Option<i64> {
	model.store().get_word(word).unwrap().map(|record| record.count)
}

/// Every triple record, in store order.
pub fn all_triples(model: &MarkovModel<MemoryStore>) -> Vec<TripleRecord> {
	model.store().find_triples(&TripleQuery::new()).unwrap()
}
