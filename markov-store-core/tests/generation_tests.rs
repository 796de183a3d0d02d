mod common;

use std::collections::HashSet;

use common::{empty_model, model_with, rng};
use markov_store_core::{DocumentStore, MarkovConfig, MarkovModel, MemoryStore, Triple};
use rstest::rstest;

#[test]
fn empty_store_generates_nothing() {
	let model = empty_model();
	let mut rng = rng(1);

	assert_eq!(model.generate_forwards("", None, &mut rng).unwrap(), None);
	assert_eq!(model.generate_backwards("", None, &mut rng).unwrap(), None);
	assert_eq!(model.generate_from_mid("word", None, &mut rng).unwrap(), None);

	let generated: Vec<_> = model.generate_multiple_from_least_common("some text", 3, None, &mut rng).unwrap().collect();
	assert!(generated.is_empty());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn single_text_is_reproduced(#[case] seed: u64) {
	let model = model_with(&["hi there"]);
	let mut rng = rng(seed);

	assert_eq!(model.generate_forwards("", None, &mut rng).unwrap().as_deref(), Some("hi there"));
	assert_eq!(model.generate_backwards("", None, &mut rng).unwrap().as_deref(), Some("hi there"));
}

#[test]
fn forwards_from_a_start_word() {
	let model = model_with(&["hi there, friend"]);
	let mut rng = rng(4);

	assert_eq!(model.generate_forwards("hi", None, &mut rng).unwrap().as_deref(), Some("hi there, friend"));
	assert_eq!(model.generate_forwards("there", None, &mut rng).unwrap().as_deref(), Some("there, friend"));
	assert_eq!(model.generate_forwards("unknown", None, &mut rng).unwrap(), None);
}

#[test]
fn backwards_to_an_end_word() {
	let model = model_with(&["hi there, friend"]);
	let mut rng = rng(5);

	assert_eq!(model.generate_backwards("there", None, &mut rng).unwrap().as_deref(), Some("hi there"));
	assert_eq!(model.generate_backwards("hi", None, &mut rng).unwrap(), None);
}

#[test]
fn from_mid_joins_both_walks() {
	let model = model_with(&["a b c"]);
	let mut rng = rng(6);

	assert_eq!(model.generate_from_mid("b", None, &mut rng).unwrap().as_deref(), Some("a b c"));
	// Last word: nothing follows it
	assert_eq!(model.generate_from_mid("c", None, &mut rng).unwrap().as_deref(), Some("a b c"));
	// First word: no backward walk, the forward walk loses its seed
	assert_eq!(model.generate_from_mid("a", None, &mut rng).unwrap().as_deref(), Some(" b c"));
	assert_eq!(model.generate_from_mid("z", None, &mut rng).unwrap(), None);
}

#[test]
fn output_follows_recorded_transitions() {
	let model = model_with(&["the cat sat", "the dog ran"]);
	let expected: HashSet<&str> = ["the cat sat", "the dog ran"].into_iter().collect();

	let mut seen = HashSet::new();
	for seed in 0..100 {
		let text = model.generate_forwards("", None, &mut rng(seed)).unwrap().unwrap();
		assert!(expected.contains(text.as_str()), "unexpected text {text:?}");
		seen.insert(text);
	}
	assert_eq!(seen.len(), 2);
}

#[test]
fn same_seed_same_walk() {
	let model = model_with(&["one two three", "one two four", "five two three", "one six"]);

	let first = model.generate_forwards("", None, &mut rng(99)).unwrap();
	let second = model.generate_forwards("", None, &mut rng(99)).unwrap();
	assert_eq!(first, second);
}

#[test]
fn tag_restricts_the_walk() {
	let model = empty_model();
	model.insert_text("red fox", Some("a")).unwrap();
	model.insert_text("blue whale", Some("b")).unwrap();

	for seed in 0..20 {
		let mut rng = rng(seed);
		assert_eq!(model.generate_forwards("", Some("a"), &mut rng).unwrap().as_deref(), Some("red fox"));
		assert_eq!(model.generate_backwards("", Some("b"), &mut rng).unwrap().as_deref(), Some("blue whale"));
	}
	assert_eq!(model.generate_forwards("", Some("c"), &mut rng(0)).unwrap(), None);
}

#[test]
fn cyclic_corpus_terminates() {
	let model = model_with(&["a a a a"]);

	for seed in 0..50 {
		let text = model.generate_forwards("", None, &mut rng(seed)).unwrap().unwrap();
		assert!(text.split(' ').all(|word| word == "a"), "unexpected text {text:?}");
	}
}

#[test]
fn step_cap_bounds_the_walk() {
	let mut config = MarkovConfig::default();
	config.set_max_steps(1).unwrap();
	let model = MarkovModel::with_config(MemoryStore::new(), config);
	model.insert_text("a a a a a a a a", None).unwrap();

	for seed in 0..20 {
		let text = model.generate_forwards("", None, &mut rng(seed)).unwrap().unwrap();
		// First triple holds one or two words, the single extension adds one
		assert!(text.split(' ').count() <= 3, "walk too long: {text:?}");
	}
}

#[test]
fn zero_step_cap_is_rejected() {
	let mut config = MarkovConfig::default();
	assert!(config.set_max_steps(0).is_err());
	assert_eq!(config, MarkovConfig::default());
}

#[test]
fn least_common_seeds_then_falls_back_to_start() {
	let model = model_with(&["hi there"]);
	let mut rng = rng(8);

	let generated: Vec<String> = model
		.generate_multiple_from_least_common("there unknown", 3, None, &mut rng)
		.unwrap()
		.collect::<Result<_, _>>()
		.unwrap();

	assert_eq!(generated, vec!["hi there"; 3]);
}

#[test]
fn least_common_skips_empty_slots() {
	let model = empty_model();
	model.insert_text("red fox", Some("a")).unwrap();
	let mut rng = rng(9);

	// No text tagged "b": every slot comes back empty
	let generated: Vec<_> = model.generate_multiple_from_least_common("red", 4, Some("b"), &mut rng).unwrap().collect();
	assert!(generated.is_empty());

	let generated = model.generate_multiple_from_least_common("fox", 2, Some("a"), &mut rng).unwrap();
	assert_eq!(generated.size_hint(), (0, Some(2)));
	assert_eq!(generated.map(Result::unwrap).collect::<Vec<_>>(), vec!["red fox", "red fox"]);
}

#[test]
fn missing_continuation_ends_the_walk() {
	// Chains without their closing triple, as left by a concurrent delete
	let model = empty_model();
	model.store().increment_triple(&Triple::new("", "", "a", " ", "b"), None).unwrap();
	assert_eq!(model.generate_forwards("", None, &mut rng(10)).unwrap().as_deref(), Some("a b"));

	let model = empty_model();
	model.store().increment_triple(&Triple::new("x", " ", "y", "", ""), None).unwrap();
	assert_eq!(model.generate_backwards("", None, &mut rng(11)).unwrap().as_deref(), Some("x y"));
}
