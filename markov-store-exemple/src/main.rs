use std::path::Path;

use markov_store_core::{DocumentStore, MarkovModel, MemoryStore};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("./data")?;

    // Restore the store from "./data/store.bin" if it exists, start empty otherwise
    let snapshot = Path::new("./data/store.bin");
    let restored = snapshot.exists();
    let model = MarkovModel::new(MemoryStore::open(snapshot)?);

    // A restored store already holds the corpora
    if !restored {
        // Every ".txt" file of the "data" directory becomes a tagged sub-corpus
        // named after the file ("data/poems.txt" -> tag "poems")
        let tags = model.insert_folder("./data", "txt")?;
        println!("Loaded corpora: {}", tags.join(", "));

        // Texts can also be inserted one by one, with or without a tag
        model.insert_text("The quick brown fox jumps over the lazy dog.", Some("pangram"))?;
    }
    model.insert_text("The lazy cat sleeps all day.", None)?;

    let stats = model.store().stats()?;
    println!("Store holds {} words and {} triples", stats.words, stats.triples);

    // A seeded generator replays the same walks over the same store content,
    // use 'rand::rng()' for fresh ones
    let mut rng = StdRng::seed_from_u64(2024);

    // Forward generation from the start of a text, restricted to a tag
    match model.generate_forwards("", Some("pangram"), &mut rng)? {
        Some(text) => println!("Forwards: {}", text),
        None => println!("Nothing tagged 'pangram'"),
    }

    // Backward generation ending on a given word
    if let Some(text) = model.generate_backwards("dog", None, &mut rng)? {
        println!("Backwards: {}", text);
    }

    // Generation around a word, in both directions
    if let Some(text) = model.generate_from_mid("lazy", None, &mut rng)? {
        println!("From mid: {}", text);
    }

    // Seed generations with the rarest words of a prompt
    let prompt = "Is the lazy fox quick?";
    println!("Least common words of {:?}: {:?}", prompt, model.least_common_words(prompt, 3)?);
    for (i, text) in model.generate_multiple_from_least_common(prompt, 3, None, &mut rng)?.enumerate() {
        println!("Generated text {}: {}", i + 1, text?);
    }

    // Removing a text undoes its insertion
    model.delete_text("The lazy cat sleeps all day.", None)?;

    model.store().save(snapshot)?;

    Ok(())
}
