use std::path::Path;
use std::thread;

use tracing::{debug, info};

use super::adapter::{delete_triple, insert_triple};
use super::config::MarkovConfig;
use super::tokenizer::{middle_words, tokenize};
use crate::error::{MarkovError, MarkovResult};
use crate::io;
use crate::store::DocumentStore;

/// Order-2 Markov text model persisted in a `DocumentStore`.
///
/// The model itself is stateless apart from its configuration: every count
/// lives in the store, so several models (or processes) may share one
/// store. Corpora can be partitioned with tags; all tags share the same
/// triple records.
///
/// # Responsibilities
/// - Split texts into triples and keep triple / word counts up to date
/// - Answer least-common-word queries
/// - Drive the weighted random walks (see `generator`)
#[derive(Debug)]
pub struct MarkovModel<S> {
	pub(crate) store: S,
	pub(crate) config: MarkovConfig,
}

impl<S: DocumentStore> MarkovModel<S> {
	/// Creates a model backed by `store` with the default configuration.
	pub fn new(store: S) -> Self {
		Self::with_config(store, MarkovConfig::default())
	}

	pub fn with_config(store: S, config: MarkovConfig) -> Self {
		Self { store, config }
	}

	/// Returns the backing store.
	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn config(&self) -> &MarkovConfig {
		&self.config
	}

	/// Adds every triple of `text` to the model, optionally under `tag`.
	///
	/// Returns the number of triples recorded (0 for an empty text).
	pub fn insert_text(&self, text: &str, tag: Option<&str>) -> MarkovResult<usize> {
		let triples = tokenize(text);
		for triple in &triples {
			insert_triple(&self.store, triple, tag)?;
		}
		debug!("Inserted {} triples (tag: {:?})", triples.len(), tag);
		Ok(triples.len())
	}

	/// Removes every triple of `text` from the model.
	///
	/// Inserting then deleting the same text with the same tag leaves the
	/// store as it was. Deleting with another tag never decrements the
	/// sub-counts of the original tag.
	pub fn delete_text(&self, text: &str, tag: Option<&str>) -> MarkovResult<usize> {
		let triples = tokenize(text);
		for triple in &triples {
			delete_triple(&self.store, triple, tag)?;
		}
		debug!("Deleted {} triples (tag: {:?})", triples.len(), tag);
		Ok(triples.len())
	}

	/// Inserts a text file, one text per line.
	///
	/// Lines are processed in parallel. Returns the number of lines read.
	pub fn insert_file<P: AsRef<Path>>(&self, path: P, tag: Option<&str>) -> MarkovResult<usize> {
		let lines = io::read_lines(&path)?;
		self.process_lines(&lines, |line| self.insert_text(line, tag).map(|_| ()))?;
		info!("Inserted {} lines from {} (tag: {:?})", lines.len(), path.as_ref().display(), tag);
		Ok(lines.len())
	}

	/// Deletes a text file previously inserted with `insert_file`.
	pub fn delete_file<P: AsRef<Path>>(&self, path: P, tag: Option<&str>) -> MarkovResult<usize> {
		let lines = io::read_lines(&path)?;
		self.process_lines(&lines, |line| self.delete_text(line, tag).map(|_| ()))?;
		info!("Deleted {} lines from {} (tag: {:?})", lines.len(), path.as_ref().display(), tag);
		Ok(lines.len())
	}

	/// Inserts every file with the given extension found in `folder`.
	///
	/// Each file becomes a sub-corpus tagged with its name without extension:
	/// `corpus/poems.txt` is inserted under the tag `poems`.
	///
	/// Returns the list of tags inserted.
	///
	/// # Notes
	/// - Both `"folder"` and `"folder/"` are accepted.
	/// - Subdirectories are ignored.
	pub fn insert_folder<P: AsRef<Path>>(&self, folder: P, extension: &str) -> MarkovResult<Vec<String>> {
		let folder = io::normalize_folder(folder.as_ref());
		if !folder.is_dir() {
			return Err(MarkovError::Config(format!("Expected a directory, got: {}", folder.display())));
		}

		let mut tags = Vec::new();
		for file in io::corpus_files(&folder, extension)? {
			let tag = io::corpus_tag(&file)?;
			self.insert_file(&file, Some(&tag))?;
			tags.push(tag);
		}
		Ok(tags)
	}

	/// Returns up to `limit` words of `text`, rarest first.
	///
	/// Only the middle words of the text's triples are considered, and only
	/// those already known to the store. Ties follow the store order.
	pub fn least_common_words(&self, text: &str, limit: usize) -> MarkovResult<Vec<String>> {
		let words = middle_words(text);
		let records = self.store.least_common(&words, limit)?;
		Ok(records.into_iter().map(|record| record.word).collect())
	}

	/// Runs `op` on every line, spreading chunks of lines over one thread per CPU.
	///
	/// The first error (in chunk order) is returned once all workers finished.
	fn process_lines<F>(&self, lines: &[String], op: F) -> MarkovResult<()>
	where
		F: Fn(&str) -> MarkovResult<()> + Sync,
	{
		if lines.is_empty() {
			return Ok(());
		}

		let chunk_size = lines.len().div_ceil(num_cpus::get());
		let op = &op;

		thread::scope(|scope| {
			let workers: Vec<_> = lines
				.chunks(chunk_size)
				.map(|chunk| scope.spawn(move || chunk.iter().try_for_each(|line| op(line.as_str()))))
				.collect();

			// Join every worker before looking at the results
			let results: Vec<_> = workers.into_iter().map(|worker| worker.join()).collect();
			first_failure(results)
		})
	}
}

/// Returns the first failure among joined worker results, in order.
///
/// A panicked worker counts as `MarkovError::WorkerPanicked`.
fn first_failure(results: Vec<thread::Result<MarkovResult<()>>>) -> MarkovResult<()> {
	results
		.into_iter()
		.try_for_each(|result| result.map_err(|_| MarkovError::WorkerPanicked)?)
}
