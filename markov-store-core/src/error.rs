use thiserror::Error;

/// Errors surfaced by the Markov model and its store collaborator.
///
/// "Nothing matched" is never an error: generation entry points return
/// `Ok(None)` for that case.
#[derive(Error, Debug)]
pub enum MarkovError {
	/// The document store failed (lost connection, poisoned lock, write conflict).
	/// Never retried by the model.
	#[error("Store error: {0}")]
	Store(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Ingestion worker panicked")]
	WorkerPanicked,

	#[error("Snapshot error: {0}")]
	Snapshot(#[from] postcard::Error),
}

pub type MarkovResult<T> = Result<T, MarkovError>;
