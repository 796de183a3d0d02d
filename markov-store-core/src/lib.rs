//! Store-backed Markov text generation library.
//!
//! This crate provides an order-2 (two-word lookback) Markov model whose
//! state lives in an external document store, including:
//! - Tokenization of texts into overlapping word/separator triples
//! - Reference-counted insertion and removal, optionally tagged
//! - Forward, backward, from-midpoint and least-common-word generation
//! - An in-process, snapshot-able store implementation
//!
//! Randomness is always supplied by the caller, so a seeded generator
//! reproduces a walk over the same store content.

/// Core Markov model, tokenizer and generation strategies.
pub mod model;

/// Document store collaborator trait and the in-memory implementation.
pub mod store;

/// Error type shared by the model and the stores.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, MarkovResult};
pub use model::config::MarkovConfig;
pub use model::generator::LeastCommonGenerations;
pub use model::markov_model::MarkovModel;
pub use model::triple::{Triple, TripleQuery, TripleRecord, WordRecord};
pub use store::memory::MemoryStore;
pub use store::{DocumentStore, StoreStats};
