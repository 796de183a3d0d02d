//! Top-level module for the Markov text model.
//!
//! This module provides an order-2 word model whose counts live in a
//! `DocumentStore`, including:
//! - Text tokenization into overlapping triples (`tokenizer`)
//! - Triple and word records (`triple`)
//! - Count bookkeeping of single triples (`adapter`)
//! - Weighted random selection (`walker`)
//! - The model itself (`MarkovModel`) and its generation strategies (`generator`)

/// Persisted records and lookup constraints.
pub mod triple;

/// Splits texts into alternating word / separator tokens and 5-token windows.
pub mod tokenizer;

/// Insert / delete of a single triple with reference counting.
///
/// Keeps triple counts, tag sub-counts and word frequencies in step.
pub mod adapter;

/// Count-weighted random choice over matching triples.
pub mod walker;

/// Model configuration.
pub mod config;

/// Text insertion, deletion and least-common-word queries.
pub mod markov_model;

/// Forward, backward, from-midpoint and least-common-seeded generation.
pub mod generator;
