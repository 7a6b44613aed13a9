//! Purpose: Library crate behind the `filmliste` CLI and integration tests.
//! Exports: `api` (import pipeline, loaders, errors) and `notice`.
//! Role: Extraction and normalization of the movie list feed; persistence stays with callers.
//! Invariants: Public callers go through `api`; pipeline internals stay private.
//! Invariants: Modules prefer explicit inputs/outputs over hidden state.
pub mod api;
mod batch_json;
mod core;
mod feed;
mod json;
mod load;
pub mod notice;
