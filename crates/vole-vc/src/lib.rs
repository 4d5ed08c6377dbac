// crates/vole-vc/src/lib.rs

//! Vector commitment layer over GGM seed trees (spec §3/§4.1/§6): commit,
//! open, reconstruct, and verify, plus the [`LeafSource`] abstraction the
//! `vole` crate's CMO/RMO constructors are built against.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

/// The materialized commitment: `vector_commitment`/`vector_open`.
pub mod commitment;
/// The `LeafSource` abstraction shared by the materialized and streaming
/// paths.
pub mod leaf_source;
/// The reconstructed view: `vector_reconstruction`/`vector_verify`.
pub mod reconstruct;

pub use commitment::{vector_commitment, vector_commitment_no_hash, vector_open, VectorCommitment};
pub use leaf_source::{LeafSource, StreamLeafSource};
pub use reconstruct::{vector_reconstruction, vector_verify, VectorCommitmentRec};
