// crates/vole/src/lib.rs

//! VOLE (Vector Oblivious Linear Evaluation) commitment core: the CMO/RMO
//! constructors and reconstructors of spec §4.3-§4.5, and the forest-wide
//! orchestration of §4.6 built on top of `vole-vc`'s per-tree vector
//! commitments.
//!
//! A VOLE commitment is a forest of `τ` seed trees (the first `tau0` at
//! depth `k0`, the rest at depth `k1`); the output matrix is the same
//! logical data laid out two ways — column-major ([`cmo`]) or row-major
//! ([`rmo`]) — chosen by the downstream consumer. [`commit`] and
//! [`reconstruct`] drive the per-tree constructors/reconstructors across
//! the whole forest and fold the per-tree results into `u`/`c`/`hcom`.

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

/// Bit-placement helpers private to the CMO/RMO writers.
pub mod bitutil;
/// Column-major constructor/reconstructor.
pub mod cmo;
/// Forest-wide commit orchestration (`stream_vole_commit`, partials).
pub mod commit;
/// Row-major constructor/reconstructor.
pub mod rmo;
/// Forest-wide reconstruct orchestration (partials, `hcom`).
pub mod reconstruct;

pub use cmo::{construct_cmo, reconstruct_cmo, CmoOutput};
pub use commit::{
    partial_vole_commit_cmo, partial_vole_commit_rmo, stream_vole_commit, VoleCommitment,
};
pub use reconstruct::{
    partial_vole_reconstruct_cmo, partial_vole_reconstruct_rmo, vole_reconstruct_hcom,
    TreeDecommitment,
};
pub use rmo::{construct_rmo, reconstruct_rmo, RmoOutput};
