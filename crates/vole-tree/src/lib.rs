// crates/vole-tree/src/lib.rs

//! GGM seed trees for the VOLE commitment core (spec §4.1, §3 "Seed tree").
//!
//! Two flavors, both expanding a root seed into `2^depth` leaves via
//! repeated PRG calls with a fixed zero IV:
//!
//! - [`SeedTree`]: materializes every node, for the non-streaming
//!   commitment path (`SPEC_FULL.md` §C.2).
//! - [`StreamSeedTree`]: keeps only the root plus one cached root-to-leaf
//!   path, recomputing the rest on demand (the recommended default, spec
//!   §9 Open Question (i)).
//!
//! Neither type does any hashing; turning a leaf seed into `(sd, com)` is
//! the vector-commitment layer's job (`vole-vc`), which is what lets both
//! tree flavors share one `LeafSource` implementation there.

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

/// The materialized (full-tree) seed expansion.
pub mod seed_tree;
/// The streaming, single-cached-path seed expansion.
pub mod stream;

pub use seed_tree::{node_index, SeedTree};
pub use stream::StreamSeedTree;
