// crates/vole-crypto/src/lib.rs

//! Concrete instantiations of the PRG/`H0`/`H1` external collaborators that
//! spec §6 treats as opaque black boxes: an AES-CTR-style PRG and
//! SHAKE-256-backed random oracles. Every call site above this crate goes
//! through the [`prg::Prg`], [`hash::RandomOracle0`], and
//! [`hash::RandomOracle1`] traits, so swapping the instantiation (e.g. for
//! the masked Keccak variant of spec §9) never touches the tree, vector
//! commitment, or VOLE layers.

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

/// Random-oracle primitives `H0`/`H1` (spec §6).
pub mod hash;
/// The PRG external collaborator (spec §6).
pub mod prg;

pub use hash::{RandomOracle0, RandomOracle1, Shake256H0, Shake256H1};
pub use prg::{zero_iv, AesCtrPrg, Prg};
