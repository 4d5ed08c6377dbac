// crates/vole-core/src/lib.rs

//! Shared foundation for the VOLE commitment workspace: immutable
//! parameter sets, the error taxonomy, and the bit-level utilities used
//! by the tree, vector-commitment, and VOLE layers.
//!
//! Allocation failure (spec §7.3) is not modeled as a [`VoleError`]
//! variant: Rust's global allocator aborts the process on OOM, which is
//! already the "abort the call, don't leak partial state" behavior the
//! spec asks for, so there is nothing more for this crate to do about it.

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

pub mod bits;
pub mod error;
pub mod params;

pub use bits::{bit_dec, chal_dec, get_bit, num_rec, xor_into};
pub use error::{Result, VoleError};
pub use params::{ParamSet, IV_SIZE};
