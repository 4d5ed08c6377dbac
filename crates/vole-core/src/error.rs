//! Error taxonomy for the VOLE commitment core (spec §7).
//!
//! Structural, not dynamic: every variant here corresponds to caller
//! misuse or an adversarial/corrupt input, never to a transient
//! condition. There is no retry path; callers should treat every
//! `Err` as fatal for the current call.

use thiserror::Error;

/// Errors produced by the VOLE commitment core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoleError {
    /// `BitDec` was asked to decompose a leaf index that does not fit in
    /// `depth` bits.
    #[error("leaf index {leaf_index} is out of range for depth {depth} (2^{depth} leaves)")]
    InvalidLeafIndex {
        /// The offending index.
        leaf_index: u64,
        /// The tree depth it was checked against.
        depth: u32,
    },

    /// `ChalDec` was asked for a tree index `>= tau0 + tau1`.
    #[error("tree index {index} is out of range (tau0+tau1 = {tau})")]
    ChallengeTreeIndexOutOfRange {
        /// The offending tree index.
        index: u32,
        /// `tau0 + tau1`.
        tau: u32,
    },

    /// A requested column/row window does not fit within `[0, total)`.
    #[error("window [{begin}, {end}) is invalid for a total of {total} columns")]
    InvalidWindow {
        /// Window start (inclusive).
        begin: u32,
        /// Window end (exclusive).
        end: u32,
        /// Total number of columns/rows available.
        total: u32,
    },

    /// Reconstructed `h`/`hcom` did not match the supplied value — the
    /// decommitment is inauthentic or corrupt (spec §7.2, Property 6).
    #[error("vector commitment verification failed")]
    VerificationFailed,

    /// A buffer supplied by the caller has the wrong length for the
    /// requested operation.
    #[error("buffer {name} has length {actual}, expected {expected}")]
    BufferLength {
        /// Name of the offending buffer, for diagnostics.
        name: &'static str,
        /// Length actually supplied.
        actual: usize,
        /// Length required.
        expected: usize,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, VoleError>;
