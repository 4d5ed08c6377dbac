//! Immutable parameter sets (spec §3, §6: "An immutable table keyed by
//! instance name").
//!
//! A [`ParamSet`] is fixed for the lifetime of a commit/reconstruct call;
//! nothing in this workspace negotiates or mutates one at runtime.

use crate::error::{Result, VoleError};

/// Size in bytes of the PRG/hash IV (spec §3).
pub const IV_SIZE: usize = 16;

/// A fixed VOLE parameter set: security parameter, tree layout, and the
/// row/column counts derived from the surrounding signature scheme.
///
/// Field names follow the letters used in `spec.md` §3 so the source is
/// easy to cross-reference against the specification rather than against
/// any particular signature scheme's own variable names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamSet {
    /// Security parameter in bits (128/192/256).
    pub lambda: u32,
    /// Number of trees at depth `k0` (the first `tau0` trees).
    pub tau0: u32,
    /// Number of trees at depth `k1` (the remaining `tau1` trees).
    pub tau1: u32,
    /// Depth of the first `tau0` trees.
    pub k0: u32,
    /// Depth of the remaining `tau1` trees.
    pub k1: u32,
    /// Circuit-facing row count `l` (bits), before the universal-hash tail
    /// and masking columns are folded in.
    pub l: u32,
    /// Width, in bits, of the universal-hash tail folded into `ellhat`.
    pub universal_hash_b_bits: u32,
}

impl ParamSet {
    /// `lambda / 8`.
    #[inline]
    #[must_use]
    pub const fn lambda_bytes(&self) -> u32 {
        self.lambda / 8
    }

    /// Total number of trees, `tau0 + tau1`.
    #[inline]
    #[must_use]
    pub const fn tau(&self) -> u32 {
        self.tau0 + self.tau1
    }

    /// `max(k0, k1)` — the deepest tree in this parameter set.
    #[inline]
    #[must_use]
    pub const fn max_depth(&self) -> u32 {
        if self.k0 >= self.k1 {
            self.k0
        } else {
            self.k1
        }
    }

    /// Total number of VOLE columns, `Σ k_i = tau0*k0 + tau1*k1`.
    #[inline]
    #[must_use]
    pub const fn total_columns(&self) -> u32 {
        self.tau0 * self.k0 + self.tau1 * self.k1
    }

    /// Effective VOLE row count in bits: `l + 2*lambda + universal_hash_b_bits`
    /// (spec §3; matches the reference `ell_hat` computation).
    #[inline]
    #[must_use]
    pub const fn ellhat(&self) -> u32 {
        self.l + 2 * self.lambda + self.universal_hash_b_bits
    }

    /// `ceil(ellhat() / 8)`.
    #[inline]
    #[must_use]
    pub const fn ellhat_bytes(&self) -> u32 {
        (self.ellhat() + 7) / 8
    }

    /// Depth of tree `i` (0-based), or an error if `i >= tau()`.
    #[inline]
    pub fn tree_depth(&self, i: u32) -> Result<u32> {
        if i < self.tau0 {
            Ok(self.k0)
        } else if i < self.tau() {
            Ok(self.k1)
        } else {
            Err(VoleError::ChallengeTreeIndexOutOfRange {
                index: i,
                tau: self.tau(),
            })
        }
    }

    /// Running column offset of tree `i`: `Σ_{s<i} depth(s)`.
    #[must_use]
    pub fn tree_column_offset(&self, i: u32) -> u32 {
        let i0 = i.min(self.tau0);
        let i1 = i.saturating_sub(self.tau0).min(self.tau1);
        i0 * self.k0 + i1 * self.k1
    }

    /// FAEST-128s-like parameters (the worked example of spec §8).
    #[must_use]
    pub const fn faest_128s() -> Self {
        Self {
            lambda: 128,
            tau0: 7,
            tau1: 4,
            k0: 12,
            k1: 11,
            l: 1_600,
            universal_hash_b_bits: 256,
        }
    }

    /// FAEST-128f-like parameters (fast variant: shallower, more trees).
    #[must_use]
    pub const fn faest_128f() -> Self {
        Self {
            lambda: 128,
            tau0: 16,
            tau1: 0,
            k0: 8,
            k1: 8,
            l: 1_600,
            universal_hash_b_bits: 256,
        }
    }

    /// FAEST-192s-like parameters.
    #[must_use]
    pub const fn faest_192s() -> Self {
        Self {
            lambda: 192,
            tau0: 8,
            tau1: 8,
            k0: 12,
            k1: 11,
            l: 2_608,
            universal_hash_b_bits: 384,
        }
    }

    /// FAEST-192f-like parameters.
    #[must_use]
    pub const fn faest_192f() -> Self {
        Self {
            lambda: 192,
            tau0: 24,
            tau1: 0,
            k0: 8,
            k1: 8,
            l: 2_608,
            universal_hash_b_bits: 384,
        }
    }

    /// FAEST-256s-like parameters.
    #[must_use]
    pub const fn faest_256s() -> Self {
        Self {
            lambda: 256,
            tau0: 14,
            tau1: 8,
            k0: 12,
            k1: 11,
            l: 3_312,
            universal_hash_b_bits: 512,
        }
    }

    /// FAEST-256f-like parameters.
    #[must_use]
    pub const fn faest_256f() -> Self {
        Self {
            lambda: 256,
            tau0: 32,
            tau1: 0,
            k0: 8,
            k1: 8,
            l: 3_312,
            universal_hash_b_bits: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_worked_example_matches() {
        let p = ParamSet::faest_128s();
        assert_eq!(p.lambda, 128);
        assert_eq!(p.tau(), 11);
        assert_eq!((p.tau0, p.k0, p.tau1, p.k1), (7, 12, 4, 11));
    }

    #[test]
    fn tree_column_offset_matches_running_sum() {
        let p = ParamSet::faest_128s();
        let mut running = 0u32;
        for i in 0..p.tau() {
            assert_eq!(p.tree_column_offset(i), running);
            running += p.tree_depth(i).unwrap();
        }
        assert_eq!(running, p.total_columns());
    }

    #[test]
    fn tree_depth_out_of_range() {
        let p = ParamSet::faest_128s();
        assert_eq!(
            p.tree_depth(p.tau()).unwrap_err(),
            VoleError::ChallengeTreeIndexOutOfRange {
                index: p.tau(),
                tau: p.tau()
            }
        );
    }
}
