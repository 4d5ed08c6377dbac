//! Materialized GGM seed tree (spec §4.1, first half; §3 "Seed tree").
//!
//! [`SeedTree::generate`] expands the full tree eagerly and keeps every
//! node, so any leaf can be read back without recomputation. This is the
//! "non-streaming" alternative path kept alongside [`crate::StreamSeedTree`]
//! per `SPEC_FULL.md` §C.2: easiest to test the per-leaf properties
//! against directly, even though the streaming cache is the recommended
//! default for production use (spec §9, Open Question (i)).

use vole_core::{Result, VoleError};
use vole_crypto::{zero_iv, Prg};

/// Linear index of node `idx_at_level` at tree `level` (root = level 0) in
/// the flattened node array of a complete binary tree.
#[inline]
#[must_use]
pub const fn node_index(level: u32, idx_at_level: u64) -> u64 {
    (1u64 << level) - 1 + idx_at_level
}

/// A fully materialized GGM tree: every internal node and leaf is stored.
#[derive(Clone, Debug)]
pub struct SeedTree {
    depth: u32,
    lambda_bytes: usize,
    /// Flattened `lambda_bytes`-stride node array, indexed by [`node_index`].
    nodes: Vec<u8>,
}

impl SeedTree {
    /// Expand `root_key` into a complete tree of depth `depth` using `prg`
    /// with the fixed all-zero internal IV (spec §9 "Zero-IV for internal
    /// PRG").
    ///
    /// # Errors
    /// Returns [`VoleError::InvalidWindow`] if `depth` is large enough that
    /// `2^depth` would overflow a `u64` node count.
    pub fn generate(root_key: &[u8], depth: u32, prg: &impl Prg) -> Result<Self> {
        if depth >= 63 {
            return Err(VoleError::InvalidWindow {
                begin: 0,
                end: depth,
                total: 62,
            });
        }
        let lambda_bytes = root_key.len();
        let num_leaves = 1u64 << depth;
        let total_nodes = (2 * num_leaves - 1) as usize;
        let mut nodes = vec![0u8; total_nodes * lambda_bytes];
        nodes[..lambda_bytes].copy_from_slice(root_key);

        let iv = zero_iv();
        for level in 0..depth {
            for idx in 0..(1u64 << level) {
                let parent = node_index(level, idx) as usize;
                let mut node_buf = vec![0u8; lambda_bytes];
                node_buf.copy_from_slice(&nodes[parent * lambda_bytes..(parent + 1) * lambda_bytes]);

                let mut children = vec![0u8; 2 * lambda_bytes];
                prg.expand(&node_buf, &iv, &mut children);

                let left = node_index(level + 1, 2 * idx) as usize;
                let right = node_index(level + 1, 2 * idx + 1) as usize;
                nodes[left * lambda_bytes..(left + 1) * lambda_bytes]
                    .copy_from_slice(&children[..lambda_bytes]);
                nodes[right * lambda_bytes..(right + 1) * lambda_bytes]
                    .copy_from_slice(&children[lambda_bytes..]);
            }
        }

        Ok(Self {
            depth,
            lambda_bytes,
            nodes,
        })
    }

    /// Tree depth (leaf count is `2^depth`).
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Node at `level`, `idx_at_level`. Panics if out of range; every caller
    /// in this workspace derives both arguments from `depth`, so an
    /// out-of-range request is a programming error, not caller input (spec
    /// §7.4).
    #[must_use]
    pub fn node(&self, level: u32, idx_at_level: u64) -> &[u8] {
        let i = node_index(level, idx_at_level) as usize;
        &self.nodes[i * self.lambda_bytes..(i + 1) * self.lambda_bytes]
    }

    /// Leaf seed `i` (`0 <= i < 2^depth`).
    #[inline]
    #[must_use]
    pub fn leaf(&self, i: u64) -> &[u8] {
        self.node(self.depth, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vole_crypto::AesCtrPrg;

    #[test]
    fn node_index_matches_complete_tree_layout() {
        // Root, then level 1 has 2 nodes, level 2 has 4, etc.
        assert_eq!(node_index(0, 0), 0);
        assert_eq!(node_index(1, 0), 1);
        assert_eq!(node_index(1, 1), 2);
        assert_eq!(node_index(2, 0), 3);
        assert_eq!(node_index(2, 3), 6);
    }

    #[test]
    fn leaves_are_deterministic_and_distinct() {
        let prg = AesCtrPrg;
        let root = [0x7au8; 16];
        let tree = SeedTree::generate(&root, 4, &prg).unwrap();
        let mut leaves: Vec<Vec<u8>> = (0..16).map(|i| tree.leaf(i).to_vec()).collect();
        leaves.sort();
        leaves.dedup();
        assert_eq!(leaves.len(), 16, "all leaves of a fresh tree should differ");
    }

    #[test]
    fn regenerating_same_root_is_deterministic() {
        let prg = AesCtrPrg;
        let root = [0x01u8; 16];
        let t1 = SeedTree::generate(&root, 5, &prg).unwrap();
        let t2 = SeedTree::generate(&root, 5, &prg).unwrap();
        for i in 0..32 {
            assert_eq!(t1.leaf(i), t2.leaf(i));
        }
    }
}
