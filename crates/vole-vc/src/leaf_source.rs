//! The `LeafSource` abstraction (spec §9 "Dual output layouts"/"Nullable
//! mode selectors"): the VOLE constructor's inner leaf loop (`vole`
//! crate) is written once against this trait, and both the materialized
//! and streaming commitment paths implement it.

use vole_core::params::IV_SIZE;
use vole_crypto::{Prg, RandomOracle0};
use vole_tree::StreamSeedTree;

use crate::commitment::VectorCommitment;

/// Source of `(sd_i, com_i)` pairs for every leaf `0..2^depth`, used by the
/// VOLE CMO/RMO constructors (spec §4.3/§4.4 step 2a).
pub trait LeafSource {
    /// Tree depth (`2^depth` leaves).
    fn depth(&self) -> u32;
    /// Produce `(sd_i, com_i)` for leaf `i`.
    fn leaf(&mut self, i: u64) -> (Vec<u8>, Vec<u8>);
}

impl LeafSource for VectorCommitment {
    fn depth(&self) -> u32 {
        self.depth
    }

    fn leaf(&mut self, i: u64) -> (Vec<u8>, Vec<u8>) {
        (self.sd[i as usize].clone(), self.com[i as usize].clone())
    }
}

/// A [`LeafSource`] backed by a [`StreamSeedTree`]: each `leaf` call
/// descends the cached path (amortized ~2 PRG calls) and then applies `H0`
/// (spec §4.1 `get_sd_com`).
pub struct StreamLeafSource<'p, 'h, P, O0> {
    tree: StreamSeedTree,
    iv: [u8; IV_SIZE],
    prg: &'p P,
    h0: &'h O0,
}

impl<'p, 'h, P, O0> StreamLeafSource<'p, 'h, P, O0>
where
    P: Prg,
    O0: RandomOracle0,
{
    /// Wrap a streaming seed tree rooted at `root_key` as a `LeafSource`.
    #[must_use]
    pub fn new(root_key: Vec<u8>, depth: u32, iv: [u8; IV_SIZE], prg: &'p P, h0: &'h O0) -> Self {
        Self {
            tree: StreamSeedTree::new(root_key, depth),
            iv,
            prg,
            h0,
        }
    }
}

impl<'p, 'h, P, O0> LeafSource for StreamLeafSource<'p, 'h, P, O0>
where
    P: Prg,
    O0: RandomOracle0,
{
    fn depth(&self) -> u32 {
        self.tree.depth()
    }

    fn leaf(&mut self, i: u64) -> (Vec<u8>, Vec<u8>) {
        let leaf_bytes = self.tree.leaf(i, self.prg).to_vec();
        let lambda_bytes = leaf_bytes.len();
        let mut sd = vec![0u8; lambda_bytes];
        let mut com = vec![0u8; 2 * lambda_bytes];
        self.h0.hash(&leaf_bytes, &self.iv, &mut sd, &mut com);
        (sd, com)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::vector_commitment;
    use vole_core::params::IV_SIZE;
    use vole_crypto::{zero_iv, AesCtrPrg, RandomOracle1, Shake256H0, Shake256H1};

    #[test]
    fn materialized_and_streaming_leaf_sources_agree() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let root = vec![0x64u8; 16];
        let depth = 5;

        let mut vc = vector_commitment(&root, &iv, depth, &prg, &h0, Shake256H1::new()).unwrap();
        let mut stream = StreamLeafSource::new(root, depth, iv, &prg, &h0);

        for i in 0..(1u64 << depth) {
            assert_eq!(LeafSource::leaf(&mut vc, i), stream.leaf(i));
        }
    }
}
