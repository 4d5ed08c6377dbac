//! The materialized vector commitment (spec §3/§4.1/§6): `vector_commitment`
//! and `vector_open`, grounded on `vc.c`'s `vector_commitment`/
//! `vector_open`.

use vole_core::bits::num_rec;
use vole_core::params::IV_SIZE;
use vole_core::Result;
use vole_crypto::{Prg, RandomOracle0, RandomOracle1};
use vole_tree::SeedTree;

/// A fully materialized vector commitment: the whole seed tree plus every
/// leaf's `(sd, com)` pair and the root commitment `h` (spec §3 "Vector
/// commitment (materialized)").
#[derive(Clone, Debug)]
pub struct VectorCommitment {
    /// Root commitment, `2 * lambda_bytes` long.
    pub h: Vec<u8>,
    /// Per-leaf `com_i`, each `2 * lambda_bytes` long.
    pub com: Vec<Vec<u8>>,
    /// Per-leaf `sd_i`, each `lambda_bytes` long.
    pub sd: Vec<Vec<u8>>,
    /// Tree depth (`2^depth` leaves).
    pub depth: u32,
    tree: SeedTree,
}

impl VectorCommitment {
    /// Build a commitment over a fresh tree rooted at `root_key` (spec
    /// §4.1 steps 1-6 of `vector_commitment`).
    ///
    /// `h1` is optional: pass `None` when the caller only needs the tree
    /// materialized to produce a decommitment (`open`) and already has
    /// `h` from elsewhere (e.g. a prior streaming CMO/RMO pass over the
    /// same leaves) — that skips the per-leaf absorption and the final
    /// `H1` pass, leaving `self.h` empty.
    pub fn build<P, O0, O1>(
        root_key: &[u8],
        iv: &[u8; IV_SIZE],
        depth: u32,
        prg: &P,
        h0: &O0,
        h1: Option<O1>,
    ) -> Result<Self>
    where
        P: Prg,
        O0: RandomOracle0,
        O1: RandomOracle1,
    {
        let tree = SeedTree::generate(root_key, depth, prg)?;
        let lambda_bytes = root_key.len();
        let num_leaves = 1u64 << depth;

        let mut h1 = h1;
        let mut sd = Vec::with_capacity(num_leaves as usize);
        let mut com = Vec::with_capacity(num_leaves as usize);
        for i in 0..num_leaves {
            let mut sd_i = vec![0u8; lambda_bytes];
            let mut com_i = vec![0u8; 2 * lambda_bytes];
            h0.hash(tree.leaf(i), iv, &mut sd_i, &mut com_i);
            if let Some(ctx) = h1.as_mut() {
                ctx.absorb(&com_i);
            }
            sd.push(sd_i);
            com.push(com_i);
        }

        let h = if let Some(ctx) = h1 {
            let mut h = vec![0u8; 2 * lambda_bytes];
            ctx.finalize_into(&mut h);
            h
        } else {
            Vec::new()
        };

        Ok(Self {
            h,
            com,
            sd,
            depth,
            tree,
        })
    }

    /// Build the partial decommitment (`pdec`, `com_j`) for hidden leaf
    /// `NumRec(challenge_bits)` (spec §6 "Persisted format", grounded on
    /// `vc.c`'s `vector_open`).
    ///
    /// `pdec[i]` is the sibling seed on the path to the hidden leaf at
    /// (1-indexed) level `i + 1`, ordered root-adjacent to leaf-adjacent.
    #[must_use]
    pub fn open(&self, challenge_bits: &[u8]) -> (Vec<Vec<u8>>, Vec<u8>) {
        debug_assert_eq!(challenge_bits.len(), self.depth as usize);

        let mut pdec = Vec::with_capacity(self.depth as usize);
        let mut a: u64 = 0;
        for i in 0..self.depth {
            let bit = challenge_bits[(self.depth - 1 - i) as usize];
            let sibling_idx = 2 * a + u64::from(bit == 0);
            pdec.push(self.tree.node(i + 1, sibling_idx).to_vec());
            a = 2 * a + u64::from(bit != 0);
        }

        let leaf_index = num_rec(challenge_bits);
        (pdec, self.com[leaf_index as usize].clone())
    }
}

/// Free-function alias matching spec §6's public entry point name.
pub fn vector_commitment<P, O0, O1>(
    root_key: &[u8],
    iv: &[u8; IV_SIZE],
    depth: u32,
    prg: &P,
    h0: &O0,
    h1: O1,
) -> Result<VectorCommitment>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    VectorCommitment::build(root_key, iv, depth, prg, h0, Some(h1))
}

/// Materialize a tree without computing `h` (spec §9 "Nullable mode
/// selectors", applied to the commitment layer itself): used when the
/// caller already has `h_t` from elsewhere and only needs the tree
/// materialized to call [`VectorCommitment::open`].
pub fn vector_commitment_no_hash<P, O0, O1>(
    root_key: &[u8],
    iv: &[u8; IV_SIZE],
    depth: u32,
    prg: &P,
    h0: &O0,
) -> Result<VectorCommitment>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    VectorCommitment::build::<P, O0, O1>(root_key, iv, depth, prg, h0, None)
}

/// Free-function alias matching spec §6's public entry point name.
#[must_use]
pub fn vector_open(vc: &VectorCommitment, challenge_bits: &[u8]) -> (Vec<Vec<u8>>, Vec<u8>) {
    vc.open(challenge_bits)
}
