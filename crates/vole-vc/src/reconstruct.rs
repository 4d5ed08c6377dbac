//! The reconstructed vector commitment view (spec §3 "Vector commitment —
//! reconstructed view", §6, §7.2, §8 Property 6), grounded on `vc.c`'s
//! `vector_reconstruction`/`vector_verify`.
//!
//! Given the co-path seeds `pdec` and the hidden leaf's commitment
//! `com_j`, every leaf except the hidden one can be rebuilt exactly as the
//! prover built it; the hidden leaf's seed is never materialized (spec §3
//! invariant: "the seed at leaf position j* is never written").

use vole_core::bits::num_rec;
use vole_core::params::IV_SIZE;
use vole_core::{Result, VoleError};
use vole_crypto::{zero_iv, Prg, RandomOracle0, RandomOracle1};

/// The verifier-side reconstructed commitment view.
#[derive(Clone, Debug)]
pub struct VectorCommitmentRec {
    /// Recomputed root commitment; compare against the prover's `h_t` to
    /// verify (spec §8 Property 3/6).
    pub h: Vec<u8>,
    /// Per-leaf `com`; every entry is populated, the hidden leaf's slot
    /// holds the supplied `com_j` (spec §3: "absorbed before finalizing").
    pub com: Vec<Vec<u8>>,
    /// Per-leaf VOLE seed (`m`/`sd` in spec naming); `None` at the hidden
    /// leaf, `Some` everywhere else.
    pub sd: Vec<Option<Vec<u8>>>,
    /// Tree depth.
    pub depth: u32,
    /// Hidden leaf index `j* = NumRec(challenge_bits)`.
    pub offset: u64,
}

impl VectorCommitmentRec {
    /// `(sd, com)` for leaf `i`; `sd` is `None` exactly at `i == offset`
    /// (spec's `get_sd_com_rec`, a pure accessor here since every
    /// non-hidden leaf was already rebuilt by [`vector_reconstruction`]).
    #[must_use]
    pub fn get(&self, i: u64) -> (Option<&[u8]>, &[u8]) {
        (
            self.sd[i as usize].as_deref(),
            self.com[i as usize].as_slice(),
        )
    }
}

/// Recursively expand a fully-known subtree rooted at `node` (level
/// `level`, position `idx_at_level`) down to depth `depth`, recording
/// every leaf it reaches. Grounded on `vc.c`'s per-level re-expansion loop
/// in `vector_reconstruction`, restructured as a direct recursive
/// descent of each revealed sibling rather than a breadth-first sweep
/// over a shared node table.
fn expand_subtree(
    node: &[u8],
    level: u32,
    idx_at_level: u64,
    depth: u32,
    prg: &impl Prg,
    iv: &[u8; IV_SIZE],
    leaves: &mut [Option<Vec<u8>>],
) {
    if level == depth {
        leaves[idx_at_level as usize] = Some(node.to_vec());
        return;
    }
    let lambda_bytes = node.len();
    let mut children = vec![0u8; 2 * lambda_bytes];
    prg.expand(node, iv, &mut children);
    expand_subtree(
        &children[..lambda_bytes],
        level + 1,
        2 * idx_at_level,
        depth,
        prg,
        iv,
        leaves,
    );
    expand_subtree(
        &children[lambda_bytes..],
        level + 1,
        2 * idx_at_level + 1,
        depth,
        prg,
        iv,
        leaves,
    );
}

/// Rebuild every leaf except the hidden one from `(pdec, com_j)` and the
/// challenge bits, and recompute `h` (spec §4.5 step 2, `vc.c`'s
/// `vector_reconstruction`).
///
/// # Errors
/// Returns [`VoleError::BufferLength`] if `pdec.len() != challenge_bits.len()`.
pub fn vector_reconstruction<P, O0, O1>(
    pdec: &[Vec<u8>],
    com_j: &[u8],
    challenge_bits: &[u8],
    iv: &[u8; IV_SIZE],
    prg: &P,
    h0: &O0,
    mut h1: O1,
) -> Result<VectorCommitmentRec>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    let depth = challenge_bits.len() as u32;
    if pdec.len() != depth as usize {
        return Err(VoleError::BufferLength {
            name: "pdec",
            actual: pdec.len(),
            expected: depth as usize,
        });
    }
    let lambda_bytes = com_j.len() / 2;
    if com_j.len() != 2 * lambda_bytes {
        return Err(VoleError::BufferLength {
            name: "com_j",
            actual: com_j.len(),
            expected: 2 * lambda_bytes,
        });
    }

    let offset = num_rec(challenge_bits);
    let num_leaves = 1u64 << depth;
    let mut raw_leaves: Vec<Option<Vec<u8>>> = vec![None; num_leaves as usize];

    let zero = zero_iv();
    let mut a: u64 = 0;
    for i in 0..depth {
        let bit = challenge_bits[(depth - 1 - i) as usize];
        let sibling_idx = 2 * a + u64::from(bit == 0);
        expand_subtree(&pdec[i as usize], i + 1, sibling_idx, depth, prg, &zero, &mut raw_leaves);
        a = 2 * a + u64::from(bit != 0);
    }
    debug_assert_eq!(a, offset, "challenge bits must trace back to NumRec(b)");

    let mut sd: Vec<Option<Vec<u8>>> = vec![None; num_leaves as usize];
    let mut com: Vec<Vec<u8>> = vec![Vec::new(); num_leaves as usize];
    for i in 0..num_leaves {
        if i == offset {
            com[i as usize] = com_j.to_vec();
            continue;
        }
        let leaf = raw_leaves[i as usize]
            .take()
            .expect("every non-hidden leaf is reachable from some revealed sibling subtree");
        let mut sd_i = vec![0u8; lambda_bytes];
        let mut com_i = vec![0u8; 2 * lambda_bytes];
        h0.hash(&leaf, iv, &mut sd_i, &mut com_i);
        sd[i as usize] = Some(sd_i);
        com[i as usize] = com_i;
    }

    // Absorption order must match the commit side exactly: increasing
    // leaf index, hidden slot included via `com_j` (spec §3 "Ordering").
    for c in &com {
        h1.absorb(c);
    }
    let mut h = vec![0u8; 2 * lambda_bytes];
    h1.finalize_into(&mut h);

    Ok(VectorCommitmentRec {
        h,
        com,
        sd,
        depth,
        offset,
    })
}

/// Reconstruct and compare against the prover's `h` (spec §7.2 "Verification
/// failure", §8 Property 6). Returns the reconstructed view on success.
///
/// # Errors
/// Returns [`VoleError::VerificationFailed`] if the recomputed `h` doesn't
/// match `expected_h`, or any error [`vector_reconstruction`] can return.
pub fn vector_verify<P, O0, O1>(
    pdec: &[Vec<u8>],
    com_j: &[u8],
    challenge_bits: &[u8],
    iv: &[u8; IV_SIZE],
    prg: &P,
    h0: &O0,
    h1: O1,
    expected_h: &[u8],
) -> Result<VectorCommitmentRec>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    let rec = vector_reconstruction(pdec, com_j, challenge_bits, iv, prg, h0, h1)?;
    if rec.h == expected_h {
        Ok(rec)
    } else {
        Err(VoleError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::vector_commitment;
    use vole_crypto::{AesCtrPrg, RandomOracle1, Shake256H0, Shake256H1};

    #[test]
    fn honest_reconstruction_matches_commit_h_and_leaves() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv = zero_iv();
        let root = [0x5bu8; 16];
        let depth = 5;
        let vc = vector_commitment(&root, &iv, depth, &prg, &h0, Shake256H1::new()).unwrap();

        for hidden in [0u64, 1, 7, 31] {
            let bits: Vec<u8> = (0..depth).map(|i| ((hidden >> i) & 1) as u8).collect();
            let (pdec, com_j) = vc.open(&bits);
            let rec =
                vector_verify(&pdec, &com_j, &bits, &iv, &prg, &h0, Shake256H1::new(), &vc.h)
                    .unwrap();
            assert_eq!(rec.offset, hidden);
            for i in 0..(1u64 << depth) {
                if i == hidden {
                    assert!(rec.sd[i as usize].is_none());
                } else {
                    assert_eq!(rec.sd[i as usize].as_deref(), Some(vc.sd[i as usize].as_slice()));
                }
                assert_eq!(rec.com[i as usize], vc.com[i as usize]);
            }
        }
    }

    #[test]
    fn tampered_pdec_fails_verification() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv = zero_iv();
        let root = [0x11u8; 16];
        let depth = 4;
        let vc = vector_commitment(&root, &iv, depth, &prg, &h0, Shake256H1::new()).unwrap();
        let bits = vec![0u8; depth as usize];
        let (mut pdec, com_j) = vc.open(&bits);
        pdec[0][0] ^= 0x01;

        let err = vector_verify(&pdec, &com_j, &bits, &iv, &prg, &h0, Shake256H1::new(), &vc.h)
            .unwrap_err();
        assert_eq!(err, VoleError::VerificationFailed);
    }

    #[test]
    fn tampered_com_j_fails_verification() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv = zero_iv();
        let root = [0x22u8; 16];
        let depth = 4;
        let vc = vector_commitment(&root, &iv, depth, &prg, &h0, Shake256H1::new()).unwrap();
        let bits = vec![1u8, 0, 1, 0];
        let (pdec, mut com_j) = vc.open(&bits);
        com_j[0] ^= 0x01;

        let err = vector_verify(&pdec, &com_j, &bits, &iv, &prg, &h0, Shake256H1::new(), &vc.h)
            .unwrap_err();
        assert_eq!(err, VoleError::VerificationFailed);
    }
}
