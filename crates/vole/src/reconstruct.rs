//! Reconstruct-side orchestration across all `τ` trees (spec §4.5 step
//! 4, §4.6), grounded on `vole.c`'s `partial_vole_reconstruct_cmo`/
//! `partial_vole_reconstruct_rmo`/`vole_reconstruct_hcom`.
//!
//! Mirrors [`crate::commit`] but drives [`vector_reconstruction`] instead
//! of [`vector_commitment`]: per tree, the challenge bits pick out the
//! hidden leaf and its co-path (`pdec`/`com_j`), the tree's non-hidden
//! leaves are rebuilt, and the CMO/RMO reconstructors accumulate `Q`
//! (the verifier's analog of `V`) and `h_t` over `i' = i ⊕ offset_t`.

use tracing::{debug, warn};

use vole_core::bits::chal_dec;
use vole_core::params::{ParamSet, IV_SIZE};
use vole_core::{Result, VoleError};
use vole_crypto::{Prg, RandomOracle0, RandomOracle1};
use vole_vc::vector_reconstruction;

use crate::cmo::reconstruct_cmo;
use crate::rmo::reconstruct_rmo;

/// One tree's `(pdec, com_j)` decommitment, as produced by
/// [`vole_vc::vector_open`] against that tree's challenge window.
pub struct TreeDecommitment<'a> {
    /// Co-path seeds, one per tree level.
    pub pdec: &'a [Vec<u8>],
    /// The hidden leaf's commitment.
    pub com_j: &'a [u8],
}

/// Reconstruct the column window `[begin, end)` of `Q` across every tree
/// it spans (spec §4.6 `partial_vole_reconstruct_cmo`).
///
/// # Errors
/// Returns [`VoleError::InvalidWindow`] if the window is out of range,
/// or propagates reconstruction/verification errors from any tree.
pub fn partial_vole_reconstruct_cmo<P, O0, O1>(
    decommits: &[TreeDecommitment<'_>],
    chal: &[u8],
    params: &ParamSet,
    iv: &[u8; IV_SIZE],
    prg: &P,
    h0: &O0,
    begin: u32,
    end: u32,
) -> Result<Vec<u8>>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    if begin > end || end > params.total_columns() {
        return Err(VoleError::InvalidWindow {
            begin,
            end,
            total: params.total_columns(),
        });
    }
    let out_len_bytes = params.ellhat_bytes();
    let mut q = vec![0u8; (end - begin) as usize * out_len_bytes as usize];

    for (t, decommit) in decommits.iter().enumerate() {
        let t = t as u32;
        let depth = params.tree_depth(t)?;
        let tree_start = params.tree_column_offset(t);
        let tree_end = tree_start + depth;
        let (lo, hi) = (begin.max(tree_start), end.min(tree_end));
        if lo >= hi {
            continue;
        }

        let bits = chal_dec(chal, t, params)?;
        debug!(tree = t, lo, hi, "partial CMO reconstruct: tree overlaps window");
        let rec = vector_reconstruction(
            decommit.pdec,
            decommit.com_j,
            &bits,
            iv,
            prg,
            h0,
            O1::new(),
        )?;

        let (local, _) = reconstruct_cmo::<_, O1>(
            &rec,
            iv,
            prg,
            params.lambda_bytes(),
            out_len_bytes,
            lo - tree_start,
            hi - tree_start,
            true,
            false,
        )?;
        let local = local.expect("q requested");
        let dst_col0 = (lo - begin) as usize;
        q[dst_col0 * out_len_bytes as usize..][..local.len()].copy_from_slice(&local);
    }

    Ok(q)
}

/// Reconstruct the row window `[start, start+len)` of `Q` in RMO layout
/// across every tree (spec §4.6 `partial_vole_reconstruct_rmo`).
///
/// # Errors
/// Propagates reconstruction/verification errors from any tree.
pub fn partial_vole_reconstruct_rmo<P, O0, O1>(
    decommits: &[TreeDecommitment<'_>],
    chal: &[u8],
    params: &ParamSet,
    iv: &[u8; IV_SIZE],
    prg: &P,
    h0: &O0,
    start: u32,
    len: u32,
) -> Result<Vec<u8>>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    let out_len_bytes = params.ellhat_bytes();
    let lambda_bytes = params.lambda_bytes();
    let mut q = vec![0u8; len as usize * lambda_bytes as usize];

    for (t, decommit) in decommits.iter().enumerate() {
        let t = t as u32;
        let depth = params.tree_depth(t)?;
        let col_idx = params.tree_column_offset(t);

        let bits = chal_dec(chal, t, params)?;
        debug!(tree = t, col_idx, "partial RMO reconstruct: tree slice");
        let rec = vector_reconstruction(
            decommit.pdec,
            decommit.com_j,
            &bits,
            iv,
            prg,
            h0,
            O1::new(),
        )?;

        let (local, _) = reconstruct_rmo::<_, O1>(
            &rec,
            iv,
            prg,
            lambda_bytes,
            out_len_bytes,
            start,
            len,
            col_idx,
            true,
            false,
        )?;
        vole_core::bits::xor_into(&mut q, &local.expect("q requested"));
    }

    Ok(q)
}

/// Recombine every tree's `h_t` into `hcom` (spec §4.5 step 4,
/// `vole_reconstruct_hcom`), and compare against the prover's `hcom` if
/// one is supplied.
///
/// # Errors
/// Returns [`VoleError::VerificationFailed`] if `expected_hcom` is
/// supplied and does not match, or propagates a reconstruction error
/// from any tree.
pub fn vole_reconstruct_hcom<P, O0, O1>(
    decommits: &[TreeDecommitment<'_>],
    chal: &[u8],
    params: &ParamSet,
    iv: &[u8; IV_SIZE],
    prg: &P,
    h0: &O0,
    expected_hcom: Option<&[u8]>,
) -> Result<Vec<u8>>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    let lambda_bytes = params.lambda_bytes();
    let mut hcom_ctx = O1::new();

    for (t, decommit) in decommits.iter().enumerate() {
        let t = t as u32;
        let bits = chal_dec(chal, t, params)?;
        let rec = vector_reconstruction(
            decommit.pdec,
            decommit.com_j,
            &bits,
            iv,
            prg,
            h0,
            O1::new(),
        )?;
        let (_, h_t) = reconstruct_cmo::<_, O1>(
            &rec,
            iv,
            prg,
            lambda_bytes,
            params.ellhat_bytes(),
            0,
            0,
            false,
            true,
        )?;
        hcom_ctx.absorb(&h_t.expect("h requested"));
    }

    let mut hcom = vec![0u8; 2 * lambda_bytes as usize];
    hcom_ctx.finalize_into(&mut hcom);

    if let Some(expected) = expected_hcom {
        if hcom != expected {
            warn!("hcom mismatch during reconstruction");
            return Err(VoleError::VerificationFailed);
        }
    }

    Ok(hcom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vole_core::bits::chal_dec;
    use vole_core::params::IV_SIZE;
    use vole_crypto::{zero_iv, AesCtrPrg, Shake256H0, Shake256H1};

    use crate::commit::{partial_vole_commit_cmo, partial_vole_commit_rmo, stream_vole_commit};

    fn tiny_params() -> ParamSet {
        ParamSet {
            lambda: 128,
            tau0: 2,
            tau1: 1,
            k0: 3,
            k1: 2,
            l: 8,
            universal_hash_b_bits: 8,
        }
    }

    /// A challenge whose every tree window decodes to leaf 0, i.e.
    /// `offset_t = 0` for every tree — the trivial case of the `i' = i ⊕
    /// offset_t` reindexing (spec §4.5). This still exercises the full
    /// multi-tree orchestration (windowing, column offsets, `hcom`
    /// folding); the reindexing's nontrivial cases (`offset != 0`) are
    /// covered per-tree in `cmo`'s and `rmo`'s own test suites.
    fn all_zero_challenge(params: &ParamSet) -> Vec<u8> {
        vec![0u8; params.lambda_bytes() as usize]
    }

    #[test]
    fn hcom_round_trips_through_reconstruction() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x19u8; 16];

        let commitment =
            stream_vole_commit::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0).unwrap();
        let chal = all_zero_challenge(&params);

        let opens: Vec<(Vec<Vec<u8>>, Vec<u8>)> = (0..params.tau())
            .map(|t| {
                let bits = chal_dec(&chal, t, &params).unwrap();
                commitment
                    .open_tree::<_, _, Shake256H1>(t, &bits, &iv, &prg, &h0)
                    .unwrap()
            })
            .collect();
        let decommits: Vec<TreeDecommitment<'_>> = opens
            .iter()
            .map(|(pdec, com_j)| TreeDecommitment { pdec, com_j })
            .collect();

        let hcom = vole_reconstruct_hcom::<_, _, Shake256H1>(
            &decommits,
            &chal,
            &params,
            &iv,
            &prg,
            &h0,
            Some(&commitment.hcom),
        )
        .unwrap();
        assert_eq!(hcom, commitment.hcom);
    }

    #[test]
    fn tampered_com_j_fails_hcom_reconstruction() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x27u8; 16];

        let commitment =
            stream_vole_commit::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0).unwrap();
        let chal = all_zero_challenge(&params);

        let mut opens: Vec<(Vec<Vec<u8>>, Vec<u8>)> = (0..params.tau())
            .map(|t| {
                let bits = chal_dec(&chal, t, &params).unwrap();
                commitment
                    .open_tree::<_, _, Shake256H1>(t, &bits, &iv, &prg, &h0)
                    .unwrap()
            })
            .collect();
        opens[0].1[0] ^= 0x01;
        let decommits: Vec<TreeDecommitment<'_>> = opens
            .iter()
            .map(|(pdec, com_j)| TreeDecommitment { pdec, com_j })
            .collect();

        let err = vole_reconstruct_hcom::<_, _, Shake256H1>(
            &decommits,
            &chal,
            &params,
            &iv,
            &prg,
            &h0,
            Some(&commitment.hcom),
        )
        .unwrap_err();
        assert_eq!(err, VoleError::VerificationFailed);
    }

    #[test]
    fn partial_cmo_reconstruction_matches_commit_off_hidden_columns() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x83u8; 16];

        let commitment =
            stream_vole_commit::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0).unwrap();
        let v = partial_vole_commit_cmo::<_, _, Shake256H1>(
            &root,
            &iv,
            &params,
            &prg,
            &h0,
            0,
            params.total_columns(),
        )
        .unwrap();

        // All-zero challenge hides leaf 0 of every tree; every window bit
        // is 0 there, so every column of every tree is clear of the
        // hidden leaf's contribution and Q must equal V exactly.
        let chal = all_zero_challenge(&params);
        let opens: Vec<(Vec<Vec<u8>>, Vec<u8>)> = (0..params.tau())
            .map(|t| {
                let bits = chal_dec(&chal, t, &params).unwrap();
                commitment
                    .open_tree::<_, _, Shake256H1>(t, &bits, &iv, &prg, &h0)
                    .unwrap()
            })
            .collect();
        let decommits: Vec<TreeDecommitment<'_>> = opens
            .iter()
            .map(|(pdec, com_j)| TreeDecommitment { pdec, com_j })
            .collect();

        let q = partial_vole_reconstruct_cmo::<_, _, Shake256H1>(
            &decommits,
            &chal,
            &params,
            &iv,
            &prg,
            &h0,
            0,
            params.total_columns(),
        )
        .unwrap();
        assert_eq!(q, v);
    }

    #[test]
    fn partial_rmo_reconstruction_matches_commit_off_hidden_leaf() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x44u8; 16];
        let rows = params.ellhat_bytes() * 8;

        let commitment =
            stream_vole_commit::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0).unwrap();
        let v = partial_vole_commit_rmo::<_, _, Shake256H1>(
            &root, &iv, &params, &prg, &h0, 0, rows,
        )
        .unwrap();

        let chal = all_zero_challenge(&params);
        let opens: Vec<(Vec<Vec<u8>>, Vec<u8>)> = (0..params.tau())
            .map(|t| {
                let bits = chal_dec(&chal, t, &params).unwrap();
                commitment
                    .open_tree::<_, _, Shake256H1>(t, &bits, &iv, &prg, &h0)
                    .unwrap()
            })
            .collect();
        let decommits: Vec<TreeDecommitment<'_>> = opens
            .iter()
            .map(|(pdec, com_j)| TreeDecommitment { pdec, com_j })
            .collect();

        let q = partial_vole_reconstruct_rmo::<_, _, Shake256H1>(
            &decommits, &chal, &params, &iv, &prg, &h0, 0, rows,
        )
        .unwrap();
        assert_eq!(q, v);
    }
}
