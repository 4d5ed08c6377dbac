//! Commit-side orchestration across all `τ` trees (spec §4.6), grounded
//! on `vole_stream.c`'s `stream_vole_commit`/`partial_vole_commit_cmo`/
//! `partial_vole_commit_rmo`.
//!
//! A VOLE commitment is not one seed tree but a forest of `τ`: the first
//! `tau0` at depth `k0`, the rest at depth `k1` (spec §3). This module
//! expands the `τ` sub-root seeds from a single root key, drives the
//! per-tree CMO/RMO constructors over the right column/row windows, and
//! folds the per-tree `u_t`/`h_t` into the commitment's `u`/`c`/`hcom`.

use tracing::debug;

use vole_core::params::{ParamSet, IV_SIZE};
use vole_core::Result;
use vole_crypto::{Prg, RandomOracle0, RandomOracle1};
use vole_vc::{vector_commitment_no_hash, StreamLeafSource};

use crate::cmo::construct_cmo;
use crate::rmo::construct_rmo;

/// The full output of [`stream_vole_commit`]: the `τ` sub-root seeds (kept
/// so a revealed tree can be re-materialized for [`VoleCommitment::open_tree`]
/// once the challenge is known), the full CMO-layout `V`, the folded
/// `u`/`c` pair, and the combined `hcom`.
pub struct VoleCommitment {
    /// Sub-root seeds, one per tree, in tree order (spec §4.6: "expands
    /// the τ sub-root seeds from `rootKey` via one PRG call").
    pub sub_roots: Vec<Vec<u8>>,
    /// `u_0`, the degree-0 tree's folded PRG output.
    pub u: Vec<u8>,
    /// Full CMO-layout `V`, all `total_columns()` columns of
    /// `ellhat_bytes` bytes each, column-major across the whole forest.
    pub v: Vec<u8>,
    /// `c_{t-1} = u_0 ⊕ u_t` for `t = 1..τ`, in tree order (length `τ-1`).
    pub c: Vec<Vec<u8>>,
    /// Combined commitment: `H1` absorption of every tree's `h_t`, in
    /// order.
    pub hcom: Vec<u8>,
}

impl VoleCommitment {
    /// Re-materialize tree `t` and produce its decommitment (`pdec`,
    /// `com_j`) for the hidden leaf `NumRec(bits)` (spec §6 "Persisted
    /// format").
    ///
    /// Unlike the bounded-memory streaming pass that produced `u`/`v`/
    /// `hcom`, producing `pdec` needs the tree's internal co-path nodes,
    /// so this re-expands tree `t` in full — but skips the redundant
    /// `H1` absorption a full materialized build would otherwise run,
    /// since `h_t` was already folded into `hcom` during the streaming
    /// pass (`vector_commitment_no_hash`).
    ///
    /// # Errors
    /// Propagates a [`vole_core::VoleError`] if `t` is out of range or
    /// tree materialization fails.
    pub fn open_tree<P, O0, O1>(
        &self,
        t: u32,
        bits: &[u8],
        iv: &[u8; IV_SIZE],
        prg: &P,
        h0: &O0,
    ) -> Result<(Vec<Vec<u8>>, Vec<u8>)>
    where
        P: Prg,
        O0: RandomOracle0,
        O1: RandomOracle1,
    {
        let depth = bits.len() as u32;
        let vc = vector_commitment_no_hash::<P, O0, O1>(&self.sub_roots[t as usize], iv, depth, prg, h0)?;
        Ok(vc.open(bits))
    }
}

/// Expand the `τ` sub-root seeds from `root_key` with a single PRG call
/// (spec §4.6: "expands τ sub-root seeds from rootKey via one PRG call,
/// `λ_B·τ` bytes").
fn expand_sub_roots(root_key: &[u8], iv: &[u8; IV_SIZE], prg: &impl Prg, params: &ParamSet) -> Vec<Vec<u8>> {
    let lambda_bytes = params.lambda_bytes() as usize;
    let tau = params.tau() as usize;
    let mut buf = vec![0u8; lambda_bytes * tau];
    prg.expand(root_key, iv, &mut buf);
    buf.chunks(lambda_bytes).map(<[u8]>::to_vec).collect()
}

/// Commit to the full forest in CMO layout, folding `u_0` against every
/// other tree's `u_t` into `c`, combining all `h_t` into `hcom`, and
/// emitting the full `V` matrix — all fused into one streaming pass per
/// tree over a bounded-memory [`StreamLeafSource`] (spec §4.6
/// `stream_vole_commit`; the original's `vole_commit_u_hcom_c` is the
/// degenerate no-`v` case, not this function).
///
/// # Errors
/// Propagates any [`vole_core::VoleError`] raised while running an
/// individual tree's CMO constructor.
pub fn stream_vole_commit<P, O0, O1>(
    root_key: &[u8],
    iv: &[u8; IV_SIZE],
    params: &ParamSet,
    prg: &P,
    h0: &O0,
) -> Result<VoleCommitment>
where
    P: Prg,
    O0: RandomOracle0,
    O1: RandomOracle1,
{
    let out_len_bytes = params.ellhat_bytes();
    let lambda_bytes = params.lambda_bytes();
    let sub_roots = expand_sub_roots(root_key, iv, prg, params);

    let mut v = vec![0u8; params.total_columns() as usize * out_len_bytes as usize];
    let mut us = Vec::with_capacity(params.tau() as usize);
    let mut hcom_ctx = O1::new();

    for (t, sub_root) in sub_roots.iter().enumerate() {
        let t = t as u32;
        let depth = params.tree_depth(t)?;
        debug!(tree = t, depth, "committing tree (streaming)");
        let mut source = StreamLeafSource::new(sub_root.clone(), depth, *iv, prg, h0);
        let out = construct_cmo::<_, _, O1>(
            &mut source, iv, prg, lambda_bytes, out_len_bytes, 0, depth, true, true, true,
        )?;
        hcom_ctx.absorb(out.h.as_ref().expect("h requested"));
        us.push(out.u.expect("u requested"));

        let col0 = params.tree_column_offset(t) as usize;
        let local = out.v.expect("v requested");
        v[col0 * out_len_bytes as usize..][..local.len()].copy_from_slice(&local);
    }

    let u0 = us[0].clone();
    let c = us[1..]
        .iter()
        .map(|u_t| {
            let mut c_t = u0.clone();
            vole_core::bits::xor_into(&mut c_t, u_t);
            c_t
        })
        .collect();

    let mut hcom = vec![0u8; 2 * lambda_bytes as usize];
    hcom_ctx.finalize_into(&mut hcom);

    Ok(VoleCommitment {
        sub_roots,
        u: u0,
        v,
        c,
        hcom,
    })
}

/// Commit to a single column window `[begin, end)` of the full VOLE
/// matrix in CMO layout, across whichever trees that window spans
/// (spec §4.6 `partial_vole_commit_cmo`).
///
/// `begin`/`end` are global column indices over `[0, params.total_columns())`.
///
/// # Errors
/// Returns [`vole_core::VoleError::InvalidWindow`] if the window is out
/// of range, or propagates errors from the underlying tree commitments.
pub fn partial_vole_commit_cmo<P, O0, O1>(
    root_key: &[u8],
    iv: &[u8; IV_SIZE],
    params: &ParamSet,
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
        return Err(vole_core::VoleError::InvalidWindow {
            begin,
            end,
            total: params.total_columns(),
        });
    }
    let out_len_bytes = params.ellhat_bytes();
    let sub_roots = expand_sub_roots(root_key, iv, prg, params);
    let mut v = vec![0u8; (end - begin) as usize * out_len_bytes as usize];

    for (t, sub_root) in sub_roots.iter().enumerate() {
        let t = t as u32;
        let depth = params.tree_depth(t)?;
        let tree_start = params.tree_column_offset(t);
        let tree_end = tree_start + depth;
        let (lo, hi) = (begin.max(tree_start), end.min(tree_end));
        if lo >= hi {
            continue;
        }
        debug!(tree = t, lo, hi, "partial CMO commit: tree overlaps window (streaming)");
        let mut source = StreamLeafSource::new(sub_root.clone(), depth, *iv, prg, h0);
        let out = construct_cmo::<_, _, O1>(
            &mut source,
            iv,
            prg,
            params.lambda_bytes(),
            out_len_bytes,
            lo - tree_start,
            hi - tree_start,
            false,
            true,
            false,
        )?;
        let local = out.v.expect("v requested");
        let dst_col0 = (lo - begin) as usize;
        v[dst_col0 * out_len_bytes as usize..][..local.len()].copy_from_slice(&local);
    }

    Ok(v)
}

/// Commit to a row window `[start, start+len)` of the full VOLE matrix
/// in RMO layout, across every tree (spec §4.6 `partial_vole_commit_rmo`):
/// every tree contributes its own `depth`-bit slice at its own global
/// column offset, all within the same row window.
///
/// # Errors
/// Propagates errors from the underlying tree commitments or an
/// out-of-range row window.
pub fn partial_vole_commit_rmo<P, O0, O1>(
    root_key: &[u8],
    iv: &[u8; IV_SIZE],
    params: &ParamSet,
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
    let sub_roots = expand_sub_roots(root_key, iv, prg, params);
    let mut v = vec![0u8; len as usize * lambda_bytes as usize];

    for (t, sub_root) in sub_roots.iter().enumerate() {
        let t = t as u32;
        let depth = params.tree_depth(t)?;
        let col_idx = params.tree_column_offset(t);
        debug!(tree = t, depth, col_idx, "partial RMO commit: tree slice (streaming)");
        let mut source = StreamLeafSource::new(sub_root.clone(), depth, *iv, prg, h0);
        let out = construct_rmo::<_, _, O1>(
            &mut source,
            iv,
            prg,
            lambda_bytes,
            out_len_bytes,
            start,
            len,
            col_idx,
            false,
            true,
            false,
        )?;
        vole_core::bits::xor_into(&mut v, &out.v.expect("v requested"));
    }

    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vole_core::params::IV_SIZE;
    use vole_crypto::{zero_iv, AesCtrPrg, Shake256H0, Shake256H1};

    fn tiny_params() -> ParamSet {
        // A small forest that exercises tau0/tau1 split without the cost
        // of a real FAEST-sized commitment.
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

    #[test]
    fn stream_commit_u_and_c_are_internally_consistent() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x9au8; 16];

        let commitment =
            stream_vole_commit::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0).unwrap();
        assert_eq!(commitment.sub_roots.len(), params.tau() as usize);
        assert_eq!(commitment.c.len(), params.tau() as usize - 1);
        assert_eq!(commitment.u.len(), params.ellhat_bytes() as usize);
        assert_eq!(
            commitment.v.len(),
            params.total_columns() as usize * params.ellhat_bytes() as usize
        );
    }

    #[test]
    fn stream_commit_v_matches_partial_cmo_over_full_range() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x9au8; 16];

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
        assert_eq!(commitment.v, v);
    }

    #[test]
    fn partial_cmo_window_matches_full_commit_slice() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x5du8; 16];

        let full =
            partial_vole_commit_cmo::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0, 0, 2)
                .unwrap();
        assert_eq!(full.len(), 2 * params.ellhat_bytes() as usize);
    }

    #[test]
    fn partial_rmo_window_has_expected_shape() {
        let prg = AesCtrPrg;
        let h0 = Shake256H0;
        let iv: [u8; IV_SIZE] = zero_iv();
        let params = tiny_params();
        let root = [0x61u8; 16];

        let rows = params.ellhat_bytes() * 8;
        let v = partial_vole_commit_rmo::<_, _, Shake256H1>(&root, &iv, &params, &prg, &h0, 0, rows)
            .unwrap();
        assert_eq!(v.len(), rows as usize * params.lambda_bytes() as usize);
    }
}
