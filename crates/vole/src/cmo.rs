//! Column-major VOLE constructor and reconstructor (spec §4.3, §4.5),
//! grounded on `vole.c`/`vole_stream.c`'s `ConstructVoleCMO` and
//! `ReconstructVoleCMO`.
//!
//! Both operate over one seed tree at a time; the multi-tree orchestration
//! (column windows, `u`/`c` folding, `hcom` combination) lives in
//! [`crate::commit`] and [`crate::reconstruct`].

use vole_core::bits::xor_into;
use vole_core::params::IV_SIZE;
use vole_core::{Result, VoleError};
use vole_crypto::{Prg, RandomOracle1};
use vole_vc::{LeafSource, VectorCommitmentRec};

use crate::bitutil::get_bit_u64;

/// What a single CMO pass over a tree produces, per spec §4.3 step 1's
/// three independent mode selectors (`u`, `v`, `h`).
#[derive(Debug, Default)]
pub struct CmoOutput {
    /// `u_t = XOR over all i of r_i`, if requested.
    pub u: Option<Vec<u8>>,
    /// Column block `V[:, begin..end)` for this tree, row-major within the
    /// block (`(end - begin)` columns of `out_len_bytes` bytes each), if
    /// requested.
    pub v: Option<Vec<u8>>,
    /// `h_t`, if requested.
    pub h: Option<Vec<u8>>,
}

fn validate_window(begin: u32, end: u32, depth: u32) -> Result<()> {
    if begin > end || end > depth {
        return Err(VoleError::InvalidWindow {
            begin,
            end,
            total: depth,
        });
    }
    Ok(())
}

/// CMO constructor over one tree (spec §4.3): for each leaf `i`, expand
/// `sd_i` to `out_len_bytes` pseudorandom bytes `r_i`, fold it
/// unconditionally into `u`, fold it into every requested column `j` whose
/// `i`-th bit is set, and absorb `com_i` into `H1` in leaf order.
pub fn construct_cmo<S, P, O1>(
    source: &mut S,
    iv: &[u8; IV_SIZE],
    prg: &P,
    lambda_bytes: u32,
    out_len_bytes: u32,
    begin: u32,
    end: u32,
    want_u: bool,
    want_v: bool,
    want_h: bool,
) -> Result<CmoOutput>
where
    S: LeafSource,
    P: Prg,
    O1: RandomOracle1,
{
    let depth = source.depth();
    validate_window(begin, end, depth)?;
    let num_leaves = 1u64 << depth;
    let col_count = (end - begin) as usize;

    let mut u = want_u.then(|| vec![0u8; out_len_bytes as usize]);
    let mut v = want_v.then(|| vec![0u8; col_count * out_len_bytes as usize]);
    let mut h1 = want_h.then(O1::new);

    let mut r = vec![0u8; out_len_bytes as usize];
    for i in 0..num_leaves {
        let (sd, com) = source.leaf(i);
        if let Some(ctx) = h1.as_mut() {
            ctx.absorb(&com);
        }

        prg.expand(&sd, iv, &mut r);
        if let Some(u) = u.as_mut() {
            xor_into(u, &r);
        }
        if let Some(v) = v.as_mut() {
            for j in begin..end {
                if get_bit_u64(i, j) == 1 {
                    let start = ((j - begin) * out_len_bytes) as usize;
                    xor_into(&mut v[start..start + out_len_bytes as usize], &r);
                }
            }
        }
    }

    let h = h1.map(|ctx| {
        let mut out = vec![0u8; 2 * lambda_bytes as usize];
        ctx.finalize_into(&mut out);
        out
    });

    Ok(CmoOutput { u, v, h })
}

/// CMO reconstructor over one tree (spec §4.5): same leaf loop, but the
/// hidden leaf `rec.offset` is skipped (its `com_j` is absorbed in place
/// of a recomputed `com`, and it contributes no `r`), and every other
/// leaf's contribution is placed using the bits of `i' = i XOR offset`
/// rather than `i` (spec §4.5 step 3, the `i' = i ⊕ offset` reindexing).
pub fn reconstruct_cmo<P, O1>(
    rec: &VectorCommitmentRec,
    iv: &[u8; IV_SIZE],
    prg: &P,
    lambda_bytes: u32,
    out_len_bytes: u32,
    begin: u32,
    end: u32,
    want_q: bool,
    want_h: bool,
) -> Result<(Option<Vec<u8>>, Option<Vec<u8>>)>
where
    P: Prg,
    O1: RandomOracle1,
{
    let depth = rec.depth;
    validate_window(begin, end, depth)?;
    let num_leaves = 1u64 << depth;
    let col_count = (end - begin) as usize;

    let mut q = want_q.then(|| vec![0u8; col_count * out_len_bytes as usize]);
    let mut h1 = want_h.then(O1::new);
    let mut r = vec![0u8; out_len_bytes as usize];

    for i in 0..num_leaves {
        if i == rec.offset {
            if let Some(ctx) = h1.as_mut() {
                let (_, com) = rec.get(i);
                ctx.absorb(com);
            }
            continue;
        }

        let (sd, com) = rec.get(i);
        let sd = sd.expect("non-hidden leaf always has a reconstructed seed");
        if let Some(ctx) = h1.as_mut() {
            ctx.absorb(com);
        }

        if let Some(q) = q.as_mut() {
            prg.expand(sd, iv, &mut r);
            let i_prime = i ^ rec.offset;
            for j in begin..end {
                if get_bit_u64(i_prime, j) == 1 {
                    let start = ((j - begin) * out_len_bytes) as usize;
                    xor_into(&mut q[start..start + out_len_bytes as usize], &r);
                }
            }
        }
    }

    let h = h1.map(|ctx| {
        let mut out = vec![0u8; 2 * lambda_bytes as usize];
        ctx.finalize_into(&mut out);
        out
    });

    Ok((q, h))
}
