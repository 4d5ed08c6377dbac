//! Bit-level utilities shared by the tree, vector-commitment, and VOLE
//! layers: leaf index <-> bit-string conversion (spec §3 "leaf bijection")
//! and the challenge window decoder (spec §4.2).

use crate::error::{Result, VoleError};
use crate::params::ParamSet;

/// Little-endian bit decomposition of a leaf index into `depth` 0/1 bytes
/// (spec §4: "Gets the bit string of a node according to its position in
/// the binary tree").
///
/// `out[i]` is the `i`-th least-significant bit of `leaf_index`.
pub fn bit_dec(leaf_index: u64, depth: u32) -> Result<Vec<u8>> {
    if depth < 64 && leaf_index >= (1u64 << depth) {
        return Err(VoleError::InvalidLeafIndex { leaf_index, depth });
    }
    let mut out = Vec::with_capacity(depth as usize);
    let mut i = leaf_index;
    for _ in 0..depth {
        out.push((i & 1) as u8);
        i >>= 1;
    }
    Ok(out)
}

/// Inverse of [`bit_dec`]: reconstruct the leaf index from its little-endian
/// bit decomposition. `bi` need not be validated as 0/1 bytes by the caller;
/// any nonzero byte is treated as 1.
#[must_use]
pub fn num_rec(bi: &[u8]) -> u64 {
    let mut out = 0u64;
    for (i, &b) in bi.iter().enumerate() {
        if b != 0 {
            out |= 1u64 << i;
        }
    }
    out
}

/// Decode the `i`-th tree's challenge window out of a `lambda`-bit
/// challenge (spec §4.2).
///
/// Returns one 0/1 byte per bit of the window, least-significant bit
/// first, matching [`bit_dec`]'s convention so `num_rec(chal_dec(...))`
/// gives the hidden leaf index directly.
pub fn chal_dec(chal: &[u8], i: u32, params: &ParamSet) -> Result<Vec<u8>> {
    let tau = params.tau();
    if i >= tau {
        return Err(VoleError::ChallengeTreeIndexOutOfRange { index: i, tau });
    }

    let (lo, hi) = if i < params.tau0 {
        (i * params.k0, (i + 1) * params.k0)
    } else {
        let t = i - params.tau0;
        (
            params.tau0 * params.k0 + t * params.k1,
            params.tau0 * params.k0 + (t + 1) * params.k1,
        )
    };

    let mut out = Vec::with_capacity((hi - lo) as usize);
    for j in lo..hi {
        out.push(get_bit(chal, j));
    }
    Ok(out)
}

/// Read bit `j` (0 = least significant of byte 0) of a byte string.
#[inline]
#[must_use]
pub fn get_bit(bytes: &[u8], j: u32) -> u8 {
    let byte = bytes[(j / 8) as usize];
    (byte >> (j % 8)) & 1
}

/// XOR `src` into `dst` in place; both slices must have equal length.
#[inline]
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len(), "xor_into: length mismatch");
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
