//! The `H0`/`H1` random-oracle external collaborators (spec §6), concretely
//! instantiated with SHAKE-256, a Keccak/SHA-3 extendable-output function
//! well suited to producing the two differently-sized outputs `H0` needs
//! from one absorb.
//!
//! `H0` is a one-shot function of a single leaf seed that yields both the
//! short VOLE seed `sd` and the longer leaf commitment `com` from one
//! absorb; `H1` is an incremental absorber used to fold a whole tree's
//! `com` values (or a whole VOLE batch's per-tree `h` values) into one
//! digest. Both are domain-separated from each other and from the PRG so
//! that a seed used as a PRG key can never be replayed as a hash input with
//! the same output.

use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};
use vole_core::params::IV_SIZE;

const H0_DOMAIN: &[u8] = b"vole-core.H0.v1";
const H1_DOMAIN: &[u8] = b"vole-core.H1.v1";

/// `H0(leaf ∥ iv) -> (sd, com)` (spec §4.1, §6).
pub trait RandomOracle0 {
    /// Absorb `leaf ∥ iv` and squeeze `sd_out.len()` bytes of seed material
    /// followed by `com_out.len()` bytes of commitment material from the
    /// same XOF stream.
    fn hash(&self, leaf: &[u8], iv: &[u8; IV_SIZE], sd_out: &mut [u8], com_out: &mut [u8]);
}

/// `H1`: a variable-length absorber that finalizes to a fixed-length digest
/// (spec §4.1, §6). Used once per tree (folding `com_i`) and once per VOLE
/// batch (folding `h_t`).
pub trait RandomOracle1 {
    /// A fresh, empty absorber.
    fn new() -> Self;
    /// Absorb another chunk of input, in order.
    fn absorb(&mut self, bytes: &[u8]);
    /// Consume the context and write the final digest into `out`.
    fn finalize_into(self, out: &mut [u8]);
}

/// SHAKE-256-backed `H0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shake256H0;

impl RandomOracle0 for Shake256H0 {
    fn hash(&self, leaf: &[u8], iv: &[u8; IV_SIZE], sd_out: &mut [u8], com_out: &mut [u8]) {
        let mut hasher = Shake256::default();
        hasher.update(H0_DOMAIN);
        hasher.update(leaf);
        hasher.update(iv);
        let mut reader = hasher.finalize_xof();
        reader.read(sd_out);
        reader.read(com_out);
    }
}

/// SHAKE-256-backed `H1`.
#[derive(Clone, Debug)]
pub struct Shake256H1 {
    hasher: Shake256,
}

impl RandomOracle1 for Shake256H1 {
    fn new() -> Self {
        let mut hasher = Shake256::default();
        hasher.update(H1_DOMAIN);
        Self { hasher }
    }

    fn absorb(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn finalize_into(self, out: &mut [u8]) {
        let mut reader = self.hasher.finalize_xof();
        reader.read(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h0_deterministic_and_not_trivially_colliding() {
        let h0 = Shake256H0;
        let leaf = [0x42u8; 16];
        let iv = [0x11u8; IV_SIZE];
        let mut sd = [0u8; 16];
        let mut com = [0u8; 32];
        h0.hash(&leaf, &iv, &mut sd, &mut com);
        assert_ne!(sd.to_vec(), com[..16].to_vec());

        let mut sd2 = [0u8; 16];
        let mut com2 = [0u8; 32];
        h0.hash(&leaf, &iv, &mut sd2, &mut com2);
        assert_eq!(sd, sd2);
        assert_eq!(com, com2);
    }

    #[test]
    fn h0_different_iv_differs() {
        let h0 = Shake256H0;
        let leaf = [0x01u8; 16];
        let mut sd_a = [0u8; 16];
        let mut com_a = [0u8; 32];
        h0.hash(&leaf, &[0u8; IV_SIZE], &mut sd_a, &mut com_a);

        let mut iv_b = [0u8; IV_SIZE];
        iv_b[0] = 1;
        let mut sd_b = [0u8; 16];
        let mut com_b = [0u8; 32];
        h0.hash(&leaf, &iv_b, &mut sd_b, &mut com_b);

        assert_ne!(sd_a, sd_b);
    }

    #[test]
    fn h1_order_sensitive_and_deterministic() {
        let mut h1a = Shake256H1::new();
        h1a.absorb(b"one");
        h1a.absorb(b"two");
        let mut out_a = [0u8; 32];
        h1a.finalize_into(&mut out_a);

        let mut h1b = Shake256H1::new();
        h1b.absorb(b"two");
        h1b.absorb(b"one");
        let mut out_b = [0u8; 32];
        h1b.finalize_into(&mut out_b);

        assert_ne!(out_a, out_b, "H1 must be sensitive to absorb order");

        let mut h1c = Shake256H1::new();
        h1c.absorb(b"one");
        h1c.absorb(b"two");
        let mut out_c = [0u8; 32];
        h1c.finalize_into(&mut out_c);
        assert_eq!(out_a, out_c);
    }
}
