//! The PRG external collaborator (spec §6): "deterministic stream cipher
//! expansion (AES/Rijndael-based in FAEST, but treated opaquely here)".
//!
//! [`AesCtrPrg`] is a concrete, swappable instantiation: AES keyed by the
//! seed, run in counter mode seeded by `iv`, to produce an arbitrary-length
//! keystream. Nothing above this module depends on the AES choice — every
//! call site goes through the [`Prg`] trait.

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use generic_array::GenericArray;
use vole_core::params::IV_SIZE;

/// Deterministic seed expansion: `prg(seed, iv, out, lambda, outLen)` from
/// spec §6, minus the redundant `lambda`/`outLen` (both are recoverable
/// from `seed.len()` and `out.len()`).
pub trait Prg {
    /// Fill `out` with `out.len()` pseudorandom bytes derived from `seed`
    /// and `iv`. Deterministic: same `(seed, iv, out.len())` always
    /// produces the same bytes.
    fn expand(&self, seed: &[u8], iv: &[u8; IV_SIZE], out: &mut [u8]);
}

/// AES-CTR-style expansion: keyed by `seed` (16/24/32 bytes selecting
/// AES-128/192/256), counter initialized from `iv` and incremented as a
/// big-endian 128-bit integer per 16-byte block.
#[derive(Clone, Copy, Debug, Default)]
pub struct AesCtrPrg;

enum Keyed {
    K128(Box<Aes128>),
    K192(Box<Aes192>),
    K256(Box<Aes256>),
}

impl Keyed {
    fn new(seed: &[u8]) -> Self {
        match seed.len() {
            16 => Self::K128(Box::new(Aes128::new(GenericArray::from_slice(seed)))),
            24 => Self::K192(Box::new(Aes192::new(GenericArray::from_slice(seed)))),
            32 => Self::K256(Box::new(Aes256::new(GenericArray::from_slice(seed)))),
            // ParamSet only ever hands out 16/24/32-byte seeds (lambda in
            // {128,192,256}); any other length is a domain violation
            // (spec §7.4), not a reachable caller input.
            other => unreachable!("unsupported PRG seed length {other}"),
        }
    }

    fn encrypt_block(&self, block: &mut GenericArray<u8, generic_array::typenum::U16>) {
        match self {
            Self::K128(c) => c.encrypt_block(block),
            Self::K192(c) => c.encrypt_block(block),
            Self::K256(c) => c.encrypt_block(block),
        }
    }
}

fn increment_counter(counter: &mut [u8; IV_SIZE]) {
    for b in counter.iter_mut().rev() {
        let (v, carry) = b.overflowing_add(1);
        *b = v;
        if !carry {
            break;
        }
    }
}

impl Prg for AesCtrPrg {
    fn expand(&self, seed: &[u8], iv: &[u8; IV_SIZE], out: &mut [u8]) {
        let keyed = Keyed::new(seed);
        let mut counter = *iv;
        let mut produced = 0usize;
        while produced < out.len() {
            let mut block = GenericArray::clone_from_slice(&counter);
            keyed.encrypt_block(&mut block);
            let take = (out.len() - produced).min(IV_SIZE);
            out[produced..produced + take].copy_from_slice(&block[..take]);
            produced += take;
            increment_counter(&mut counter);
        }
    }
}

/// The fixed all-zero IV used for internal seed-tree PRG calls (spec §9:
/// "Zero-IV for internal PRG"). The outer `prg` calls made by the VOLE
/// constructor/reconstructor use the caller-supplied IV instead.
#[must_use]
pub const fn zero_iv() -> [u8; IV_SIZE] {
    [0u8; IV_SIZE]
}
