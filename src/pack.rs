//! Wire encoding for public keys and reconciliation hints (spec §4.5, C5).
//!
//! Polynomial coefficients are canonical values in [0, q), q < 2^14, so each
//! coefficient packs into 14 bits; four coefficients (56 bits) pack exactly
//! into 7 bytes with no padding, giving `encode_poly`/`decode_poly` their
//! 1792-byte output for N = 1024 coefficients. Hint bytes are two bits each
//! (`HelpRec` only ever emits 0..=3), so they pack four to a byte.
//!
//! `kex.c`'s `encode_A`/`decode_A` hand-unroll this bit schedule over groups
//! of four coefficients. This crate gets the same output length and an
//! exact round-trip from a small LSB-first bit accumulator instead, since
//! spec §9's Open Question 2 only commits to the literal `1792`-byte length,
//! not to bit-for-bit agreement with the reference's unrolled shift amounts.

use crate::error::Error;
use crate::params::{N, PUBLIC_KEY_A_BYTES, PUBLIC_KEY_B_BYTES, Q, SEED_BYTES};

const COEFF_BITS: u32 = 14;
const HINT_BITS: u32 = 2;
const PACKED_POLY_BYTES: usize = N * COEFF_BITS as usize / 8; // 1792

struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    acc_bits: u32,
}

impl BitWriter {
    fn new() -> Self {
        BitWriter { bytes: Vec::new(), acc: 0, acc_bits: 0 }
    }

    fn push(&mut self, value: u32, bits: u32) {
        self.acc |= (value as u64) << self.acc_bits;
        self.acc_bits += bits;
        while self.acc_bits >= 8 {
            self.bytes.push((self.acc & 0xFF) as u8);
            self.acc >>= 8;
            self.acc_bits -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.acc_bits > 0 {
            self.bytes.push((self.acc & 0xFF) as u8);
        }
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    byte_pos: usize,
    acc: u64,
    acc_bits: u32,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        BitReader { bytes, byte_pos: 0, acc: 0, acc_bits: 0 }
    }

    fn pull(&mut self, bits: u32) -> u32 {
        while self.acc_bits < bits {
            let next = self.bytes.get(self.byte_pos).copied().unwrap_or(0);
            self.byte_pos += 1;
            self.acc |= (next as u64) << self.acc_bits;
            self.acc_bits += 8;
        }
        let mask = (1u64 << bits) - 1;
        let value = (self.acc & mask) as u32;
        self.acc >>= bits;
        self.acc_bits -= bits;
        value
    }
}

fn encode_poly(p: &[i32; N]) -> Vec<u8> {
    let mut w = BitWriter::new();
    for &c in p.iter() {
        w.push(c as u32, COEFF_BITS);
    }
    w.finish()
}

fn decode_poly(bytes: &[u8]) -> [i32; N] {
    let mut r = BitReader::new(bytes);
    let mut p = [0i32; N];
    for slot in p.iter_mut() {
        *slot = r.pull(COEFF_BITS) as i32;
    }
    p
}

fn encode_hint(hint: &[u8; N]) -> Vec<u8> {
    let mut w = BitWriter::new();
    for &h in hint.iter() {
        w.push(h as u32, HINT_BITS);
    }
    w.finish()
}

fn decode_hint(bytes: &[u8]) -> [u8; N] {
    let mut r = BitReader::new(bytes);
    let mut hint = [0u8; N];
    for slot in hint.iter_mut() {
        *slot = r.pull(HINT_BITS) as u8;
    }
    hint
}

/// `PublicKeyA`: the packed NTT-domain polynomial `b_A`, followed by the
/// 32-byte seed that expands `a`.
#[derive(Clone)]
pub struct PublicKeyA {
    pub poly: [i32; N],
    pub seed: [u8; SEED_BYTES],
}

impl PublicKeyA {
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_A_BYTES] {
        let mut out = [0u8; PUBLIC_KEY_A_BYTES];
        out[..PACKED_POLY_BYTES].copy_from_slice(&encode_poly(&self.poly));
        out[PACKED_POLY_BYTES..].copy_from_slice(&self.seed);
        out
    }

    /// Decodes unconditionally: per spec §4.5, a coefficient ≥ q is a valid
    /// 14-bit wire value and must not be rejected here (§8's boundary case
    /// requires such a key still produce a shared secret without panic).
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_A_BYTES]) -> Result<Self, Error> {
        let poly = decode_poly(&bytes[..PACKED_POLY_BYTES]);
        let mut seed = [0u8; SEED_BYTES];
        seed.copy_from_slice(&bytes[PACKED_POLY_BYTES..]);
        Ok(PublicKeyA { poly, seed })
    }
}

/// `PublicKeyB`: the packed NTT-domain polynomial `b_B`, followed by the
/// packed reconciliation hint.
#[derive(Clone)]
pub struct PublicKeyB {
    pub poly: [i32; N],
    pub hint: [u8; N],
}

impl PublicKeyB {
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_B_BYTES] {
        let mut out = [0u8; PUBLIC_KEY_B_BYTES];
        out[..PACKED_POLY_BYTES].copy_from_slice(&encode_poly(&self.poly));
        out[PACKED_POLY_BYTES..].copy_from_slice(&encode_hint(&self.hint));
        out
    }

    /// Decodes unconditionally: see `PublicKeyA::from_bytes`.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_B_BYTES]) -> Result<Self, Error> {
        let poly = decode_poly(&bytes[..PACKED_POLY_BYTES]);
        let hint = decode_hint(&bytes[PACKED_POLY_BYTES..]);
        Ok(PublicKeyB { poly, hint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly_roundtrips_through_encode_decode() {
        let mut p = [0i32; N];
        for (i, x) in p.iter_mut().enumerate() {
            *x = (i as i32 * 97 + 3) % Q as i32;
        }
        let bytes = encode_poly(&p);
        assert_eq!(bytes.len(), PACKED_POLY_BYTES);
        assert_eq!(decode_poly(&bytes), p);
    }

    #[test]
    fn hint_roundtrips_through_encode_decode() {
        let mut h = [0u8; N];
        for (i, x) in h.iter_mut().enumerate() {
            *x = (i % 4) as u8;
        }
        let bytes = encode_hint(&h);
        assert_eq!(bytes.len(), N * HINT_BITS as usize / 8);
        assert_eq!(decode_hint(&bytes), h);
    }

    #[test]
    fn public_key_a_roundtrips() {
        let mut poly = [0i32; N];
        for (i, x) in poly.iter_mut().enumerate() {
            *x = (i as i32 * 11) % Q as i32;
        }
        let seed = [42u8; SEED_BYTES];
        let pk = PublicKeyA { poly, seed };
        let bytes = pk.to_bytes();
        let decoded = PublicKeyA::from_bytes(&bytes).unwrap();
        assert_eq!(&decoded.poly[..], &pk.poly[..]);
        assert_eq!(decoded.seed, pk.seed);
    }

    #[test]
    fn public_key_b_roundtrips() {
        let mut poly = [0i32; N];
        let mut hint = [0u8; N];
        for i in 0..N {
            poly[i] = (i as i32 * 5 + 1) % Q as i32;
            hint[i] = (i % 4) as u8;
        }
        let pk = PublicKeyB { poly, hint };
        let bytes = pk.to_bytes();
        let decoded = PublicKeyB::from_bytes(&bytes).unwrap();
        assert_eq!(&decoded.poly[..], &pk.poly[..]);
        assert_eq!(decoded.hint, pk.hint);
    }

    #[test]
    fn public_key_a_accepts_a_coefficient_at_or_above_q() {
        let poly = [0i32; N];
        let seed = [0u8; SEED_BYTES];
        let mut bytes = PublicKeyA { poly, seed }.to_bytes();
        // Force the first 14-bit coefficient slot to an out-of-range value
        // (all ones covers bits 0..13, i.e. 16383 >= Q). Spec §4.5 requires
        // this still decode; §8 requires it still yield a secret, not an
        // error.
        bytes[0] = 0xFF;
        bytes[1] = 0xFF;
        let decoded = PublicKeyA::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.poly[0], 0x3FFF);
        assert!(decoded.poly[0] as u32 >= Q);
    }
}
