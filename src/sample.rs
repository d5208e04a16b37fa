//! Centered binomial noise sampling (spec §4.4, C4).
//!
//! Each coefficient is drawn from the B_16 centered binomial distribution:
//! stretch (seed, nonce) into `3·N` bytes of stream output, then for each
//! coefficient take 24 bits (3 bytes) LSB-first and compute
//! `popcount(low 12 bits) − popcount(high 12 bits)`. `kex.c`'s `get_error`
//! reads its stream through a packed SWAR scheme instead; this crate keeps
//! the bit count and coefficient count the spec fixes (3 bytes in, one
//! coefficient out) and gets there through an explicit mask-and-popcount
//! pair rather than the original's bit-packed accumulator.

use crate::error::Error;
use crate::oracle::Stream;
use crate::params::{ERROR_SEED_BYTES, N, NONCE_SEED_BYTES, Q};

const Q_I32: i32 = Q as i32;
const HALF_MASK: u32 = 0x0FFF; // low 12 bits of the 24-bit window

/// Draws an `N`-coefficient error polynomial from the stream oracle keyed
/// by `key` and `nonce`, with coefficients canonicalized into [0, q).
pub fn sample_error(
    stream: &dyn Stream,
    key: &[u8; ERROR_SEED_BYTES],
    nonce: &[u8; NONCE_SEED_BYTES],
) -> Result<[i32; N], Error> {
    let mut bytes = vec![0u8; 3 * N];
    stream.fill(key, nonce, &mut bytes)?;

    let mut out = [0i32; N];
    for i in 0..N {
        let word = (bytes[3 * i] as u32)
            | ((bytes[3 * i + 1] as u32) << 8)
            | ((bytes[3 * i + 2] as u32) << 16);
        let lo = word & HALF_MASK;
        let hi = (word >> 12) & HALF_MASK;
        let diff = lo.count_ones() as i32 - hi.count_ones() as i32;
        out[i] = if diff < 0 { diff + Q_I32 } else { diff };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::CounterStream;

    #[test]
    fn sampled_coefficients_are_canonical_and_small() {
        let key = [7u8; ERROR_SEED_BYTES];
        let nonce = [1u8; NONCE_SEED_BYTES];
        let stream = CounterStream { start: 3 };
        let e = sample_error(&stream, &key, &nonce).unwrap();
        for &c in e.iter() {
            assert!((0..Q_I32).contains(&c));
            let centered = if c > Q_I32 / 2 { c - Q_I32 } else { c };
            assert!(centered.abs() <= 16);
        }
    }

    #[test]
    fn same_key_and_nonce_reproduce_the_same_polynomial() {
        let key = [9u8; ERROR_SEED_BYTES];
        let nonce = [2u8; NONCE_SEED_BYTES];
        let a = sample_error(&CounterStream { start: 0 }, &key, &nonce).unwrap();
        let b = sample_error(&CounterStream { start: 0 }, &key, &nonce).unwrap();
        assert_eq!(&a[..], &b[..]);
    }

    #[test]
    fn consumes_three_bytes_per_coefficient() {
        struct LenCheck(std::cell::Cell<usize>);
        impl Stream for LenCheck {
            fn fill(
                &self,
                _key: &[u8; ERROR_SEED_BYTES],
                _nonce: &[u8; NONCE_SEED_BYTES],
                out: &mut [u8],
            ) -> Result<(), Error> {
                self.0.set(out.len());
                Ok(())
            }
        }
        let probe = LenCheck(std::cell::Cell::new(0));
        let _ = sample_error(&probe, &[0u8; ERROR_SEED_BYTES], &[0u8; NONCE_SEED_BYTES]);
        assert_eq!(probe.0.get(), 3 * N);
    }
}
