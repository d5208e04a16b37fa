//! The three external capabilities the protocol consumes (spec §6): a
//! source of randomness, an extendable-output function for expanding the
//! public polynomial `a`, and a keyed stream function for error sampling
//! and reconciliation bias bits.
//!
//! Re-architected per spec §9 away from the original's heap-allocated
//! function-pointer struct (`LatticeCryptoStruct`) into a small
//! interface-typed capability record passed by reference to each protocol
//! entry point. No process-global oracle state exists anywhere in this
//! crate.

use crate::error::Error;
use crate::params::{ERROR_SEED_BYTES, N, NONCE_SEED_BYTES, Q, SEED_BYTES};

/// Fills a caller-supplied buffer with cryptographically secure random bytes.
pub trait RandomOracle {
    fn fill(&mut self, out: &mut [u8]) -> Result<(), Error>;
}

/// Expands a `SEED_BYTES` seed into `N` uniform coefficients of the public
/// polynomial `a`, already in NTT-domain representation (see spec §4.7,
/// step 2: "a uniform polynomial ... the XOF is parametrised to emit
/// coefficients directly"). Rejection sampling to stay within [0, q) is the
/// oracle's responsibility.
pub trait Xof {
    fn expand_a(&self, seed: &[u8; SEED_BYTES]) -> Result<[i32; N], Error>;
}

/// Produces deterministic pseudorandom bytes from an `ERROR_SEED_BYTES` key
/// and an 8-byte nonce. Used both for noise sampling and for the `HelpRec`
/// bias bits.
pub trait Stream {
    fn fill(
        &self,
        key: &[u8; ERROR_SEED_BYTES],
        nonce: &[u8; NONCE_SEED_BYTES],
        out: &mut [u8],
    ) -> Result<(), Error>;
}

/// The capability triple a protocol entry point needs, grouped so call
/// sites don't thread three separate generic parameters through every
/// function signature.
pub struct Oracles<'a> {
    pub random: &'a mut dyn RandomOracle,
    pub xof: &'a dyn Xof,
    pub stream: &'a dyn Stream,
}

/// `RandomOracle` backed by the operating system's CSPRNG.
pub struct OsRandom;

impl RandomOracle for OsRandom {
    fn fill(&mut self, out: &mut [u8]) -> Result<(), Error> {
        use rand_core::RngCore;
        rand::rngs::OsRng.fill_bytes(out);
        Ok(())
    }
}

/// `Xof` backed by SHAKE256, rejection-sampling 14-bit coefficients the way
/// the teacher's `sample_poly_uniform` rejection-samples 23-bit ML-DSA
/// coefficients from an `XofReader`.
pub struct Shake256Xof;

impl Xof for Shake256Xof {
    fn expand_a(&self, seed: &[u8; SEED_BYTES]) -> Result<[i32; N], Error> {
        use sha3::digest::{ExtendableOutput, Update, XofReader};
        use sha3::Shake256;

        let mut hasher = Shake256::default();
        hasher.update(seed);
        let mut xof = hasher.finalize_xof();

        let mut a = [0i32; N];
        let mut i = 0;
        let mut buf = [0u8; 2];
        let mut iterations = 0usize;
        while i < N {
            xof.read(&mut buf);
            let val = u16::from_le_bytes(buf) & 0x3FFF; // 14 bits: Q < 2^14
            if (val as u32) < Q {
                a[i] = val as i32;
                i += 1;
            }
            iterations += 1;
            if iterations > N * 64 {
                return Err(Error::TooManyIterations);
            }
        }
        Ok(a)
    }
}

/// `Stream` backed by SHAKE256, keyed the way the teacher's
/// `FalconPrng::from_seed` keys its reader.
pub struct Shake256Stream;

impl Stream for Shake256Stream {
    fn fill(
        &self,
        key: &[u8; ERROR_SEED_BYTES],
        nonce: &[u8; NONCE_SEED_BYTES],
        out: &mut [u8],
    ) -> Result<(), Error> {
        use sha3::digest::{ExtendableOutput, Update, XofReader};
        use sha3::Shake256;

        let mut hasher = Shake256::default();
        hasher.update(key);
        hasher.update(nonce);
        let mut xof = hasher.finalize_xof();
        xof.read(out);
        Ok(())
    }
}

/// A deterministic counter-based stream (bytes `0x00, 0x01, 0x02, ...`),
/// used only for the reproducibility scenarios spec §8 describes. Not a
/// cryptographic oracle — test-only.
pub struct CounterStream {
    pub start: u8,
}

impl Stream for CounterStream {
    fn fill(
        &self,
        _key: &[u8; ERROR_SEED_BYTES],
        _nonce: &[u8; NONCE_SEED_BYTES],
        out: &mut [u8],
    ) -> Result<(), Error> {
        let mut b = self.start;
        for slot in out.iter_mut() {
            *slot = b;
            b = b.wrapping_add(1);
        }
        Ok(())
    }
}

impl Xof for CounterStream {
    fn expand_a(&self, seed: &[u8; SEED_BYTES]) -> Result<[i32; N], Error> {
        Shake256Xof.expand_a(seed)
    }
}

pub struct CounterRandom {
    pub next: u8,
}

impl RandomOracle for CounterRandom {
    fn fill(&mut self, out: &mut [u8]) -> Result<(), Error> {
        for slot in out.iter_mut() {
            *slot = self.next;
            self.next = self.next.wrapping_add(1);
        }
        Ok(())
    }
}
