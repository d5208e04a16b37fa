//! Handshake orchestration (spec §4.7, C7): `keygen`, `agree_b`, `agree_a`.
//!
//! Mirrors `kex.c`'s `KeyGeneration_A`/`SecretAgreement_B`/`SecretAgreement_A`
//! triple, but replaces its `goto cleanup; clear_words(...)` idiom with
//! `zeroize::Zeroizing` guards that wipe secret polynomials on drop
//! regardless of which return path is taken, and its process-global
//! function-pointer oracle struct with the borrowed `Oracles` capability
//! record threaded through every call (spec §9).

use zeroize::Zeroizing;

use crate::error::Error;
use crate::field::{correction, smul};
use crate::ntt;
use crate::oracle::Oracles;
use crate::pack::{PublicKeyA, PublicKeyB};
use crate::params::{ERROR_SEED_BYTES, N, NONCE_SEED_BYTES, SEED_BYTES, SHARED_SECRET_BYTES};
use crate::poly::{pmul, pmuladd};
use crate::reconcile::{help_rec_poly, rec_poly};
use crate::sample::sample_error;

const NONCE_SECRET: [u8; NONCE_SEED_BYTES] = [0; NONCE_SEED_BYTES];
const NONCE_ERROR_B: [u8; NONCE_SEED_BYTES] = [1, 0, 0, 0, 0, 0, 0, 0];
const NONCE_ERROR_V: [u8; NONCE_SEED_BYTES] = [2, 0, 0, 0, 0, 0, 0, 0];

/// The 32-byte key both parties agree on at the end of a successful
/// exchange.
pub type SharedSecret = [u8; SHARED_SECRET_BYTES];

/// Alice's half of the handshake state: the NTT-domain secret polynomial
/// she must keep until `agree_a`, zeroized on drop.
pub struct SecretKeyA {
    s_ntt: Zeroizing<[i32; N]>,
}

fn random_seed(oracles: &mut Oracles) -> Result<[u8; SEED_BYTES], Error> {
    let mut seed = [0u8; SEED_BYTES];
    oracles.random.fill(&mut seed)?;
    Ok(seed)
}

fn random_error_seed(oracles: &mut Oracles) -> Result<[u8; ERROR_SEED_BYTES], Error> {
    let mut seed = [0u8; ERROR_SEED_BYTES];
    oracles.random.fill(&mut seed)?;
    Ok(seed)
}

/// Alice generates a fresh keypair: `PublicKeyA` to publish, `SecretKeyA`
/// to retain for `agree_a`.
pub fn keygen(oracles: &mut Oracles) -> Result<(PublicKeyA, SecretKeyA), Error> {
    log::trace!("keygen: expanding public polynomial a");
    let seed = random_seed(oracles)?;
    let a = oracles.xof.expand_a(&seed)?;

    let err_seed = random_error_seed(oracles)?;
    let mut s = sample_error(oracles.stream, &err_seed, &NONCE_SECRET)?;
    let mut e = sample_error(oracles.stream, &err_seed, &NONCE_ERROR_B)?;
    ntt::forward(&mut s);
    ntt::forward(&mut e);
    smul(&mut e, 3);

    let b = pmuladd(&a, &s, &e);
    log::debug!("keygen: produced PublicKeyA ({} coefficients)", N);

    Ok((
        PublicKeyA { poly: b, seed },
        SecretKeyA { s_ntt: Zeroizing::new(s) },
    ))
}

/// Bob consumes Alice's public key, derives the shared secret, and
/// produces the `PublicKeyB` Alice needs to derive the same value.
pub fn agree_b(oracles: &mut Oracles, pk_a: &PublicKeyA) -> Result<(PublicKeyB, SharedSecret), Error> {
    log::trace!("agree_b: expanding public polynomial a from peer seed");
    let a = oracles.xof.expand_a(&pk_a.seed)?;

    let err_seed = random_error_seed(oracles)?;
    let mut s = sample_error(oracles.stream, &err_seed, &NONCE_SECRET)?;
    let mut e = sample_error(oracles.stream, &err_seed, &NONCE_ERROR_B)?;
    ntt::forward(&mut s);
    ntt::forward(&mut e);
    smul(&mut e, 3);
    let b = pmuladd(&a, &s, &e);

    let mut e2 = sample_error(oracles.stream, &err_seed, &NONCE_ERROR_V)?;
    ntt::forward(&mut e2);
    smul(&mut e2, 81);

    let mut v = pmuladd(&pk_a.poly, &s, &e2);
    ntt::inverse(&mut v);
    correction(&mut v);

    let hint = help_rec_poly(&v, oracles.stream, &err_seed)?;
    let secret = rec_poly(&v, &hint);
    log::debug!("agree_b: reconciled shared secret ({} bytes)", SHARED_SECRET_BYTES);

    Ok((PublicKeyB { poly: b, hint }, secret))
}

/// Alice consumes Bob's public key and her retained secret key to derive
/// the same shared secret `agree_b` produced.
pub fn agree_a(sk_a: &SecretKeyA, pk_b: &PublicKeyB) -> Result<SharedSecret, Error> {
    let mut w = pmul(&pk_b.poly, &sk_a.s_ntt);
    ntt::inverse(&mut w);
    correction(&mut w);

    let secret = rec_poly(&w, &pk_b.hint);
    log::debug!("agree_a: reconciled shared secret ({} bytes)", SHARED_SECRET_BYTES);
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{CounterRandom, Shake256Stream, Shake256Xof};

    fn oracles<'a>(random: &'a mut CounterRandom, xof: &'a Shake256Xof, stream: &'a Shake256Stream) -> Oracles<'a> {
        Oracles { random, xof, stream }
    }

    #[test]
    fn both_parties_derive_the_same_shared_secret() {
        let xof = Shake256Xof;
        let stream = Shake256Stream;

        let mut rand_a = CounterRandom { next: 11 };
        let (pk_a, sk_a) = keygen(&mut oracles(&mut rand_a, &xof, &stream)).unwrap();

        let mut rand_b = CounterRandom { next: 97 };
        let (pk_b, secret_b) = agree_b(&mut oracles(&mut rand_b, &xof, &stream), &pk_a).unwrap();

        let secret_a = agree_a(&sk_a, &pk_b).unwrap();
        assert_eq!(secret_a, secret_b);
    }

    #[test]
    fn different_runs_produce_different_secrets() {
        let xof = Shake256Xof;
        let stream = Shake256Stream;

        let mut rand_a1 = CounterRandom { next: 1 };
        let (pk_a1, sk_a1) = keygen(&mut oracles(&mut rand_a1, &xof, &stream)).unwrap();
        let mut rand_b1 = CounterRandom { next: 2 };
        let (pk_b1, _) = agree_b(&mut oracles(&mut rand_b1, &xof, &stream), &pk_a1).unwrap();
        let secret1 = agree_a(&sk_a1, &pk_b1).unwrap();

        let mut rand_a2 = CounterRandom { next: 200 };
        let (pk_a2, sk_a2) = keygen(&mut oracles(&mut rand_a2, &xof, &stream)).unwrap();
        let mut rand_b2 = CounterRandom { next: 201 };
        let (pk_b2, _) = agree_b(&mut oracles(&mut rand_b2, &xof, &stream), &pk_a2).unwrap();
        let secret2 = agree_a(&sk_a2, &pk_b2).unwrap();

        assert_ne!(secret1, secret2);
    }
}
