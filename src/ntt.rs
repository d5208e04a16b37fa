//! Negacyclic NTT over Z_q[x]/(x^N + 1), N = 1024, q = 12289 (spec §4.2, C2).
//!
//! The original reference (`kex.c`) ships 1024-entry hardcoded twiddle
//! tables produced offline. This crate derives the equivalent tables at
//! first use instead: it searches for a primitive 2N-th root of unity `ζ`
//! mod q, then builds every twiddle needed for the forward/inverse pair
//! from `ζ`'s powers. The tables are built once behind a `once_cell::sync::Lazy`
//! and never mutated afterward, matching spec §3's "read-only,
//! process-lifetime" requirement for precomputed tables.
//!
//! Forward transforms a polynomial in standard order into NTT-domain
//! (bit-reversed order, per spec's data model) using decimation-in-
//! frequency; inverse is the dual decimation-in-time walk, so no explicit
//! bit-reversal permutation pass is needed in either direction.

use once_cell::sync::Lazy;

use crate::field::{addmod, mulmod, submod};
use crate::params::{N, Q};

struct NttTables {
    /// zeta_pow[i] = ζ^i mod q, for i in [0, N) — negacyclic twist factors.
    zeta_pow: [i32; N],
    /// zeta_inv_pow[i] = ζ^(-i) mod q, for i in [0, N) — untwist factors.
    zeta_inv_pow: [i32; N],
    /// omega_pow[k] = ω^k mod q where ω = ζ^2 is a primitive N-th root.
    omega_pow: [i32; N],
    /// omega_inv_pow[k] = ω^(-k) mod q.
    omega_inv_pow: [i32; N],
    /// N^(-1) mod q.
    n_inv: i32,
}

static TABLES: Lazy<NttTables> = Lazy::new(build_tables);

fn mod_pow(mut base: u64, mut exp: u64, q: u64) -> u64 {
    let mut acc = 1u64;
    base %= q;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = (acc * base) % q;
        }
        base = (base * base) % q;
        exp >>= 1;
    }
    acc
}

/// Finds a primitive `order`-th root of unity mod q, where `order` must
/// divide q - 1 and be a power of two. Candidate `c^((q-1)/order)` has
/// order dividing `order` by Fermat's little theorem; it has order exactly
/// `order` iff raising it to `order/2` yields -1 (otherwise its order
/// divides `order/2`, a strictly smaller power of two).
fn find_primitive_root(order: u64, q: u64) -> u64 {
    let exponent = (q - 1) / order;
    let mut c = 2u64;
    loop {
        let psi = mod_pow(c, exponent, q);
        if psi != 0 && mod_pow(psi, order / 2, q) == q - 1 {
            return psi;
        }
        c += 1;
        assert!(c < q, "no primitive root of the requested order exists mod q");
    }
}

fn build_tables() -> NttTables {
    let q = Q as u64;
    let two_n = 2 * N as u64;
    let zeta = find_primitive_root(two_n, q);
    let zeta_inv = mod_pow(zeta, two_n - 1, q);
    let omega = (zeta * zeta) % q;
    let omega_inv = (zeta_inv * zeta_inv) % q;

    let mut zeta_pow = [0i32; N];
    let mut zeta_inv_pow = [0i32; N];
    let mut omega_pow = [0i32; N];
    let mut omega_inv_pow = [0i32; N];

    let mut acc = 1u64;
    for i in 0..N {
        zeta_pow[i] = acc as i32;
        acc = (acc * zeta) % q;
    }
    acc = 1u64;
    for i in 0..N {
        zeta_inv_pow[i] = acc as i32;
        acc = (acc * zeta_inv) % q;
    }
    acc = 1u64;
    for i in 0..N {
        omega_pow[i] = acc as i32;
        acc = (acc * omega) % q;
    }
    acc = 1u64;
    for i in 0..N {
        omega_inv_pow[i] = acc as i32;
        acc = (acc * omega_inv) % q;
    }

    let n_inv = mod_pow(N as u64, q - 2, q) as i32;

    NttTables {
        zeta_pow,
        zeta_inv_pow,
        omega_pow,
        omega_inv_pow,
        n_inv,
    }
}

/// Forward NTT: standard order, canonical [0, q) coefficients, to
/// NTT-domain (bit-reversed order), in place. Decimation-in-frequency.
pub fn forward(a: &mut [i32; N]) {
    let t = &*TABLES;
    for i in 0..N {
        a[i] = mulmod(a[i], t.zeta_pow[i]);
    }

    let mut len = N;
    while len > 1 {
        let half = len / 2;
        let stride = N / len;
        for start in (0..N).step_by(len) {
            for j in 0..half {
                let w = t.omega_pow[j * stride];
                let u = a[start + j];
                let v = mulmod(a[start + j + half], w);
                a[start + j] = addmod(u, v);
                a[start + j + half] = submod(u, v);
            }
        }
        len = half;
    }
}

/// Inverse NTT: NTT-domain (bit-reversed order) to standard order, in
/// place. Decimation-in-time, the exact dual of `forward`.
pub fn inverse(a: &mut [i32; N]) {
    let t = &*TABLES;

    let mut len = 2;
    while len <= N {
        let half = len / 2;
        let stride = N / len;
        for start in (0..N).step_by(len) {
            for j in 0..half {
                let w = t.omega_inv_pow[j * stride];
                let u = a[start + j];
                let v = a[start + j + half];
                a[start + j] = addmod(u, v);
                a[start + j + half] = mulmod(submod(u, v), w);
            }
        }
        len <<= 1;
    }

    for x in a.iter_mut() {
        *x = mulmod(*x, t.n_inv);
    }
    for i in 0..N {
        a[i] = mulmod(a[i], t.zeta_inv_pow[i]);
    }
}
