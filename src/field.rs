//! Modular arithmetic primitives over Z_q, q = 12289 (spec §4.1, C1).
//!
//! `addmod`/`submod`/`correction` are branchless: the reference's `Abs` and
//! sign-mask trick (`kex.c`, `HelpRec`/`LDDecode`) is ported directly rather
//! than reimplemented with an `if`, since these run over coefficients that
//! may depend on secret polynomials. `mulmod` reduces via `rem_euclid`
//! instead of a hand-rolled Barrett step — spec §4.2 explicitly leaves the
//! reduction strategy to the implementer ("Harvey-style ... or Montgomery
//! reductions; the external contract is only ... identity"), and a
//! division-based reduction is the one this crate can verify by hand.

use crate::params::{N, Q};

const Q_I32: i32 = Q as i32;

/// `a + b` if the sum is already below one extra `q`, else `a + b - q`,
/// selected by an arithmetic mask rather than a branch.
#[inline]
pub fn addmod(a: i32, b: i32) -> i32 {
    let s = a + b - Q_I32;
    s + (Q_I32 & (s >> 31))
}

/// `a - b` corrected into [0, q) by the same branchless pattern.
#[inline]
pub fn submod(a: i32, b: i32) -> i32 {
    let s = a - b;
    s + (Q_I32 & (s >> 31))
}

/// `a * b mod q`, reduced via `rem_euclid` (always returns a value in
/// [0, q)).
#[inline]
pub fn mulmod(a: i32, b: i32) -> i32 {
    (((a as i64) * (b as i64)).rem_euclid(Q_I32 as i64)) as i32
}

/// Branchless absolute value of a signed 32-bit integer, ported verbatim
/// from `kex.c`'s `Abs`.
#[inline]
pub fn abs_branchless(value: i32) -> u32 {
    let mask = (value >> 31) as u32;
    (mask ^ (value as u32)).wrapping_sub(mask)
}

/// Reduces each coefficient toward (-q, q) via two conditional subtractions
/// of q, for coefficients that may be bounded by roughly 4q after NTT
/// accumulation (spec §4.1).
pub fn two_reduce(p: &mut [i32; N]) {
    for c in p.iter_mut() {
        *c = reduce_once(reduce_once(*c));
    }
}

#[inline]
fn reduce_once(c: i32) -> i32 {
    let c2 = c - Q_I32;
    c2 + (Q_I32 & (c2 >> 31))
}

/// Conditionally adds q to every coefficient whose sign bit is set,
/// yielding the canonical representative in [0, q). Branchless, ported
/// from the same pattern as `Abs`.
pub fn correction(p: &mut [i32; N]) {
    for c in p.iter_mut() {
        *c += Q_I32 & (*c >> 31);
    }
}

/// Multiplies every coefficient by a small constant `c` modulo q. Used to
/// pre-scale error polynomials by 3 or 81 before `pmuladd`, per spec §4.3.
pub fn smul(p: &mut [i32; N], c: i32) {
    for x in p.iter_mut() {
        *x = mulmod(*x, c);
    }
}
