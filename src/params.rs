//! Fixed parameters for the Ring-LWE key exchange (NewHope instantiation).
//!
//! These are invariant for the life of the library: ring dimension, modulus,
//! reconciliation thresholds, and the byte lengths of the three oracle seeds.
//! See spec §3.

/// Ring dimension: polynomials live in Z_q[x] / (x^N + 1).
pub const N: usize = 1024;

/// Prime modulus. q ≡ 1 (mod 2N), which is what makes a primitive 2N-th
/// root of unity exist and the negacyclic NTT complete.
pub const Q: u32 = 12289;

/// Reconciliation thresholds used by `HelpRec`/`Rec` (spec §4.6).
pub const PARAMETER_Q4: i32 = Q as i32 / 4;
pub const PARAMETER_Q2: i32 = Q as i32 / 2;
pub const PARAMETER_3Q4: i32 = 3 * Q as i32 / 4;
pub const PARAMETER_5Q4: i32 = 5 * Q as i32 / 4;
pub const PARAMETER_3Q2: i32 = 3 * Q as i32 / 2;
pub const PARAMETER_7Q4: i32 = 7 * Q as i32 / 4;

/// Seed handed to the XOF oracle to expand the public polynomial `a`.
pub const SEED_BYTES: usize = 32;

/// Seed handed to the stream oracle to derive error polynomials and the
/// `HelpRec` bias bits.
pub const ERROR_SEED_BYTES: usize = 32;

/// Length of the nonce mixed into the stream oracle alongside the error
/// seed (matches the 8-byte `nce` buffer in the original C reference).
pub const NONCE_SEED_BYTES: usize = 8;

/// Size of PublicKeyA on the wire: packed polynomial + seed.
pub const PUBLIC_KEY_A_BYTES: usize = 1792 + SEED_BYTES;

/// Size of PublicKeyB on the wire: packed polynomial + packed hint.
pub const PUBLIC_KEY_B_BYTES: usize = 1792 + 256;

/// Size of the derived shared secret, in bytes.
pub const SHARED_SECRET_BYTES: usize = 32;
