//! Ring-LWE (NewHope-parameter) post-quantum key exchange core.
//!
//! Two parties run [`protocol::keygen`] / [`protocol::agree_b`] /
//! [`protocol::agree_a`] over an exchanged [`pack::PublicKeyA`] /
//! [`pack::PublicKeyB`] pair to arrive at an identical
//! [`protocol::SharedSecret`], using randomness and hashing capabilities
//! supplied through [`oracle::Oracles`] rather than any ambient global
//! state.

pub mod error;
pub mod field;
pub mod ntt;
pub mod oracle;
pub mod pack;
pub mod params;
pub mod poly;
pub mod protocol;
pub mod reconcile;
pub mod sample;

pub use error::Error;
pub use oracle::{OsRandom, Oracles, RandomOracle, Shake256Stream, Shake256Xof, Stream, Xof};
pub use pack::{PublicKeyA, PublicKeyB};
pub use params::{PUBLIC_KEY_A_BYTES, PUBLIC_KEY_B_BYTES, SHARED_SECRET_BYTES};
pub use protocol::{agree_a, agree_b, keygen, SecretKeyA, SharedSecret};
