//! Sigma-protocol proofs over the dealing group (spec §4.B), grounded in
//! the teacher's native (non-circuit) `chaum_pedersen` module and the
//! `Signable`/`TranscriptBuilder` domain-separation pattern in
//! `signing/mod.rs`, adapted from a Poseidon-sponge challenge to the
//! SHA-512 `Transcript` defined in [`crate::group`].

pub mod enc_share;
pub mod eqdlog;
pub mod switch_gate;

pub use enc_share::EncShareProof;
pub use eqdlog::EqDlogProof;
pub use switch_gate::SwitchProof;

use thiserror::Error;

pub const LOG_TARGET: &str = "ocp_core::proofs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("proof rejected by verifier")]
    Invalid,
    #[error("non-trivial re-randomization check failed: output c1 equals an input c1")]
    TrivialReencryption,
    #[error("wrong encoded length: expected {expected}, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("embedded group element or scalar is not canonically encoded")]
    NonCanonicalEncoding,
}

impl From<crate::group::CodecError> for ProofError {
    fn from(_: crate::group::CodecError) -> Self {
        ProofError::NonCanonicalEncoding
    }
}
