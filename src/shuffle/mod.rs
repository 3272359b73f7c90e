//! Verifiable re-encryption shuffle (spec §4.C): "sort-by-random-key via
//! odd-even adjacent swaps with zero-knowledge switch gates over `R`
//! rounds". Grounded in the teacher's native Sigma-protocol code
//! (`chaum_pedersen::native`), generalized from its single-proof shape to
//! the round-based mix-network composition the spec describes; the
//! teacher's SNARK/Bayer-Groth shuffle circuit has no role here.

pub mod permutation;
pub mod proof;
pub mod prove;
pub mod verify;

pub use proof::ShuffleProof;
pub use prove::shuffle_prove;
pub use verify::shuffle_verify;

use thiserror::Error;

pub const LOG_TARGET: &str = "ocp_core::shuffle";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShuffleError {
    #[error("deck size mismatch: expected {expected}, got {actual}")]
    DeckSizeMismatch { expected: usize, actual: usize },
    #[error("proof round count does not match the agreed round count")]
    RoundCountMismatch,
    #[error("switch proof rejected at round {round}, pair starting at {index}")]
    SwitchProofRejected { round: usize, index: usize },
    #[error("single re-encryption proof rejected at round {round}, position {index}")]
    SingleProofRejected { round: usize, index: usize },
    #[error(transparent)]
    Proof(#[from] crate::proofs::ProofError),
    #[error(transparent)]
    Codec(#[from] crate::group::CodecError),
    #[error("malformed proof bytes: {0}")]
    Malformed(String),
}

/// For round `r` over `n` positions, the disjoint adjacent pair set
/// starting at `r mod 2`, and the remaining "single" positions, both in
/// ascending index order (spec §4.C step 3).
pub(crate) fn pairs_and_singles(round: usize, n: usize) -> (Vec<(usize, usize)>, Vec<usize>) {
    let start = round % 2;
    let mut pairs = Vec::new();
    let mut covered = vec![false; n];
    let mut i = start;
    while i + 1 < n {
        pairs.push((i, i + 1));
        covered[i] = true;
        covered[i + 1] = true;
        i += 2;
    }
    let singles: Vec<usize> = (0..n).filter(|&idx| !covered[idx]).collect();
    (pairs, singles)
}
