//! Crate-level error aggregation (spec §9 ambient stack), grounded in the
//! teacher's `ApiError`-style aggregation in `server/error.rs`, adapted
//! from an HTTP response boundary to a library one: one `#[from]`-driven
//! enum over every subsystem's own `thiserror` type, for callers (chiefly
//! [`crate::dispatch::dispatch`]) that want a single error type to
//! propagate rather than matching on each subsystem individually.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Action(#[from] crate::poker::errors::ActionError),
    #[error(transparent)]
    State(#[from] crate::poker::errors::StateError),
    #[error(transparent)]
    Proof(#[from] crate::proofs::ProofError),
    #[error(transparent)]
    Shuffle(#[from] crate::shuffle::ShuffleError),
    #[error(transparent)]
    Dkg(#[from] crate::dkg::DkgError),
    #[error(transparent)]
    Dealer(#[from] crate::dealer::DealerError),
    #[error(transparent)]
    Committee(#[from] crate::epoch::CommitteeError),
    #[error(transparent)]
    Codec(#[from] crate::group::CodecError),
    #[error("unknown table {0}")]
    UnknownTable(crate::poker::types::TableId),
    #[error("unknown epoch {0}")]
    UnknownEpoch(u64),
}
