//! Error taxonomy for table/hand transitions (spec §7), mirroring the
//! teacher's per-subsystem `thiserror` enums (`ledger::error`,
//! `server/error.rs`).

use thiserror::Error;

use super::types::{Chips, SeatId};

/// Errors surfaced by a rejected message; the state is left untouched
/// (no partial effects — §7 "Propagation").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("invalid table parameters: {0}")]
    InvalidParams(String),
    #[error("seat {0} is already occupied")]
    SeatOccupied(SeatId),
    #[error("seat {0} is empty")]
    SeatEmpty(SeatId),
    #[error("buy-in {amount} is outside [{min}, {max}]")]
    InvalidBuyIn {
        amount: Chips,
        min: Chips,
        max: Chips,
    },
    #[error("bond {amount} is below the required minimum {min}")]
    InvalidBond { amount: Chips, min: Chips },
    #[error("seat {0} cannot leave while seated in an active hand")]
    SeatInHand(SeatId),
    #[error("it is not seat {0}'s turn to act")]
    OutOfTurn(SeatId),
    #[error("action is not legal in the current betting state: {0}")]
    IllegalAction(String),
    #[error("bet-to amount {0} is not a legal commitment")]
    InvalidAmount(Chips),
    #[error("raise of size {raise_size} is below the minimum raise {min_raise}")]
    RaiseBelowMinimum { raise_size: Chips, min_raise: Chips },
    #[error("at least two funded seats are required to start a hand")]
    NotEnoughPlayers,
    #[error("operation is not legal in phase {0:?}")]
    WrongPhase(super::types::Phase),
    #[error("deadline has not yet been reached")]
    DeadlineNotReached,
    #[error(transparent)]
    Proof(#[from] crate::proofs::ProofError),
    #[error("group/scalar decode failure: {0}")]
    NonCanonicalEncoding(#[from] crate::group::CodecError),
    #[error("committee cannot produce the required threshold of shares")]
    ThresholdUnreachable,
    #[error("duplicate submission for this (position, validator, key)")]
    DuplicateSubmission,
    #[error("DKG operation attempted outside its valid window")]
    DkgTooEarly,
    #[error("DKG epoch is already finalized")]
    DkgAlreadyFinalized,
    #[error("no active hand on this table")]
    NoActiveHand,
    #[error("a hand is already active on this table")]
    HandAlreadyActive,
}

/// Internal invariant violations (§7: "not recoverable — indicate an
/// implementation bug"). Transitions that would produce one of these
/// must halt rather than commit the mutation; see
/// [`super::engine::check_invariants`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("chip conservation violated: expected {expected}, got {actual}")]
    ChipsNotConserved { expected: Chips, actual: Chips },
    #[error("seat {0} has negative stack")]
    NegativeStack(SeatId),
    #[error("seat {0} has street_commit {street_commit} exceeding total_commit {total_commit}")]
    CommitOrderingViolated {
        seat: SeatId,
        street_commit: Chips,
        total_commit: Chips,
    },
    #[error("bet_to {bet_to} is below the maximum street commit {max_commit}")]
    BetToBelowMaxCommit { bet_to: Chips, max_commit: Chips },
    #[error("action_on points at seat {0} which does not need to act")]
    ActionOnInvalidSeat(SeatId),
}
