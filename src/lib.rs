//! Confidential dealing and game-progression core for an on-chain poker
//! protocol: a deterministic No-Limit Hold'em state machine plus the
//! threshold dealing subsystem (DKG, verifiable shuffle, encrypted hole
//! cards, threshold community-card reveal) that drives it.
//!
//! The crate is a pure function of an ordered message stream (see
//! [`dispatch`]): every mutating operation takes a state and a message and
//! returns either a new state plus an append-only list of events, or a
//! typed error that leaves the state untouched. There is no I/O and no
//! concurrency inside the core; the surrounding consensus/transport layer
//! is a collaborator, not part of this crate.

pub mod cards;
pub mod config;
pub mod dealer;
pub mod dispatch;
pub mod dkg;
pub mod elgamal;
pub mod epoch;
pub mod error;
pub mod group;
pub mod logging;
pub mod poker;
pub mod proofs;
pub mod shuffle;
pub mod slashing;

#[cfg(test)]
pub mod test_utils;

pub use error::CoreError;
pub use group::{GroupElement, Scalar};
