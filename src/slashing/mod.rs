//! Slashing evidence taxonomy (spec §4.I). Every punitive transition in
//! `poker`, `dkg`, and `dealer` produces one of these records instead of
//! mutating stake/bond directly inline, grounded in the teacher's
//! `ledger::slashing` evidence-record pattern.

use serde::{Deserialize, Serialize};

use crate::poker::types::Chips;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashReason {
    PlayerTimeout,
    ShuffleMissing,
    ShuffleInvalid,
    HoleShareMissing,
    HoleShareInvalid,
    PubShareMissing,
    PubShareInvalid,
    DkgBadCommitment,
    DkgInvalidReveal,
    DkgWithheldReveal,
    DkgFrivolousComplaint,
}

impl SlashReason {
    /// Whether this reason moves the actor to the inactive/jailed set in
    /// addition to reducing its bond or stake.
    pub fn causes_jailing(self) -> bool {
        matches!(
            self,
            SlashReason::ShuffleMissing
                | SlashReason::ShuffleInvalid
                | SlashReason::DkgBadCommitment
                | SlashReason::DkgInvalidReveal
                | SlashReason::DkgWithheldReveal
        )
    }
}

/// A single slashing record (§4.I: "actor, reason, amount slashed
/// (capped at current stake/bond), destination, whether it causes
/// jailing").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashEvidence {
    pub actor: u64,
    pub reason: SlashReason,
    pub amount: Chips,
    pub destination: SlashDestination,
    pub jailed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashDestination {
    Treasury,
}

/// Slash `available` by `requested`, capped at what is actually present,
/// and build the evidence record. Never panics on insufficient balance —
/// capping silently, per §4.I "capped at current stake/bond".
pub fn slash(
    actor: u64,
    reason: SlashReason,
    requested: Chips,
    available: Chips,
) -> (Chips, SlashEvidence) {
    let amount = requested.min(available);
    let evidence = SlashEvidence {
        actor,
        reason,
        amount,
        destination: SlashDestination::Treasury,
        jailed: reason.causes_jailing(),
    };
    (amount, evidence)
}
