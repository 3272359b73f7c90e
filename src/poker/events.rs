//! Typed, append-only event log (spec §3, §5, §6). Generalizes the bare
//! `Vec<Event>` the distilled spec implies into a small wrapper whose
//! only mutator is `push`, making "events are append-only" a type-level
//! property instead of a convention — grounded in the teacher's
//! `EventLog`/`Signable` append patterns in `signing/mod.rs`.

use serde::{Deserialize, Serialize};

use super::types::{Chips, SeatId, Street};
use crate::slashing::SlashReason;

pub type ValidatorId = u64;
pub type EpochId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    BetTo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TableCreated,
    PlayerSat { seat: SeatId },
    PlayerLeft { seat: SeatId },
    PlayerEjected { seat: SeatId },
    HandStarted {
        button: SeatId,
        sb_seat: SeatId,
        bb_seat: SeatId,
    },
    DeckFinalized,
    HoleCardAssigned { seat: SeatId, h: u8, pos: u8 },
    StreetRevealed { street: Street, cards: Vec<u8> },
    HandCompleted { winner: SeatId, pot: Chips },
    HandAborted { reason: String },
    ActionApplied {
        seat: SeatId,
        kind: ActionKind,
        amount: Option<Chips>,
    },
    TimeoutApplied { seat: SeatId, default: ActionKind },
    PlayerSlashed {
        seat: SeatId,
        reason: SlashReason,
        amount: Chips,
    },
    ValidatorSlashed {
        validator: ValidatorId,
        reason: SlashReason,
        amount: Chips,
    },
    ShuffleAccepted { round: u8, shuffler: ValidatorId },
    EncShareAccepted { pos: u8, validator: ValidatorId },
    PubShareAccepted { pos: u8, validator: ValidatorId },
    EpochBegun { epoch_id: EpochId },
    EpochFinalized { epoch_id: EpochId, pk_epoch: crate::group::GroupElement },
}

/// Append-only, indexed buffer of [`GameEvent`]s for a single hand (or
/// table lifecycle, before a hand exists).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) -> u64 {
        self.events.push(event);
        (self.events.len() - 1) as u64
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }
}
