//! Table/hand data model (spec §3), grounded in the teacher's
//! `engine::nl::types` shapes (`Chips`, `SeatId`, `Street`, `PlayerState`,
//! `Pots`) generalized to the spec's fixed 9-max table and bet-to action
//! semantics.

use crate::cards::Card;
use serde::{Deserialize, Serialize};

pub type Chips = u64;
pub type SeatId = u8;
pub type PlayerId = u64;
pub type TableId = u64;
pub type HandId = u64;

pub const MAX_SEATS: usize = 9;
pub const SENTINEL_UNSET: u8 = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Shuffle,
    Betting,
    AwaitFlop,
    AwaitTurn,
    AwaitRiver,
    AwaitShowdown,
    Showdown,
    Complete,
    Aborted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerBetAction {
    Fold,
    Check,
    Call,
    BetTo(Chips),
}

/// Per-table configuration (spec §3 `Table.params`). `create_table`
/// validates this via [`validate`](TableParams::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableParams {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub action_timeout_secs: u64,
    pub dealer_timeout_secs: u64,
    pub player_bond: Chips,
    pub rake_bps: u32,
    /// Whether blind contributions are refunded to their seats on a
    /// pre-showdown abort (resolved Open Question, `SPEC_FULL.md` §6).
    pub refund_blinds_on_abort: bool,
}

impl TableParams {
    pub fn validate(&self) -> Result<(), super::errors::ActionError> {
        use super::errors::ActionError;
        if self.small_blind == 0 {
            return Err(ActionError::InvalidParams("small_blind must be > 0".into()));
        }
        if self.big_blind <= self.small_blind {
            return Err(ActionError::InvalidParams(
                "big_blind must be greater than small_blind".into(),
            ));
        }
        if self.action_timeout_secs == 0 {
            return Err(ActionError::InvalidParams(
                "action_timeout_secs must be > 0".into(),
            ));
        }
        if self.dealer_timeout_secs == 0 {
            return Err(ActionError::InvalidParams(
                "dealer_timeout_secs must be > 0".into(),
            ));
        }
        if self.min_buy_in == 0 || self.min_buy_in > self.max_buy_in {
            return Err(ActionError::InvalidParams(
                "min_buy_in must be positive and at most max_buy_in".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub pk_player: [u8; 32],
    pub stack: Chips,
    pub bond: Chips,
}

/// Status flags for a seat within the active hand (spec §3 `in_hand`,
/// `folded`, `all_in` parallel arrays, modeled here per-seat instead).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHandState {
    pub in_hand: bool,
    pub folded: bool,
    pub all_in: bool,
    pub street_commit: Chips,
    pub total_commit: Chips,
    pub last_interval_acted: i32,
    pub hole_pos: [u8; 2],
}

impl Default for PlayerHandState {
    fn default() -> Self {
        PlayerHandState {
            in_hand: false,
            folded: false,
            all_in: false,
            street_commit: 0,
            total_commit: 0,
            last_interval_acted: -1,
            hole_pos: [SENTINEL_UNSET, SENTINEL_UNSET],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<SeatId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandConfig {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hand {
    pub hand_id: HandId,
    pub phase: Phase,
    pub street: Street,
    pub button_seat: SeatId,
    pub small_blind_seat: SeatId,
    pub big_blind_seat: SeatId,
    pub action_on: Option<SeatId>,
    pub action_deadline: u64,
    pub bet_to: Chips,
    pub min_raise_size: Chips,
    pub interval_id: u32,
    pub players: Vec<PlayerHandState>,
    pub seat_occupied: Vec<bool>,
    pub board: Vec<Card>,
    pub pots: Vec<Pot>,
    pub cfg: HandConfig,
    pub events: super::events::EventLog,
    /// Set by `refund_uncalled_excess` for `on_street_complete`'s caller
    /// to apply to the seat's live stack (which lives on `Table`, not
    /// `Hand`); always `None` outside that single-transition window.
    pub pending_refund: Option<(SeatId, Chips)>,
    /// Cryptographic dealer state for this hand (spec §3 `DealerHand`),
    /// attached by `dealer::init_hand` once `InitHand` arrives and kept
    /// until the hand terminates. Its own `shuffle_step`/`finalized`
    /// fields gate the dealing pipeline independently of `Hand.phase`.
    pub dealer: Option<crate::dealer::DealerHand>,
}

/// A table: created once, long-lived across many hands (spec §3
/// "Table").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub creator: PlayerId,
    pub params: TableParams,
    pub seats: Vec<Option<Seat>>,
    pub button_seat: SeatId,
    pub hand: Option<Hand>,
    pub next_hand_id: HandId,
    /// Chips sequestered from pre-showdown aborts when
    /// `refund_blinds_on_abort` is false, rather than returned to seats.
    pub treasury: Chips,
    pub events: super::events::EventLog,
}

impl Table {
    pub fn new(id: TableId, creator: PlayerId, params: TableParams) -> Self {
        Table {
            id,
            creator,
            params,
            seats: vec![None; MAX_SEATS],
            button_seat: 0,
            hand: None,
            next_hand_id: 1,
            treasury: 0,
            events: super::events::EventLog::new(),
        }
    }

    pub fn funded_seats(&self) -> Vec<SeatId> {
        (0..self.seats.len())
            .filter(|&i| self.seats[i].is_some())
            .map(|i| i as SeatId)
            .collect()
    }
}

impl Hand {
    pub fn active_seats(&self) -> Vec<SeatId> {
        (0..self.players.len())
            .filter(|&i| self.players[i].in_hand)
            .map(|i| i as SeatId)
            .collect()
    }

    pub fn seats_still_in(&self) -> Vec<SeatId> {
        (0..self.players.len())
            .filter(|&i| self.players[i].in_hand && !self.players[i].folded)
            .map(|i| i as SeatId)
            .collect()
    }

    pub fn active_non_allin_seats(&self) -> Vec<SeatId> {
        (0..self.players.len())
            .filter(|&i| {
                self.players[i].in_hand && !self.players[i].folded && !self.players[i].all_in
            })
            .map(|i| i as SeatId)
            .collect()
    }
}
