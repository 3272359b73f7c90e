//! Action legality and betting-interval arithmetic (spec §4.E "Action
//! legality", "Street-end detection"). Pure functions over [`Hand`] so
//! `engine::act` stays a thin orchestration layer: classify, then apply.

use super::errors::ActionError;
use super::types::{Chips, Hand, SeatId};

/// `to_call = bet_to − street_commit[seat]` (never negative: `bet_to`
/// only ever grows at or above every seat's street commit).
pub fn to_call(hand: &Hand, seat: SeatId) -> Chips {
    hand.bet_to
        .saturating_sub(hand.players[seat as usize].street_commit)
}

fn require_actor(hand: &Hand, seat: SeatId) -> Result<(), ActionError> {
    if hand.action_on != Some(seat) {
        return Err(ActionError::OutOfTurn(seat));
    }
    let p = &hand.players[seat as usize];
    if !p.in_hand {
        return Err(ActionError::SeatEmpty(seat));
    }
    if p.folded || p.all_in {
        return Err(ActionError::IllegalAction(
            "seat is folded or already all-in".into(),
        ));
    }
    Ok(())
}

pub fn validate_check(hand: &Hand, seat: SeatId) -> Result<(), ActionError> {
    require_actor(hand, seat)?;
    if to_call(hand, seat) != 0 {
        return Err(ActionError::IllegalAction(
            "cannot check while facing a bet".into(),
        ));
    }
    Ok(())
}

/// Returns the amount actually paid (capped at `stack`, the seat's
/// remaining chips outside this street's commitment) and whether the
/// call exhausts the seat's stack (goes all-in). `Hand` does not carry
/// stacks (they live on the table's seats — see `engine::Table`), so the
/// caller supplies the live value.
pub fn validate_call(hand: &Hand, seat: SeatId, stack: Chips) -> Result<(Chips, bool), ActionError> {
    require_actor(hand, seat)?;
    let owed = to_call(hand, seat);
    if owed == 0 {
        return Err(ActionError::IllegalAction(
            "nothing to call; use check".into(),
        ));
    }
    let paid = owed.min(stack);
    let all_in = paid == stack;
    Ok((paid, all_in))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetOutcome {
    pub paid: Chips,
    pub new_bet_to: Chips,
    pub new_min_raise: Chips,
    pub opens_new_interval: bool,
    pub all_in: bool,
}

/// Validate and compute the effect of `BetTo(amount)` given the seat's
/// available `stack` (current street_commit + remaining stack is the
/// seat's ceiling).
pub fn validate_bet_to(
    hand: &Hand,
    seat: SeatId,
    amount: Chips,
    stack: Chips,
) -> Result<BetOutcome, ActionError> {
    require_actor(hand, seat)?;
    let p = &hand.players[seat as usize];
    let ceiling = p.street_commit + stack;

    if amount <= p.street_commit {
        return Err(ActionError::InvalidAmount(amount));
    }
    if amount > ceiling {
        return Err(ActionError::InvalidAmount(amount));
    }
    if p.last_interval_acted == hand.interval_id as i32 {
        return Err(ActionError::IllegalAction(
            "seat already acted in the current betting interval".into(),
        ));
    }

    let all_in = amount == ceiling;
    let paid = amount - p.street_commit;

    if hand.bet_to == 0 {
        // Opening bet.
        if amount < hand.cfg.big_blind && !all_in {
            return Err(ActionError::InvalidAmount(amount));
        }
        let min_raise = amount.max(hand.cfg.big_blind);
        return Ok(BetOutcome {
            paid,
            new_bet_to: amount,
            new_min_raise: min_raise,
            opens_new_interval: true,
            all_in,
        });
    }

    let raise_size = amount - hand.bet_to;
    if raise_size < hand.min_raise_size && !all_in {
        return Err(ActionError::RaiseBelowMinimum {
            raise_size,
            min_raise: hand.min_raise_size,
        });
    }

    let full_raise = raise_size >= hand.min_raise_size;
    Ok(BetOutcome {
        paid,
        new_bet_to: amount,
        new_min_raise: if full_raise {
            raise_size
        } else {
            hand.min_raise_size
        },
        opens_new_interval: full_raise,
        all_in,
    })
}

/// Street is complete once every in-hand, non-folded, non-all-in seat
/// has matched `bet_to` and acted within the current interval (spec
/// §4.E "Street-end detection").
pub fn is_street_complete(hand: &Hand) -> bool {
    hand.active_non_allin_seats().iter().all(|&seat| {
        let p = &hand.players[seat as usize];
        p.street_commit == hand.bet_to && p.last_interval_acted == hand.interval_id as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::events::EventLog;
    use crate::poker::types::{HandConfig, Phase, PlayerHandState, Street};

    fn sample_hand(n: usize) -> Hand {
        Hand {
            hand_id: 1,
            phase: Phase::Betting,
            street: Street::Preflop,
            button_seat: 0,
            small_blind_seat: 0,
            big_blind_seat: 1,
            action_on: Some(0),
            action_deadline: 0,
            bet_to: 2,
            min_raise_size: 2,
            interval_id: 0,
            players: vec![PlayerHandState::default(); n],
            seat_occupied: vec![true; n],
            board: vec![],
            pots: vec![],
            cfg: HandConfig {
                small_blind: 1,
                big_blind: 2,
            },
            events: EventLog::new(),
            pending_refund: None,
            dealer: None,
        }
    }

    #[test]
    fn check_rejected_when_facing_a_bet() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 0;
        assert!(validate_check(&hand, 0).is_err());
    }

    #[test]
    fn check_allowed_when_matched() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 2;
        assert!(validate_check(&hand, 0).is_ok());
    }

    #[test]
    fn opening_bet_below_big_blind_rejected_unless_all_in() {
        let mut hand = sample_hand(2);
        hand.bet_to = 0;
        hand.min_raise_size = 2;
        hand.players[0].in_hand = true;
        let err = validate_bet_to(&hand, 0, 1, 50).unwrap_err();
        assert!(matches!(err, ActionError::InvalidAmount(1)));
    }

    #[test]
    fn opening_bet_all_in_below_big_blind_is_allowed() {
        let mut hand = sample_hand(2);
        hand.bet_to = 0;
        hand.players[0].in_hand = true;
        let outcome = validate_bet_to(&hand, 0, 1, 1).unwrap();
        assert!(outcome.all_in);
        assert_eq!(outcome.new_bet_to, 1);
    }

    #[test]
    fn under_raise_non_all_in_is_rejected() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 0;
        // bet_to=2, min_raise_size=2; raising to 3 is only a raise_size of 1.
        let err = validate_bet_to(&hand, 0, 3, 50).unwrap_err();
        assert!(matches!(err, ActionError::RaiseBelowMinimum { .. }));
    }

    #[test]
    fn under_raise_all_in_is_allowed_and_does_not_reopen_interval() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 0;
        let outcome = validate_bet_to(&hand, 0, 3, 3).unwrap();
        assert!(outcome.all_in);
        assert!(!outcome.opens_new_interval);
        assert_eq!(outcome.new_min_raise, hand.min_raise_size);
    }

    #[test]
    fn full_raise_opens_new_interval_and_updates_min_raise() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 0;
        let outcome = validate_bet_to(&hand, 0, 6, 50).unwrap();
        assert!(outcome.opens_new_interval);
        assert_eq!(outcome.new_min_raise, 4);
        assert_eq!(outcome.new_bet_to, 6);
    }

    #[test]
    fn call_shorter_than_owed_goes_all_in() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 0;
        let (paid, all_in) = validate_call(&hand, 0, 1).unwrap();
        assert_eq!(paid, 1);
        assert!(all_in);
    }

    #[test]
    fn call_with_nothing_owed_is_rejected() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].street_commit = 2;
        assert!(validate_call(&hand, 0, 50).is_err());
    }

    #[test]
    fn raise_blocked_if_seat_already_acted_this_interval() {
        let mut hand = sample_hand(2);
        hand.players[0].in_hand = true;
        hand.players[0].last_interval_acted = 0;
        hand.interval_id = 0;
        let err = validate_bet_to(&hand, 0, 10, 50).unwrap_err();
        assert!(matches!(err, ActionError::IllegalAction(_)));
    }
}
