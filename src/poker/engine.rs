//! Table/hand operations (spec §4.E): `create_table`, `sit`, `leave`,
//! `start_hand`, `act`, `tick`, `abort_hand`, plus the street-end and
//! showdown machinery they share. Every transition is a pure function of
//! `(&mut Table, message, now) -> Result<Vec<GameEvent>, ActionError>`;
//! on error the table is left untouched (spec §7 "Propagation").

use tracing::{debug, info, warn};

use crate::cards::{self, Card};
use crate::slashing::{self, SlashReason};

use super::betting::{self, is_street_complete, to_call};
use super::errors::{ActionError, StateError};
use super::events::{ActionKind, GameEvent};
use super::pots::compute_side_pots;
use super::types::{
    Chips, Hand, HandConfig, Phase, PlayerBetAction, PlayerHandState, Seat, SeatId, Street, Table,
    TableId, TableParams, MAX_SEATS,
};

pub const LOG_TARGET: &str = "ocp_core::poker::engine";

fn next_occupied_seat(table: &Table, after: SeatId) -> Option<SeatId> {
    let n = table.seats.len();
    for step in 1..=n {
        let candidate = ((after as usize + step) % n) as SeatId;
        if table.seats[candidate as usize].is_some() {
            return Some(candidate);
        }
    }
    None
}

fn first_actionable_seat_from(hand: &Hand, after: SeatId) -> Option<SeatId> {
    let n = hand.players.len();
    for step in 1..=n {
        let candidate = ((after as usize + step) % n) as SeatId;
        let p = &hand.players[candidate as usize];
        if p.in_hand && !p.folded && !p.all_in {
            return Some(candidate);
        }
    }
    None
}

pub fn create_table(
    id: TableId,
    creator: super::types::PlayerId,
    params: TableParams,
) -> Result<Table, ActionError> {
    params.validate()?;
    info!(target: LOG_TARGET, table_id = id, "table created");
    Ok(Table::new(id, creator, params))
}

pub fn sit(
    table: &mut Table,
    seat: SeatId,
    player: super::types::PlayerId,
    pk_player: [u8; 32],
    buy_in: Chips,
    bond: Chips,
) -> Result<Vec<GameEvent>, ActionError> {
    let idx = seat as usize;
    if idx >= table.seats.len() {
        return Err(ActionError::SeatEmpty(seat));
    }
    if table.seats[idx].is_some() {
        return Err(ActionError::SeatOccupied(seat));
    }
    if buy_in < table.params.min_buy_in || buy_in > table.params.max_buy_in {
        return Err(ActionError::InvalidBuyIn {
            amount: buy_in,
            min: table.params.min_buy_in,
            max: table.params.max_buy_in,
        });
    }
    if bond < table.params.player_bond {
        return Err(ActionError::InvalidBond {
            amount: bond,
            min: table.params.player_bond,
        });
    }
    table.seats[idx] = Some(Seat {
        player,
        pk_player,
        stack: buy_in,
        bond,
    });
    debug!(target: LOG_TARGET, seat, player, "player sat");
    let ev = GameEvent::PlayerSat { seat };
    table.events.push(ev.clone());
    Ok(vec![ev])
}

pub fn leave(table: &mut Table, seat: SeatId) -> Result<Vec<GameEvent>, ActionError> {
    let idx = seat as usize;
    let occupant = table
        .seats
        .get(idx)
        .and_then(|s| *s)
        .ok_or(ActionError::SeatEmpty(seat))?;
    if let Some(hand) = &table.hand {
        if idx < hand.players.len() && hand.players[idx].in_hand {
            return Err(ActionError::SeatInHand(seat));
        }
    }
    table.seats[idx] = None;
    let _ = occupant;
    let ev = GameEvent::PlayerLeft { seat };
    table.events.push(ev.clone());
    Ok(vec![ev])
}

/// Starts a new hand: advances the button, posts blinds, and determines
/// the first actor (spec §4.E `start_hand`).
pub fn start_hand(table: &mut Table, now: u64) -> Result<Vec<GameEvent>, ActionError> {
    if table.hand.is_some() {
        return Err(ActionError::HandAlreadyActive);
    }
    let funded = table.funded_seats();
    if funded.len() < 2 {
        return Err(ActionError::NotEnoughPlayers);
    }

    let button = next_occupied_seat(table, table.button_seat).unwrap_or(funded[0]);
    table.button_seat = button;

    let heads_up = funded.len() == 2;
    let sb_seat = if heads_up {
        button
    } else {
        next_occupied_seat(table, button).expect("at least 2 funded seats")
    };
    let bb_seat = next_occupied_seat(table, sb_seat).expect("at least 2 funded seats");

    let n = table.seats.len();
    let mut players = vec![PlayerHandState::default(); n];
    for &s in &funded {
        players[s as usize].in_hand = true;
    }

    let sb_amount = table.params.small_blind;
    let bb_amount = table.params.big_blind;
    let sb_stack = table.seats[sb_seat as usize].as_ref().unwrap().stack;
    let bb_stack = table.seats[bb_seat as usize].as_ref().unwrap().stack;
    let sb_pay = sb_amount.min(sb_stack);
    let bb_pay = bb_amount.min(bb_stack);

    table.seats[sb_seat as usize].as_mut().unwrap().stack -= sb_pay;
    table.seats[bb_seat as usize].as_mut().unwrap().stack -= bb_pay;
    players[sb_seat as usize].street_commit = sb_pay;
    players[sb_seat as usize].total_commit = sb_pay;
    players[sb_seat as usize].all_in = sb_pay < sb_amount;
    players[bb_seat as usize].street_commit = bb_pay;
    players[bb_seat as usize].total_commit = bb_pay;
    players[bb_seat as usize].all_in = bb_pay < bb_amount;

    let hand_id = table.next_hand_id;
    table.next_hand_id += 1;

    let mut hand = Hand {
        hand_id,
        phase: Phase::Shuffle,
        street: Street::Preflop,
        button_seat: button,
        small_blind_seat: sb_seat,
        big_blind_seat: bb_seat,
        action_on: None,
        action_deadline: now + table.params.action_timeout_secs,
        bet_to: bb_pay,
        min_raise_size: table.params.big_blind,
        interval_id: 0,
        players,
        seat_occupied: table.seats.iter().map(Option::is_some).collect(),
        board: Vec::new(),
        pots: Vec::new(),
        cfg: HandConfig {
            small_blind: sb_amount,
            big_blind: bb_amount,
        },
        events: super::events::EventLog::new(),
        pending_refund: None,
        dealer: None,
    };

    // `hand.phase` stays `Shuffle` and `action_on` stays `None` here:
    // betting cannot begin until the dealer pipeline finalizes the deck
    // and assigns hole positions (spec §4.G, §5 "Shuffle -> Betting"
    // DAG edge). `FinalizeDeck` calls `begin_preflop_betting` once
    // dealing completes.
    let events = vec![GameEvent::HandStarted {
        button,
        sb_seat,
        bb_seat,
    }];
    hand.events.push(events[0].clone());

    info!(target: LOG_TARGET, hand_id, button, sb_seat, bb_seat, "hand started");
    table.hand = Some(hand);
    Ok(events)
}

/// Called by the dealer pipeline once `FinalizeDeck` succeeds for a
/// hand's first (preflop) street: moves the hand from `Shuffle` to
/// `Betting` and sets the first actor (left of the big blind, or the
/// button itself heads-up), or transitions straight to `AwaitShowdown`
/// if no seat can act (spec §4.E `start_hand`: "if no one can act …
/// go immediately to showdown").
pub fn begin_preflop_betting(table: &mut Table, now: u64) -> Result<(), ActionError> {
    let button = table.button_seat;
    let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
    if hand.phase != Phase::Shuffle {
        return Err(ActionError::WrongPhase(hand.phase));
    }
    let heads_up = hand.players.iter().filter(|p| p.in_hand).count() == 2;
    let bb_seat = hand.big_blind_seat;
    let first_actor = if heads_up {
        Some(button)
    } else {
        first_actionable_seat_from(hand, bb_seat)
    };
    match first_actor {
        Some(seat) => {
            hand.action_on = Some(seat);
            hand.action_deadline = now + table.params.action_timeout_secs;
            hand.phase = Phase::Betting;
        }
        None => {
            // Everyone who can act is already all-in on blinds alone.
            finalize_to_showdown(hand);
        }
    }
    Ok(())
}

fn finalize_to_showdown(hand: &mut Hand) {
    let totals: Vec<Chips> = hand.players.iter().map(|p| p.total_commit).collect();
    let folded: Vec<bool> = hand.players.iter().map(|p| p.folded).collect();
    hand.pots = compute_side_pots(&totals, &folded);
    hand.phase = Phase::AwaitShowdown;
    hand.action_on = None;
}

/// Apply a player's action (spec §4.E `act`). `stack` is the seat's
/// current chip stack outside this street's commitment (live on
/// `table.seats`); this function mutates both the seat's stack and the
/// active hand.
pub fn act(
    table: &mut Table,
    seat: SeatId,
    action: PlayerBetAction,
    now: u64,
) -> Result<Vec<GameEvent>, ActionError> {
    let stack = table.seats[seat as usize]
        .as_ref()
        .ok_or(ActionError::SeatEmpty(seat))?
        .stack;

    let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
    if hand.phase != Phase::Betting {
        return Err(ActionError::WrongPhase(hand.phase));
    }

    let mut events = Vec::new();

    match action {
        PlayerBetAction::Fold => {
            betting::validate_check(hand, seat).err(); // no-op; actor check below
            if hand.action_on != Some(seat) {
                return Err(ActionError::OutOfTurn(seat));
            }
            hand.players[seat as usize].folded = true;
            events.push(GameEvent::ActionApplied {
                seat,
                kind: ActionKind::Fold,
                amount: None,
            });
        }
        PlayerBetAction::Check => {
            betting::validate_check(hand, seat)?;
            hand.players[seat as usize].last_interval_acted = hand.interval_id as i32;
            events.push(GameEvent::ActionApplied {
                seat,
                kind: ActionKind::Check,
                amount: None,
            });
        }
        PlayerBetAction::Call => {
            let (paid, all_in) = betting::validate_call(hand, seat, stack)?;
            hand.players[seat as usize].street_commit += paid;
            hand.players[seat as usize].total_commit += paid;
            hand.players[seat as usize].last_interval_acted = hand.interval_id as i32;
            if all_in {
                hand.players[seat as usize].all_in = true;
            }
            table.seats[seat as usize].as_mut().unwrap().stack -= paid;
            events.push(GameEvent::ActionApplied {
                seat,
                kind: ActionKind::Call,
                amount: Some(paid),
            });
        }
        PlayerBetAction::BetTo(amount) => {
            let outcome = betting::validate_bet_to(hand, seat, amount, stack)?;
            hand.players[seat as usize].street_commit = amount;
            hand.players[seat as usize].total_commit += outcome.paid;
            hand.bet_to = outcome.new_bet_to;
            hand.min_raise_size = outcome.new_min_raise;
            if outcome.opens_new_interval {
                hand.interval_id += 1;
            }
            hand.players[seat as usize].last_interval_acted = hand.interval_id as i32;
            if outcome.all_in {
                hand.players[seat as usize].all_in = true;
            }
            table.seats[seat as usize].as_mut().unwrap().stack -= outcome.paid;
            events.push(GameEvent::ActionApplied {
                seat,
                kind: ActionKind::BetTo,
                amount: Some(amount),
            });
        }
    }

    for e in &events {
        hand.events.push(e.clone());
    }

    let still_in = hand.seats_still_in();
    if still_in.len() == 1 {
        let winner = still_in[0];
        let pot = complete_by_folds(table, winner)?;
        events.push(GameEvent::HandCompleted { winner, pot });
        table.hand = None;
        return Ok(events);
    }

    if is_street_complete(hand) {
        let mut more = on_street_complete(table, now)?;
        events.append(&mut more);
    } else {
        let next = first_actionable_seat_from(hand, seat);
        hand.action_on = next;
        hand.action_deadline = now + table.params.action_timeout_secs;
    }

    Ok(events)
}

fn complete_by_folds(table: &mut Table, winner: SeatId) -> Result<Chips, ActionError> {
    let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
    refund_uncalled_excess(hand);
    let pot: Chips = hand.players.iter().map(|p| p.total_commit).sum();
    for p in hand.players.iter_mut() {
        p.total_commit = 0;
        p.street_commit = 0;
    }
    hand.phase = Phase::Complete;
    table.seats[winner as usize].as_mut().unwrap().stack += pot;
    info!(target: LOG_TARGET, winner, pot, "hand completed by folds");
    Ok(pot)
}

fn refund_uncalled_excess(hand: &mut Hand) {
    let active: Vec<SeatId> = hand.active_seats();
    if active.is_empty() {
        return;
    }
    let mut sorted: Vec<Chips> = active
        .iter()
        .map(|&s| hand.players[s as usize].street_commit)
        .collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    if sorted.len() < 2 {
        return;
    }
    let top = sorted[0];
    let second = sorted[1];
    if top <= second {
        return;
    }
    let excess = top - second;
    let top_seats: Vec<SeatId> = active
        .iter()
        .copied()
        .filter(|&s| hand.players[s as usize].street_commit == top)
        .collect();
    if top_seats.len() != 1 {
        return;
    }
    let seat = top_seats[0];
    hand.players[seat as usize].street_commit -= excess;
    hand.players[seat as usize].total_commit -= excess;
    // Caller applies the stack-side refund; see `on_street_complete`.
    hand.pending_refund = Some((seat, excess));
}

fn on_street_complete(table: &mut Table, now: u64) -> Result<Vec<GameEvent>, ActionError> {
    let mut events = Vec::new();
    {
        let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
        refund_uncalled_excess(hand);
    }
    if let Some((seat, amount)) = table.hand.as_mut().and_then(|h| h.pending_refund.take()) {
        table.seats[seat as usize].as_mut().unwrap().stack += amount;
    }

    let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
    let still_in = hand.seats_still_in();
    let contenders_with_chips = still_in
        .iter()
        .filter(|&&s| !hand.players[s as usize].all_in)
        .count();

    if hand.street == Street::River {
        finalize_to_showdown(hand);
        events.push(GameEvent::DeckFinalized);
        return Ok(events);
    }

    if contenders_with_chips < 2 {
        finalize_to_showdown(hand);
        return Ok(events);
    }

    hand.street = match hand.street {
        Street::Preflop => Street::Flop,
        Street::Flop => Street::Turn,
        Street::Turn => Street::River,
        Street::River => unreachable!(),
    };
    for p in hand.players.iter_mut() {
        p.street_commit = 0;
        p.last_interval_acted = -1;
    }
    hand.bet_to = 0;
    hand.min_raise_size = hand.cfg.big_blind;
    hand.interval_id = 0;
    hand.phase = match hand.street {
        Street::Flop => Phase::AwaitFlop,
        Street::Turn => Phase::AwaitTurn,
        Street::River => Phase::AwaitRiver,
        Street::Preflop => unreachable!(),
    };
    hand.action_on = None;
    let _ = now;
    Ok(events)
}

/// Called by the dealer pipeline once the street's board cards have
/// been revealed; moves the hand from `Await{Flop,Turn,River}` to
/// `Betting` and sets the first actor (clockwise from the button).
pub fn begin_betting_round(table: &mut Table, now: u64) -> Result<(), ActionError> {
    let button = table.button_seat;
    let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
    match hand.phase {
        Phase::AwaitFlop | Phase::AwaitTurn | Phase::AwaitRiver => {}
        other => return Err(ActionError::WrongPhase(other)),
    }
    hand.phase = Phase::Betting;
    hand.action_on = first_actionable_seat_from(hand, button);
    hand.action_deadline = now + table.params.action_timeout_secs;
    if hand.action_on.is_none() {
        finalize_to_showdown(hand);
    }
    Ok(())
}

/// Resolve a hand that has reached showdown, given every non-folded
/// seat's hole cards and the final board. Splits each pot among tied
/// winners; remainder chips (integer division) go to the lowest-indexed
/// winning seat.
pub fn resolve_showdown(
    table: &mut Table,
    hole_cards: &[(SeatId, [Card; 2])],
) -> Result<Vec<GameEvent>, ActionError> {
    let hand = table.hand.as_mut().ok_or(ActionError::NoActiveHand)?;
    if !matches!(hand.phase, Phase::AwaitShowdown | Phase::Showdown) {
        return Err(ActionError::WrongPhase(hand.phase));
    }
    hand.phase = Phase::Showdown;

    let mut events = Vec::new();
    for pot in hand.pots.clone() {
        let mut ranked: Vec<(SeatId, cards::HandRank)> = Vec::new();
        for &seat in &pot.eligible {
            if let Some((_, hole)) = hole_cards.iter().find(|(s, _)| *s == seat) {
                let mut seven = hole.to_vec();
                seven.extend_from_slice(&hand.board);
                ranked.push((seat, cards::evaluate(&seven)));
            }
        }
        if ranked.is_empty() {
            continue;
        }
        let best = ranked.iter().map(|(_, r)| r.clone()).max().unwrap();
        let mut winners: Vec<SeatId> = ranked
            .iter()
            .filter(|(_, r)| *r == best)
            .map(|(s, _)| *s)
            .collect();
        winners.sort_unstable();

        let share = pot.amount / winners.len() as Chips;
        let remainder = pot.amount % winners.len() as Chips;
        for (i, &seat) in winners.iter().enumerate() {
            let amount = share + if i == 0 { remainder } else { 0 };
            table.seats[seat as usize].as_mut().unwrap().stack += amount;
            events.push(GameEvent::HandCompleted {
                winner: seat,
                pot: amount,
            });
        }
    }

    for p in hand.players.iter_mut() {
        p.total_commit = 0;
        p.street_commit = 0;
    }
    hand.phase = Phase::Complete;
    for e in &events {
        hand.events.push(e.clone());
    }
    table.hand = None;
    Ok(events)
}

/// Apply the default action for the seat on the clock if its deadline
/// has elapsed (spec §4.E `tick`). A no-op (returns `Ok(vec![])`)
/// whenever there is no active hand or no seat currently on the clock.
pub fn tick(
    table: &mut Table,
    now: u64,
    player_bond_min: Chips,
    player_timeout_slash: Chips,
) -> Result<Vec<GameEvent>, ActionError> {
    let (seat, deadline) = match table.hand.as_ref().and_then(|h| h.action_on.map(|s| (s, h.action_deadline))) {
        Some(pair) => pair,
        None => return Ok(Vec::new()),
    };
    if now < deadline {
        return Err(ActionError::DeadlineNotReached);
    }

    let legal_check = {
        let hand = table.hand.as_ref().unwrap();
        to_call(hand, seat) == 0
    };
    let default = if legal_check {
        PlayerBetAction::Check
    } else {
        PlayerBetAction::Fold
    };
    let default_kind = match default {
        PlayerBetAction::Check => ActionKind::Check,
        PlayerBetAction::Fold => ActionKind::Fold,
        _ => unreachable!(),
    };

    let mut events = act(table, seat, default, now)?;
    events.push(GameEvent::TimeoutApplied {
        seat,
        default: default_kind,
    });

    let bond = table.seats[seat as usize].as_ref().map(|s| s.bond).unwrap_or(0);
    let (slashed, evidence) = slashing::slash(seat as u64, SlashReason::PlayerTimeout, player_timeout_slash, bond);
    if let Some(s) = table.seats[seat as usize].as_mut() {
        s.bond -= slashed;
    }
    events.push(GameEvent::PlayerSlashed {
        seat,
        reason: evidence.reason,
        amount: evidence.amount,
    });
    warn!(target: LOG_TARGET, seat, amount = slashed, "player timed out and was slashed");

    if let Some(s) = table.seats[seat as usize].as_ref() {
        if s.bond < player_bond_min {
            let _ = leave(table, seat);
            events.push(GameEvent::PlayerEjected { seat });
        }
    }

    Ok(events)
}

/// Aborts the active hand, refunding committed chips per
/// `refund_blinds_on_abort` (spec §4.E `abort_hand`).
pub fn abort_hand(table: &mut Table, reason: String) -> Result<Vec<GameEvent>, ActionError> {
    let refund_blinds = table.params.refund_blinds_on_abort;
    let (sb_seat, bb_seat) = {
        let hand = table.hand.as_ref().ok_or(ActionError::NoActiveHand)?;
        (hand.small_blind_seat, hand.big_blind_seat)
    };
    let hand = table.hand.take().ok_or(ActionError::NoActiveHand)?;

    for (idx, p) in hand.players.iter().enumerate() {
        if p.total_commit == 0 {
            continue;
        }
        let seat = idx as SeatId;
        let is_blind_only = (seat == sb_seat || seat == bb_seat) && hand.street == Street::Preflop;
        if is_blind_only && !refund_blinds {
            table.treasury += p.total_commit;
            continue;
        }
        if let Some(s) = table.seats[idx].as_mut() {
            s.stack += p.total_commit;
        }
    }

    let ev = GameEvent::HandAborted { reason };
    table.events.push(ev.clone());
    info!(target: LOG_TARGET, "hand aborted");
    Ok(vec![ev])
}

/// Postcondition invariant checks (spec §4.E "Invariants"), run after
/// every mutating transition in tests and by callers that want extra
/// assurance; a violation here indicates an implementation bug and must
/// halt processing (spec §7), not be treated as a recoverable error.
pub fn check_invariants(table: &Table, expected_total: Chips) -> Result<(), StateError> {
    let seat_total: Chips = table.seats.iter().flatten().map(|s| s.stack).sum();
    let commit_total: Chips = table
        .hand
        .as_ref()
        .map(|h| h.players.iter().map(|p| p.total_commit).sum())
        .unwrap_or(0);
    let total = seat_total + commit_total + table.treasury;
    if total != expected_total {
        return Err(StateError::ChipsNotConserved {
            expected: expected_total,
            actual: total,
        });
    }
    if let Some(hand) = &table.hand {
        let max_commit = hand.players.iter().map(|p| p.street_commit).max().unwrap_or(0);
        if hand.bet_to < max_commit {
            return Err(StateError::BetToBelowMaxCommit {
                bet_to: hand.bet_to,
                max_commit,
            });
        }
        for (i, p) in hand.players.iter().enumerate() {
            if p.street_commit > p.total_commit {
                return Err(StateError::CommitOrderingViolated {
                    seat: i as SeatId,
                    street_commit: p.street_commit,
                    total_commit: p.total_commit,
                });
            }
        }
        if let Some(seat) = hand.action_on {
            let p = &hand.players[seat as usize];
            if !(p.in_hand && !p.folded && !p.all_in) {
                return Err(StateError::ActionOnInvalidSeat(seat));
            }
        }
    }
    let _ = MAX_SEATS;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TableParams {
        TableParams {
            small_blind: 1,
            big_blind: 2,
            min_buy_in: 50,
            max_buy_in: 200,
            action_timeout_secs: 30,
            dealer_timeout_secs: 30,
            player_bond: 10,
            rake_bps: 0,
            refund_blinds_on_abort: true,
        }
    }

    fn seat_up(table: &mut Table, seat: SeatId, buy_in: Chips) {
        sit(table, seat, seat as u64, [0u8; 32], buy_in, 10).unwrap();
    }

    #[test]
    fn start_hand_waits_in_shuffle_until_dealing_finalizes() {
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        start_hand(&mut table, 0).unwrap();

        {
            let hand = table.hand.as_ref().unwrap();
            assert_eq!(hand.phase, Phase::Shuffle);
            assert_eq!(hand.action_on, None);
        }
        assert!(matches!(
            act(&mut table, 0, PlayerBetAction::Fold, 1),
            Err(ActionError::WrongPhase(Phase::Shuffle))
        ));

        begin_preflop_betting(&mut table, 1).unwrap();
        let hand = table.hand.as_ref().unwrap();
        assert_eq!(hand.phase, Phase::Betting);
        assert_eq!(hand.action_on, Some(0));
    }

    #[test]
    fn heads_up_blinds_and_uncalled_excess_fold() {
        // Spec §8 scenario 1.
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        start_hand(&mut table, 0).unwrap();
        begin_preflop_betting(&mut table, 0).unwrap();

        assert_eq!(table.seats[0].as_ref().unwrap().stack, 99);
        assert_eq!(table.seats[1].as_ref().unwrap().stack, 98);
        {
            let hand = table.hand.as_ref().unwrap();
            assert_eq!(hand.players[0].street_commit, 1);
            assert_eq!(hand.players[1].street_commit, 2);
            assert_eq!(hand.bet_to, 2);
            assert_eq!(hand.action_on, Some(0));
        }

        act(&mut table, 0, PlayerBetAction::Fold, 1).unwrap();

        assert!(table.hand.is_none());
        assert_eq!(table.seats[0].as_ref().unwrap().stack, 99);
        assert_eq!(table.seats[1].as_ref().unwrap().stack, 101);
    }

    #[test]
    fn three_way_all_in_produces_expected_side_pots() {
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 200);
        seat_up(&mut table, 2, 200);
        start_hand(&mut table, 0).unwrap();
        begin_preflop_betting(&mut table, 0).unwrap();

        // seat 0 = button+sb (100), seat 1 = bb (200), seat 2 acts first (200).
        act(&mut table, 2, PlayerBetAction::BetTo(200), 1).unwrap();
        act(&mut table, 0, PlayerBetAction::BetTo(100), 2).unwrap();
        let events = act(&mut table, 1, PlayerBetAction::BetTo(200), 3).unwrap();

        let hand = table.hand.as_ref().unwrap();
        assert_eq!(hand.phase, Phase::AwaitShowdown);
        assert_eq!(hand.pots.len(), 2);
        assert_eq!(hand.pots[0].amount, 300);
        assert_eq!(hand.pots[0].eligible, vec![0, 1, 2]);
        assert_eq!(hand.pots[1].amount, 200);
        assert_eq!(hand.pots[1].eligible, vec![1, 2]);
        let _ = events;
    }

    #[test]
    fn timeout_folds_when_facing_a_bet_and_slashes_bond() {
        // Spec §8 scenario 5.
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        seat_up(&mut table, 2, 100);
        start_hand(&mut table, 0).unwrap();
        begin_preflop_betting(&mut table, 0).unwrap();

        let deadline = table.hand.as_ref().unwrap().action_deadline;
        let events = tick(&mut table, deadline, 5, 3).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TimeoutApplied { default: ActionKind::Fold, .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerSlashed { .. })));
    }

    #[test]
    fn tick_before_deadline_is_an_error() {
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        start_hand(&mut table, 0).unwrap();
        begin_preflop_betting(&mut table, 0).unwrap();
        let deadline = table.hand.as_ref().unwrap().action_deadline;
        assert!(matches!(
            tick(&mut table, deadline - 1, 5, 3),
            Err(ActionError::DeadlineNotReached)
        ));
    }

    #[test]
    fn start_hand_requires_two_funded_seats() {
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        assert!(matches!(
            start_hand(&mut table, 0),
            Err(ActionError::NotEnoughPlayers)
        ));
    }

    #[test]
    fn abort_hand_refunds_committed_chips() {
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        start_hand(&mut table, 0).unwrap();
        abort_hand(&mut table, "threshold unreachable".into()).unwrap();
        assert_eq!(table.seats[0].as_ref().unwrap().stack, 100);
        assert_eq!(table.seats[1].as_ref().unwrap().stack, 100);
        assert!(table.hand.is_none());
    }

    #[test]
    fn abort_hand_sequesters_blinds_when_configured() {
        let mut p = params();
        p.refund_blinds_on_abort = false;
        let mut table = create_table(1, 0, p).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        start_hand(&mut table, 0).unwrap();
        abort_hand(&mut table, "threshold unreachable".into()).unwrap();
        assert_eq!(table.seats[0].as_ref().unwrap().stack, 99);
        assert_eq!(table.seats[1].as_ref().unwrap().stack, 98);
        assert_eq!(table.treasury, 3);
    }

    #[test]
    fn chip_conservation_holds_after_a_fold() {
        let mut table = create_table(1, 0, params()).unwrap();
        seat_up(&mut table, 0, 100);
        seat_up(&mut table, 1, 100);
        start_hand(&mut table, 0).unwrap();
        begin_preflop_betting(&mut table, 0).unwrap();
        act(&mut table, 0, PlayerBetAction::Fold, 1).unwrap();
        check_invariants(&table, 200).unwrap();
    }
}
