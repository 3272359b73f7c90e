//! Message dispatch over the chain-wide aggregate (spec §6), grounded in
//! the teacher's `game::coordinator::manager` message-routing loop,
//! generalized from its single in-memory game table to the spec's
//! multi-table, multi-epoch aggregate. This is the one place in the
//! crate that wires `poker`, `dealer`, `dkg`, `epoch`, and `slashing`
//! together behind a single ordered-message entry point; everything
//! upstream of it stays a pure function of its own subsystem's state.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::ProtocolConfig;
use crate::dealer::DealerHand;
use crate::dkg::{ComplaintKind, DkgState, RevealOutcome};
use crate::elgamal::CardPointTable;
use crate::epoch::{self, CommitteeMember, Epoch, EpochPhase};
use crate::group::{GroupElement, Scalar};
use crate::poker::engine;
use crate::poker::errors::ActionError;
use crate::poker::events::{EpochId, GameEvent, ValidatorId};
use crate::poker::types::{Chips, HandId, PlayerBetAction, PlayerId, SeatId, TableId, TableParams};
use crate::CoreError;

pub const LOG_TARGET: &str = "ocp_core::dispatch";

/// Every message the core accepts (spec §6), addressed either to a
/// table, to the chain-wide epoch/DKG state, or to a specific hand.
#[derive(Clone, Debug)]
pub enum Message {
    CreateTable {
        table_id: TableId,
        creator: PlayerId,
        params: TableParams,
    },
    Sit {
        table_id: TableId,
        seat: SeatId,
        player: PlayerId,
        pk_player: [u8; 32],
        buy_in: Chips,
        bond: Chips,
    },
    Leave {
        table_id: TableId,
        seat: SeatId,
    },
    StartHand {
        table_id: TableId,
    },
    Act {
        table_id: TableId,
        seat: SeatId,
        action: PlayerBetAction,
    },
    Tick {
        table_id: TableId,
    },

    BeginEpoch {
        epoch_id: EpochId,
        candidates: Vec<(ValidatorId, u64)>,
        committee_size: u8,
        threshold: u8,
        seed: [u8; 32],
        commit_window: u64,
        complaint_window: u64,
        reveal_window: u64,
    },
    DkgCommit {
        epoch_id: EpochId,
        dealer: u8,
        commitments: Vec<GroupElement>,
    },
    DkgComplaintMissing {
        epoch_id: EpochId,
        complainer: u8,
        dealer: u8,
    },
    DkgComplaintInvalid {
        epoch_id: EpochId,
        complainer: u8,
        dealer: u8,
    },
    DkgShareReveal {
        epoch_id: EpochId,
        dealer: u8,
        recipient: u8,
        share: Scalar,
    },
    DkgTimeout {
        epoch_id: EpochId,
    },
    FinalizeEpoch {
        epoch_id: EpochId,
    },

    InitHand {
        table_id: TableId,
        hand_id: HandId,
        epoch_id: EpochId,
        deck_size: Option<u8>,
    },
    SubmitShuffle {
        table_id: TableId,
        hand_id: HandId,
        shuffler: u8,
        proof_bytes: Vec<u8>,
    },
    FinalizeDeck {
        table_id: TableId,
        hand_id: HandId,
    },
    SubmitEncShare {
        table_id: TableId,
        hand_id: HandId,
        pos: u8,
        validator: u8,
        pk_player: GroupElement,
        enc_share: [u8; 64],
        proof_bytes: Vec<u8>,
    },
    SubmitPubShare {
        table_id: TableId,
        hand_id: HandId,
        pos: u8,
        validator: u8,
        share: GroupElement,
        proof: crate::proofs::EqDlogProof,
    },
    FinalizeReveal {
        table_id: TableId,
        hand_id: HandId,
        pos: u8,
    },
    DealerTimeout {
        table_id: TableId,
        hand_id: HandId,
    },
}

const DEFAULT_DECK_SIZE: u8 = 52;

/// The chain-wide aggregate (spec §5 "Shared resources"): one entry per
/// table, one active (or most-recent) epoch's committee/DKG state. All
/// mutation happens through [`dispatch`].
#[derive(Debug, Default)]
pub struct Chain {
    pub tables: HashMap<TableId, crate::poker::types::Table>,
    pub epochs: HashMap<EpochId, Epoch>,
    pub dkg_states: HashMap<EpochId, DkgState>,
    pub config: ProtocolConfig,
}

impl Chain {
    pub fn new(config: ProtocolConfig) -> Self {
        Chain {
            tables: HashMap::new(),
            epochs: HashMap::new(),
            dkg_states: HashMap::new(),
            config,
        }
    }

    fn table_mut(&mut self, table_id: TableId) -> Result<&mut crate::poker::types::Table, CoreError> {
        self.tables
            .get_mut(&table_id)
            .ok_or(CoreError::UnknownTable(table_id))
    }

    fn epoch_mut(&mut self, epoch_id: EpochId) -> Result<&mut Epoch, CoreError> {
        self.epochs
            .get_mut(&epoch_id)
            .ok_or(CoreError::UnknownEpoch(epoch_id))
    }

    fn dkg_mut(&mut self, epoch_id: EpochId) -> Result<&mut DkgState, CoreError> {
        self.dkg_states
            .get_mut(&epoch_id)
            .ok_or(CoreError::UnknownEpoch(epoch_id))
    }

    fn hand_mut<'t>(
        table: &'t mut crate::poker::types::Table,
        hand_id: HandId,
    ) -> Result<&'t mut crate::poker::types::Hand, CoreError> {
        match table.hand.as_mut() {
            Some(h) if h.hand_id == hand_id => Ok(h),
            _ => Err(CoreError::Action(ActionError::NoActiveHand)),
        }
    }
}

/// Apply one totally-ordered `msg` to `chain` at time/block-height
/// `now`, returning the events it produced or a typed error that leaves
/// `chain` untouched (spec §5 "Transaction discipline": atomic, typed
/// rejection on failure).
pub fn dispatch(chain: &mut Chain, msg: Message, now: u64) -> Result<Vec<GameEvent>, CoreError> {
    match msg {
        Message::CreateTable {
            table_id,
            creator,
            params,
        } => {
            let table = engine::create_table(table_id, creator, params)?;
            let ev = GameEvent::TableCreated;
            chain.tables.insert(table_id, table);
            Ok(vec![ev])
        }
        Message::Sit {
            table_id,
            seat,
            player,
            pk_player,
            buy_in,
            bond,
        } => {
            let table = chain.table_mut(table_id)?;
            Ok(engine::sit(table, seat, player, pk_player, buy_in, bond)?)
        }
        Message::Leave { table_id, seat } => {
            let table = chain.table_mut(table_id)?;
            Ok(engine::leave(table, seat)?)
        }
        Message::StartHand { table_id } => {
            let table = chain.table_mut(table_id)?;
            Ok(engine::start_hand(table, now)?)
        }
        Message::Act {
            table_id,
            seat,
            action,
        } => {
            let table = chain.table_mut(table_id)?;
            Ok(engine::act(table, seat, action, now)?)
        }
        Message::Tick { table_id } => {
            let cfg = chain.config;
            let table = chain.table_mut(table_id)?;
            Ok(engine::tick(table, now, cfg.player_bond_min, cfg.player_timeout_slash)?)
        }

        Message::BeginEpoch {
            epoch_id,
            candidates,
            committee_size,
            threshold,
            seed,
            commit_window,
            complaint_window,
            reveal_window,
        } => {
            let epoch = epoch::begin_epoch(epoch_id, &candidates, committee_size, threshold, seed)?;
            let state = DkgState::new(
                &epoch,
                now + commit_window,
                now + commit_window + complaint_window,
                now + commit_window + complaint_window + reveal_window,
            );
            info!(target: LOG_TARGET, epoch_id, "epoch begun");
            chain.epochs.insert(epoch_id, epoch);
            chain.dkg_states.insert(epoch_id, state);
            Ok(vec![GameEvent::EpochBegun { epoch_id }])
        }
        Message::DkgCommit {
            epoch_id,
            dealer,
            commitments,
        } => {
            let state = chain.dkg_mut(epoch_id)?;
            state.commit(dealer, commitments, now)?;
            Ok(Vec::new())
        }
        Message::DkgComplaintMissing {
            epoch_id,
            complainer,
            dealer,
        } => {
            let state = chain.dkg_mut(epoch_id)?;
            state.file_complaint(complainer, dealer, ComplaintKind::Missing)?;
            Ok(Vec::new())
        }
        Message::DkgComplaintInvalid {
            epoch_id,
            complainer,
            dealer,
        } => {
            let state = chain.dkg_mut(epoch_id)?;
            state.file_complaint(complainer, dealer, ComplaintKind::Invalid)?;
            Ok(Vec::new())
        }
        Message::DkgShareReveal {
            epoch_id,
            dealer,
            recipient,
            share,
        } => {
            let epoch = chain
                .epochs
                .get(&epoch_id)
                .cloned()
                .ok_or(CoreError::UnknownEpoch(epoch_id))?;
            let config = chain.config;
            let state = chain.dkg_mut(epoch_id)?;
            let outcome = state.reveal(dealer, recipient, share, &epoch)?;
            Ok(vec![slash_event_for_reveal(outcome, &config)])
        }
        Message::DkgTimeout { epoch_id } => {
            let epoch = chain
                .epochs
                .get(&epoch_id)
                .cloned()
                .ok_or(CoreError::UnknownEpoch(epoch_id))?;
            let config = chain.config;
            let state = chain.dkg_mut(epoch_id)?;
            let (slashes, result) = state.timeout(now, &epoch);
            let mut events: Vec<GameEvent> = slashes
                .into_iter()
                .map(|s| GameEvent::ValidatorSlashed {
                    validator: s.validator,
                    reason: s.reason,
                    amount: config.dkg_bad_commitment_slash,
                })
                .collect();
            if let Ok(pk_epoch) = result {
                let epoch = chain.epoch_mut(epoch_id)?;
                epoch.pk_epoch = Some(pk_epoch);
                epoch.phase = EpochPhase::Active;
                events.push(GameEvent::EpochFinalized { epoch_id, pk_epoch });
            }
            Ok(events)
        }
        Message::FinalizeEpoch { epoch_id } => {
            let state = chain.dkg_mut(epoch_id)?;
            let pk_epoch = state.finalize(now)?;
            let epoch = chain.epoch_mut(epoch_id)?;
            epoch.pk_epoch = Some(pk_epoch);
            epoch.phase = EpochPhase::Active;
            info!(target: LOG_TARGET, epoch_id, "epoch finalized");
            Ok(vec![GameEvent::EpochFinalized { epoch_id, pk_epoch }])
        }

        Message::InitHand {
            table_id,
            hand_id,
            epoch_id,
            deck_size,
        } => {
            let epoch = chain
                .epochs
                .get(&epoch_id)
                .cloned()
                .ok_or(CoreError::UnknownEpoch(epoch_id))?;
            let pk_epoch = epoch.pk_epoch.ok_or(CoreError::UnknownEpoch(epoch_id))?;
            let table = chain.table_mut(table_id)?;
            let dealer_timeout = table.params.dealer_timeout_secs;
            let hand = Chain::hand_mut(table, hand_id)?;
            if hand.dealer.is_some() {
                return Err(CoreError::Action(ActionError::HandAlreadyActive));
            }
            let indices: Vec<u8> = epoch.members.iter().map(|m: &CommitteeMember| m.index).collect();
            let deck_size = deck_size.unwrap_or(DEFAULT_DECK_SIZE);
            let dh = DealerHand::init_hand(
                epoch_id,
                table_id,
                hand_id,
                pk_epoch,
                deck_size,
                &indices,
                now + dealer_timeout,
                now + 2 * dealer_timeout,
                now + 3 * dealer_timeout,
            );
            hand.dealer = Some(dh);
            Ok(Vec::new())
        }
        Message::SubmitShuffle {
            table_id,
            hand_id,
            shuffler,
            proof_bytes,
        } => {
            let table = chain.table_mut(table_id)?;
            let hand = Chain::hand_mut(table, hand_id)?;
            let dh = hand
                .dealer
                .as_mut()
                .ok_or(CoreError::Action(ActionError::NoActiveHand))?;
            dh.submit_shuffle(shuffler, &proof_bytes, now)?;
            Ok(vec![GameEvent::ShuffleAccepted {
                round: shuffler,
                shuffler: shuffler as ValidatorId,
            }])
        }
        Message::FinalizeDeck { table_id, hand_id } => {
            let table = chain.table_mut(table_id)?;
            let events = {
                let hand = Chain::hand_mut(table, hand_id)?;
                let seats_in_hand: Vec<SeatId> = hand.active_seats();
                let dh = hand
                    .dealer
                    .as_mut()
                    .ok_or(CoreError::Action(ActionError::NoActiveHand))?;
                dh.finalize_deck()?;

                let mut events = vec![GameEvent::DeckFinalized];
                for seat in seats_in_hand {
                    let positions = dh.allocate_positions(2)?;
                    hand.players[seat as usize].hole_pos = [positions[0], positions[1]];
                    events.push(GameEvent::HoleCardAssigned {
                        seat,
                        h: 0,
                        pos: positions[0],
                    });
                    events.push(GameEvent::HoleCardAssigned {
                        seat,
                        h: 1,
                        pos: positions[1],
                    });
                }
                for ev in &events {
                    hand.events.push(ev.clone());
                }
                events
            };
            // Dealing is complete: betting may now begin (spec §4.G,
            // §5 "Shuffle -> Betting" DAG edge) — §4.E's degenerate
            // all-in-on-blinds path is handled inside this call too.
            engine::begin_preflop_betting(table, now)?;
            Ok(events)
        }
        Message::SubmitEncShare {
            table_id,
            hand_id,
            pos,
            validator,
            pk_player,
            enc_share,
            proof_bytes,
        } => {
            let epoch_id = {
                let table = chain.table_mut(table_id)?;
                let hand = Chain::hand_mut(table, hand_id)?;
                hand.dealer
                    .as_ref()
                    .ok_or(CoreError::Action(ActionError::NoActiveHand))?
                    .epoch_id
            };
            let y_m_hand = per_hand_public_share(chain, epoch_id, table_id, hand_id, validator)?;
            let table = chain.table_mut(table_id)?;
            let hand = Chain::hand_mut(table, hand_id)?;
            let dh = hand
                .dealer
                .as_mut()
                .ok_or(CoreError::Action(ActionError::NoActiveHand))?;
            let accepted = dh.submit_enc_share(pos, validator, pk_player, enc_share, &proof_bytes, y_m_hand)?;
            if !accepted {
                return Ok(Vec::new());
            }
            Ok(vec![GameEvent::EncShareAccepted {
                pos,
                validator: validator as ValidatorId,
            }])
        }
        Message::SubmitPubShare {
            table_id,
            hand_id,
            pos,
            validator,
            share,
            proof,
        } => {
            let epoch_id = {
                let table = chain.table_mut(table_id)?;
                let hand = Chain::hand_mut(table, hand_id)?;
                hand.dealer
                    .as_ref()
                    .ok_or(CoreError::Action(ActionError::NoActiveHand))?
                    .epoch_id
            };
            let y_m_hand = per_hand_public_share(chain, epoch_id, table_id, hand_id, validator)?;
            let table = chain.table_mut(table_id)?;
            let hand = Chain::hand_mut(table, hand_id)?;
            let dh = hand
                .dealer
                .as_mut()
                .ok_or(CoreError::Action(ActionError::NoActiveHand))?;
            let accepted = dh.submit_pub_share(pos, validator, share, proof, y_m_hand)?;
            if !accepted {
                return Ok(Vec::new());
            }
            Ok(vec![GameEvent::PubShareAccepted {
                pos,
                validator: validator as ValidatorId,
            }])
        }
        Message::FinalizeReveal {
            table_id,
            hand_id,
            pos,
        } => {
            let threshold = chain
                .epochs
                .values()
                .next()
                .map(|e| e.threshold)
                .unwrap_or(1);
            let table = chain.table_mut(table_id)?;
            let hand = Chain::hand_mut(table, hand_id)?;
            let dh = hand
                .dealer
                .as_ref()
                .ok_or(CoreError::Action(ActionError::NoActiveHand))?;
            let table_cards = CardPointTable::build();
            let card = dh.finalize_reveal(pos, threshold, &table_cards)?;
            hand.board.push(card);

            // Street progression itself is driven by the betting
            // engine's own `on_street_complete`; this only supplies the
            // plaintext card once its threshold reveal is on file.
            let event = GameEvent::StreetRevealed {
                street: hand.street,
                cards: vec![card.id()],
            };
            hand.events.push(event.clone());
            Ok(vec![event])
        }
        Message::DealerTimeout { table_id, hand_id } => {
            let table = chain.table_mut(table_id)?;
            let reason = {
                let hand = Chain::hand_mut(table, hand_id)?;
                let dh = hand
                    .dealer
                    .as_ref()
                    .ok_or(CoreError::Action(ActionError::NoActiveHand))?;
                let missing = dh.missing_shufflers(now);
                if !missing.is_empty() {
                    Some("committee members failed to submit a shuffle in time".to_string())
                } else {
                    None
                }
            };
            if let Some(reason) = reason {
                warn!(target: LOG_TARGET, table_id, hand_id, "dealer timeout, aborting hand");
                return Ok(engine::abort_hand(table, reason)?);
            }
            Ok(Vec::new())
        }
    }
}

fn slash_event_for_reveal(outcome: RevealOutcome, config: &ProtocolConfig) -> GameEvent {
    match outcome {
        RevealOutcome::DealerDisqualified { dealer } => GameEvent::ValidatorSlashed {
            validator: dealer,
            reason: crate::slashing::SlashReason::DkgInvalidReveal,
            amount: config.dkg_invalid_reveal_slash,
        },
        RevealOutcome::ComplaintFrivolous { complainer } => GameEvent::ValidatorSlashed {
            validator: complainer,
            reason: crate::slashing::SlashReason::DkgFrivolousComplaint,
            amount: config.dkg_frivolous_complaint_slash,
        },
    }
}

/// Derive `y_m_hand = x_m_hand·base` is not computable on-chain (the
/// chain never learns `x_m_hand`); instead we require the caller to have
/// already published it once per epoch via its DKG commitment
/// (`y_m = commitments_m[0]`) raised to the per-hand key. This helper
/// recomputes `y_m_hand = k · y_m` from `pk_epoch`'s per-member public
/// share, mirroring `pk_hand = k · pk_epoch`.
fn per_hand_public_share(
    chain: &Chain,
    epoch_id: EpochId,
    table_id: TableId,
    hand_id: HandId,
    validator_index: u8,
) -> Result<GroupElement, CoreError> {
    let state = chain
        .dkg_states
        .get(&epoch_id)
        .ok_or(CoreError::UnknownEpoch(epoch_id))?;
    let y_m = state
        .member_public_share(validator_index)
        .ok_or(CoreError::UnknownEpoch(epoch_id))?;
    let k = crate::dealer::derive_hand_key(epoch_id, table_id, hand_id);
    Ok(y_m * k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::random_nonzero_scalar;
    use crate::poker::types::TableParams;
    use crate::shuffle::shuffle_prove;

    fn sample_params() -> TableParams {
        TableParams {
            small_blind: 1,
            big_blind: 2,
            min_buy_in: 20,
            max_buy_in: 200,
            action_timeout_secs: 30,
            dealer_timeout_secs: 30,
            player_bond: 5,
            rake_bps: 0,
            refund_blinds_on_abort: true,
        }
    }

    #[test]
    fn create_sit_start_hand_round_trip() {
        let mut chain = Chain::new(ProtocolConfig::default());
        dispatch(
            &mut chain,
            Message::CreateTable {
                table_id: 1,
                creator: 1,
                params: sample_params(),
            },
            0,
        )
        .unwrap();
        dispatch(
            &mut chain,
            Message::Sit {
                table_id: 1,
                seat: 0,
                player: 1,
                pk_player: [0u8; 32],
                buy_in: 100,
                bond: 5,
            },
            0,
        )
        .unwrap();
        dispatch(
            &mut chain,
            Message::Sit {
                table_id: 1,
                seat: 1,
                player: 2,
                pk_player: [0u8; 32],
                buy_in: 100,
                bond: 5,
            },
            0,
        )
        .unwrap();
        let events = dispatch(&mut chain, Message::StartHand { table_id: 1 }, 0).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::HandStarted { .. })));
        assert!(chain.tables[&1].hand.is_some());
    }

    #[test]
    fn unknown_table_is_rejected() {
        let mut chain = Chain::new(ProtocolConfig::default());
        let err = dispatch(&mut chain, Message::StartHand { table_id: 99 }, 0).unwrap_err();
        assert!(matches!(err, CoreError::UnknownTable(99)));
    }

    #[test]
    fn epoch_begin_and_finalize_round_trip() {
        let mut chain = Chain::new(ProtocolConfig::default());
        let candidates: Vec<(ValidatorId, u64)> = (1..=4u64).map(|i| (i, 100)).collect();
        dispatch(
            &mut chain,
            Message::BeginEpoch {
                epoch_id: 1,
                candidates,
                committee_size: 3,
                threshold: 2,
                seed: [9u8; 32],
                commit_window: 10,
                complaint_window: 10,
                reveal_window: 10,
            },
            0,
        )
        .unwrap();
        let members: Vec<u8> = chain.epochs[&1].members.iter().map(|m| m.index).collect();
        let mut rng = rand::thread_rng();
        for &idx in &members {
            let coeffs: Vec<GroupElement> = (0..2)
                .map(|_| GroupElement::base() * random_nonzero_scalar(&mut rng))
                .collect();
            dispatch(
                &mut chain,
                Message::DkgCommit {
                    epoch_id: 1,
                    dealer: idx,
                    commitments: coeffs,
                },
                5,
            )
            .unwrap();
        }
        let events = dispatch(&mut chain, Message::FinalizeEpoch { epoch_id: 1 }, 30).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::EpochFinalized { .. })));
        assert!(chain.epochs[&1].pk_epoch.is_some());
    }

    #[test]
    fn init_hand_and_shuffle_through_dispatch() {
        let mut chain = Chain::new(ProtocolConfig::default());
        dispatch(
            &mut chain,
            Message::CreateTable {
                table_id: 1,
                creator: 1,
                params: sample_params(),
            },
            0,
        )
        .unwrap();
        dispatch(
            &mut chain,
            Message::Sit {
                table_id: 1,
                seat: 0,
                player: 1,
                pk_player: [0u8; 32],
                buy_in: 100,
                bond: 5,
            },
            0,
        )
        .unwrap();
        dispatch(
            &mut chain,
            Message::Sit {
                table_id: 1,
                seat: 1,
                player: 2,
                pk_player: [0u8; 32],
                buy_in: 100,
                bond: 5,
            },
            0,
        )
        .unwrap();
        dispatch(&mut chain, Message::StartHand { table_id: 1 }, 0).unwrap();
        let hand_id = chain.tables[&1].hand.as_ref().unwrap().hand_id;
        {
            let hand = chain.tables[&1].hand.as_ref().unwrap();
            assert_eq!(hand.phase, crate::poker::types::Phase::Shuffle);
            assert_eq!(hand.action_on, None);
        }

        let candidates: Vec<(ValidatorId, u64)> = (1..=2u64).map(|i| (i, 100)).collect();
        dispatch(
            &mut chain,
            Message::BeginEpoch {
                epoch_id: 1,
                candidates,
                committee_size: 2,
                threshold: 2,
                seed: [1u8; 32],
                commit_window: 10,
                complaint_window: 10,
                reveal_window: 10,
            },
            0,
        )
        .unwrap();
        for idx in 1..=2u8 {
            let mut rng = rand::thread_rng();
            let coeffs: Vec<GroupElement> = (0..2)
                .map(|_| GroupElement::base() * random_nonzero_scalar(&mut rng))
                .collect();
            dispatch(
                &mut chain,
                Message::DkgCommit {
                    epoch_id: 1,
                    dealer: idx,
                    commitments: coeffs,
                },
                0,
            )
            .unwrap();
        }
        dispatch(&mut chain, Message::FinalizeEpoch { epoch_id: 1 }, 30).unwrap();

        dispatch(
            &mut chain,
            Message::InitHand {
                table_id: 1,
                hand_id,
                epoch_id: 1,
                deck_size: Some(6),
            },
            30,
        )
        .unwrap();

        let pk_hand = chain.tables[&1]
            .hand
            .as_ref()
            .unwrap()
            .dealer
            .as_ref()
            .unwrap()
            .pk_hand;
        let deck = chain.tables[&1].hand.as_ref().unwrap().dealer.as_ref().unwrap().deck.clone();
        let mut rng = rand::thread_rng();
        for idx in 1..=2u8 {
            let (proof, _) = shuffle_prove(&mut rng, pk_hand, &deck, &[idx; 32], 6).unwrap();
            dispatch(
                &mut chain,
                Message::SubmitShuffle {
                    table_id: 1,
                    hand_id,
                    shuffler: idx,
                    proof_bytes: proof.encode(),
                },
                30,
            )
            .unwrap();
        }
        let events = dispatch(&mut chain, Message::FinalizeDeck { table_id: 1, hand_id }, 30).unwrap();
        assert!(events.iter().any(|e| matches!(e, GameEvent::DeckFinalized)));
        let hand = chain.tables[&1].hand.as_ref().unwrap();
        assert_ne!(hand.players[0].hole_pos, [255, 255]);
        assert_ne!(hand.players[1].hole_pos, [255, 255]);
        assert_eq!(hand.phase, crate::poker::types::Phase::Betting);
        assert!(hand.action_on.is_some());
    }
}
