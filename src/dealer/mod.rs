//! Dealer pipeline (spec §4.G): per-hand key derivation, deck
//! initialization, committee-order shuffle orchestration, hole-position
//! bookkeeping, encrypted hole-share submission and recovery, and
//! threshold public reveal of community cards. Grounded in the
//! teacher's `shuffler_service`/`player` modules, which perform the same
//! encrypt-shuffle-reveal pipeline against a SNARK-verified shuffle;
//! here the shuffle proof is the Sigma-protocol one from
//! [`crate::shuffle`] instead of a Bayer-Groth circuit.

pub mod lagrange;

use thiserror::Error;
use tracing::{info, warn};

use crate::cards::Card;
use crate::elgamal::{CardPointTable, Ciphertext};
use crate::group::{GroupElement, Scalar, Transcript};
use crate::proofs::{enc_share::EncShareProof, eqdlog::EqDlogProof};
use crate::shuffle::{shuffle_verify, ShuffleError, ShuffleProof};

pub const LOG_TARGET: &str = "ocp_core::dealer";

const HAND_KEY_DOMAIN: &[u8] = b"ocp/v1/dealer/hand-derive";
const ENC_SHARE_DOMAIN: &[u8] = b"ocp/v1/dealer/enc-share";
const PUB_SHARE_DOMAIN: &[u8] = b"ocp/v1/dealer/pub-share";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealerError {
    #[error("shuffle window closed")]
    ShuffleWindowClosed,
    #[error("deck already finalized")]
    AlreadyFinalized,
    #[error("deck not yet finalized")]
    NotYetFinalized,
    #[error("it is committee member {expected}'s turn to shuffle, not {got}")]
    OutOfShuffleOrder { expected: u8, got: u8 },
    #[error(transparent)]
    Shuffle(#[from] ShuffleError),
    #[error(transparent)]
    Proof(#[from] crate::proofs::ProofError),
    #[error("encrypted-share proof rejected for position {pos}, member {validator}")]
    InvalidEncShareProof { pos: u8, validator: u8 },
    #[error("public-share proof rejected for position {pos}, member {validator}")]
    InvalidPubShareProof { pos: u8, validator: u8 },
    #[error("position {0} is out of range for this deck")]
    UnknownPosition(u8),
    #[error("need {need} valid shares for position {pos}, have {have}")]
    NotEnoughShares { pos: u8, have: usize, need: usize },
    #[error("recovered point for position {0} does not correspond to any card")]
    CardNotFound(u8),
    #[error(transparent)]
    Codec(#[from] crate::group::CodecError),
}

/// `k = hash_to_scalar("ocp/v1/dealer/hand-derive", epoch_id, table_id,
/// hand_id)` (spec §4.G). The chain never needs `k` itself beyond
/// computing `pk_hand = k·pk_epoch`; no collaborator stores it.
pub fn derive_hand_key(epoch_id: u64, table_id: u64, hand_id: u64) -> Scalar {
    crate::group::hash_to_scalar(
        HAND_KEY_DOMAIN,
        &[
            &epoch_id.to_le_bytes(),
            &table_id.to_le_bytes(),
            &hand_id.to_le_bytes(),
        ],
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct EncShareRecord {
    pos: u8,
    validator: u8,
    pk_player: GroupElement,
    u: GroupElement,
    v: GroupElement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct PubShareRecord {
    pos: u8,
    validator: u8,
    share: GroupElement,
}

/// Cryptographic dealer state attached to a [`crate::poker::types::Hand`]
/// from `InitHand` until the hand terminates (spec §3 `DealerHand`).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DealerHand {
    pub epoch_id: u64,
    pub pk_hand: GroupElement,
    pub deck_size: u8,
    pub deck: Vec<Ciphertext>,
    /// Committee member indices in the order they must submit a shuffle
    /// (spec §4.G: "members act in order of their canonical DKG index").
    pub shuffle_order: Vec<u8>,
    pub shuffle_step: usize,
    pub shuffle_deadline: u64,
    pub finalized: bool,
    /// Next unallocated deck position (spec §4.G cursor bookkeeping).
    pub cursor: u8,
    enc_shares: Vec<EncShareRecord>,
    pub_shares: Vec<PubShareRecord>,
    pub hole_shares_deadline: u64,
    pub reveal_deadline: u64,
}

impl DealerHand {
    /// `InitHand`: derive `pk_hand`, lay down the trivial pre-shuffle
    /// deck (spec's resolved Open Question #2: randomness exactly 0),
    /// and record the committee shuffle order.
    pub fn init_hand(
        epoch_id: u64,
        table_id: u64,
        hand_id: u64,
        pk_epoch: GroupElement,
        deck_size: u8,
        committee_indices: &[u8],
        shuffle_deadline: u64,
        hole_shares_deadline: u64,
        reveal_deadline: u64,
    ) -> Self {
        let k = derive_hand_key(epoch_id, table_id, hand_id);
        let pk_hand = pk_epoch * k;
        let deck = (0u8..deck_size)
            .map(|id| {
                let m = crate::elgamal::card_to_point(Card::new(id));
                Ciphertext::encrypt(pk_hand, m, Scalar::from(0u64))
            })
            .collect();
        let mut shuffle_order = committee_indices.to_vec();
        shuffle_order.sort_unstable();

        info!(target: LOG_TARGET, epoch_id, table_id, hand_id, deck_size, "dealer hand initialized");
        DealerHand {
            epoch_id,
            pk_hand,
            deck_size,
            deck,
            shuffle_order,
            shuffle_step: 0,
            shuffle_deadline,
            finalized: false,
            cursor: 0,
            enc_shares: Vec::new(),
            pub_shares: Vec::new(),
            hole_shares_deadline,
            reveal_deadline,
        }
    }

    pub fn shuffle_complete(&self) -> bool {
        self.shuffle_step == self.shuffle_order.len()
    }

    /// `SubmitShuffle{round, shuffler, proof_bytes}`: verify `shuffler`
    /// is next in committee order, check and apply the proof, advance
    /// `shuffle_step`.
    pub fn submit_shuffle(
        &mut self,
        shuffler_index: u8,
        proof_bytes: &[u8],
        now: u64,
    ) -> Result<(), DealerError> {
        if self.finalized {
            return Err(DealerError::AlreadyFinalized);
        }
        if now > self.shuffle_deadline {
            return Err(DealerError::ShuffleWindowClosed);
        }
        let expected = self.shuffle_order[self.shuffle_step];
        if shuffler_index != expected {
            return Err(DealerError::OutOfShuffleOrder {
                expected,
                got: shuffler_index,
            });
        }
        let proof = ShuffleProof::decode(proof_bytes)?;
        let new_deck = shuffle_verify(&self.deck, &proof, self.pk_hand)?;
        self.deck = new_deck;
        self.shuffle_step += 1;
        info!(target: LOG_TARGET, epoch_id = self.epoch_id, shuffler_index, shuffle_step = self.shuffle_step, "shuffle accepted");
        Ok(())
    }

    /// Missing shufflers as of `now`, for `DealerTimeout` bookkeeping.
    pub fn missing_shufflers(&self, now: u64) -> Vec<u8> {
        if now <= self.shuffle_deadline || self.finalized {
            return Vec::new();
        }
        self.shuffle_order[self.shuffle_step..].to_vec()
    }

    /// `FinalizeDeck`: once every committee member has contributed a
    /// shuffle round, lock the deck and allow hole/board position
    /// allocation.
    pub fn finalize_deck(&mut self) -> Result<(), DealerError> {
        if self.finalized {
            return Err(DealerError::AlreadyFinalized);
        }
        if !self.shuffle_complete() {
            return Err(DealerError::NotEnoughShares {
                pos: 0,
                have: self.shuffle_step,
                need: self.shuffle_order.len(),
            });
        }
        self.finalized = true;
        info!(target: LOG_TARGET, epoch_id = self.epoch_id, "deck finalized");
        Ok(())
    }

    /// Allocate the next `n` deck positions, advancing the cursor (spec
    /// §4.G: hole cards allocate two per seat in seat order; board
    /// reveals consume 3/1/1 for flop/turn/river).
    pub fn allocate_positions(&mut self, n: u8) -> Result<Vec<u8>, DealerError> {
        if !self.finalized {
            return Err(DealerError::NotYetFinalized);
        }
        let mut out = Vec::with_capacity(n as usize);
        for _ in 0..n {
            if self.cursor >= self.deck_size {
                return Err(DealerError::UnknownPosition(self.cursor));
            }
            out.push(self.cursor);
            self.cursor += 1;
        }
        Ok(out)
    }

    pub fn ciphertext_at(&self, pos: u8) -> Result<Ciphertext, DealerError> {
        self.deck
            .get(pos as usize)
            .copied()
            .ok_or(DealerError::UnknownPosition(pos))
    }

    /// `SubmitEncShare`: verify the dual-Schnorr proof that `(u, v)`
    /// encrypts committee member `validator`'s decryption share for
    /// `pos` under `pk_player`. Returns `Ok(false)` for an
    /// already-accepted `(pos, validator, pk_player)` triple (spec
    /// §4.G: "duplicates … are ignored" — not an error).
    pub fn submit_enc_share(
        &mut self,
        pos: u8,
        validator: u8,
        pk_player: GroupElement,
        enc_share: [u8; 64],
        proof_bytes: &[u8],
        y_m_hand: GroupElement,
    ) -> Result<bool, DealerError> {
        let already = self
            .enc_shares
            .iter()
            .any(|r| r.pos == pos && r.validator == validator && r.pk_player == pk_player);
        if already {
            return Ok(false);
        }
        let c1 = self.ciphertext_at(pos)?.c1;
        let u = GroupElement::decode(&enc_share[..32])?;
        let v = GroupElement::decode(&enc_share[32..])?;
        let proof = EncShareProof::decode(proof_bytes)?;
        let mut t = Transcript::new(ENC_SHARE_DOMAIN);
        if !proof.verify(&mut t, c1, pk_player, y_m_hand, u, v) {
            return Err(DealerError::InvalidEncShareProof { pos, validator });
        }
        self.enc_shares.push(EncShareRecord {
            pos,
            validator,
            pk_player,
            u,
            v,
        });
        info!(target: LOG_TARGET, epoch_id = self.epoch_id, pos, validator, "encrypted hole share accepted");
        Ok(true)
    }

    /// Encrypted shares on file for `pos` addressed to `pk_player`, as
    /// `(validator_index, u, v)` triples for player-side recovery.
    pub fn enc_shares_for(&self, pos: u8, pk_player: GroupElement) -> Vec<(u8, GroupElement, GroupElement)> {
        self.enc_shares
            .iter()
            .filter(|r| r.pos == pos && r.pk_player == pk_player)
            .map(|r| (r.validator, r.u, r.v))
            .collect()
    }

    /// Committee indices with no accepted share for `(pos, pk_player)`,
    /// for `DealerTimeout` slashing.
    pub fn missing_enc_share_members(&self, pos: u8, pk_player: GroupElement, committee: &[u8]) -> Vec<u8> {
        committee
            .iter()
            .copied()
            .filter(|&idx| {
                !self
                    .enc_shares
                    .iter()
                    .any(|r| r.pos == pos && r.validator == idx && r.pk_player == pk_player)
            })
            .collect()
    }

    /// `SubmitPubShare`: verify the Chaum-Pedersen proof that `share =
    /// x_m_hand·c1` for community-card position `pos`.
    pub fn submit_pub_share(
        &mut self,
        pos: u8,
        validator: u8,
        share: GroupElement,
        proof: EqDlogProof,
        y_m_hand: GroupElement,
    ) -> Result<bool, DealerError> {
        let already = self
            .pub_shares
            .iter()
            .any(|r| r.pos == pos && r.validator == validator);
        if already {
            return Ok(false);
        }
        let c1 = self.ciphertext_at(pos)?.c1;
        let mut t = Transcript::new(PUB_SHARE_DOMAIN);
        if !proof.verify(&mut t, GroupElement::base(), c1, y_m_hand, share) {
            return Err(DealerError::InvalidPubShareProof { pos, validator });
        }
        self.pub_shares.push(PubShareRecord {
            pos,
            validator,
            share,
        });
        info!(target: LOG_TARGET, epoch_id = self.epoch_id, pos, validator, "public share accepted");
        Ok(true)
    }

    pub fn missing_pub_share_members(&self, pos: u8, committee: &[u8]) -> Vec<u8> {
        committee
            .iter()
            .copied()
            .filter(|&idx| !self.pub_shares.iter().any(|r| r.pos == pos && r.validator == idx))
            .collect()
    }

    /// `FinalizeReveal{pos}`: once at least `threshold` valid public
    /// shares are on file, deterministically pick the lowest-index
    /// `threshold` of them, Lagrange-combine, and look up the recovered
    /// card.
    pub fn finalize_reveal(
        &self,
        pos: u8,
        threshold: u8,
        table: &CardPointTable,
    ) -> Result<Card, DealerError> {
        let mut candidates: Vec<&PubShareRecord> =
            self.pub_shares.iter().filter(|r| r.pos == pos).collect();
        if candidates.len() < threshold as usize {
            return Err(DealerError::NotEnoughShares {
                pos,
                have: candidates.len(),
                need: threshold as usize,
            });
        }
        candidates.sort_by_key(|r| r.validator);
        candidates.truncate(threshold as usize);

        let indices: Vec<u8> = candidates.iter().map(|r| r.validator).collect();
        let coeffs = lagrange::coefficients_at_zero(&indices);
        let d = candidates
            .iter()
            .zip(coeffs.iter())
            .map(|(r, &c)| r.share * c)
            .fold(GroupElement::identity(), |acc, p| acc + p);

        let ct = self.ciphertext_at(pos)?;
        let m = ct.c2 - d;
        table.lookup(m).ok_or(DealerError::CardNotFound(pos))
    }
}

/// Player-side hole-card recovery (spec §4.G): combine at least
/// `threshold` encrypted shares decrypted with the player's own secret
/// key, then look up the recovered point. Not part of on-chain state —
/// this runs wherever the player's wallet holds `sk_player`.
pub fn recover_hole_card(
    ct: Ciphertext,
    shares: &[(u8, GroupElement, GroupElement)],
    sk_player: Scalar,
    threshold: u8,
    table: &CardPointTable,
) -> Result<Card, DealerError> {
    if shares.len() < threshold as usize {
        return Err(DealerError::NotEnoughShares {
            pos: 0,
            have: shares.len(),
            need: threshold as usize,
        });
    }
    let mut chosen = shares.to_vec();
    chosen.sort_by_key(|(idx, _, _)| *idx);
    chosen.truncate(threshold as usize);

    let indices: Vec<u8> = chosen.iter().map(|(idx, _, _)| *idx).collect();
    let coeffs = lagrange::coefficients_at_zero(&indices);
    let d = chosen
        .iter()
        .zip(coeffs.iter())
        .map(|((_, u, v), &c)| (*v - *u * sk_player) * c)
        .fold(GroupElement::identity(), |acc, p| acc + p);

    let m = ct.c2 - d;
    table.lookup(m).ok_or_else(|| {
        warn!(target: LOG_TARGET, "recovered hole-card point did not match any card");
        DealerError::CardNotFound(0)
    })
}
