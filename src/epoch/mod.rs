//! Epoch lifecycle and committee sampling (spec §4.H, §3 "Epoch"),
//! grounded in the teacher's `shuffling::public_key_setup` committee/
//! member bookkeeping and its `vrf` module's weighted-sampling-by-power
//! pattern, generalized from the teacher's fixed shuffler count to the
//! spec's candidate-pool-weighted-by-consensus-power selection.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::group::GroupElement;
use crate::poker::events::{EpochId, ValidatorId};

pub const LOG_TARGET: &str = "ocp_core::epoch";

const RAND_DOMAIN: &[u8] = b"ocp/v1/dkg/rand";
const COMMITTEE_DOMAIN: &[u8] = b"ocp/v1/dkg/committee";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitteeError {
    #[error("committee_size must be > 0")]
    ZeroCommitteeSize,
    #[error("threshold must be in 1..=committee_size, got {threshold} for size {committee_size}")]
    InvalidThreshold { threshold: u8, committee_size: u8 },
    #[error("candidate pool has only {available} members, need {required}")]
    NotEnoughCandidates { available: usize, required: usize },
    #[error("duplicate candidate operator id {0}")]
    DuplicateCandidate(ValidatorId),
    #[error("candidate {0} has non-positive consensus power")]
    NonPositivePower(ValidatorId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochPhase {
    Dkg,
    Active,
}

/// A committee member's canonical 1-based polynomial-argument index
/// (spec Glossary "Committee member index"), assigned by sorting
/// candidate operator identities lexicographically (here, by `u64`
/// numeric order, which is how this core represents operator identity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub validator: ValidatorId,
    pub index: u8,
    pub power: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Epoch {
    pub epoch_id: EpochId,
    pub members: Vec<CommitteeMember>,
    pub threshold: u8,
    pub committee_size: u8,
    pub pk_epoch: Option<GroupElement>,
    pub phase: EpochPhase,
}

impl Epoch {
    pub fn member_by_index(&self, index: u8) -> Option<&CommitteeMember> {
        self.members.iter().find(|m| m.index == index)
    }

    pub fn member_by_validator(&self, validator: ValidatorId) -> Option<&CommitteeMember> {
        self.members.iter().find(|m| m.validator == validator)
    }
}

/// `hash_to_bytes(domain, parts…)`: SHA-256 over a length-prefixed
/// domain and length-prefixed parts, mirroring the length-prefixing
/// discipline of [`crate::group::hash_to_scalar`] but over SHA-256 and
/// producing a raw 32-byte digest rather than a scalar (spec §4.H names
/// SHA-256 explicitly for the randomness beacon and committee seed,
/// distinct from §4.A's SHA-512 `hash_to_scalar`).
fn hash256(domain: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update((domain.len() as u32).to_le_bytes());
    hasher.update(domain);
    for part in parts {
        hasher.update((part.len() as u32).to_le_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Derive the epoch randomness input when the caller does not supply one
/// externally (spec §4.H): `SHA-256("ocp/v1/dkg/rand" ‖ chain_id ‖
/// block_height ‖ last_block_hash ‖ epoch_id)`.
pub fn derive_epoch_randomness(
    chain_id: u64,
    block_height: u64,
    last_block_hash: [u8; 32],
    epoch_id: EpochId,
) -> [u8; 32] {
    hash256(
        RAND_DOMAIN,
        &[
            &chain_id.to_le_bytes(),
            &block_height.to_le_bytes(),
            &last_block_hash,
            &epoch_id.to_le_bytes(),
        ],
    )
}

/// Derive the committee sampling seed from the epoch randomness (spec
/// §4.H): `SHA-256("ocp/v1/dkg/committee" ‖ rand_epoch ‖ epoch_id)`.
pub fn derive_committee_seed(rand_epoch: [u8; 32], epoch_id: EpochId) -> [u8; 32] {
    hash256(COMMITTEE_DOMAIN, &[&rand_epoch, &epoch_id.to_le_bytes()])
}

/// Counter-mode SHA-256 byte stream, the same rejection-sampling driver
/// shape as `shuffle::permutation::ByteStream`, specialized to this
/// module's seed type and domain-separated from it by construction
/// (different domain string, different digest width).
struct ByteStream {
    seed: [u8; 32],
    counter: u64,
    buf: [u8; 32],
    pos: usize,
}

impl ByteStream {
    fn new(seed: [u8; 32]) -> Self {
        ByteStream {
            seed,
            counter: 0,
            buf: [0u8; 32],
            pos: 32,
        }
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_le_bytes());
        self.buf = hasher.finalize().into();
        self.pos = 0;
        self.counter += 1;
    }

    fn next_u64(&mut self) -> u64 {
        if self.pos + 8 > self.buf.len() {
            self.refill();
        }
        let bytes: [u8; 8] = self.buf[self.pos..self.pos + 8].try_into().unwrap();
        self.pos += 8;
        u64::from_le_bytes(bytes)
    }

    fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0);
        let limit = u64::MAX - (u64::MAX % bound);
        loop {
            let v = self.next_u64();
            if v < limit {
                return v % bound;
            }
        }
    }
}

/// Weighted sampling of `k` distinct candidates by consensus power (spec
/// §4.H): repeatedly draw a uniform value in `[0, total_power)` from the
/// seeded byte stream, walk the remaining pool to find the candidate
/// whose cumulative power bracket contains it, remove it, and repeat
/// with the reduced pool and total.
pub fn sample_committee(
    candidates: &[(ValidatorId, u64)],
    k: usize,
    seed: [u8; 32],
) -> Result<Vec<ValidatorId>, CommitteeError> {
    let mut seen = std::collections::HashSet::new();
    for &(op, power) in candidates {
        if !seen.insert(op) {
            return Err(CommitteeError::DuplicateCandidate(op));
        }
        if power == 0 {
            return Err(CommitteeError::NonPositivePower(op));
        }
    }
    if candidates.len() < k {
        return Err(CommitteeError::NotEnoughCandidates {
            available: candidates.len(),
            required: k,
        });
    }

    let mut pool: Vec<(ValidatorId, u64)> = candidates.to_vec();
    let mut stream = ByteStream::new(seed);
    let mut picked = Vec::with_capacity(k);

    for _ in 0..k {
        let total: u64 = pool.iter().map(|&(_, p)| p).sum();
        let mut draw = stream.next_below(total);
        let mut chosen_idx = pool.len() - 1;
        for (idx, &(_, power)) in pool.iter().enumerate() {
            if draw < power {
                chosen_idx = idx;
                break;
            }
            draw -= power;
        }
        let (op, _) = pool.remove(chosen_idx);
        picked.push(op);
    }

    picked.sort_unstable();
    Ok(picked)
}

/// Begin a new epoch: sample its committee, return it in `Dkg` phase
/// with no `pk_epoch` yet (set once `dkg::finalize_epoch` succeeds).
pub fn begin_epoch(
    epoch_id: EpochId,
    candidates: &[(ValidatorId, u64)],
    committee_size: u8,
    threshold: u8,
    seed: [u8; 32],
) -> Result<Epoch, CommitteeError> {
    if committee_size == 0 {
        return Err(CommitteeError::ZeroCommitteeSize);
    }
    if threshold == 0 || threshold > committee_size {
        return Err(CommitteeError::InvalidThreshold {
            threshold,
            committee_size,
        });
    }
    let picked = sample_committee(candidates, committee_size as usize, seed)?;
    let members = picked
        .into_iter()
        .enumerate()
        .map(|(i, validator)| {
            let power = candidates.iter().find(|&&(v, _)| v == validator).unwrap().1;
            CommitteeMember {
                validator,
                index: (i + 1) as u8,
                power,
            }
        })
        .collect();

    info!(target: LOG_TARGET, epoch_id, committee_size, threshold, "epoch begun");
    Ok(Epoch {
        epoch_id,
        members,
        threshold,
        committee_size,
        pk_epoch: None,
        phase: EpochPhase::Dkg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randomness_and_seed_derivation_are_deterministic() {
        let r1 = derive_epoch_randomness(1, 100, [9u8; 32], 7);
        let r2 = derive_epoch_randomness(1, 100, [9u8; 32], 7);
        assert_eq!(r1, r2);
        let r3 = derive_epoch_randomness(1, 100, [9u8; 32], 8);
        assert_ne!(r1, r3);

        let s1 = derive_committee_seed(r1, 7);
        let s2 = derive_committee_seed(r1, 7);
        assert_eq!(s1, s2);
    }

    #[test]
    fn sample_committee_picks_distinct_sorted_members() {
        let candidates: Vec<(ValidatorId, u64)> = (1..=10u64).map(|i| (i, i * 10)).collect();
        let seed = [3u8; 32];
        let picked = sample_committee(&candidates, 5, seed).unwrap();
        assert_eq!(picked.len(), 5);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        assert_eq!(picked, sorted);
        let mut uniq = picked.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert_eq!(uniq.len(), picked.len());
    }

    #[test]
    fn sample_committee_rejects_not_enough_candidates() {
        let candidates = vec![(1u64, 5u64), (2u64, 5u64)];
        assert!(matches!(
            sample_committee(&candidates, 3, [0u8; 32]),
            Err(CommitteeError::NotEnoughCandidates { .. })
        ));
    }

    #[test]
    fn sample_committee_rejects_duplicate_operator() {
        let candidates = vec![(1u64, 5u64), (1u64, 5u64)];
        assert!(matches!(
            sample_committee(&candidates, 1, [0u8; 32]),
            Err(CommitteeError::DuplicateCandidate(1))
        ));
    }

    #[test]
    fn begin_epoch_assigns_canonical_indices() {
        let candidates: Vec<(ValidatorId, u64)> = (1..=5u64).map(|i| (i, 100)).collect();
        let epoch = begin_epoch(1, &candidates, 3, 2, [5u8; 32]).unwrap();
        assert_eq!(epoch.members.len(), 3);
        let mut indices: Vec<u8> = epoch.members.iter().map(|m| m.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(epoch.phase, EpochPhase::Dkg);
    }

    #[test]
    fn begin_epoch_rejects_bad_threshold() {
        let candidates: Vec<(ValidatorId, u64)> = (1..=5u64).map(|i| (i, 100)).collect();
        assert!(matches!(
            begin_epoch(1, &candidates, 3, 0, [5u8; 32]),
            Err(CommitteeError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            begin_epoch(1, &candidates, 3, 4, [5u8; 32]),
            Err(CommitteeError::InvalidThreshold { .. })
        ));
    }
}
