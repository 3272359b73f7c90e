//! Feldman-VSS distributed key generation with on-chain
//! complaint-and-reveal (spec §4.F), grounded in the teacher's
//! `shuffling::public_key_setup` dealer/commitment bookkeeping, adapted
//! from the teacher's trusted single-shot setup to a slashing-backed,
//! multi-phase on-chain protocol. Secret polynomials and shares never
//! appear here — this module only ever sees commitments and revealed
//! (already-exposed) shares, per spec §5's "committee-member secret
//! shares… never part of chain state".

use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::epoch::Epoch;
use crate::group::{GroupElement, Scalar};
use crate::poker::events::{EpochId, ValidatorId};
use crate::slashing::SlashReason;

pub const LOG_TARGET: &str = "ocp_core::dkg";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DkgError {
    #[error("dealer index {0} is not a member of this committee")]
    UnknownMember(u8),
    #[error("dealer {0} already committed")]
    AlreadyCommitted(u8),
    #[error("commit window closed at block {deadline}, now {now}")]
    CommitWindowClosed { deadline: u64, now: u64 },
    #[error("expected {expected} commitments, got {actual}")]
    WrongCommitmentCount { expected: usize, actual: usize },
    #[error("commitment contains an identity element, implying a zero coefficient")]
    ZeroCoefficientCommitment,
    #[error("dealer {0} never committed")]
    DealerDidNotCommit(u8),
    #[error("deadline not yet reached: need {deadline}, now {now}")]
    DeadlineNotReached { deadline: u64, now: u64 },
    #[error("dkg already finalized")]
    AlreadyFinalized,
    #[error("fewer than {threshold} qualified dealers remain ({qualified})")]
    ThresholdUnreachable { threshold: u8, qualified: usize },
    #[error("no outstanding complaint from {recipient} against dealer {dealer}")]
    NoOutstandingComplaint { dealer: u8, recipient: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplaintKind {
    Missing,
    Invalid,
}

#[derive(Clone, Debug)]
struct Complaint {
    complainer: u8,
    dealer: u8,
    #[allow(dead_code)]
    kind: ComplaintKind,
    resolved: bool,
}

#[derive(Clone, Debug)]
struct DealerRecord {
    commitments: Vec<GroupElement>,
    disqualified: bool,
}

/// The result of resolving one outstanding complaint via its dealer's
/// on-chain reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The revealed share failed Feldman verification: the dealer is
    /// disqualified and slashed.
    DealerDisqualified { dealer: ValidatorId },
    /// The revealed share verified: the complaint was frivolous and its
    /// filer is slashed.
    ComplaintFrivolous { complainer: ValidatorId },
}

/// A slash this module has determined is owed, expressed against a
/// validator identity rather than a committee index so a caller can
/// apply it straight to chain-level stake bookkeeping (spec §4.I: each
/// slash event is capped against "current stake/bond", which only the
/// chain aggregate tracks).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSlash {
    pub validator: ValidatorId,
    pub reason: SlashReason,
}

/// Mutable state for one epoch's DKG run (spec §3 "DkgState" /
/// §4.F). Lives alongside its [`Epoch`] in the chain aggregate until
/// `finalize` succeeds (or fails permanently via a restarted epoch).
#[derive(Clone, Debug)]
pub struct DkgState {
    pub epoch_id: EpochId,
    threshold: u8,
    committee_size: u8,
    dealers: HashMap<u8, DealerRecord>,
    complaints: Vec<Complaint>,
    pub commit_deadline: u64,
    pub complaint_deadline: u64,
    pub reveal_deadline: u64,
    pub finalized: bool,
}

impl DkgState {
    pub fn new(
        epoch: &Epoch,
        commit_deadline: u64,
        complaint_deadline: u64,
        reveal_deadline: u64,
    ) -> Self {
        DkgState {
            epoch_id: epoch.epoch_id,
            threshold: epoch.threshold,
            committee_size: epoch.committee_size,
            dealers: HashMap::new(),
            complaints: Vec::new(),
            commit_deadline,
            complaint_deadline,
            reveal_deadline,
            finalized: false,
        }
    }

    fn require_member(&self, index: u8) -> Result<(), DkgError> {
        if index == 0 || index > self.committee_size {
            return Err(DkgError::UnknownMember(index));
        }
        Ok(())
    }

    /// Phase 1 — a dealer posts its degree-`(t-1)` Feldman commitments.
    pub fn commit(
        &mut self,
        dealer: u8,
        commitments: Vec<GroupElement>,
        now: u64,
    ) -> Result<(), DkgError> {
        self.require_member(dealer)?;
        if now > self.commit_deadline {
            return Err(DkgError::CommitWindowClosed {
                deadline: self.commit_deadline,
                now,
            });
        }
        if self.dealers.contains_key(&dealer) {
            return Err(DkgError::AlreadyCommitted(dealer));
        }
        if commitments.len() != self.threshold as usize {
            return Err(DkgError::WrongCommitmentCount {
                expected: self.threshold as usize,
                actual: commitments.len(),
            });
        }
        if commitments.iter().any(GroupElement::is_identity) {
            return Err(DkgError::ZeroCoefficientCommitment);
        }
        info!(target: LOG_TARGET, epoch_id = self.epoch_id, dealer, "dkg commitment accepted");
        self.dealers.insert(
            dealer,
            DealerRecord {
                commitments,
                disqualified: false,
            },
        );
        Ok(())
    }

    /// Phase 2 — file a complaint against `dealer`, forcing it to reveal
    /// `f_dealer(complainer)` on-chain in phase 3. Both complaint kinds
    /// (`Missing`/`Invalid`) are resolved identically: by the dealer's
    /// next reveal, since this protocol has no off-chain channel to
    /// privately validate the alternative.
    pub fn file_complaint(
        &mut self,
        complainer: u8,
        dealer: u8,
        kind: ComplaintKind,
    ) -> Result<(), DkgError> {
        self.require_member(complainer)?;
        self.require_member(dealer)?;
        self.complaints.push(Complaint {
            complainer,
            dealer,
            kind,
            resolved: false,
        });
        Ok(())
    }

    /// Phase 3 — dealer `dealer` reveals `share = f_dealer(recipient)`
    /// in response to an outstanding complaint from `recipient`. Rejects
    /// the reveal outright if no such complaint is on file — spec §4.F
    /// Phase 3 only contemplates a reveal "for each outstanding
    /// complaint `(complainer r, dealer d)`"; a dealer cannot manufacture
    /// a frivolous-complaint slash against a validator who never
    /// complained. Verifies `share·base == Σ_k recipient^k ·
    /// commitments_dealer[k]` and resolves every matching outstanding
    /// complaint at once.
    pub fn reveal(
        &mut self,
        dealer: u8,
        recipient: u8,
        share: Scalar,
        epoch: &Epoch,
    ) -> Result<RevealOutcome, DkgError> {
        self.require_member(dealer)?;
        self.require_member(recipient)?;
        let record = self
            .dealers
            .get(&dealer)
            .ok_or(DkgError::DealerDidNotCommit(dealer))?;

        let resolved_any = self
            .complaints
            .iter()
            .any(|c| !c.resolved && c.dealer == dealer && c.complainer == recipient);
        if !resolved_any {
            return Err(DkgError::NoOutstandingComplaint { dealer, recipient });
        }

        let x = Scalar::from(recipient as u64);
        let mut expected = GroupElement::identity();
        let mut power = Scalar::from(1u64);
        for c in &record.commitments {
            expected = expected + (*c * power);
            power *= x;
        }
        let actual = GroupElement::base() * share;
        let verifies = actual == expected;

        for complaint in self
            .complaints
            .iter_mut()
            .filter(|c| !c.resolved && c.dealer == dealer && c.complainer == recipient)
        {
            complaint.resolved = true;
        }

        if verifies {
            let complainer_validator = epoch
                .member_by_index(recipient)
                .map(|m| m.validator)
                .ok_or(DkgError::UnknownMember(recipient))?;
            warn!(target: LOG_TARGET, epoch_id = self.epoch_id, dealer, recipient, "dkg complaint was frivolous");
            Ok(RevealOutcome::ComplaintFrivolous {
                complainer: complainer_validator,
            })
        } else {
            let dealer_validator = epoch
                .member_by_index(dealer)
                .map(|m| m.validator)
                .ok_or(DkgError::UnknownMember(dealer))?;
            warn!(target: LOG_TARGET, epoch_id = self.epoch_id, dealer, recipient, "dkg reveal failed verification, disqualifying dealer");
            if let Some(record) = self.dealers.get_mut(&dealer) {
                record.disqualified = true;
            }
            Ok(RevealOutcome::DealerDisqualified {
                dealer: dealer_validator,
            })
        }
    }

    /// The constant-term commitment `y_m = f_m(0)·base` posted by
    /// committee member `index` during its DKG commit phase, i.e. its
    /// public share of `pk_epoch`. Used by the dealer pipeline to derive
    /// `y_m_hand = k · y_m` for encrypted/public-share proof
    /// verification (spec §4.G).
    pub fn member_public_share(&self, index: u8) -> Option<GroupElement> {
        self.dealers.get(&index).map(|r| r.commitments[0])
    }

    fn qualified_indices(&self) -> Vec<u8> {
        let mut qualified: Vec<u8> = self
            .dealers
            .iter()
            .filter(|(_, r)| !r.disqualified)
            .map(|(&idx, _)| idx)
            .collect();
        qualified.sort_unstable();
        qualified
    }

    fn unresolved_complaint_exists(&self) -> bool {
        self.complaints.iter().any(|c| !c.resolved)
    }

    /// Phase 4 — finalize once the complaint/reveal windows have closed
    /// and no outstanding complaint remains. Returns `pk_epoch`, the sum
    /// of qualified dealers' constant-term commitments.
    pub fn finalize(&mut self, now: u64) -> Result<GroupElement, DkgError> {
        if self.finalized {
            return Err(DkgError::AlreadyFinalized);
        }
        if now < self.reveal_deadline {
            return Err(DkgError::DeadlineNotReached {
                deadline: self.reveal_deadline,
                now,
            });
        }
        if self.unresolved_complaint_exists() {
            return Err(DkgError::DeadlineNotReached {
                deadline: self.reveal_deadline,
                now,
            });
        }
        let qualified = self.qualified_indices();
        if qualified.len() < self.threshold as usize {
            return Err(DkgError::ThresholdUnreachable {
                threshold: self.threshold,
                qualified: qualified.len(),
            });
        }
        let pk_epoch = qualified
            .iter()
            .map(|idx| self.dealers[idx].commitments[0])
            .fold(GroupElement::identity(), |acc, c| acc + c);
        self.finalized = true;
        info!(target: LOG_TARGET, epoch_id = self.epoch_id, qualified = qualified.len(), "dkg finalized");
        Ok(pk_epoch)
    }

    /// `DkgTimeout`: disqualify every committee member who never posted
    /// a commitment, then attempt to finalize with whoever remains
    /// qualified. Returns the slashes owed for non-committing dealers
    /// alongside the finalize attempt's own result.
    pub fn timeout(&mut self, now: u64, epoch: &Epoch) -> (Vec<PendingSlash>, Result<GroupElement, DkgError>) {
        let mut slashes = Vec::new();
        for member in &epoch.members {
            if !self.dealers.contains_key(&member.index) {
                slashes.push(PendingSlash {
                    validator: member.validator,
                    reason: SlashReason::DkgBadCommitment,
                });
            }
        }
        (slashes, self.finalize(now))
    }
}
