//! Bit-exact shuffle proof layout (spec §4.C): `version ‖ n ‖ rounds ‖
//! rounds×(deck snapshot ‖ switch proofs ‖ single proofs)`, all multi-byte
//! fields little-endian.

use super::{pairs_and_singles, ShuffleError};
use crate::elgamal::{Ciphertext, CIPHERTEXT_LEN};
use crate::proofs::{eqdlog::ENCODED_LEN_EQDLOG, switch_gate::ENCODED_LEN_SWITCH, EqDlogProof, SwitchProof};

pub const VERSION: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleProof {
    pub n: u16,
    pub rounds: u16,
    /// `round_snapshots[r]` is the deck *after* round `r` is applied
    /// (round 0's input is the caller-supplied `deck_in`, not stored here).
    pub round_snapshots: Vec<Vec<Ciphertext>>,
    pub round_switch_proofs: Vec<Vec<SwitchProof>>,
    pub round_single_proofs: Vec<Vec<EqDlogProof>>,
}

impl ShuffleProof {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(VERSION);
        out.extend_from_slice(&self.n.to_le_bytes());
        out.extend_from_slice(&self.rounds.to_le_bytes());
        for r in 0..self.rounds as usize {
            for ct in &self.round_snapshots[r] {
                out.extend_from_slice(&ct.encode());
            }
            for sw in &self.round_switch_proofs[r] {
                out.extend_from_slice(&sw.encode());
            }
            for sg in &self.round_single_proofs[r] {
                out.extend_from_slice(&sg.encode());
            }
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ShuffleError> {
        if bytes.len() < 5 {
            return Err(ShuffleError::Malformed("proof shorter than header".into()));
        }
        let version = bytes[0];
        if version != VERSION {
            return Err(ShuffleError::Malformed(format!(
                "unsupported proof version {version}"
            )));
        }
        let n = u16::from_le_bytes([bytes[1], bytes[2]]);
        let rounds = u16::from_le_bytes([bytes[3], bytes[4]]);
        let mut off = 5usize;
        let n_usize = n as usize;

        let mut round_snapshots = Vec::with_capacity(rounds as usize);
        let mut round_switch_proofs = Vec::with_capacity(rounds as usize);
        let mut round_single_proofs = Vec::with_capacity(rounds as usize);

        for r in 0..rounds as usize {
            let snapshot_len = n_usize * CIPHERTEXT_LEN;
            let snapshot_bytes = bytes.get(off..off + snapshot_len).ok_or_else(|| {
                ShuffleError::Malformed(format!("truncated deck snapshot at round {r}"))
            })?;
            let mut snapshot = Vec::with_capacity(n_usize);
            for chunk in snapshot_bytes.chunks_exact(CIPHERTEXT_LEN) {
                snapshot.push(Ciphertext::decode(chunk)?);
            }
            off += snapshot_len;

            let (pairs, singles) = pairs_and_singles(r, n_usize);
            let mut switches = Vec::with_capacity(pairs.len());
            for _ in &pairs {
                let chunk = bytes.get(off..off + ENCODED_LEN_SWITCH).ok_or_else(|| {
                    ShuffleError::Malformed(format!("truncated switch proof at round {r}"))
                })?;
                switches.push(SwitchProof::decode(chunk)?);
                off += ENCODED_LEN_SWITCH;
            }
            let mut singles_proofs = Vec::with_capacity(singles.len());
            for _ in &singles {
                let chunk = bytes.get(off..off + ENCODED_LEN_EQDLOG).ok_or_else(|| {
                    ShuffleError::Malformed(format!("truncated single proof at round {r}"))
                })?;
                singles_proofs.push(EqDlogProof::decode(chunk)?);
                off += ENCODED_LEN_EQDLOG;
            }

            round_snapshots.push(snapshot);
            round_switch_proofs.push(switches);
            round_single_proofs.push(singles_proofs);
        }

        if off != bytes.len() {
            return Err(ShuffleError::Malformed("trailing bytes after proof".into()));
        }

        Ok(ShuffleProof {
            n,
            rounds,
            round_snapshots,
            round_switch_proofs,
            round_single_proofs,
        })
    }
}
