//! Protocol-wide tunables (spec §9 ambient stack: "default timeouts,
//! slash amounts, bond minimums, shuffle round count"), grounded in the
//! teacher's `config.rs` shape (there a single struct with a `Default`
//! impl supplying its own domain's constants). Per-table parameters
//! (`poker::types::TableParams`) stay part of the data model and are
//! supplied by the caller at `create_table` time; this struct only holds
//! values that are constant across the whole chain.

use crate::poker::types::Chips;

/// Chain-wide defaults, independent of any single table or hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Number of odd/even mix-network rounds a shuffle proof must cover
    /// (spec §4.C: "odd/even bubble sort over ≥ n rounds converges").
    /// Defaults to the 52-card deck size, the worst-case bound for
    /// odd-even transposition sort to fully converge.
    pub shuffle_rounds: u16,

    /// Minimum bond balance before a player is ejected after a slash
    /// (spec §4.I `PlayerTimeout`).
    pub player_bond_min: Chips,
    /// Bond slashed from a player whose action deadline expired (spec §8
    /// scenario 5).
    pub player_timeout_slash: Chips,

    /// Stake slashed from a committee member who misses or submits an
    /// invalid shuffle proof (spec §4.I `ShuffleMissing`/`ShuffleInvalid`).
    pub shuffle_missing_slash: Chips,
    pub shuffle_invalid_slash: Chips,
    /// Stake slashed for a missing/invalid encrypted hole-share
    /// submission (spec §4.I `HoleShareMissing`/`HoleShareInvalid`).
    pub hole_share_missing_slash: Chips,
    pub hole_share_invalid_slash: Chips,
    /// Stake slashed for a missing/invalid public community-card reveal
    /// share (spec §4.I `PubShareMissing`/`PubShareInvalid`).
    pub pub_share_missing_slash: Chips,
    pub pub_share_invalid_slash: Chips,

    /// Stake slashed from a DKG dealer with a bad commitment or an
    /// invalid reveal (spec §4.F Phase 3, §4.I).
    pub dkg_bad_commitment_slash: Chips,
    pub dkg_invalid_reveal_slash: Chips,
    /// Stake slashed from a dealer who never posts a reveal for an
    /// outstanding complaint by the reveal deadline.
    pub dkg_withheld_reveal_slash: Chips,
    /// Stake slashed per frivolous complaint (resolved Open Question,
    /// `SPEC_FULL.md` §6: charged per-complaint, not per-epoch).
    pub dkg_frivolous_complaint_slash: Chips,

    /// Default length, in block heights, of each DKG phase window
    /// (commit, complaint, reveal) when the caller does not override it
    /// in `BeginEpoch`.
    pub dkg_commit_window_blocks: u64,
    pub dkg_complaint_window_blocks: u64,
    pub dkg_reveal_window_blocks: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            shuffle_rounds: 52,
            player_bond_min: 5,
            player_timeout_slash: 3,
            shuffle_missing_slash: 50,
            shuffle_invalid_slash: 50,
            hole_share_missing_slash: 10,
            hole_share_invalid_slash: 10,
            pub_share_missing_slash: 10,
            pub_share_invalid_slash: 10,
            dkg_bad_commitment_slash: 100,
            dkg_invalid_reveal_slash: 100,
            dkg_withheld_reveal_slash: 100,
            dkg_frivolous_complaint_slash: 20,
            dkg_commit_window_blocks: 50,
            dkg_complaint_window_blocks: 50,
            dkg_reveal_window_blocks: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_positive_windows() {
        let cfg = ProtocolConfig::default();
        assert!(cfg.dkg_commit_window_blocks > 0);
        assert!(cfg.dkg_complaint_window_blocks > 0);
        assert!(cfg.dkg_reveal_window_blocks > 0);
        assert!(cfg.shuffle_rounds >= 52);
    }
}
