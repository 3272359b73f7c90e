//! Side-pot computation (spec §4.E "Side pots"), computed once at
//! showdown or fold-completion from the hand's final `total_commit`
//! array.

use super::types::{Pot, SeatId};

/// Build tiered side pots from each seat's total commitment this hand.
/// Seats with `total_commit == 0` contribute no tier. Folded seats still
/// contribute chips to every tier their commitment reaches, but are
/// never eligible to win.
///
/// Thresholds are the sorted distinct positive `total_commit` values
/// `0 < l1 < l2 < … < lk`; pot `i` collects, from every seat, the slice
/// of its commitment between `l_{i-1}` and `l_i`, and is eligible to any
/// non-folded seat whose commitment reaches at least `l_i`.
pub fn compute_side_pots(total_commit: &[u64], folded: &[bool]) -> Vec<Pot> {
    let mut thresholds: Vec<u64> = total_commit.iter().copied().filter(|&c| c > 0).collect();
    thresholds.sort_unstable();
    thresholds.dedup();

    let mut pots = Vec::with_capacity(thresholds.len());
    let mut prev = 0u64;
    for &l in &thresholds {
        let mut amount = 0u64;
        let mut eligible: Vec<SeatId> = Vec::new();
        for (seat, &commit) in total_commit.iter().enumerate() {
            let slice = commit.min(l).saturating_sub(commit.min(prev));
            amount += slice;
            if commit >= l && !folded[seat] {
                eligible.push(seat as SeatId);
            }
        }
        pots.push(Pot { amount, eligible });
        prev = l;
    }
    pots
}
