//! Best 5-card hand ranking over 5, 6, or 7 distinct cards (spec §4.D).

use super::Card;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    Trips = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    Quads = 7,
    StraightFlush = 8,
}

/// A ranked 5-card hand: category plus descending tiebreakers. Comparing
/// two `HandRank`s by category then element-wise on `tiebreakers` is a
/// total order over all possible 5-card hands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreakers: Vec<u8>,
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreakers.cmp(&other.tiebreakers))
    }
}

/// `compare(a, b)`: −1 if `a < b`, 0 if equal, 1 if `a > b`.
pub fn compare(a: &HandRank, b: &HandRank) -> i8 {
    match a.cmp(b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// Evaluate the best 5-card hand out of 5, 6, or 7 distinct cards.
pub fn evaluate(cards: &[Card]) -> HandRank {
    assert!(
        (5..=7).contains(&cards.len()),
        "hand evaluator expects 5 to 7 cards, got {}",
        cards.len()
    );
    if cards.len() == 5 {
        return rank_five(cards);
    }
    combinations_5(cards)
        .map(|combo| rank_five(&combo))
        .max()
        .expect("at least one 5-card combination exists for 5..=7 input cards")
}

fn combinations_5(cards: &[Card]) -> impl Iterator<Item = [Card; 5]> + '_ {
    let n = cards.len();
    (0..n).flat_map(move |a| {
        (a + 1..n).flat_map(move |b| {
            (b + 1..n).flat_map(move |c| {
                (c + 1..n).flat_map(move |d| {
                    (d + 1..n).map(move |e| [cards[a], cards[b], cards[c], cards[d], cards[e]])
                })
            })
        })
    })
}

fn rank_five(cards: &[Card]) -> HandRank {
    assert_eq!(cards.len(), 5);
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank()).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight_high = straight_high_rank(&ranks);

    let mut counts: std::collections::BTreeMap<u8, u8> = std::collections::BTreeMap::new();
    for r in &ranks {
        *counts.entry(*r).or_insert(0) += 1;
    }
    // Sort rank groups by (count desc, rank desc) to read off tiebreakers
    // in relevance order for pairs/trips/quads categories.
    let mut groups: Vec<(u8, u8)> = counts.into_iter().map(|(rank, count)| (count, rank)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    if let Some(high) = straight_high {
        if is_flush {
            return HandRank {
                category: HandCategory::StraightFlush,
                tiebreakers: vec![high],
            };
        }
    }

    if groups[0].0 == 4 {
        let kicker = groups[1].1;
        return HandRank {
            category: HandCategory::Quads,
            tiebreakers: vec![groups[0].1, kicker],
        };
    }

    if groups[0].0 == 3 && groups.len() > 1 && groups[1].0 >= 2 {
        return HandRank {
            category: HandCategory::FullHouse,
            tiebreakers: vec![groups[0].1, groups[1].1],
        };
    }

    if is_flush {
        return HandRank {
            category: HandCategory::Flush,
            tiebreakers: ranks,
        };
    }

    if let Some(high) = straight_high {
        return HandRank {
            category: HandCategory::Straight,
            tiebreakers: vec![high],
        };
    }

    if groups[0].0 == 3 {
        let mut kickers: Vec<u8> = groups[1..].iter().map(|(_, r)| *r).collect();
        kickers.sort_unstable_by(|a, b| b.cmp(a));
        return HandRank {
            category: HandCategory::Trips,
            tiebreakers: [vec![groups[0].1], kickers].concat(),
        };
    }

    if groups[0].0 == 2 && groups.len() > 1 && groups[1].0 == 2 {
        let (hi_pair, lo_pair) = if groups[0].1 > groups[1].1 {
            (groups[0].1, groups[1].1)
        } else {
            (groups[1].1, groups[0].1)
        };
        let kicker = groups[2].1;
        return HandRank {
            category: HandCategory::TwoPair,
            tiebreakers: vec![hi_pair, lo_pair, kicker],
        };
    }

    if groups[0].0 == 2 {
        let mut kickers: Vec<u8> = groups[1..].iter().map(|(_, r)| *r).collect();
        kickers.sort_unstable_by(|a, b| b.cmp(a));
        return HandRank {
            category: HandCategory::OnePair,
            tiebreakers: [vec![groups[0].1], kickers].concat(),
        };
    }

    HandRank {
        category: HandCategory::HighCard,
        tiebreakers: ranks,
    }
}

/// Returns the straight's high rank if `ranks` (sorted descending, with
/// duplicates) forms five consecutive ranks, accounting for the
/// ace-low wheel (A-2-3-4-5, high = 5).
fn straight_high_rank(ranks_desc: &[u8]) -> Option<u8> {
    let mut distinct: Vec<u8> = ranks_desc.to_vec();
    distinct.dedup();
    if distinct.len() < 5 {
        return None;
    }
    for window in distinct.windows(5) {
        if window[0] - window[4] == 4 {
            return Some(window[0]);
        }
    }
    // Wheel: A(14),5,4,3,2 present.
    if distinct.contains(&14)
        && distinct.contains(&5)
        && distinct.contains(&4)
        && distinct.contains(&3)
        && distinct.contains(&2)
    {
        return Some(5);
    }
    None
}
