//! Card representation and hand evaluation (spec §3, §4.D), grounded in
//! the teacher's `player`/`showdown` card-indexing convention (cards as a
//! flat `0..=51` id, rank/suit derived by division) adapted to a native
//! (non-circuit) evaluator since showdown comparison here is off the
//! proof path entirely.

pub mod evaluator;

pub use evaluator::{compare, evaluate, HandCategory, HandRank};

use serde::{Deserialize, Serialize};

/// A playing card, represented as its id in `0..=51`.
///
/// `rank = id % 13 + 2` (2..=14, 14 = ace), `suit = id / 13` (0..=3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(u8);

impl Card {
    /// Construct a card from its `0..=51` id. Panics outside that range:
    /// every caller in this crate derives ids from fixed deck positions or
    /// validated wire input, so an out-of-range id is a programming error.
    pub fn new(id: u8) -> Self {
        assert!(id < 52, "card id out of range: {id}");
        Card(id)
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    /// 2..=14, where 14 is ace.
    pub fn rank(&self) -> u8 {
        self.0 % 13 + 2
    }

    pub fn suit(&self) -> u8 {
        self.0 / 13
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const RANKS: [&str; 13] = [
            "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
        ];
        const SUITS: [&str; 4] = ["c", "d", "h", "s"];
        write!(
            f,
            "{}{}",
            RANKS[(self.rank() - 2) as usize],
            SUITS[self.suit() as usize]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_and_suit_boundaries() {
        assert_eq!(Card::new(0).rank(), 2);
        assert_eq!(Card::new(0).suit(), 0);
        assert_eq!(Card::new(12).rank(), 14);
        assert_eq!(Card::new(12).suit(), 0);
        assert_eq!(Card::new(51).rank(), 14);
        assert_eq!(Card::new(51).suit(), 3);
    }
}
