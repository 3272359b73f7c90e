//! Shared test fixtures: sample tables, deterministic polynomial
//! helpers, and a fully-driven honest DKG epoch. Grounded in the
//! teacher's `shuffling::test_utils` deck/permutation generator helpers
//! — adapted from its fixed-size ElGamal array fixtures to this crate's
//! `Vec`-based tables, committees, and DKG polynomials. Compiled only
//! under `#[cfg(test)]` (see `lib.rs`), so every other module's unit
//! tests can pull fixtures from here instead of re-deriving them.

use rand::Rng;

use crate::dkg::DkgState;
use crate::epoch::{begin_epoch, Epoch};
use crate::group::{random_nonzero_scalar, GroupElement, Scalar};
use crate::poker::engine;
use crate::poker::types::{PlayerId, Table, TableId, TableParams};

pub fn sample_table_params() -> TableParams {
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

/// A freshly created table with `num_seats` seats filled in order,
/// each with a 100-chip stack and the minimum bond.
pub fn sample_table(table_id: TableId, num_seats: u8) -> Table {
    let mut table = engine::create_table(table_id, 1, sample_table_params()).unwrap();
    for seat in 0..num_seats {
        engine::sit(&mut table, seat, (seat + 1) as PlayerId, [0u8; 32], 100, 5).unwrap();
    }
    table
}

/// A degree-`(t-1)` polynomial with random nonzero coefficients, for
/// driving a DKG dealer's commit phase without a real complaint.
pub fn sample_polynomial<R: Rng + ?Sized>(t: usize, rng: &mut R) -> Vec<Scalar> {
    (0..t).map(|_| random_nonzero_scalar(rng)).collect()
}

pub fn eval_polynomial(poly: &[Scalar], x: u64) -> Scalar {
    let x = Scalar::from(x);
    let mut acc = Scalar::from(0u64);
    let mut power = Scalar::from(1u64);
    for c in poly {
        acc += *c * power;
        power *= x;
    }
    acc
}

pub fn commitments_of(poly: &[Scalar]) -> Vec<GroupElement> {
    poly.iter().map(|c| GroupElement::base() * *c).collect()
}

/// Drive a brand-new `n`-member, `t`-threshold epoch's DKG to
/// completion with every member honest, returning the finalized
/// `Epoch` (`pk_epoch` set) alongside each committee member's own
/// constant-term secret `x_m`, for tests that need to build encrypted
/// or public reveal shares without re-running a whole DKG round.
pub fn honest_epoch(epoch_id: u64, n: u8, t: u8) -> (Epoch, Vec<(u8, Scalar)>) {
    let mut rng = rand::thread_rng();
    let candidates: Vec<(u64, u64)> = (1..=n as u64).map(|i| (i, 100)).collect();
    let mut epoch = begin_epoch(epoch_id, &candidates, n, t, [epoch_id as u8; 32]).unwrap();
    let mut state = DkgState::new(&epoch, 10, 20, 30);

    let polys: Vec<(u8, Vec<Scalar>)> = epoch
        .members
        .iter()
        .map(|m| (m.index, sample_polynomial(t as usize, &mut rng)))
        .collect();
    for (idx, poly) in &polys {
        state.commit(*idx, commitments_of(poly), 5).unwrap();
    }
    let pk_epoch = state.finalize(30).unwrap();
    epoch.pk_epoch = Some(pk_epoch);

    let secrets = polys.into_iter().map(|(idx, poly)| (idx, poly[0])).collect();
    (epoch, secrets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_table_seats_players_with_bonds() {
        let table = sample_table(1, 3);
        assert_eq!(table.funded_seats(), vec![0, 1, 2]);
    }

    #[test]
    fn honest_epoch_reconstructs_pk_epoch_from_secrets() {
        let (epoch, secrets) = honest_epoch(1, 4, 3);
        let pk_epoch = epoch.pk_epoch.unwrap();
        let expected = secrets
            .iter()
            .map(|&(_, x)| GroupElement::base() * x)
            .fold(GroupElement::identity(), |acc, p| acc + p);
        assert_eq!(pk_epoch, expected);
    }
}
