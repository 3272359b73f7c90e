//! Shuffle prover (spec §4.C): builds the round-by-round mix network and
//! its proof from a seed and an input deck.

use super::proof::ShuffleProof;
use super::{pairs_and_singles, ShuffleError};
use crate::elgamal::Ciphertext;
use crate::group::{GroupElement, Scalar, Transcript};
use crate::proofs::{EqDlogProof, SwitchProof};

const SWITCH_DOMAIN: &[u8] = b"ocp/v1/shuffle/switch-or";
const SINGLE_DOMAIN: &[u8] = b"ocp/v1/shuffle/reenc-eqdlog";

/// Sample a fresh non-zero `rho` such that re-randomizing `ct` under `pk`
/// produces a `c1` distinct from every `forbidden` input `c1` (spec
/// §4.B/§4.C non-zero re-randomization rule).
fn resample_rerandomization<R: rand::Rng + ?Sized>(
    rng: &mut R,
    pk: GroupElement,
    ct: Ciphertext,
    forbidden: &[GroupElement],
) -> (Scalar, Ciphertext) {
    loop {
        let rho = crate::group::random_nonzero_scalar(rng);
        let out = ct.rerandomize(pk, rho);
        if !forbidden.iter().any(|&f| f == out.c1) {
            return (rho, out);
        }
    }
}

/// Run the shuffle protocol: derive the permutation from `seed`, apply
/// `rounds` odd/even switch-gate rounds, and return the proof together
/// with the resulting deck.
pub fn shuffle_prove<R: rand::Rng + ?Sized>(
    rng: &mut R,
    pk: GroupElement,
    deck_in: &[Ciphertext],
    seed: &[u8],
    rounds: u16,
) -> Result<(ShuffleProof, Vec<Ciphertext>), ShuffleError> {
    let n = deck_in.len();
    if n == 0 || n > u16::MAX as usize {
        return Err(ShuffleError::DeckSizeMismatch {
            expected: n,
            actual: n,
        });
    }

    let perm = super::permutation::derive_permutation(seed, n);
    let mut deck: Vec<Ciphertext> = deck_in.to_vec();
    let mut keys: Vec<u16> = perm;

    let mut round_snapshots = Vec::with_capacity(rounds as usize);
    let mut round_switch_proofs = Vec::with_capacity(rounds as usize);
    let mut round_single_proofs = Vec::with_capacity(rounds as usize);

    for r in 0..rounds as usize {
        let (pairs, singles) = pairs_and_singles(r, n);
        let mut switches = Vec::with_capacity(pairs.len());
        for &(i, j) in &pairs {
            let in0 = deck[i];
            let in1 = deck[j];
            let swap = keys[i] > keys[j];

            let forbidden = [in0.c1, in1.c1];
            let (swapped_in_for_out0, swapped_in_for_out1) = if swap { (in1, in0) } else { (in0, in1) };
            let (rho0, out0) = resample_rerandomization(rng, pk, swapped_in_for_out0, &forbidden);
            let (rho1, out1) = resample_rerandomization(rng, pk, swapped_in_for_out1, &forbidden);

            let mut t = Transcript::new(SWITCH_DOMAIN);
            let proof = SwitchProof::prove(&mut t, rng, pk, in0, in1, out0, out1, swap, rho0, rho1);
            switches.push(proof);

            deck[i] = out0;
            deck[j] = out1;
            let (new_key_i, new_key_j) = if swap {
                (keys[j], keys[i])
            } else {
                (keys[i], keys[j])
            };
            keys[i] = new_key_i;
            keys[j] = new_key_j;
        }

        let mut singles_proofs = Vec::with_capacity(singles.len());
        for &s in &singles {
            let input = deck[s];
            let forbidden = [input.c1];
            let (rho, out) = resample_rerandomization(rng, pk, input, &forbidden);
            let mut t = Transcript::new(SINGLE_DOMAIN);
            let (_x, _y, proof) = EqDlogProof::prove(&mut t, rng, rho, GroupElement::base(), pk);
            singles_proofs.push(proof);
            deck[s] = out;
        }

        round_snapshots.push(deck.clone());
        round_switch_proofs.push(switches);
        round_single_proofs.push(singles_proofs);
    }

    let proof = ShuffleProof {
        n: n as u16,
        rounds,
        round_snapshots,
        round_switch_proofs,
        round_single_proofs,
    };
    Ok((proof, deck))
}
