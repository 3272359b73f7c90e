//! Shuffle verifier (spec §4.C): checks a shuffle proof against a known
//! input deck and public key, round by round.

use super::proof::ShuffleProof;
use super::{pairs_and_singles, ShuffleError};
use crate::elgamal::Ciphertext;
use crate::group::{GroupElement, Transcript};

const SWITCH_DOMAIN: &[u8] = b"ocp/v1/shuffle/switch-or";
const SINGLE_DOMAIN: &[u8] = b"ocp/v1/shuffle/reenc-eqdlog";

/// Verify `proof` transforms `deck_in` into a fresh re-randomization and
/// permutation under `pk`. Returns the accepted output deck.
pub fn shuffle_verify(
    deck_in: &[Ciphertext],
    proof: &ShuffleProof,
    pk: GroupElement,
) -> Result<Vec<Ciphertext>, ShuffleError> {
    let n = deck_in.len();
    if proof.n as usize != n {
        return Err(ShuffleError::DeckSizeMismatch {
            expected: n,
            actual: proof.n as usize,
        });
    }
    if proof.round_snapshots.len() != proof.rounds as usize
        || proof.round_switch_proofs.len() != proof.rounds as usize
        || proof.round_single_proofs.len() != proof.rounds as usize
    {
        return Err(ShuffleError::RoundCountMismatch);
    }

    let mut current: Vec<Ciphertext> = deck_in.to_vec();

    for r in 0..proof.rounds as usize {
        let (pairs, singles) = pairs_and_singles(r, n);
        let snapshot = &proof.round_snapshots[r];
        if snapshot.len() != n {
            return Err(ShuffleError::DeckSizeMismatch {
                expected: n,
                actual: snapshot.len(),
            });
        }
        let switches = &proof.round_switch_proofs[r];
        let singles_proofs = &proof.round_single_proofs[r];
        if switches.len() != pairs.len() {
            return Err(ShuffleError::RoundCountMismatch);
        }
        if singles_proofs.len() != singles.len() {
            return Err(ShuffleError::RoundCountMismatch);
        }

        for (idx, (&(i, j), sw)) in pairs.iter().zip(switches.iter()).enumerate() {
            let in0 = current[i];
            let in1 = current[j];
            let out0 = snapshot[i];
            let out1 = snapshot[j];
            let mut t = Transcript::new(SWITCH_DOMAIN);
            if !sw.verify(&mut t, pk, in0, in1, out0, out1) {
                return Err(ShuffleError::SwitchProofRejected { round: r, index: idx });
            }
        }

        for (idx, (&s, proof)) in singles.iter().zip(singles_proofs.iter()).enumerate() {
            let input = current[s];
            let out = snapshot[s];
            if out.c1 == input.c1 {
                return Err(ShuffleError::SingleProofRejected { round: r, index: idx });
            }
            let x = out.c1 - input.c1;
            let y = out.c2 - input.c2;
            let mut t = Transcript::new(SINGLE_DOMAIN);
            if !proof.verify(&mut t, GroupElement::base(), pk, x, y) {
                return Err(ShuffleError::SingleProofRejected { round: r, index: idx });
            }
        }

        current = snapshot.clone();
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::shuffle_prove;

    fn trivial_deck(pk: GroupElement, n: usize) -> Vec<Ciphertext> {
        (0..n)
            .map(|i| {
                let m = GroupElement::base() * crate::group::Scalar::from((i + 1) as u64);
                Ciphertext::encrypt(pk, m, crate::group::Scalar::from(0u64))
            })
            .collect()
    }

    #[test]
    fn honest_shuffle_round_trips() {
        let mut rng = rand::thread_rng();
        let x = crate::group::random_nonzero_scalar(&mut rng);
        let pk = GroupElement::base() * x;
        let deck_in = trivial_deck(pk, 10);

        let (proof, deck_out) = shuffle_prove(&mut rng, pk, &deck_in, &[7u8; 32], 10).unwrap();
        let verified = shuffle_verify(&deck_in, &proof, pk).unwrap();
        assert_eq!(verified, deck_out);
        assert_eq!(verified.len(), 10);
    }

    #[test]
    fn flipping_a_snapshot_byte_is_rejected() {
        let mut rng = rand::thread_rng();
        let x = crate::group::random_nonzero_scalar(&mut rng);
        let pk = GroupElement::base() * x;
        let deck_in = trivial_deck(pk, 10);

        let (proof, _) = shuffle_prove(&mut rng, pk, &deck_in, &[7u8; 32], 10).unwrap();
        let mut bytes = proof.encode();
        // Byte 5 is inside round 0's deck snapshot region.
        bytes[5] ^= 0x01;
        let tampered = super::super::proof::ShuffleProof::decode(&bytes);
        match tampered {
            Ok(tampered_proof) => {
                assert!(shuffle_verify(&deck_in, &tampered_proof, pk).is_err());
            }
            Err(_) => {
                // Flipping the byte produced a non-canonical point encoding,
                // which is an equally valid rejection.
            }
        }
    }

    #[test]
    fn wrong_deck_size_rejected() {
        let mut rng = rand::thread_rng();
        let x = crate::group::random_nonzero_scalar(&mut rng);
        let pk = GroupElement::base() * x;
        let deck_in = trivial_deck(pk, 10);
        let (proof, _) = shuffle_prove(&mut rng, pk, &deck_in, &[7u8; 32], 10).unwrap();

        let shorter_deck = &deck_in[..9];
        assert!(matches!(
            shuffle_verify(shorter_deck, &proof, pk),
            Err(ShuffleError::DeckSizeMismatch { .. })
        ));
    }
}
