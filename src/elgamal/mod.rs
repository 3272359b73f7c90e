//! Additive ElGamal encryption over the dealing group (spec §4.B), grounded
//! in the teacher's `shuffling::public_key_setup` native (non-circuit)
//! tests, which already layer per-member public keys additively and
//! partial-decrypt the same way threshold reveal does here.

use crate::group::{CodecError, GroupElement, Scalar, ENCODED_LEN};
use serde::{Deserialize, Serialize};

/// Length in bytes of the canonical ciphertext encoding (`c1 ‖ c2`).
pub const CIPHERTEXT_LEN: usize = 2 * ENCODED_LEN;

/// An ElGamal ciphertext `(c1, c2) = (r·base, m + r·pk)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub c1: GroupElement,
    pub c2: GroupElement,
}

impl Ciphertext {
    pub fn encode(&self) -> [u8; CIPHERTEXT_LEN] {
        let mut out = [0u8; CIPHERTEXT_LEN];
        out[..ENCODED_LEN].copy_from_slice(&self.c1.encode());
        out[ENCODED_LEN..].copy_from_slice(&self.c2.encode());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != CIPHERTEXT_LEN {
            return Err(CodecError::WrongLength {
                expected: CIPHERTEXT_LEN,
                actual: bytes.len(),
            });
        }
        let c1 = GroupElement::decode(&bytes[..ENCODED_LEN])?;
        let c2 = GroupElement::decode(&bytes[ENCODED_LEN..])?;
        Ok(Ciphertext { c1, c2 })
    }

    /// `encrypt(pk, m, r)`: trivial encryption when `r = 0` (used for the
    /// pre-shuffle deck initialization, spec §4.G).
    pub fn encrypt(pk: GroupElement, message: GroupElement, r: Scalar) -> Self {
        Ciphertext {
            c1: GroupElement::base() * r,
            c2: message + pk * r,
        }
    }

    /// `rerandomize`: add a fresh encryption of the identity under `pk`
    /// with randomness `rho`, producing an equivalent ciphertext for the
    /// same plaintext under a different, unlinkable `(c1, c2)` pair.
    pub fn rerandomize(&self, pk: GroupElement, rho: Scalar) -> Self {
        Ciphertext {
            c1: self.c1 + GroupElement::base() * rho,
            c2: self.c2 + pk * rho,
        }
    }
}

/// `decrypt(x, (c1,c2)) = c2 − x·c1`, full decryption with the hand secret
/// key. Used only by tests and by the deck-initialization trivial case;
/// on-chain recovery always goes through threshold shares (see
/// `crate::dealer::lagrange`).
pub fn decrypt(x: Scalar, ct: &Ciphertext) -> GroupElement {
    ct.c2 - ct.c1 * x
}

/// Maps a card id `0..=51` to its group-element encoding `m_c = (c+1)·base`,
/// per spec §4.G (`c+1` avoids the identity element at `c = 0`).
pub fn card_to_point(card: crate::cards::Card) -> GroupElement {
    let c = card.id() as u64 + 1;
    GroupElement::base() * Scalar::from(c)
}

/// Inverse of [`card_to_point`]: a precomputed lookup table `{(c+1)·base →
/// c}` over the 52-card deck, used to identify a recovered message point.
pub struct CardPointTable {
    points: Vec<(GroupElement, crate::cards::Card)>,
}

impl CardPointTable {
    pub fn build() -> Self {
        let points = (0u8..52)
            .map(|id| {
                let card = crate::cards::Card::new(id);
                (card_to_point(card), card)
            })
            .collect();
        CardPointTable { points }
    }

    pub fn lookup(&self, point: GroupElement) -> Option<crate::cards::Card> {
        self.points
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, card)| *card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::random_nonzero_scalar;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut rng = rand::thread_rng();
        let x = random_nonzero_scalar(&mut rng);
        let pk = GroupElement::base() * x;
        let m = GroupElement::base() * Scalar::from(7u64);
        let r = random_nonzero_scalar(&mut rng);
        let ct = Ciphertext::encrypt(pk, m, r);
        assert_eq!(decrypt(x, &ct), m);
    }

    #[test]
    fn trivial_encryption_with_zero_randomness() {
        let pk = GroupElement::base() * Scalar::from(5u64);
        let m = GroupElement::base() * Scalar::from(3u64);
        let ct = Ciphertext::encrypt(pk, m, Scalar::from(0u64));
        assert_eq!(ct.c1, GroupElement::identity());
        assert_eq!(ct.c2, m);
    }

    #[test]
    fn rerandomize_preserves_plaintext() {
        let mut rng = rand::thread_rng();
        let x = random_nonzero_scalar(&mut rng);
        let pk = GroupElement::base() * x;
        let m = GroupElement::base() * Scalar::from(11u64);
        let r = random_nonzero_scalar(&mut rng);
        let ct = Ciphertext::encrypt(pk, m, r);
        let rho = random_nonzero_scalar(&mut rng);
        let ct2 = ct.rerandomize(pk, rho);
        assert_ne!(ct.c1, ct2.c1);
        assert_eq!(decrypt(x, &ct2), m);
    }

    #[test]
    fn ciphertext_roundtrip() {
        let pk = GroupElement::base() * Scalar::from(2u64);
        let m = GroupElement::base() * Scalar::from(9u64);
        let ct = Ciphertext::encrypt(pk, m, Scalar::from(4u64));
        let bytes = ct.encode();
        assert_eq!(bytes.len(), CIPHERTEXT_LEN);
        let back = Ciphertext::decode(&bytes).unwrap();
        assert_eq!(back, ct);
    }

    #[test]
    fn card_point_table_roundtrips_every_card() {
        let table = CardPointTable::build();
        for id in 0u8..52 {
            let card = crate::cards::Card::new(id);
            let point = card_to_point(card);
            assert_eq!(table.lookup(point), Some(card));
        }
    }
}
