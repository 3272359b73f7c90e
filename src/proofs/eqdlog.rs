//! Chaum-Pedersen equality-of-discrete-log proof (spec §4.B): proves
//! knowledge of `x` such that `y = x·A ∧ d = x·c1`, without revealing `x`.
//! Grounded in `chaum_pedersen::native::ChaumPedersenProof` in the teacher
//! crate, minus the Poseidon-sponge challenge (replaced with the SHA-512
//! [`Transcript`](crate::group::Transcript)).

use super::ProofError;
use crate::group::{decode_scalar, encode_scalar, GroupElement, Scalar, Transcript, ENCODED_LEN};

pub const ENCODED_LEN_EQDLOG: usize = 3 * ENCODED_LEN;

/// `t1 ‖ t2 ‖ z`, 96 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EqDlogProof {
    pub t1: GroupElement,
    pub t2: GroupElement,
    pub z: Scalar,
}

impl EqDlogProof {
    /// Prove knowledge of `x` with `y = x·a`, `d = x·c1`. The caller
    /// supplies a transcript already tagged with the calling protocol's
    /// domain (spec §4.A contract: every challenge depends on every
    /// public input in a fixed order).
    pub fn prove<R: rand::Rng + ?Sized>(
        transcript: &mut Transcript,
        rng: &mut R,
        x: Scalar,
        a: GroupElement,
        c1: GroupElement,
    ) -> (GroupElement, GroupElement, Self) {
        let y = a * x;
        let d = c1 * x;
        let w = crate::group::random_nonzero_scalar(rng);
        let t1 = a * w;
        let t2 = c1 * w;

        transcript.append(b"A", &a.encode());
        transcript.append(b"c1", &c1.encode());
        transcript.append(b"y", &y.encode());
        transcript.append(b"d", &d.encode());
        transcript.append(b"t1", &t1.encode());
        transcript.append(b"t2", &t2.encode());
        let e = transcript.challenge_scalar(b"e");

        let z = w + e * x;
        (y, d, EqDlogProof { t1, t2, z })
    }

    /// Verify `z·A = t1 + e·y` and `z·c1 = t2 + e·d`.
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        a: GroupElement,
        c1: GroupElement,
        y: GroupElement,
        d: GroupElement,
    ) -> bool {
        transcript.append(b"A", &a.encode());
        transcript.append(b"c1", &c1.encode());
        transcript.append(b"y", &y.encode());
        transcript.append(b"d", &d.encode());
        transcript.append(b"t1", &self.t1.encode());
        transcript.append(b"t2", &self.t2.encode());
        let e = transcript.challenge_scalar(b"e");

        let lhs1 = a * self.z;
        let rhs1 = self.t1 + y * e;
        let lhs2 = c1 * self.z;
        let rhs2 = self.t2 + d * e;
        lhs1 == rhs1 && lhs2 == rhs2
    }

    pub fn encode(&self) -> [u8; ENCODED_LEN_EQDLOG] {
        let mut out = [0u8; ENCODED_LEN_EQDLOG];
        out[..ENCODED_LEN].copy_from_slice(&self.t1.encode());
        out[ENCODED_LEN..2 * ENCODED_LEN].copy_from_slice(&self.t2.encode());
        out[2 * ENCODED_LEN..].copy_from_slice(&encode_scalar(&self.z));
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() != ENCODED_LEN_EQDLOG {
            return Err(ProofError::WrongLength {
                expected: ENCODED_LEN_EQDLOG,
                actual: bytes.len(),
            });
        }
        let t1 = GroupElement::decode(&bytes[..ENCODED_LEN])?;
        let t2 = GroupElement::decode(&bytes[ENCODED_LEN..2 * ENCODED_LEN])?;
        let z = decode_scalar(&bytes[2 * ENCODED_LEN..])?;
        Ok(EqDlogProof { t1, t2, z })
    }
}
