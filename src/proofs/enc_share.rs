//! Encrypted-share proof (spec §4.B): a dual-Schnorr proof of knowledge of
//! `(x_i, r)` satisfying `y_i = x_i·base`, `u = r·base`,
//! `v = x_i·c1 + r·pk_p` — used when a committee member encrypts its
//! decryption share `d_i = x_i·c1` to a player's public key as
//! `(u, v) = (r·base, d_i + r·pk_p)`.

use super::ProofError;
use crate::group::{decode_scalar, encode_scalar, GroupElement, Scalar, Transcript, ENCODED_LEN};

pub const ENCODED_LEN_ENC_SHARE: usize = 5 * ENCODED_LEN;

/// `t_y ‖ t_u ‖ t_v ‖ z1 ‖ z2`, 160 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncShareProof {
    pub t_y: GroupElement,
    pub t_u: GroupElement,
    pub t_v: GroupElement,
    pub z1: Scalar,
    pub z2: Scalar,
}

impl EncShareProof {
    /// Prove knowledge of `(x_i, r)` for the stated public values. The
    /// caller derives `y_i`, `u`, `v` itself (they are not recomputed
    /// here) and passes them in for transcript binding.
    #[allow(clippy::too_many_arguments)]
    pub fn prove<R: rand::Rng + ?Sized>(
        transcript: &mut Transcript,
        rng: &mut R,
        x_i: Scalar,
        r: Scalar,
        c1: GroupElement,
        pk_p: GroupElement,
        y_i: GroupElement,
        u: GroupElement,
        v: GroupElement,
    ) -> Self {
        let w1 = crate::group::random_nonzero_scalar(rng);
        let w2 = crate::group::random_nonzero_scalar(rng);
        let base = GroupElement::base();
        let t_y = base * w1;
        let t_u = base * w2;
        let t_v = c1 * w1 + pk_p * w2;

        transcript.append(b"c1", &c1.encode());
        transcript.append(b"pk_p", &pk_p.encode());
        transcript.append(b"y_i", &y_i.encode());
        transcript.append(b"u", &u.encode());
        transcript.append(b"v", &v.encode());
        transcript.append(b"t_y", &t_y.encode());
        transcript.append(b"t_u", &t_u.encode());
        transcript.append(b"t_v", &t_v.encode());
        let e = transcript.challenge_scalar(b"e");

        let z1 = w1 + e * x_i;
        let z2 = w2 + e * r;
        EncShareProof {
            t_y,
            t_u,
            t_v,
            z1,
            z2,
        }
    }

    pub fn verify(
        &self,
        transcript: &mut Transcript,
        c1: GroupElement,
        pk_p: GroupElement,
        y_i: GroupElement,
        u: GroupElement,
        v: GroupElement,
    ) -> bool {
        transcript.append(b"c1", &c1.encode());
        transcript.append(b"pk_p", &pk_p.encode());
        transcript.append(b"y_i", &y_i.encode());
        transcript.append(b"u", &u.encode());
        transcript.append(b"v", &v.encode());
        transcript.append(b"t_y", &self.t_y.encode());
        transcript.append(b"t_u", &self.t_u.encode());
        transcript.append(b"t_v", &self.t_v.encode());
        let e = transcript.challenge_scalar(b"e");

        let base = GroupElement::base();
        let ok_y = base * self.z1 == self.t_y + y_i * e;
        let ok_u = base * self.z2 == self.t_u + u * e;
        let ok_v = c1 * self.z1 + pk_p * self.z2 == self.t_v + v * e;
        ok_y && ok_u && ok_v
    }

    pub fn encode(&self) -> [u8; ENCODED_LEN_ENC_SHARE] {
        let mut out = [0u8; ENCODED_LEN_ENC_SHARE];
        out[..ENCODED_LEN].copy_from_slice(&self.t_y.encode());
        out[ENCODED_LEN..2 * ENCODED_LEN].copy_from_slice(&self.t_u.encode());
        out[2 * ENCODED_LEN..3 * ENCODED_LEN].copy_from_slice(&self.t_v.encode());
        out[3 * ENCODED_LEN..4 * ENCODED_LEN].copy_from_slice(&encode_scalar(&self.z1));
        out[4 * ENCODED_LEN..].copy_from_slice(&encode_scalar(&self.z2));
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() != ENCODED_LEN_ENC_SHARE {
            return Err(ProofError::WrongLength {
                expected: ENCODED_LEN_ENC_SHARE,
                actual: bytes.len(),
            });
        }
        let t_y = GroupElement::decode(&bytes[..ENCODED_LEN])?;
        let t_u = GroupElement::decode(&bytes[ENCODED_LEN..2 * ENCODED_LEN])?;
        let t_v = GroupElement::decode(&bytes[2 * ENCODED_LEN..3 * ENCODED_LEN])?;
        let z1 = decode_scalar(&bytes[3 * ENCODED_LEN..4 * ENCODED_LEN])?;
        let z2 = decode_scalar(&bytes[4 * ENCODED_LEN..])?;
        Ok(EncShareProof {
            t_y,
            t_u,
            t_v,
            z1,
            z2,
        })
    }
}
