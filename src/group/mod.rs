//! Prime-order group, scalar arithmetic, and canonical 32-byte encodings
//! (spec §4.A). `GroupElement` wraps `ark_grumpkin::Projective`: its base
//! and scalar fields are both ~254 bits, so compressed points and scalars
//! both canonicalize to exactly 32 bytes, matching the wire encoding the
//! rest of the protocol assumes.

pub mod transcript;

use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use zeroize::Zeroize;

pub use transcript::Transcript;

type Inner = ark_grumpkin::Projective;

/// Scalar field of the dealing group: canonical representatives live in
/// `[0, q)`; arkworks rejects non-canonical byte strings on decode.
pub type Scalar = <Inner as PrimeGroup>::ScalarField;

/// Length in bytes of a canonical scalar or group-element encoding.
pub const ENCODED_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("non-canonical encoding")]
    NonCanonical,
}

/// A point in the dealing group `G`.
///
/// Equality, addition, subtraction and scalar multiplication are whatever
/// `ark_grumpkin`'s short-Weierstrass implementation provides; arkworks
/// group arithmetic is not constant-time with respect to the *scalar*
/// (see `DESIGN.md`), a known, accepted limitation inherited from the
/// underlying curve library rather than something this crate can paper
/// over without hand-rolling field arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupElement(pub Inner);

impl GroupElement {
    pub fn identity() -> Self {
        GroupElement(Inner::zero())
    }

    pub fn base() -> Self {
        GroupElement(Inner::generator())
    }

    pub fn is_identity(&self) -> bool {
        self.0 == Inner::zero()
    }

    /// Encode to the canonical 32-byte compressed representation.
    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut bytes = Vec::with_capacity(ENCODED_LEN);
        self.0
            .serialize_compressed(&mut bytes)
            .expect("group element serialization is infallible for fixed-size points");
        let mut out = [0u8; ENCODED_LEN];
        out.copy_from_slice(&bytes[..ENCODED_LEN]);
        out
    }

    /// Decode a canonical 32-byte compressed point, rejecting any encoding
    /// that is not the unique canonical one (spec §3).
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != ENCODED_LEN {
            return Err(CodecError::WrongLength {
                expected: ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        let point = Inner::deserialize_with_mode(bytes, Compress::Yes, Validate::Yes)
            .map_err(|_| CodecError::NonCanonical)?;
        // Re-encoding must round-trip to the same bytes, which rules out
        // any decoder acceptance of a non-canonical but parseable input.
        let mut roundtrip = Vec::with_capacity(ENCODED_LEN);
        point
            .serialize_compressed(&mut roundtrip)
            .map_err(|_| CodecError::NonCanonical)?;
        if roundtrip != bytes {
            return Err(CodecError::NonCanonical);
        }
        Ok(GroupElement(point))
    }
}

impl std::ops::Add for GroupElement {
    type Output = GroupElement;
    fn add(self, rhs: GroupElement) -> GroupElement {
        GroupElement(self.0 + rhs.0)
    }
}

impl std::ops::Sub for GroupElement {
    type Output = GroupElement;
    fn sub(self, rhs: GroupElement) -> GroupElement {
        GroupElement(self.0 - rhs.0)
    }
}

impl std::ops::Mul<Scalar> for GroupElement {
    type Output = GroupElement;
    fn mul(self, rhs: Scalar) -> GroupElement {
        GroupElement(self.0 * rhs)
    }
}

impl std::ops::Neg for GroupElement {
    type Output = GroupElement;
    fn neg(self) -> GroupElement {
        GroupElement(-self.0)
    }
}

impl Serialize for GroupElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.encode()))
    }
}

impl<'de> Deserialize<'de> for GroupElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        GroupElement::decode(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Encode a scalar to its canonical 32-byte little-endian representation.
pub fn encode_scalar(s: &Scalar) -> [u8; ENCODED_LEN] {
    let mut bytes = Vec::with_capacity(ENCODED_LEN);
    s.serialize_compressed(&mut bytes)
        .expect("scalar serialization is infallible for a fixed-size field element");
    let mut out = [0u8; ENCODED_LEN];
    out.copy_from_slice(&bytes[..ENCODED_LEN]);
    out
}

/// Decode a canonical scalar, rejecting values `>= q` (spec §3).
pub fn decode_scalar(bytes: &[u8]) -> Result<Scalar, CodecError> {
    if bytes.len() != ENCODED_LEN {
        return Err(CodecError::WrongLength {
            expected: ENCODED_LEN,
            actual: bytes.len(),
        });
    }
    Scalar::deserialize_with_mode(bytes, Compress::Yes, Validate::Yes)
        .map_err(|_| CodecError::NonCanonical)
}

/// A scalar tagged for best-effort zeroization on drop. Used for per-hand
/// and per-epoch secret material held only by a committee member, never
/// by the chain.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretScalar(pub(crate) [u8; ENCODED_LEN]);

impl SecretScalar {
    pub fn from_scalar(s: &Scalar) -> Self {
        SecretScalar(encode_scalar(s))
    }

    pub fn to_scalar(&self) -> Scalar {
        decode_scalar(&self.0).expect("roundtripped scalar is always canonical")
    }
}

/// `hash_to_scalar(domain, parts...)` (spec §4.A): SHA-512 over
/// `"OCPv1|hash_to_scalar|" || u32_le(|domain|) || domain || (u32_le(|p|) || p)...`,
/// interpreting the 64-byte digest as a little-endian integer mod `q`.
pub fn hash_to_scalar(domain: &[u8], parts: &[&[u8]]) -> Scalar {
    use sha2::{Digest, Sha512};
    let mut hasher = Sha512::new();
    hasher.update(b"OCPv1|hash_to_scalar|");
    hasher.update((domain.len() as u32).to_le_bytes());
    hasher.update(domain);
    for part in parts {
        hasher.update((part.len() as u32).to_le_bytes());
        hasher.update(part);
    }
    let digest = hasher.finalize();
    Scalar::from_le_bytes_mod_order(&digest)
}

/// Draw a uniformly random non-zero scalar, used wherever the protocol
/// requires a fresh nonce or re-randomization factor.
pub fn random_nonzero_scalar<R: rand::Rng + ?Sized>(rng: &mut R) -> Scalar {
    use ark_ff::UniformRand;
    loop {
        let s = Scalar::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

trait IsZero {
    fn is_zero(&self) -> bool;
}
impl IsZero for Scalar {
    fn is_zero(&self) -> bool {
        use ark_ff::Zero;
        Zero::is_zero(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_element_roundtrip() {
        let g = GroupElement::base();
        let encoded = g.encode();
        let decoded = GroupElement::decode(&encoded).unwrap();
        assert_eq!(decoded, g);
        assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn identity_roundtrip() {
        let g = GroupElement::identity();
        let decoded = GroupElement::decode(&g.encode()).unwrap();
        assert_eq!(decoded, g);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = GroupElement::decode(&[0u8; 31]).unwrap_err();
        assert_eq!(
            err,
            CodecError::WrongLength {
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn scalar_roundtrip() {
        let s = hash_to_scalar(b"test", &[b"a", b"b"]);
        let bytes = encode_scalar(&s);
        let back = decode_scalar(&bytes).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn hash_to_scalar_is_deterministic_and_domain_separated() {
        let a = hash_to_scalar(b"domain-a", &[b"x"]);
        let b = hash_to_scalar(b"domain-b", &[b"x"]);
        assert_ne!(a, b);
        let a2 = hash_to_scalar(b"domain-a", &[b"x"]);
        assert_eq!(a, a2);
    }

    #[test]
    fn group_arithmetic() {
        let g = GroupElement::base();
        let two = g + g;
        let two_mul = g * (Scalar::from(2u64));
        assert_eq!(two, two_mul);
        assert_eq!(two - g, g);
    }
}
