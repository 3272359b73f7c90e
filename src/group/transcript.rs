//! Domain-separated Fiat-Shamir transcript (spec §4.A), grounded in the
//! teacher's `signing::TranscriptBuilder`: a length-prefixed, domain-tagged
//! byte buffer. The teacher reduces the buffer through a Poseidon sponge
//! for circuit compatibility; this crate has no circuit to stay compatible
//! with, so it reduces through SHA-512 via `hash_to_scalar` instead.

use super::{hash_to_scalar, Scalar};

/// An append-only transcript that accumulates domain-separated, labeled
/// byte strings and derives Fiat-Shamir challenges from them.
///
/// Every `challenge_scalar` call folds the accumulated bytes (and the
/// challenge index, so repeated calls on the same state diverge) into a
/// fresh scalar and rolls the transcript forward by appending the
/// challenge's own encoding, so a later `append`/`challenge_scalar` pair
/// cannot be replayed against an earlier prefix.
#[derive(Clone, Debug)]
pub struct Transcript {
    domain: Vec<u8>,
    buf: Vec<u8>,
    challenges_drawn: u32,
}

impl Transcript {
    pub fn new(domain: &[u8]) -> Self {
        Transcript {
            domain: domain.to_vec(),
            buf: Vec::new(),
            challenges_drawn: 0,
        }
    }

    /// Append a labeled field. The label is length-prefixed so that
    /// `append("a", "bc")` and `append("ab", "c")` cannot collide.
    pub fn append(&mut self, label: &[u8], bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(&(label.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(label);
        self.buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Derive a challenge scalar from the current transcript state, then
    /// roll the state forward so the next challenge depends on this one.
    pub fn challenge_scalar(&mut self, label: &[u8]) -> Scalar {
        self.buf.extend_from_slice(&(label.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(label);
        self.buf
            .extend_from_slice(&self.challenges_drawn.to_le_bytes());
        let challenge = hash_to_scalar(&self.domain, &[&self.buf]);
        self.challenges_drawn += 1;
        self.buf
            .extend_from_slice(&super::encode_scalar(&challenge));
        challenge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_transcripts_produce_identical_challenges() {
        let mut t1 = Transcript::new(b"test/transcript");
        t1.append(b"A", &[1, 2, 3]);
        t1.append(b"B", &[4, 5]);
        let c1 = t1.challenge_scalar(b"e");

        let mut t2 = Transcript::new(b"test/transcript");
        t2.append(b"A", &[1, 2, 3]);
        t2.append(b"B", &[4, 5]);
        let c2 = t2.challenge_scalar(b"e");

        assert_eq!(c1, c2);
    }

    #[test]
    fn different_append_order_diverges() {
        let mut t1 = Transcript::new(b"test/transcript");
        t1.append(b"A", &[1, 2, 3]);
        t1.append(b"B", &[4, 5]);
        let c1 = t1.challenge_scalar(b"e");

        let mut t2 = Transcript::new(b"test/transcript");
        t2.append(b"B", &[4, 5]);
        t2.append(b"A", &[1, 2, 3]);
        let c2 = t2.challenge_scalar(b"e");

        assert_ne!(c1, c2);
    }

    #[test]
    fn label_prefix_collision_is_prevented_by_length_prefixing() {
        let mut t1 = Transcript::new(b"test/transcript");
        t1.append(b"a", b"bc");
        let c1 = t1.challenge_scalar(b"e");

        let mut t2 = Transcript::new(b"test/transcript");
        t2.append(b"ab", b"c");
        let c2 = t2.challenge_scalar(b"e");

        assert_ne!(c1, c2);
    }

    #[test]
    fn successive_challenges_on_same_transcript_diverge() {
        let mut t = Transcript::new(b"test/transcript");
        t.append(b"A", &[1]);
        let c1 = t.challenge_scalar(b"e");
        let c2 = t.challenge_scalar(b"e");
        assert_ne!(c1, c2);
    }

    #[test]
    fn different_domain_diverges() {
        let mut t1 = Transcript::new(b"domain-1");
        t1.append(b"A", &[1]);
        let c1 = t1.challenge_scalar(b"e");

        let mut t2 = Transcript::new(b"domain-2");
        t2.append(b"A", &[1]);
        let c2 = t2.challenge_scalar(b"e");

        assert_ne!(c1, c2);
    }
}
