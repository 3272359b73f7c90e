//! Deterministic permutation derivation (spec §4.C step 1): Fisher-Yates
//! shuffle driven by a SHA-512-based deterministic byte stream, domain
//! `"ocp/v1/shuffle/rng"`.

use sha2::{Digest, Sha512};

/// A counter-mode SHA-512 byte stream: `SHA-512(domain ‖ seed ‖
/// u64_le(counter))` for successive counters, buffered and consumed a
/// chunk at a time. Used only to drive rejection sampling, never as a
/// scalar or key material directly.
struct ByteStream {
    domain: Vec<u8>,
    seed: Vec<u8>,
    counter: u64,
    buf: Vec<u8>,
    pos: usize,
}

impl ByteStream {
    fn new(domain: &[u8], seed: &[u8]) -> Self {
        ByteStream {
            domain: domain.to_vec(),
            seed: seed.to_vec(),
            counter: 0,
            buf: Vec::new(),
            pos: 0,
        }
    }

    fn refill(&mut self) {
        let mut hasher = Sha512::new();
        hasher.update(&self.domain);
        hasher.update(&self.seed);
        hasher.update(self.counter.to_le_bytes());
        self.buf = hasher.finalize().to_vec();
        self.pos = 0;
        self.counter += 1;
    }

    fn next_u64(&mut self) -> u64 {
        if self.pos + 8 > self.buf.len() {
            self.refill();
        }
        let bytes: [u8; 8] = self.buf[self.pos..self.pos + 8].try_into().unwrap();
        self.pos += 8;
        u64::from_le_bytes(bytes)
    }

    /// Uniform value in `0..bound` via rejection sampling (no modulo bias).
    fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0);
        let limit = u64::MAX - (u64::MAX % bound);
        loop {
            let v = self.next_u64();
            if v < limit {
                return v % bound;
            }
        }
    }
}

/// Derive the deterministic target-rank permutation of `0..n` from
/// `seed` via Fisher-Yates: `perm[i]` is input position `i`'s target rank
/// after sorting.
pub fn derive_permutation(seed: &[u8], n: usize) -> Vec<u16> {
    let mut stream = ByteStream::new(b"ocp/v1/shuffle/rng", seed);
    let mut perm: Vec<u16> = (0..n as u16).collect();
    for i in (1..n).rev() {
        let j = stream.next_below((i + 1) as u64) as usize;
        perm.swap(i, j);
    }
    perm
}
