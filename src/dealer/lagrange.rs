//! Lagrange interpolation at `x = 0` over committee-member indices
//! (spec §4.G: both player-side hole-card recovery and the chain's
//! threshold public reveal "compute Lagrange combination"), grounded in
//! the teacher's `Field::inverse()` usage in `logup.rs` and the
//! `pedersen_commitment::opening_proof` modules — the only place in the
//! teacher repo performing bare field inversion outside a circuit.

use ark_ff::Field;

use crate::group::Scalar;

/// `λ_i = Π_{j≠i} (-x_j) / (x_i - x_j)` for each `i` in `indices`,
/// evaluating the unique degree-`(k-1)` polynomial through
/// `{(x_i, y_i)}` at `x = 0`. Panics if two indices coincide (a
/// programmer error: caller must dedupe participant indices first).
pub fn coefficients_at_zero(indices: &[u8]) -> Vec<Scalar> {
    let xs: Vec<Scalar> = indices.iter().map(|&i| Scalar::from(i as u64)).collect();
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut num = Scalar::from(1u64);
            let mut den = Scalar::from(1u64);
            for (j, &xj) in xs.iter().enumerate() {
                if i == j {
                    continue;
                }
                num *= -xj;
                den *= xi - xj;
            }
            let den_inv = den.inverse().expect("distinct indices imply nonzero denominator");
            num * den_inv
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Field;

    fn eval(poly: &[Scalar], x: Scalar) -> Scalar {
        let mut acc = Scalar::from(0u64);
        let mut power = Scalar::from(1u64);
        for c in poly {
            acc += *c * power;
            power *= x;
        }
        acc
    }

    #[test]
    fn reconstructs_constant_term_from_shares() {
        let poly = vec![Scalar::from(17u64), Scalar::from(3u64), Scalar::from(9u64)];
        let indices = [1u8, 2u8, 4u8];
        let shares: Vec<Scalar> = indices.iter().map(|&i| eval(&poly, Scalar::from(i as u64))).collect();
        let coeffs = coefficients_at_zero(&indices);
        let recovered: Scalar = coeffs
            .iter()
            .zip(shares.iter())
            .map(|(&c, &s)| c * s)
            .fold(Scalar::from(0u64), |acc, x| acc + x);
        assert_eq!(recovered, poly[0]);
    }

    #[test]
    fn different_subsets_of_same_size_agree() {
        let poly = vec![Scalar::from(5u64), Scalar::from(21u64), Scalar::from(1u64)];
        let shares_at = |i: u8| eval(&poly, Scalar::from(i as u64));

        let idx_a = [1u8, 2u8, 3u8];
        let idx_b = [2u8, 3u8, 5u8];
        let recover = |idx: &[u8]| -> Scalar {
            let coeffs = coefficients_at_zero(idx);
            idx.iter()
                .zip(coeffs.iter())
                .map(|(&i, &c)| c * shares_at(i))
                .fold(Scalar::from(0u64), |acc, x| acc + x)
        };
        assert_eq!(recover(&idx_a), poly[0]);
        assert_eq!(recover(&idx_b), poly[0]);
    }
}
