//! Integer square root via the Babylonian method
//!
//! Used for first-mint share issuance (geometric mean of the two deposits)
//! and for the protocol-fee growth computation (sqrt of the invariant).

use ethers_core::types::U256;

/// Floor of the square root of `y`.
///
/// Babylonian iteration: monotonically decreasing from an initial guess of
/// `y / 2 + 1`, terminating when the sequence stops shrinking. For `y <= 3`
/// the answer is `min(y, 1)`.
pub fn integer_sqrt(y: U256) -> U256 {
    if y > U256::from(3u64) {
        let mut z = y;
        let mut x = y / 2 + U256::one();
        while x < z {
            z = x;
            x = (y / x + x) / 2;
        }
        z
    } else if y.is_zero() {
        U256::zero()
    } else {
        U256::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        assert_eq!(integer_sqrt(U256::zero()), U256::zero());
        assert_eq!(integer_sqrt(U256::one()), U256::one());
        assert_eq!(integer_sqrt(U256::from(2u64)), U256::one());
        assert_eq!(integer_sqrt(U256::from(3u64)), U256::one());
        assert_eq!(integer_sqrt(U256::from(4u64)), U256::from(2u64));
    }

    #[test]
    fn perfect_squares() {
        for n in [5u64, 10, 111, 1000, 65_535] {
            let sq = U256::from(n) * U256::from(n);
            assert_eq!(integer_sqrt(sq), U256::from(n));
        }
    }

    #[test]
    fn rounds_down() {
        // 99 is between 9^2 and 10^2
        assert_eq!(integer_sqrt(U256::from(99u64)), U256::from(9u64));
        // one less than a perfect square
        let n = U256::from(1_000_000_007u64);
        let sq = n * n - 1;
        assert_eq!(integer_sqrt(sq), n - 1);
    }

    #[test]
    fn first_mint_vector() {
        // sqrt(1e18 * 4e18) = 2e18, the issuance for the canonical first mint
        let e18 = U256::exp10(18);
        assert_eq!(integer_sqrt(e18 * (e18 * 4)), e18 * 2);
    }

    #[test]
    fn large_values() {
        // near the top of the 224-bit product range seen by first mint
        let r = (U256::one() << 112) - 1;
        let root = integer_sqrt(r * r);
        assert_eq!(root, r);
    }

    proptest::proptest! {
        #[test]
        fn root_brackets_the_input(a in proptest::prelude::any::<u128>(), b in proptest::prelude::any::<u128>()) {
            let y = U256::from(a) * U256::from(b);
            let root = integer_sqrt(y);
            proptest::prop_assert!(root * root <= y);
            if let Some(next_square) = (root + 1).checked_mul(root + 1) {
                proptest::prop_assert!(next_square > y);
            }
        }
    }
}
