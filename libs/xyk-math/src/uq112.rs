//! UQ112.112 binary fixed point
//!
//! The price oracle expresses reserve ratios as unsigned 112.112 fixed-point
//! numbers: 112 integer bits, 112 fractional bits. A ratio of two 112-bit
//! reserves therefore always fits in 224 bits, and the cumulative accumulators
//! wrap modulo 2^224 by design so that consumers can difference two samples
//! with plain modular subtraction.

use ethers_core::types::U256;

/// Number of fractional bits in the fixed-point representation.
pub const Q112: usize = 112;

/// Encode an integer reserve as UQ112.112 (multiply by 2^112).
///
/// The caller guarantees `y < 2^112`; the reserve engine enforces that bound
/// before any value reaches the oracle.
pub fn encode_uq112(y: u128) -> U256 {
    U256::from(y) << Q112
}

/// UQ112.112 ratio `numerator / denominator`.
///
/// Returns zero for a zero denominator; the oracle never advances while either
/// reserve is empty, so the guard is unreachable in practice.
pub fn uq112_ratio(numerator: u128, denominator: u128) -> U256 {
    if denominator == 0 {
        return U256::zero();
    }
    encode_uq112(numerator) / U256::from(denominator)
}

/// Reduce a value modulo 2^224, the accumulator word width.
pub fn wrap224(value: U256) -> U256 {
    value & ((U256::one() << 224) - U256::one())
}
