//! Constant-product swap quoting
//!
//! Pure x*y=k sizing formulas with the input fee expressed in per-mille
//! scaled-integer form, matching the reserve engine's K check exactly. These
//! are the caller-side counterparts of the invariant the pair enforces: an
//! output computed by [`get_amount_out`] is the largest output the pair will
//! accept for the given input, and one unit more violates K.

use ethers_core::types::U256;
use thiserror::Error;

/// Scale factor shared with the pair's fee-adjusted K check.
pub const FEE_SCALE: u32 = 1000;

/// Errors from quote computation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Zero input where a positive amount is required
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Zero output where a positive amount is required
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// A reserve is empty or too small to serve the request
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Intermediate product exceeded 256 bits
    #[error("arithmetic overflow in quote computation")]
    Overflow,
}

/// Equivalent value of `amount_a` in asset B at the current reserve ratio.
///
/// No fee is applied; this is the mint-side helper for proportional deposits.
pub fn quote(amount_a: U256, reserve_a: U256, reserve_b: U256) -> Result<U256, MathError> {
    if amount_a.is_zero() {
        return Err(MathError::InsufficientInputAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(MathError::InsufficientLiquidity);
    }
    amount_a
        .checked_mul(reserve_b)
        .map(|n| n / reserve_a)
        .ok_or(MathError::Overflow)
}

/// Maximum output for `amount_in`, charging `fee_per_mille` on the input.
///
/// `out = in·(1000-fee)·R_out / (R_in·1000 + in·(1000-fee))`
pub fn get_amount_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee_per_mille: u32,
) -> Result<U256, MathError> {
    if amount_in.is_zero() {
        return Err(MathError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(MathError::InsufficientLiquidity);
    }
    let fee_factor = U256::from(FEE_SCALE - fee_per_mille);
    let amount_in_with_fee = amount_in.checked_mul(fee_factor).ok_or(MathError::Overflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(MathError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(U256::from(FEE_SCALE))
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or(MathError::Overflow)?;
    Ok(numerator / denominator)
}

/// Minimum input that yields `amount_out`, charging `fee_per_mille` on the input.
///
/// Rounds up by one unit so the returned input always satisfies the K check.
pub fn get_amount_in(
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee_per_mille: u32,
) -> Result<U256, MathError> {
    if amount_out.is_zero() {
        return Err(MathError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(MathError::InsufficientLiquidity);
    }
    let numerator = reserve_in
        .checked_mul(amount_out)
        .and_then(|n| n.checked_mul(U256::from(FEE_SCALE)))
        .ok_or(MathError::Overflow)?;
    let denominator = (reserve_out - amount_out)
        .checked_mul(U256::from(FEE_SCALE - fee_per_mille))
        .ok_or(MathError::Overflow)?;
    Ok(numerator / denominator + U256::one())
}
