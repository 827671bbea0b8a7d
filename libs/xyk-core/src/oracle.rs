//! Time-weighted cumulative price accumulators
//!
//! On the first state-changing call of each timestamp tick, both accumulators
//! advance by the current UQ112.112 reserve ratio multiplied by elapsed
//! seconds. Accumulators wrap modulo 2^224 and the timestamp wraps modulo
//! 2^32, both deliberately: consumers derive a time-weighted average price as
//! the modular difference of two samples divided by elapsed time, which stays
//! correct across wraparound as long as they sample more often than the wrap
//! period.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};
use xyk_math::{uq112_ratio, wrap224};

/// Cumulative price state for one pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOracle {
    price0_cumulative: U256,
    price1_cumulative: U256,
    last_block_timestamp: u32,
}

impl PriceOracle {
    /// Cumulative token0 price (token1 per token0), UQ112.112-scaled seconds.
    pub fn price0_cumulative(&self) -> U256 {
        self.price0_cumulative
    }

    /// Cumulative token1 price (token0 per token1), UQ112.112-scaled seconds.
    pub fn price1_cumulative(&self) -> U256 {
        self.price1_cumulative
    }

    /// Timestamp of the last reserve update, truncated to 32 bits.
    pub fn last_block_timestamp(&self) -> u32 {
        self.last_block_timestamp
    }

    /// Advance both accumulators for the time elapsed since the last update,
    /// priced at the pre-update reserves, then record `now`.
    ///
    /// No-op (beyond the timestamp write) while either reserve is empty or
    /// within an already-accumulated timestamp tick.
    pub fn advance(&mut self, reserve0: u128, reserve1: u128, now: u32) {
        let elapsed = now.wrapping_sub(self.last_block_timestamp);
        if elapsed != 0 && reserve0 != 0 && reserve1 != 0 {
            let dt = U256::from(elapsed);
            let (delta0, _) = uq112_ratio(reserve1, reserve0).overflowing_mul(dt);
            let (delta1, _) = uq112_ratio(reserve0, reserve1).overflowing_mul(dt);
            self.price0_cumulative = wrap224(self.price0_cumulative.overflowing_add(delta0).0);
            self.price1_cumulative = wrap224(self.price1_cumulative.overflowing_add(delta1).0);
        }
        self.last_block_timestamp = now;
    }
}
