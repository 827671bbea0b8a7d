//! Exchange configuration
//!
//! Policy constants the protocol treats as configuration rather than code.
//! Defaults reproduce the canonical deployment: 0.3% input fee and a 1/6
//! protocol share of invariant growth.

use serde::{Deserialize, Serialize};

/// Tunable policy for an [`crate::Exchange`] instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Input fee charged by swaps, in thousandths (3 = 0.3%)
    pub swap_fee_per_mille: u32,
    /// Weight of the current invariant root in the protocol-fee denominator.
    /// With weight `w` the protocol collects `1/(w+1)` of invariant growth;
    /// the default of 5 yields the canonical 1/6 split.
    pub protocol_fee_weight: u32,
    /// Chain identifier bound into every pair's permit domain separator
    pub chain_id: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            swap_fee_per_mille: 3,
            protocol_fee_weight: 5,
            chain_id: 1,
        }
    }
}
