//! Observable event log
//!
//! Every state-changing call appends ordered [`LogEntry`] records. Field order
//! inside each variant is part of the integration contract and must not change.
//! A rejected call leaves no events behind: the log is restored together with
//! the rest of the state.

use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Events emitted by pairs, the factory, and asset ledgers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new pair was registered (emitter: factory)
    PairCreated {
        token0: Address,
        token1: Address,
        pair: Address,
        pair_count: u64,
    },

    /// Liquidity deposited (emitter: pair)
    Mint {
        sender: Address,
        amount0: U256,
        amount1: U256,
    },

    /// Liquidity withdrawn (emitter: pair)
    Burn {
        sender: Address,
        amount0: U256,
        amount1: U256,
        to: Address,
    },

    /// Reserves exchanged (emitter: pair)
    Swap {
        sender: Address,
        amount0_in: U256,
        amount1_in: U256,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    },

    /// Reserves resynchronized to custody (emitter: pair)
    Sync { reserve0: u128, reserve1: u128 },

    /// Fungible balance movement (emitter: share token or asset ledger)
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },

    /// Allowance granted (emitter: share token or asset ledger)
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
}

/// An event together with the address that emitted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub emitter: Address,
    pub event: Event,
}
