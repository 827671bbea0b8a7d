//! Pair state: reserves, invariant bookkeeping, share ledger, oracle
//!
//! A [`Pair`] is the singleton pool for one unordered asset set, held in
//! canonical ascending address order. It owns its reserve snapshot, the
//! `k_last` checkpoint for protocol-fee accrual, the reentrancy flag, the
//! embedded share ledger, and the cumulative price oracle. The state-changing
//! operations themselves live on [`crate::Exchange`], which owns the asset
//! custody the pair must read.

use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::PairError;
use crate::ledger::ShareLedger;
use crate::oracle::PriceOracle;

/// Shares permanently issued to the zero address on first mint, so total
/// supply can never return to zero once a pool has been seeded.
pub const MINIMUM_LIQUIDITY: u64 = 1000;

/// Upper bound (inclusive) for each reserve: 2^112 - 1.
pub const MAX_RESERVE: u128 = (1 << 112) - 1;

/// One constant-product pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    address: Address,
    factory: Address,
    token0: Address,
    token1: Address,
    reserve0: u128,
    reserve1: u128,
    k_last: U256,
    locked: bool,
    oracle: PriceOracle,
    ledger: ShareLedger,
}

impl Pair {
    /// Fresh, uninitialized pair deployed by `factory` at `address`.
    pub(crate) fn new(factory: Address, address: Address, chain_id: u64) -> Self {
        Self {
            address,
            factory,
            token0: Address::zero(),
            token1: Address::zero(),
            reserve0: 0,
            reserve1: 0,
            k_last: U256::zero(),
            locked: false,
            oracle: PriceOracle::default(),
            ledger: ShareLedger::new(chain_id, address),
        }
    }

    /// Bind the asset identities. Callable exactly once, only by the factory
    /// of record; `token0 < token1` is the caller's responsibility.
    pub(crate) fn initialize(
        &mut self,
        caller: Address,
        token0: Address,
        token1: Address,
    ) -> Result<(), PairError> {
        if caller != self.factory || !self.token0.is_zero() {
            return Err(PairError::ForbiddenInit);
        }
        self.token0 = token0;
        self.token1 = token1;
        Ok(())
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    pub fn token0(&self) -> Address {
        self.token0
    }

    pub fn token1(&self) -> Address {
        self.token1
    }

    /// Reserve snapshot plus the (wrapping) timestamp of its last update.
    pub fn reserves(&self) -> (u128, u128, u32) {
        (
            self.reserve0,
            self.reserve1,
            self.oracle.last_block_timestamp(),
        )
    }

    /// Reserve product recorded after the last liquidity event; zero while
    /// protocol fee collection is disabled.
    pub fn k_last(&self) -> U256 {
        self.k_last
    }

    pub(crate) fn set_k_last(&mut self, k: U256) {
        self.k_last = k;
    }

    pub fn oracle(&self) -> &PriceOracle {
        &self.oracle
    }

    pub fn ledger(&self) -> &ShareLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut ShareLedger {
        &mut self.ledger
    }

    /// Enter the non-reentrant critical section.
    pub(crate) fn lock(&mut self) -> Result<(), PairError> {
        if self.locked {
            return Err(PairError::Locked);
        }
        self.locked = true;
        Ok(())
    }

    /// Leave the critical section. Failed calls never reach this point; their
    /// lock flag is discarded with the rest of the rolled-back state.
    pub(crate) fn unlock(&mut self) {
        self.locked = false;
    }

    /// Overwrite reserves with the observed custody balances, advancing the
    /// oracle for the elapsed time at the pre-update reserves.
    pub(crate) fn apply_custody(
        &mut self,
        balance0: U256,
        balance1: U256,
        now: u32,
    ) -> Result<(u128, u128), PairError> {
        if balance0 > U256::from(MAX_RESERVE) || balance1 > U256::from(MAX_RESERVE) {
            return Err(PairError::ReserveOverflow);
        }
        self.oracle.advance(self.reserve0, self.reserve1, now);
        self.reserve0 = balance0.low_u128();
        self.reserve1 = balance1.low_u128();
        Ok((self.reserve0, self.reserve1))
    }
}

/// Fee-adjusted constant-product check for a swap against reserves
/// `(reserve0, reserve1)`: with the fee charged on inputs in per-mille form,
/// `(b0·1000 − in0·fee) · (b1·1000 − in1·fee) >= r0·r1·1000²`.
pub(crate) fn invariant_holds(
    balance0: U256,
    balance1: U256,
    amount0_in: U256,
    amount1_in: U256,
    reserve0: u128,
    reserve1: u128,
    fee_per_mille: u32,
) -> Result<bool, PairError> {
    let scale = U256::from(1000u64);
    let fee = U256::from(fee_per_mille);
    let adjusted0 = balance0
        .checked_mul(scale)
        .and_then(|b| b.checked_sub(amount0_in * fee))
        .ok_or(PairError::ReserveOverflow)?;
    let adjusted1 = balance1
        .checked_mul(scale)
        .and_then(|b| b.checked_sub(amount1_in * fee))
        .ok_or(PairError::ReserveOverflow)?;
    let lhs = adjusted0.checked_mul(adjusted1).ok_or(PairError::ReserveOverflow)?;
    let rhs = U256::from(reserve0) * U256::from(reserve1) * scale * scale;
    Ok(lhs >= rhs)
}
