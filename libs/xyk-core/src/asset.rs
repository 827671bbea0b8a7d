//! External asset interface and a minimal fungible ledger
//!
//! The reserve engine consumes traded assets exclusively through the [`Asset`]
//! capability set: read a custody balance, move value. It never trusts a
//! caller-declared amount; deltas are always inferred from before/after
//! balance reads, which keeps the engine correct for assets that deduct their
//! own fee on transfer.
//!
//! [`TokenLedger`] is the standard implementation used by deployments and
//! tests: plain balance/allowance bookkeeping plus an optional burn-style
//! transfer fee for exercising the fee-on-transfer path.

use std::collections::HashMap;

use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Minimal capability set the reserve engine requires from a traded asset
pub trait Asset {
    /// Current balance of `holder`
    fn balance_of(&self, holder: Address) -> U256;

    /// Move `value` from `from` to `to`; `from` is the calling context
    fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), TokenError>;

    /// Move `value` from `from` to `to` on behalf of `spender`, consuming allowance
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), TokenError>;
}

/// In-memory fungible token ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
    /// Fee burned on every transfer, in thousandths. Zero for standard assets.
    transfer_fee_per_mille: u32,
}

impl TokenLedger {
    /// New ledger with `total_supply` credited to `holder`.
    pub fn new(total_supply: U256, holder: Address) -> Self {
        let mut balances = HashMap::new();
        balances.insert(holder, total_supply);
        Self {
            balances,
            allowances: HashMap::new(),
            total_supply,
            transfer_fee_per_mille: 0,
        }
    }

    /// Burn `fee_per_mille` thousandths of every transferred amount, modelling
    /// a deflationary fee-on-transfer asset.
    pub fn with_transfer_fee(mut self, fee_per_mille: u32) -> Self {
        self.transfer_fee_per_mille = fee_per_mille;
        self
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn approve(&mut self, owner: Address, spender: Address, value: U256) {
        self.allowances.insert((owner, spender), value);
    }

    fn debit(&mut self, holder: Address, value: U256) -> Result<(), TokenError> {
        let balance = self.balance_of(holder);
        let remaining = balance
            .checked_sub(value)
            .ok_or(TokenError::InsufficientBalance {
                holder,
                amount: value,
            })?;
        self.balances.insert(holder, remaining);
        Ok(())
    }

    fn credit(&mut self, holder: Address, value: U256) {
        let balance = self.balance_of(holder);
        self.balances.insert(holder, balance + value);
    }
}

impl Asset for TokenLedger {
    fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), TokenError> {
        self.debit(from, value)?;
        let fee = value * U256::from(self.transfer_fee_per_mille) / U256::from(1000u64);
        self.credit(to, value - fee);
        // the fee leaves circulation entirely
        self.total_supply = self.total_supply - fee;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, spender);
        if allowance != U256::MAX {
            let remaining =
                allowance
                    .checked_sub(value)
                    .ok_or(TokenError::InsufficientAllowance {
                        owner: from,
                        spender,
                        amount: value,
                    })?;
            self.allowances.insert((from, spender), remaining);
        }
        self.transfer(from, to, value)
    }
}
