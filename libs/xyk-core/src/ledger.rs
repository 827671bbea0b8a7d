//! Liquidity-share ledger with off-line-signed approvals
//!
//! Each pair embeds one [`ShareLedger`]: fungible balance/allowance
//! bookkeeping for the pair's own liquidity token, plus the domain-separated
//! signed-approval scheme. The digest follows the standard EIP-712 layout,
//! so any standard wallet can produce a valid
//! approval signature: `0x19 0x01 ‖ domain ‖ hash(Permit(...))` with a domain
//! binding {token name, version "1", chain id, pair address} and a message
//! binding {owner, spender, value, current nonce, deadline}.
//!
//! Replay protection: the digest commits to the owner's current nonce, and a
//! successful approval increments it, so an identical payload can never be
//! accepted twice.

use std::collections::HashMap;

use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, RecoveryMessage, Signature, H256, U256};
use ethers_core::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::error::PairError;

/// Share token name, also bound into the permit domain separator.
pub const TOKEN_NAME: &str = "XYK Liquidity";
/// Share token ticker.
pub const TOKEN_SYMBOL: &str = "XYK-LP";
/// Share token display precision.
pub const TOKEN_DECIMALS: u8 = 18;

/// `keccak256("Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)")`
pub fn permit_typehash() -> H256 {
    H256::from(keccak256(
        b"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)",
    ))
}

fn domain_typehash() -> H256 {
    H256::from(keccak256(
        b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
    ))
}

/// Balance, allowance, and nonce bookkeeping for one pair's share token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, U256>,
    total_supply: U256,
    domain_separator: H256,
}

impl ShareLedger {
    /// Empty ledger whose signed approvals are bound to `chain_id` and the
    /// pair's own address.
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        let domain_separator = H256::from(keccak256(encode(&[
            Token::FixedBytes(domain_typehash().as_bytes().to_vec()),
            Token::FixedBytes(keccak256(TOKEN_NAME.as_bytes()).to_vec()),
            Token::FixedBytes(keccak256(b"1").to_vec()),
            Token::Uint(U256::from(chain_id)),
            Token::Address(verifying_contract),
        ])));
        Self {
            balances: HashMap::new(),
            allowances: HashMap::new(),
            nonces: HashMap::new(),
            total_supply: U256::zero(),
            domain_separator,
        }
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn nonce_of(&self, owner: Address) -> U256 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    pub fn domain_separator(&self) -> H256 {
        self.domain_separator
    }

    /// Issue `value` new shares to `to`.
    pub(crate) fn mint(&mut self, to: Address, value: U256) {
        self.total_supply = self.total_supply + value;
        let balance = self.balance_of(to);
        self.balances.insert(to, balance + value);
    }

    /// Destroy `value` shares held by `from`.
    pub(crate) fn burn(&mut self, from: Address, value: U256) -> Result<(), PairError> {
        let balance = self.balance_of(from);
        let remaining = balance.checked_sub(value).ok_or(PairError::BalanceUnderflow)?;
        self.balances.insert(from, remaining);
        self.total_supply = self.total_supply - value;
        Ok(())
    }

    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), PairError> {
        let balance = self.balance_of(from);
        let remaining = balance.checked_sub(value).ok_or(PairError::BalanceUnderflow)?;
        self.balances.insert(from, remaining);
        let target = self.balance_of(to);
        self.balances.insert(to, target + value);
        Ok(())
    }

    pub(crate) fn approve(&mut self, owner: Address, spender: Address, value: U256) {
        self.allowances.insert((owner, spender), value);
    }

    /// Consume `value` of the allowance granted by `owner` to `spender`.
    /// An unlimited (`U256::MAX`) allowance is never decremented.
    pub(crate) fn spend_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<(), PairError> {
        let allowance = self.allowance(owner, spender);
        if allowance != U256::MAX {
            let remaining = allowance
                .checked_sub(value)
                .ok_or(PairError::AllowanceUnderflow)?;
            self.allowances.insert((owner, spender), remaining);
        }
        Ok(())
    }

    /// Digest the owner must sign to approve `spender` for `value` until
    /// `deadline`, under the owner's current nonce.
    pub fn permit_digest(
        &self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
    ) -> H256 {
        let struct_hash = keccak256(encode(&[
            Token::FixedBytes(permit_typehash().as_bytes().to_vec()),
            Token::Address(owner),
            Token::Address(spender),
            Token::Uint(value),
            Token::Uint(self.nonce_of(owner)),
            Token::Uint(deadline),
        ]));
        let mut preimage = Vec::with_capacity(2 + 32 + 32);
        preimage.extend_from_slice(&[0x19, 0x01]);
        preimage.extend_from_slice(self.domain_separator.as_bytes());
        preimage.extend_from_slice(&struct_hash);
        H256::from(keccak256(preimage))
    }

    /// Verify a signed approval and set the allowance.
    ///
    /// `now` is the current ledger time; a digest signed for an earlier nonce
    /// or a different field set recovers to the wrong address and is rejected.
    pub(crate) fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &Signature,
        now: u64,
    ) -> Result<(), PairError> {
        if U256::from(now) > deadline {
            return Err(PairError::Expired);
        }
        let digest = self.permit_digest(owner, spender, value, deadline);
        let recovered = signature
            .recover(RecoveryMessage::Hash(digest))
            .map_err(|_| PairError::InvalidSignature)?;
        if recovered.is_zero() || recovered != owner {
            return Err(PairError::InvalidSignature);
        }
        let nonce = self.nonce_of(owner);
        self.nonces.insert(owner, nonce + U256::one());
        self.approve(owner, spender, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let mut ledger = ShareLedger::new(1, addr(9));
        ledger.mint(addr(1), U256::from(500u64));
        ledger.mint(addr(2), U256::from(300u64));
        assert_eq!(ledger.total_supply(), U256::from(800u64));

        ledger.burn(addr(1), U256::from(200u64)).unwrap();
        assert_eq!(ledger.balance_of(addr(1)), U256::from(300u64));
        assert_eq!(ledger.total_supply(), U256::from(600u64));

        let err = ledger.burn(addr(2), U256::from(301u64)).unwrap_err();
        assert_eq!(err, PairError::BalanceUnderflow);
    }

    #[test]
    fn digest_changes_with_nonce() {
        let mut ledger = ShareLedger::new(1, addr(9));
        let before = ledger.permit_digest(addr(1), addr(2), U256::from(7u64), U256::MAX);
        ledger.nonces.insert(addr(1), U256::one());
        let after = ledger.permit_digest(addr(1), addr(2), U256::from(7u64), U256::MAX);
        assert_ne!(before, after);
    }

    #[test]
    fn domain_separator_binds_address_and_chain() {
        let a = ShareLedger::new(1, addr(9));
        let b = ShareLedger::new(1, addr(10));
        let c = ShareLedger::new(2, addr(9));
        assert_ne!(a.domain_separator(), b.domain_separator());
        assert_ne!(a.domain_separator(), c.domain_separator());
    }
}
