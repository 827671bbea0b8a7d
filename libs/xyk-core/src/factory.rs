//! Factory registry and deterministic pair addressing
//!
//! The registry owns the symmetric token-pair → pair-address map, the
//! creation-ordered pair list, and the protocol fee recipient/setter. Pair
//! addresses are not sequence numbers: they are a pure function of the factory
//! address, the canonical token ordering, and a fixed code fingerprint, so any
//! integrator can compute a pair's address off-line before it exists. The
//! derivation is exposed as the standalone [`pair_address`] function — the
//! single source of truth shared by the registry and external callers.

use std::collections::HashMap;

use ethers_core::types::{Address, H256};
use ethers_core::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::error::FactoryError;

/// Fingerprint of the pair implementation, the third input to the address
/// derivation. Bump the tag when the pair semantics change incompatibly.
pub fn pair_code_hash() -> H256 {
    H256::from(keccak256(b"xyk-pair/v1"))
}

/// Canonical ascending ordering of an asset pair, rejecting degenerate sets.
pub fn sort_assets(token_a: Address, token_b: Address) -> Result<(Address, Address), FactoryError> {
    if token_a == token_b {
        return Err(FactoryError::IdenticalAddresses);
    }
    if token_a.is_zero() || token_b.is_zero() {
        return Err(FactoryError::ZeroAddress);
    }
    if token_a < token_b {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

/// Deterministic pair address:
/// `keccak256(0xff ‖ factory ‖ keccak256(token0 ‖ token1) ‖ code_hash)[12..]`.
///
/// Accepts the tokens in either order; the salt always uses the canonical
/// ascending ordering.
pub fn pair_address(factory: Address, token_a: Address, token_b: Address) -> Address {
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    let mut packed = Vec::with_capacity(40);
    packed.extend_from_slice(token0.as_bytes());
    packed.extend_from_slice(token1.as_bytes());
    let salt = keccak256(packed);

    let mut preimage = Vec::with_capacity(1 + 20 + 32 + 32);
    preimage.push(0xff);
    preimage.extend_from_slice(factory.as_bytes());
    preimage.extend_from_slice(&salt);
    preimage.extend_from_slice(pair_code_hash().as_bytes());
    Address::from_slice(&keccak256(preimage)[12..])
}

/// The factory's registry state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    address: Address,
    fee_to: Address,
    fee_to_setter: Address,
    pairs: HashMap<(Address, Address), Address>,
    all_pairs: Vec<Address>,
}

impl Registry {
    /// Registry deployed at `address`, with fee collection disabled and
    /// `fee_to_setter` holding the configuration authority.
    pub fn new(address: Address, fee_to_setter: Address) -> Self {
        Self {
            address,
            fee_to: Address::zero(),
            fee_to_setter,
            pairs: HashMap::new(),
            all_pairs: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Protocol fee recipient; the zero address disables fee collection.
    pub fn fee_to(&self) -> Address {
        self.fee_to
    }

    pub fn fee_to_setter(&self) -> Address {
        self.fee_to_setter
    }

    /// Registered pair for an unordered asset set, in either argument order.
    pub fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Address> {
        let key = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        self.pairs.get(&key).copied()
    }

    pub fn all_pairs(&self) -> &[Address] {
        &self.all_pairs
    }

    pub fn all_pairs_length(&self) -> u64 {
        self.all_pairs.len() as u64
    }

    /// Record a newly deployed pair; returns the new list length.
    pub(crate) fn register(&mut self, token0: Address, token1: Address, pair: Address) -> u64 {
        self.pairs.insert((token0, token1), pair);
        self.all_pairs.push(pair);
        self.all_pairs_length()
    }

    pub(crate) fn set_fee_to(&mut self, caller: Address, fee_to: Address) -> Result<(), FactoryError> {
        if caller != self.fee_to_setter {
            return Err(FactoryError::Forbidden);
        }
        self.fee_to = fee_to;
        Ok(())
    }

    pub(crate) fn set_fee_to_setter(
        &mut self,
        caller: Address,
        fee_to_setter: Address,
    ) -> Result<(), FactoryError> {
        if caller != self.fee_to_setter {
            return Err(FactoryError::Forbidden);
        }
        self.fee_to_setter = fee_to_setter;
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
    fn sorting_validates_and_orders() {
        assert_eq!(sort_assets(addr(2), addr(1)).unwrap(), (addr(1), addr(2)));
        assert_eq!(sort_assets(addr(1), addr(2)).unwrap(), (addr(1), addr(2)));
        assert_eq!(
            sort_assets(addr(1), addr(1)),
            Err(FactoryError::IdenticalAddresses)
        );
        assert_eq!(
            sort_assets(Address::zero(), addr(1)),
            Err(FactoryError::ZeroAddress)
        );
    }

    #[test]
    fn derivation_is_order_independent() {
        let factory = addr(99);
        let forward = pair_address(factory, addr(1), addr(2));
        let reverse = pair_address(factory, addr(2), addr(1));
        assert_eq!(forward, reverse);
        // and distinct inputs land on distinct addresses
        assert_ne!(forward, pair_address(factory, addr(1), addr(3)));
        assert_ne!(forward, pair_address(addr(98), addr(1), addr(2)));
    }

    #[test]
    fn registry_is_symmetric() {
        let mut registry = Registry::new(addr(99), addr(5));
        let pair = pair_address(addr(99), addr(1), addr(2));
        registry.register(addr(1), addr(2), pair);
        assert_eq!(registry.get_pair(addr(1), addr(2)), Some(pair));
        assert_eq!(registry.get_pair(addr(2), addr(1)), Some(pair));
        assert_eq!(registry.get_pair(addr(1), addr(3)), None);
        assert_eq!(registry.all_pairs(), &[pair]);
    }

    #[test]
    fn fee_setter_is_exclusive() {
        let mut registry = Registry::new(addr(99), addr(5));
        assert_eq!(
            registry.set_fee_to(addr(6), addr(7)),
            Err(FactoryError::Forbidden)
        );
        registry.set_fee_to(addr(5), addr(7)).unwrap();
        assert_eq!(registry.fee_to(), addr(7));

        registry.set_fee_to_setter(addr(5), addr(6)).unwrap();
        // authority moved: the old setter is now rejected
        assert_eq!(
            registry.set_fee_to_setter(addr(5), addr(5)),
            Err(FactoryError::Forbidden)
        );
    }
}
