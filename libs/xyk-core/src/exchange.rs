//! # Exchange - Atomic Execution Environment for the AMM Core
//!
//! ## Purpose
//!
//! Single owner of all mutable exchange state: asset ledgers, the factory
//! registry, every deployed pair, the clock, and the observable event log.
//! Every public state-changing call executes as one atomic unit — it either
//! completes fully or is rejected with all partial effects (events included)
//! discarded — which is what makes the optimistic-transfer swap protocol safe
//! to compose.
//!
//! ## Integration Points
//!
//! - **Input Sources**: callers (wallets, routers, tests) invoking factory,
//!   pair, and share-token operations with an explicit sender identity
//! - **Output Destinations**: the ordered event log ([`LogEntry`]) drained by
//!   integrators, plus bincode snapshots for persistence
//! - **Callbacks**: flash-swap recipients participate through the
//!   [`SwapCallback`] capability passed per call, never through stored state
//!
//! ## Concurrency Model
//!
//! Calls are serialized; there is no internal parallelism. The only point
//! where externally-supplied logic runs mid-operation is the swap callback,
//! and the per-pair reentrancy flag holds for the full duration of
//! mint/burn/swap/sync/skim, so a nested attempt on the same pair fails with
//! `Locked` without affecting the outer call.

use std::collections::HashMap;

use ethers_core::types::{Address, Signature, H256, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use xyk_math::{integer_sqrt, FEE_SCALE};

use crate::asset::{Asset, TokenLedger};
use crate::config::ExchangeConfig;
use crate::error::{DexError, PairError, TokenError};
use crate::events::{Event, LogEntry};
use crate::factory::{pair_address, sort_assets, Registry};
use crate::pair::{invariant_holds, Pair, MINIMUM_LIQUIDITY};

/// Capability handed to [`Exchange::swap`] so a flash-swap recipient can act
/// on the optimistically delivered funds and source the input within the same
/// call. Invoked iff the callback data is non-empty.
pub trait SwapCallback {
    fn on_swap(
        &mut self,
        exchange: &mut Exchange,
        sender: Address,
        amount0_out: U256,
        amount1_out: U256,
        data: &[u8],
    ) -> Result<(), DexError>;
}

/// The exchange state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    config: ExchangeConfig,
    /// Current ledger time in seconds; pairs observe it truncated to 32 bits.
    now: u64,
    assets: HashMap<Address, TokenLedger>,
    registry: Registry,
    pairs: HashMap<Address, Pair>,
    events: Vec<LogEntry>,
}

impl Exchange {
    pub fn new(config: ExchangeConfig, factory_address: Address, fee_to_setter: Address) -> Self {
        Self {
            config,
            now: 0,
            assets: HashMap::new(),
            registry: Registry::new(factory_address, fee_to_setter),
            pairs: HashMap::new(),
            events: Vec::new(),
        }
    }

    // ---- clock ----------------------------------------------------------

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn set_timestamp(&mut self, now: u64) {
        self.now = now;
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.now += seconds;
    }

    // ---- assets ---------------------------------------------------------

    /// Make an asset ledger available at `address`. Replaces any previous
    /// ledger at the same address.
    pub fn register_asset(&mut self, address: Address, ledger: TokenLedger) {
        self.assets.insert(address, ledger);
    }

    pub fn asset(&self, address: Address) -> Result<&TokenLedger, DexError> {
        self.assets
            .get(&address)
            .ok_or(DexError::UnknownAsset(address))
    }

    pub fn asset_balance(&self, token: Address, holder: Address) -> Result<U256, DexError> {
        Ok(self.asset(token)?.balance_of(holder))
    }

    /// Direct asset transfer with `sender` as the paying party.
    pub fn transfer_asset(
        &mut self,
        sender: Address,
        token: Address,
        to: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.transact(|ex| ex.move_asset(token, sender, to, value).map_err(Into::into))
    }

    pub fn approve_asset(
        &mut self,
        sender: Address,
        token: Address,
        spender: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            let ledger = ex
                .assets
                .get_mut(&token)
                .ok_or(DexError::UnknownAsset(token))?;
            ledger.approve(sender, spender, value);
            ex.emit(
                token,
                Event::Approval {
                    owner: sender,
                    spender,
                    value,
                },
            );
            Ok(())
        })
    }

    pub fn transfer_asset_from(
        &mut self,
        sender: Address,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            let ledger = ex
                .assets
                .get_mut(&token)
                .ok_or(DexError::UnknownAsset(token))?;
            ledger.transfer_from(sender, from, to, value)?;
            ex.emit(token, Event::Transfer { from, to, value });
            Ok(())
        })
    }

    // ---- events & persistence ------------------------------------------

    pub fn events(&self) -> &[LogEntry] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn restore(snapshot: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(snapshot)
    }

    // ---- factory --------------------------------------------------------

    pub fn fee_to(&self) -> Address {
        self.registry.fee_to()
    }

    pub fn fee_to_setter(&self) -> Address {
        self.registry.fee_to_setter()
    }

    pub fn set_fee_to(&mut self, sender: Address, fee_to: Address) -> Result<(), DexError> {
        self.transact(|ex| ex.registry.set_fee_to(sender, fee_to).map_err(Into::into))
    }

    pub fn set_fee_to_setter(
        &mut self,
        sender: Address,
        fee_to_setter: Address,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            ex.registry
                .set_fee_to_setter(sender, fee_to_setter)
                .map_err(Into::into)
        })
    }

    pub fn factory_address(&self) -> Address {
        self.registry.address()
    }

    pub fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Address> {
        self.registry.get_pair(token_a, token_b)
    }

    pub fn all_pairs(&self) -> &[Address] {
        self.registry.all_pairs()
    }

    pub fn all_pairs_length(&self) -> u64 {
        self.registry.all_pairs_length()
    }

    /// Deploy and register the pair for an unordered asset set at its
    /// deterministically derived address.
    pub fn create_pair(&mut self, token_a: Address, token_b: Address) -> Result<Address, DexError> {
        self.transact(|ex| {
            let (token0, token1) = sort_assets(token_a, token_b)?;
            if ex.registry.get_pair(token0, token1).is_some() {
                return Err(crate::error::FactoryError::PairExists.into());
            }
            let factory = ex.registry.address();
            let address = pair_address(factory, token0, token1);
            let mut pair = Pair::new(factory, address, ex.config.chain_id);
            pair.initialize(factory, token0, token1)?;
            ex.pairs.insert(address, pair);
            let pair_count = ex.registry.register(token0, token1, address);
            ex.emit(
                factory,
                Event::PairCreated {
                    token0,
                    token1,
                    pair: address,
                    pair_count,
                },
            );
            info!(%token0, %token1, pair = %address, pair_count, "pair created");
            Ok(address)
        })
    }

    // ---- pair reads -----------------------------------------------------

    pub fn pair(&self, address: Address) -> Result<&Pair, DexError> {
        self.pairs.get(&address).ok_or(DexError::UnknownPair(address))
    }

    pub fn get_reserves(&self, pair: Address) -> Result<(u128, u128, u32), DexError> {
        Ok(self.pair(pair)?.reserves())
    }

    pub fn price0_cumulative_last(&self, pair: Address) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.oracle().price0_cumulative())
    }

    pub fn price1_cumulative_last(&self, pair: Address) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.oracle().price1_cumulative())
    }

    pub fn k_last(&self, pair: Address) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.k_last())
    }

    // ---- pair operations ------------------------------------------------

    /// Issue liquidity shares for the assets transferred to the pair since
    /// its last reserve snapshot. Returns the issued share amount.
    pub fn mint(&mut self, sender: Address, pair: Address, to: Address) -> Result<U256, DexError> {
        self.transact(|ex| ex.mint_locked(sender, pair, to))
    }

    /// Redeem the shares currently held by the pair itself for a pro-rata
    /// slice of both custody balances. Returns the two amounts paid out.
    pub fn burn(
        &mut self,
        sender: Address,
        pair: Address,
        to: Address,
    ) -> Result<(U256, U256), DexError> {
        self.transact(|ex| ex.burn_locked(sender, pair, to))
    }

    /// Exchange reserves: optimistically pay out the requested amounts,
    /// optionally hand control to `callback` (iff `data` is non-empty), then
    /// verify the fee-adjusted constant product against the delivered input.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        sender: Address,
        pair: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        data: &[u8],
        callback: Option<&mut dyn SwapCallback>,
    ) -> Result<(), DexError> {
        self.transact(move |ex| {
            ex.swap_locked(sender, pair, amount0_out, amount1_out, to, data, callback)
        })
    }

    /// Force reserves to match custody balances exactly.
    pub fn sync(&mut self, pair: Address) -> Result<(), DexError> {
        self.transact(|ex| {
            {
                let p = ex.pair_mut(pair)?;
                p.lock()?;
            }
            let (token0, token1) = ex.pair_tokens(pair)?;
            let balance0 = ex.asset_balance(token0, pair)?;
            let balance1 = ex.asset_balance(token1, pair)?;
            ex.update_reserves(pair, balance0, balance1)?;
            ex.pair_mut(pair)?.unlock();
            Ok(())
        })
    }

    /// Pay custody in excess of the recorded reserves out to `to`, leaving
    /// reserves untouched. The counterpart of [`Exchange::sync`].
    pub fn skim(&mut self, pair: Address, to: Address) -> Result<(), DexError> {
        self.transact(|ex| {
            {
                let p = ex.pair_mut(pair)?;
                p.lock()?;
            }
            let (token0, token1) = ex.pair_tokens(pair)?;
            let (reserve0, reserve1, _) = ex.pair(pair)?.reserves();
            let excess0 = ex
                .asset_balance(token0, pair)?
                .checked_sub(U256::from(reserve0))
                .ok_or(PairError::InsufficientLiquidity)?;
            let excess1 = ex
                .asset_balance(token1, pair)?
                .checked_sub(U256::from(reserve1))
                .ok_or(PairError::InsufficientLiquidity)?;
            if !excess0.is_zero() {
                ex.pay_out(token0, pair, to, excess0)?;
            }
            if !excess1.is_zero() {
                ex.pay_out(token1, pair, to, excess1)?;
            }
            ex.pair_mut(pair)?.unlock();
            Ok(())
        })
    }

    // ---- share token surface -------------------------------------------

    pub fn share_total_supply(&self, pair: Address) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.ledger().total_supply())
    }

    pub fn share_balance_of(&self, pair: Address, holder: Address) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.ledger().balance_of(holder))
    }

    pub fn share_allowance(
        &self,
        pair: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.ledger().allowance(owner, spender))
    }

    pub fn nonce_of(&self, pair: Address, owner: Address) -> Result<U256, DexError> {
        Ok(self.pair(pair)?.ledger().nonce_of(owner))
    }

    pub fn domain_separator(&self, pair: Address) -> Result<H256, DexError> {
        Ok(self.pair(pair)?.ledger().domain_separator())
    }

    /// Digest an owner signs to authorize a spender off-line, under the
    /// owner's current nonce.
    pub fn permit_digest(
        &self,
        pair: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
    ) -> Result<H256, DexError> {
        Ok(self
            .pair(pair)?
            .ledger()
            .permit_digest(owner, spender, value, deadline))
    }

    pub fn share_transfer(
        &mut self,
        sender: Address,
        pair: Address,
        to: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            ex.pair_mut(pair)?.ledger_mut().transfer(sender, to, value)?;
            ex.emit(
                pair,
                Event::Transfer {
                    from: sender,
                    to,
                    value,
                },
            );
            Ok(())
        })
    }

    pub fn share_approve(
        &mut self,
        sender: Address,
        pair: Address,
        spender: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            ex.pair_mut(pair)?.ledger_mut().approve(sender, spender, value);
            ex.emit(
                pair,
                Event::Approval {
                    owner: sender,
                    spender,
                    value,
                },
            );
            Ok(())
        })
    }

    pub fn share_transfer_from(
        &mut self,
        sender: Address,
        pair: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            let ledger = ex.pair_mut(pair)?.ledger_mut();
            ledger.spend_allowance(from, sender, value)?;
            ledger.transfer(from, to, value)?;
            ex.emit(pair, Event::Transfer { from, to, value });
            Ok(())
        })
    }

    /// Set an allowance authorized purely by the owner's signature over the
    /// pair's domain-separated digest.
    pub fn permit(
        &mut self,
        pair: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &Signature,
    ) -> Result<(), DexError> {
        self.transact(|ex| {
            let now = ex.now;
            ex.pair_mut(pair)?
                .ledger_mut()
                .permit(owner, spender, value, deadline, signature, now)?;
            ex.emit(
                pair,
                Event::Approval {
                    owner,
                    spender,
                    value,
                },
            );
            Ok(())
        })
    }

    // ---- internals ------------------------------------------------------

    /// Run `op` all-or-nothing: on error, restore the pre-call state
    /// (event log included) and surface the error unchanged.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, DexError>,
    ) -> Result<T, DexError> {
        let checkpoint = self.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                *self = checkpoint;
                Err(error)
            }
        }
    }

    fn emit(&mut self, emitter: Address, event: Event) {
        self.events.push(LogEntry { emitter, event });
    }

    fn pair_mut(&mut self, address: Address) -> Result<&mut Pair, DexError> {
        self.pairs
            .get_mut(&address)
            .ok_or(DexError::UnknownPair(address))
    }

    fn pair_tokens(&self, pair: Address) -> Result<(Address, Address), DexError> {
        let p = self.pair(pair)?;
        Ok((p.token0(), p.token1()))
    }

    fn move_asset(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), DexError> {
        let ledger = self
            .assets
            .get_mut(&token)
            .ok_or(DexError::UnknownAsset(token))?;
        ledger.transfer(from, to, value).map_err(DexError::Token)?;
        self.emit(token, Event::Transfer { from, to, value });
        Ok(())
    }

    /// Asset transfer out of pair custody; a rejection by the asset surfaces
    /// as insufficient liquidity.
    fn pay_out(
        &mut self,
        token: Address,
        pair: Address,
        to: Address,
        value: U256,
    ) -> Result<(), DexError> {
        self.move_asset(token, pair, to, value).map_err(|e| match e {
            DexError::Token(TokenError::InsufficientBalance { .. }) => {
                PairError::InsufficientLiquidity.into()
            }
            other => other,
        })
    }

    /// Resync reserves to the given custody balances, advancing the oracle,
    /// and emit the reserve-sync event.
    fn update_reserves(
        &mut self,
        pair: Address,
        balance0: U256,
        balance1: U256,
    ) -> Result<(u128, u128), DexError> {
        let now32 = self.now as u32;
        let p = self.pair_mut(pair)?;
        let (reserve0, reserve1) = p.apply_custody(balance0, balance1, now32)?;
        self.emit(pair, Event::Sync { reserve0, reserve1 });
        Ok((reserve0, reserve1))
    }

    /// Mint the protocol's share of invariant growth since the last liquidity
    /// event, if fee collection is enabled. Returns whether it is enabled.
    fn mint_protocol_fee(&mut self, pair: Address) -> Result<bool, DexError> {
        let fee_to = self.registry.fee_to();
        let fee_on = !fee_to.is_zero();
        let weight = U256::from(self.config.protocol_fee_weight);

        let p = self.pair_mut(pair)?;
        let k_last = p.k_last();
        if fee_on {
            if !k_last.is_zero() {
                let (reserve0, reserve1, _) = p.reserves();
                let root_k = integer_sqrt(U256::from(reserve0) * U256::from(reserve1));
                let root_k_last = integer_sqrt(k_last);
                if root_k > root_k_last {
                    let numerator = p.ledger().total_supply() * (root_k - root_k_last);
                    let denominator = root_k * weight + root_k_last;
                    let liquidity = numerator / denominator;
                    if !liquidity.is_zero() {
                        p.ledger_mut().mint(fee_to, liquidity);
                        self.emit(
                            pair,
                            Event::Transfer {
                                from: Address::zero(),
                                to: fee_to,
                                value: liquidity,
                            },
                        );
                    }
                }
            }
        } else if !k_last.is_zero() {
            p.set_k_last(U256::zero());
        }
        Ok(fee_on)
    }

    fn mint_locked(&mut self, sender: Address, pair: Address, to: Address) -> Result<U256, DexError> {
        self.pair_mut(pair)?.lock()?;
        let (token0, token1) = self.pair_tokens(pair)?;
        let (reserve0, reserve1, _) = self.pair(pair)?.reserves();

        let balance0 = self.asset_balance(token0, pair)?;
        let balance1 = self.asset_balance(token1, pair)?;
        let amount0 = balance0
            .checked_sub(U256::from(reserve0))
            .ok_or(PairError::InsufficientLiquidityMinted)?;
        let amount1 = balance1
            .checked_sub(U256::from(reserve1))
            .ok_or(PairError::InsufficientLiquidityMinted)?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(PairError::InsufficientLiquidityMinted.into());
        }

        let fee_on = self.mint_protocol_fee(pair)?;
        let total_supply = self.pair(pair)?.ledger().total_supply();

        let liquidity = if total_supply.is_zero() {
            let product = amount0
                .checked_mul(amount1)
                .ok_or(PairError::ReserveOverflow)?;
            let issued = integer_sqrt(product);
            let liquidity = issued
                .checked_sub(U256::from(MINIMUM_LIQUIDITY))
                .filter(|l| !l.is_zero())
                .ok_or(PairError::InsufficientLiquidityMinted)?;
            // the minimum is locked forever at the zero address
            self.pair_mut(pair)?
                .ledger_mut()
                .mint(Address::zero(), U256::from(MINIMUM_LIQUIDITY));
            self.emit(
                pair,
                Event::Transfer {
                    from: Address::zero(),
                    to: Address::zero(),
                    value: U256::from(MINIMUM_LIQUIDITY),
                },
            );
            liquidity
        } else {
            // proportional to the scarcer contribution, so an imbalanced
            // deposit cannot dilute existing holders
            let by0 = amount0
                .checked_mul(total_supply)
                .ok_or(PairError::ReserveOverflow)?
                / U256::from(reserve0);
            let by1 = amount1
                .checked_mul(total_supply)
                .ok_or(PairError::ReserveOverflow)?
                / U256::from(reserve1);
            let liquidity = by0.min(by1);
            if liquidity.is_zero() {
                return Err(PairError::InsufficientLiquidityMinted.into());
            }
            liquidity
        };

        self.pair_mut(pair)?.ledger_mut().mint(to, liquidity);
        self.emit(
            pair,
            Event::Transfer {
                from: Address::zero(),
                to,
                value: liquidity,
            },
        );

        let (reserve0, reserve1) = self.update_reserves(pair, balance0, balance1)?;
        if fee_on {
            self.pair_mut(pair)?
                .set_k_last(U256::from(reserve0) * U256::from(reserve1));
        }
        self.emit(
            pair,
            Event::Mint {
                sender,
                amount0,
                amount1,
            },
        );
        debug!(%pair, %amount0, %amount1, %liquidity, "liquidity minted");
        self.pair_mut(pair)?.unlock();
        Ok(liquidity)
    }

    fn burn_locked(
        &mut self,
        sender: Address,
        pair: Address,
        to: Address,
    ) -> Result<(U256, U256), DexError> {
        self.pair_mut(pair)?.lock()?;
        let (token0, token1) = self.pair_tokens(pair)?;

        let balance0 = self.asset_balance(token0, pair)?;
        let balance1 = self.asset_balance(token1, pair)?;
        let liquidity = self.pair(pair)?.ledger().balance_of(pair);

        let fee_on = self.mint_protocol_fee(pair)?;
        let total_supply = self.pair(pair)?.ledger().total_supply();
        if total_supply.is_zero() {
            return Err(PairError::InsufficientLiquidityBurned.into());
        }

        // pro-rata of actual custody, not nominal reserves, so direct
        // donations are distributed rather than stranded
        let amount0 = liquidity * balance0 / total_supply;
        let amount1 = liquidity * balance1 / total_supply;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(PairError::InsufficientLiquidityBurned.into());
        }

        self.pair_mut(pair)?.ledger_mut().burn(pair, liquidity)?;
        self.emit(
            pair,
            Event::Transfer {
                from: pair,
                to: Address::zero(),
                value: liquidity,
            },
        );
        self.pay_out(token0, pair, to, amount0)?;
        self.pay_out(token1, pair, to, amount1)?;

        let balance0 = self.asset_balance(token0, pair)?;
        let balance1 = self.asset_balance(token1, pair)?;
        let (reserve0, reserve1) = self.update_reserves(pair, balance0, balance1)?;
        if fee_on {
            self.pair_mut(pair)?
                .set_k_last(U256::from(reserve0) * U256::from(reserve1));
        }
        self.emit(
            pair,
            Event::Burn {
                sender,
                amount0,
                amount1,
                to,
            },
        );
        debug!(%pair, %amount0, %amount1, %liquidity, "liquidity burned");
        self.pair_mut(pair)?.unlock();
        Ok((amount0, amount1))
    }

    #[allow(clippy::too_many_arguments)]
    fn swap_locked(
        &mut self,
        sender: Address,
        pair: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        data: &[u8],
        callback: Option<&mut dyn SwapCallback>,
    ) -> Result<(), DexError> {
        self.pair_mut(pair)?.lock()?;
        let (token0, token1) = self.pair_tokens(pair)?;
        let (reserve0, reserve1, _) = self.pair(pair)?.reserves();

        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(PairError::InsufficientLiquidity.into());
        }
        if amount0_out >= U256::from(reserve0) || amount1_out >= U256::from(reserve1) {
            return Err(PairError::InsufficientLiquidity.into());
        }
        if to == token0 || to == token1 {
            return Err(PairError::InvalidRecipient.into());
        }

        // phase 1: provisional effects, then hand control to the recipient
        if !amount0_out.is_zero() {
            self.pay_out(token0, pair, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            self.pay_out(token1, pair, to, amount1_out)?;
        }
        if !data.is_empty() {
            let callback = callback.ok_or(PairError::MissingCallback)?;
            callback.on_swap(self, sender, amount0_out, amount1_out, data)?;
        }

        // phase 2: infer delivered input from custody and verify the invariant
        let balance0 = self.asset_balance(token0, pair)?;
        let balance1 = self.asset_balance(token1, pair)?;
        let amount0_in = balance0
            .checked_sub(U256::from(reserve0) - amount0_out)
            .unwrap_or_default();
        let amount1_in = balance1
            .checked_sub(U256::from(reserve1) - amount1_out)
            .unwrap_or_default();
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(PairError::InsufficientInputAmount.into());
        }
        debug_assert!(u64::from(self.config.swap_fee_per_mille) < u64::from(FEE_SCALE));
        if !invariant_holds(
            balance0,
            balance1,
            amount0_in,
            amount1_in,
            reserve0,
            reserve1,
            self.config.swap_fee_per_mille,
        )? {
            return Err(PairError::InvariantViolation.into());
        }

        self.update_reserves(pair, balance0, balance1)?;
        self.emit(
            pair,
            Event::Swap {
                sender,
                amount0_in,
                amount1_in,
                amount0_out,
                amount1_out,
                to,
            },
        );
        debug!(%pair, %amount0_in, %amount1_in, %amount0_out, %amount1_out, "swap");
        self.pair_mut(pair)?.unlock();
        Ok(())
    }
}
