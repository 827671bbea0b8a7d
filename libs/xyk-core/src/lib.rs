//! # xyk-core - Constant-Product Exchange Core
//!
//! ## Purpose
//!
//! The complete automated-market-maker core: pairs of fungible-token reserves
//! traded under the constant-product rule, a factory that deterministically
//! derives and registers one pair per unordered asset set, and a transferable
//! liquidity-share token with off-line-signed approval support. No central
//! operator: any caller can swap, provide or withdraw liquidity, and read
//! spot or time-weighted prices.
//!
//! ## Architecture Role
//!
//! ```text
//! Caller → [Factory Registry] → deterministic pair address
//!    ↓            ↓
//! asset transfer into pair custody
//!    ↓
//! [Exchange::mint/swap/burn] → balance-inference → reserve update
//!    ↓            ↓                    ↓
//! share ledger  K-invariant check   price accumulators + event log
//! ```
//!
//! The [`Exchange`] owns all mutable state and executes every call atomically;
//! pairs infer transferred amounts by reading their own custody balances
//! (never trusting a caller-declared amount), so fee-on-transfer assets are
//! handled correctly by construction.

pub mod asset;
pub mod config;
pub mod error;
pub mod events;
pub mod exchange;
pub mod factory;
pub mod ledger;
pub mod oracle;
pub mod pair;

pub use asset::{Asset, TokenLedger};
pub use config::ExchangeConfig;
pub use error::{DexError, FactoryError, PairError, TokenError};
pub use events::{Event, LogEntry};
pub use exchange::{Exchange, SwapCallback};
pub use factory::{pair_address, pair_code_hash, sort_assets, Registry};
pub use ledger::{permit_typehash, ShareLedger, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
pub use oracle::PriceOracle;
pub use pair::{Pair, MAX_RESERVE, MINIMUM_LIQUIDITY};

pub use ethers_core::types::{Address, Signature, H256, U256};
