//! Error types for the exchange core
//!
//! One enum per component, composed into a top-level [`DexError`] via `#[from]`
//! conversions. Every failure aborts the whole call: the execution wrapper in
//! [`crate::exchange`] discards all partial state on any `Err`.

use ethers_core::types::{Address, U256};
use thiserror::Error;

/// Failures raised by an external asset ledger
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Holder balance is below the requested transfer amount
    #[error("balance of {holder} is below the requested {amount}")]
    InsufficientBalance { holder: Address, amount: U256 },

    /// Spender allowance is below the requested transfer amount
    #[error("allowance granted by {owner} to {spender} is below the requested {amount}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        amount: U256,
    },
}

/// Failures raised by pair operations and the embedded share ledger
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairError {
    /// A mint/burn/swap/sync/skim is already in flight on this pair
    #[error("pair is locked by an in-flight operation")]
    Locked,

    /// Second initialization, or initialization by anyone but the factory
    #[error("pair may only be initialized once, by its factory")]
    ForbiddenInit,

    /// Deposit too small (or imbalanced) to issue any shares
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// Share amount too small to redeem a positive amount of both assets
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Requested output is zero, exceeds reserves, or a custody transfer was rejected
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Swap recipient collides with one of the pool assets
    #[error("recipient must differ from both pool assets")]
    InvalidRecipient,

    /// No input was delivered before the invariant check
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Fee-adjusted constant product decreased
    #[error("constant-product invariant violated")]
    InvariantViolation,

    /// A custody balance does not fit the 112-bit reserve range
    #[error("custody balance exceeds the 112-bit reserve range")]
    ReserveOverflow,

    /// Callback data supplied without a callback capability
    #[error("callback data supplied without a callback capability")]
    MissingCallback,

    /// Share transfer or burn exceeding the holder's balance
    #[error("share balance underflow")]
    BalanceUnderflow,

    /// Share transfer-from exceeding the granted allowance
    #[error("share allowance underflow")]
    AllowanceUnderflow,

    /// Signed approval submitted after its deadline
    #[error("signed approval expired")]
    Expired,

    /// Signature does not recover to the owner (or replays a spent nonce)
    #[error("invalid signed approval")]
    InvalidSignature,
}

/// Failures raised by the factory registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Both sides of the requested pair are the same asset
    #[error("identical asset addresses")]
    IdenticalAddresses,

    /// The zero address is not a valid asset
    #[error("zero address is not a valid asset")]
    ZeroAddress,

    /// A pair for this asset set already exists (either ordering)
    #[error("pair already exists")]
    PairExists,

    /// Caller is not the current fee setter
    #[error("caller is not the fee setter")]
    Forbidden,
}

/// Top-level error for every exchange call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DexError {
    #[error(transparent)]
    Pair(#[from] PairError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Token(#[from] TokenError),

    /// No asset ledger registered at this address
    #[error("no asset ledger registered at {0}")]
    UnknownAsset(Address),

    /// No pair deployed at this address
    #[error("no pair deployed at {0}")]
    UnknownPair(Address),
}
