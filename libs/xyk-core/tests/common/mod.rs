//! Shared fixtures for the exchange integration tests
#![allow(dead_code)]

use ethers_core::types::{Address, U256};
use xyk_core::{Exchange, ExchangeConfig, TokenLedger};

pub const START_TIME: u64 = 1_600_000_000;

/// Route engine logs through `RUST_LOG` during test runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

pub fn e18(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

pub fn banker() -> Address {
    addr(0xB0B)
}

pub fn factory() -> Address {
    addr(0xFAC)
}

/// A funded exchange with one registered pair, tokens in canonical order.
pub struct PairFixture {
    pub exchange: Exchange,
    pub token0: Address,
    pub token1: Address,
    pub pair: Address,
}

impl PairFixture {
    /// Fresh exchange, two assets of 10000e18 supply held by the banker, and
    /// the pair for them already created.
    pub fn new() -> Self {
        Self::with_config(ExchangeConfig::default())
    }

    pub fn with_config(config: ExchangeConfig) -> Self {
        init_tracing();
        let mut exchange = Exchange::new(config, factory(), banker());
        exchange.set_timestamp(START_TIME);

        let token_a = addr(0xAAAA);
        let token_b = addr(0xBBBB);
        exchange.register_asset(token_a, TokenLedger::new(e18(10_000), banker()));
        exchange.register_asset(token_b, TokenLedger::new(e18(10_000), banker()));
        let pair = exchange.create_pair(token_a, token_b).unwrap();
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        exchange.take_events();

        Self {
            exchange,
            token0,
            token1,
            pair,
        }
    }

    /// Transfer both deposits into pair custody and mint to the banker.
    pub fn add_liquidity(&mut self, amount0: U256, amount1: U256) -> U256 {
        self.exchange
            .transfer_asset(banker(), self.token0, self.pair, amount0)
            .unwrap();
        self.exchange
            .transfer_asset(banker(), self.token1, self.pair, amount1)
            .unwrap();
        let minted = self
            .exchange
            .mint(banker(), self.pair, banker())
            .unwrap();
        self.exchange.take_events();
        minted
    }

    pub fn balance0(&self, holder: Address) -> U256 {
        self.exchange.asset_balance(self.token0, holder).unwrap()
    }

    pub fn balance1(&self, holder: Address) -> U256 {
        self.exchange.asset_balance(self.token1, holder).unwrap()
    }
}
