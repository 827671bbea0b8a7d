//! # xyk-math - Constant-Product AMM Mathematics
//!
//! ## Purpose
//!
//! Integer-only mathematical foundation for the xyk exchange core. Implements
//! the exact arithmetic the reserve engine depends on: Babylonian square roots
//! over 256-bit unsigned integers (share issuance, protocol fee growth),
//! UQ112.112 fixed-point ratios (cumulative price oracle), and the scaled
//! constant-product quote formulas (swap sizing for callers and tests).
//!
//! ## Integration Points
//!
//! - **Input Sources**: reserve snapshots and transfer deltas from the pair engine
//! - **Output Destinations**: share issuance in mint/burn, K-invariant checks,
//!   oracle accumulator advances, caller-side swap quoting
//! - **Precision**: no floating point anywhere; every formula is expressed in
//!   scaled integer arithmetic so results match the reserve engine bit-for-bit
//!
//! All operations are pure functions over `ethers_core` `U256` values; overflow
//! is either checked (quotes) or explicitly wrapping (oracle accumulators).

pub mod sqrt;
pub mod swap_math;
pub mod uq112;

pub use sqrt::integer_sqrt;
pub use swap_math::{get_amount_in, get_amount_out, quote, MathError, FEE_SCALE};
pub use uq112::{encode_uq112, uq112_ratio, wrap224, Q112};

pub use ethers_core::types::U256;
