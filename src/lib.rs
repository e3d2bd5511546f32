//! Deterministic validator staking ledger.
//!
//! This crate implements the on-chain state machine that lets a network
//! participant deposit a fixed stake to become a validator, withdraw that
//! stake after an unbonding period, and be slashed by a privileged owner
//! address. It is built from four small modules:
//!
//! * [`call`] — the call boundary: descriptors, the closed operation table,
//!   and return codes.
//! * [`contract`] — the staking contract itself, a handler per operation.
//! * [`env`] — the narrow capability traits the contract consumes (storage,
//!   value transfer, block height, diagnostics) plus in-memory
//!   implementations for tests and tooling.
//! * [`record`] — the versioned codec for per-account staking records.
//!
//! Every handler is synchronous and deterministic: calls are replayed in a
//! globally agreed order by the hosting runtime, so the same call sequence
//! must always produce bit-identical storage on every node.

pub mod call;
pub mod contract;
pub mod env;
pub mod record;

mod error;

pub use error::{CallError, StakingConfigError};
