//! Capability interfaces the staking contract consumes, and in-memory
//! implementations of each for tests and the replay binary.
//!
//! The hosting runtime exposes one broad environment interface; here it is
//! decomposed into three narrow traits — [`LedgerStore`], [`TransferEngine`],
//! [`HeightOracle`] — so each handler depends only on what it needs and tests
//! can substitute lightweight fakes. A fourth capability, [`Diagnostics`],
//! replaces the process-global logger the original runtime used.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use thiserror::Error;

/// Byte-keyed durable storage. Account addresses and the reserved singleton
/// keys share this namespace.
pub trait LedgerStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Writes `value` under `key`; `None` deletes the key.
    fn set(&mut self, key: &[u8], value: Option<Vec<u8>>);
}

/// Moves value between accounts. Completes synchronously before the handler
/// returns; there is no asynchronous settlement at this layer.
pub trait TransferEngine {
    fn transfer(
        &mut self,
        from: &[u8],
        to: &[u8],
        amount: &BigUint,
        payload: Option<&[u8]>,
    ) -> Result<(), TransferError>;
}

/// Supplies the current block height, monotonically non-decreasing across
/// calls.
pub trait HeightOracle {
    fn current_height(&self) -> u64;
}

/// Diagnostic sink for rejected calls, injected at contract construction.
pub trait Diagnostics {
    fn report(&self, message: &str);
}

/// Rejection raised by a [`TransferEngine`].
#[derive(Debug, Error)]
#[error("transfer rejected: {0}")]
pub struct TransferError(pub String);

/// Default diagnostics sink: forwards to the `log` facade.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// In-memory [`LedgerStore`] over a `BTreeMap`, so iteration order (and any
/// dump derived from it) is deterministic.
#[derive(Default)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Option<Vec<u8>>) {
        match value {
            Some(bytes) => {
                self.entries.insert(key.to_vec(), bytes);
            }
            None => {
                self.entries.remove(key);
            }
        }
    }
}

/// One settled movement of value, kept for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Vec<u8>,
    pub to: Vec<u8>,
    pub amount: BigUint,
}

/// In-memory [`TransferEngine`] with per-account balances and a journal of
/// settled transfers. Debiting more than an account holds is rejected.
#[derive(Default)]
pub struct MemTransfers {
    balances: BTreeMap<Vec<u8>, BigUint>,
    journal: Vec<TransferEvent>,
}

impl MemTransfers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, holder: &[u8], amount: BigUint) {
        *self.balances.entry(holder.to_vec()).or_default() += amount;
    }

    pub fn balance(&self, holder: &[u8]) -> BigUint {
        self.balances.get(holder).cloned().unwrap_or_default()
    }

    pub fn journal(&self) -> &[TransferEvent] {
        &self.journal
    }
}

impl TransferEngine for MemTransfers {
    fn transfer(
        &mut self,
        from: &[u8],
        to: &[u8],
        amount: &BigUint,
        _payload: Option<&[u8]>,
    ) -> Result<(), TransferError> {
        let available = self.balances.get(from).cloned().unwrap_or_default();
        if available < *amount {
            return Err(TransferError(format!(
                "insufficient funds in {}",
                hex::encode(from)
            )));
        }
        self.balances.insert(from.to_vec(), available - amount);
        *self.balances.entry(to.to_vec()).or_default() += amount;
        self.journal.push(TransferEvent {
            from: from.to_vec(),
            to: to.to_vec(),
            amount: amount.clone(),
        });
        Ok(())
    }
}

/// In-memory [`HeightOracle`]; only moves forward.
#[derive(Default)]
pub struct BlockClock {
    height: u64,
}

impl BlockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(height: u64) -> Self {
        Self { height }
    }

    pub fn advance(&mut self, blocks: u64) {
        self.height += blocks;
    }

    /// Moves to `height` if it is ahead of the current one; never rewinds.
    pub fn advance_to(&mut self, height: u64) {
        self.height = self.height.max(height);
    }
}

impl HeightOracle for BlockClock {
    fn current_height(&self) -> u64 {
        self.height
    }
}
