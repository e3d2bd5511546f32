//! Versioned codec for per-account staking records.
//!
//! Records are stored as JSON with a leading version field. Decoding rejects
//! malformed bytes and unknown versions with [`RecordCodecError`]; the
//! contract surfaces that as a call error, never a panic.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current encoding version.
pub const RECORD_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum RecordCodecError {
    #[error("malformed staking record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported staking record version {0}")]
    UnsupportedVersion(u8),
}

/// One staking record per validator account, keyed by the account address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StakeRecord {
    pub version: u8,

    /// Height at which staking began.
    pub start_height: u64,

    /// Current participation state.
    pub staked: bool,

    /// Height at which unstaking was requested; zero until used. Meaningful
    /// only when strictly greater than `start_height`.
    pub unstaked_height: u64,

    /// Opaque consensus key of the validator.
    #[serde(with = "hex::serde")]
    pub validator_key: Vec<u8>,

    /// Deposited amount; equals the required stake at staking time, possibly
    /// reduced later by slashing. Non-negative by construction.
    #[serde(with = "biguint_dec")]
    pub stake_value: BigUint,
}

impl StakeRecord {
    /// A fresh record with every field at its default: not staked, no key,
    /// zero balance.
    pub fn zero() -> Self {
        Self {
            version: RECORD_VERSION,
            start_height: 0,
            staked: false,
            unstaked_height: 0,
            validator_key: Vec::new(),
            stake_value: BigUint::default(),
        }
    }

    /// True when a genuine unstake happened after staking began.
    pub fn unstake_is_valid(&self) -> bool {
        self.unstaked_height > self.start_height
    }

    pub fn encode(&self) -> Result<Vec<u8>, RecordCodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RecordCodecError> {
        let record: StakeRecord = serde_json::from_slice(bytes)?;
        if record.version != RECORD_VERSION {
            return Err(RecordCodecError::UnsupportedVersion(record.version));
        }
        Ok(record)
    }
}

/// Serde helper rendering a `BigUint` as a decimal string, shared with the
/// call-value field of the call boundary.
pub(crate) mod biguint_dec {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
