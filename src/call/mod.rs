//! The call boundary: descriptors handed in by the hosting runtime, the
//! closed table of operations, and the outcome handed back.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::record::biguint_dec;

/// The closed set of operations the contract answers to. Wire-level function
/// names outside this table are rejected at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakingOp {
    Init,
    Stake,
    UnStake,
    UnBound,
    Slash,
    Get,
}

impl StakingOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "_init" => Some(Self::Init),
            "stake" => Some(Self::Stake),
            "unStake" => Some(Self::UnStake),
            "unBound" => Some(Self::UnBound),
            "slash" => Some(Self::Slash),
            "get" => Some(Self::Get),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "_init",
            Self::Stake => "stake",
            Self::UnStake => "unStake",
            Self::UnBound => "unBound",
            Self::Slash => "slash",
            Self::Get => "get",
        }
    }
}

/// One incoming call, as produced by the dispatch runtime. Serializable so
/// replay scripts can be written as JSON; byte fields are hex strings there.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallInput {
    /// Wire-level function name, looked up in [`StakingOp`].
    pub function: String,

    #[serde(with = "hex::serde")]
    pub caller: Vec<u8>,

    /// The contract's own custody address.
    #[serde(with = "hex::serde")]
    pub recipient: Vec<u8>,

    #[serde(with = "biguint_dec")]
    pub call_value: BigUint,

    #[serde(default, with = "hex_list")]
    pub arguments: Vec<Vec<u8>>,
}

impl CallInput {
    /// A descriptor without a caller cannot be attributed and is rejected
    /// before dispatch.
    pub fn is_well_formed(&self) -> bool {
        !self.caller.is_empty()
    }
}

/// Result code returned to the runtime for every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    UserError,
}

/// Return code plus the output buffers appended by the handler (`get` only).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutcome {
    pub code: ReturnCode,
    pub output: Vec<Vec<u8>>,
}

impl CallOutcome {
    pub fn ok(output: Vec<Vec<u8>>) -> Self {
        Self {
            code: ReturnCode::Ok,
            output,
        }
    }

    pub fn user_error() -> Self {
        Self {
            code: ReturnCode::UserError,
            output: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == ReturnCode::Ok
    }
}

/// Serde helper rendering `Vec<Vec<u8>>` as a list of hex strings.
mod hex_list {
    use serde::ser::SerializeSeq;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&hex::encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|s| hex::decode(&s).map_err(de::Error::custom))
            .collect()
    }
}
