use thiserror::Error;

use crate::env::TransferError;
use crate::record::RecordCodecError;

/// Construction-time failures. A contract that fails to build never becomes
/// usable; nothing is written anywhere.
#[derive(Debug, Error)]
pub enum StakingConfigError {
    /// The required stake must be strictly positive.
    #[error("required stake must be strictly positive")]
    ZeroRequiredStake,
}

/// Recoverable per-call failures. The dispatcher maps every variant to
/// [`ReturnCode::UserError`](crate::call::ReturnCode) and reports the message
/// through the injected diagnostics sink; storage is left untouched.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("contract was already initialized")]
    AlreadyInitialized,

    /// The call value is zero or does not match the required stake.
    #[error("call value does not match the required stake")]
    WrongStakeValue,

    #[error("not enough arguments to process {0} function")]
    MissingArguments(&'static str),

    #[error("account already staked, re-staking is invalid")]
    AlreadyStaked,

    #[error("no staking record for this address")]
    UnknownAccount,

    #[error("account is not staked")]
    NotStaked,

    #[error("account is still staked")]
    StillStaked,

    /// The record carries no unstake event later than its staking start.
    #[error("no valid unstake precedes this unbond")]
    NoValidUnstake,

    #[error("unbond period has not elapsed")]
    UnbondPeriodNotElapsed,

    #[error("only the owner may slash")]
    NotOwner,

    #[error("slash expects exactly two arguments")]
    WrongArgumentCount,

    /// A stored record failed to decode. Treated as a call error so a
    /// corrupt entry can never crash the hosting runtime.
    #[error("corrupt staking record: {0}")]
    CorruptRecord(#[from] RecordCodecError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}
