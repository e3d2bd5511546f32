//! The staking contract: a handler per operation over the capability traits.
//!
//! Each handler either fully applies its mutation or applies none. All checks
//! run before the first write, and the two handlers that move value order the
//! transfer ahead of the storage commit, so a rejected transfer rejects the
//! whole call.

use num_bigint::BigUint;

use crate::call::{CallInput, CallOutcome, StakingOp};
use crate::env::{Diagnostics, HeightOracle, LedgerStore, LogDiagnostics, TransferEngine};
use crate::error::{CallError, StakingConfigError};
use crate::record::StakeRecord;

/// Reserved storage key of the owner singleton.
pub const OWNER_KEY: &[u8] = b"owner";

/// Reserved storage key of the required-stake singleton.
pub const INITIAL_STAKE_KEY: &[u8] = b"initialStake";

/// Mutable view over the host capabilities for the duration of one call.
pub struct HostEnv<'a> {
    pub store: &'a mut dyn LedgerStore,
    pub transfers: &'a mut dyn TransferEngine,
    pub heights: &'a dyn HeightOracle,
}

/// The validator staking contract. Holds only immutable configuration and
/// the diagnostics sink; all mutable state lives behind [`HostEnv`].
pub struct StakingContract {
    required_stake: BigUint,
    unbond_period: u64,
    diag: Box<dyn Diagnostics>,
}

impl StakingContract {
    /// Builds a contract instance. The required stake must be strictly
    /// positive; the unbond period may be zero.
    pub fn new(required_stake: BigUint, unbond_period: u64) -> Result<Self, StakingConfigError> {
        if required_stake == BigUint::default() {
            return Err(StakingConfigError::ZeroRequiredStake);
        }
        Ok(Self {
            required_stake,
            unbond_period,
            diag: Box::new(LogDiagnostics),
        })
    }

    /// Replaces the default diagnostics sink.
    pub fn with_diagnostics(mut self, diag: Box<dyn Diagnostics>) -> Self {
        self.diag = diag;
        self
    }

    /// Dispatches one call. Malformed descriptors and unknown function names
    /// are rejected here with no state change; handler failures are reported
    /// through the diagnostics sink and mapped to
    /// [`ReturnCode::UserError`](crate::call::ReturnCode).
    pub fn execute(&self, env: &mut HostEnv<'_>, input: &CallInput) -> CallOutcome {
        if !input.is_well_formed() {
            self.diag.report("rejected call with no caller address");
            return CallOutcome::user_error();
        }
        let Some(op) = StakingOp::from_name(&input.function) else {
            self.diag
                .report(&format!("unknown function {:?}", input.function));
            return CallOutcome::user_error();
        };

        let result = match op {
            StakingOp::Init => self.init(env, input).map(|_| Vec::new()),
            StakingOp::Stake => self.stake(env, input).map(|_| Vec::new()),
            StakingOp::UnStake => self.un_stake(env, input).map(|_| Vec::new()),
            StakingOp::UnBound => self.un_bound(env, input).map(|_| Vec::new()),
            StakingOp::Slash => self.slash(env, input).map(|_| Vec::new()),
            StakingOp::Get => self.get(env, input),
        };

        match result {
            Ok(output) => CallOutcome::ok(output),
            Err(err) => {
                self.diag.report(&format!("{} failed: {err}", op.name()));
                CallOutcome::user_error()
            }
        }
    }

    /// Runs exactly once per contract instance: records the caller as owner,
    /// seeds a zero-balance record for it, and persists the required stake.
    fn init(&self, env: &mut HostEnv<'_>, input: &CallInput) -> Result<(), CallError> {
        if env.store.get(OWNER_KEY).is_some() {
            return Err(CallError::AlreadyInitialized);
        }

        env.store.set(OWNER_KEY, Some(input.caller.clone()));
        env.store.set(&input.caller, Some(StakeRecord::zero().encode()?));
        env.store
            .set(INITIAL_STAKE_KEY, Some(self.required_stake.to_bytes_be()));
        Ok(())
    }

    fn stake(&self, env: &mut HostEnv<'_>, input: &CallInput) -> Result<(), CallError> {
        // The deposit is compared against the persisted singleton, not the
        // construction-time config: before init it is absent, which reads as
        // zero and rejects every stake.
        let required = env
            .store
            .get(INITIAL_STAKE_KEY)
            .map(|bytes| BigUint::from_bytes_be(&bytes))
            .unwrap_or_default();
        if input.call_value != required || input.call_value == BigUint::default() {
            return Err(CallError::WrongStakeValue);
        }
        let validator_key = input
            .arguments
            .first()
            .ok_or(CallError::MissingArguments("stake"))?;

        let mut record = match env.store.get(&input.caller) {
            Some(data) => StakeRecord::decode(&data)?,
            None => StakeRecord::zero(),
        };
        if record.staked {
            return Err(CallError::AlreadyStaked);
        }

        record.staked = true;
        record.start_height = env.heights.current_height();
        record.validator_key = validator_key.clone();
        record.stake_value = required;
        let encoded = record.encode()?;

        // Custody transfer first: a rejected deposit must leave no staked
        // record behind.
        env.transfers
            .transfer(&input.caller, &input.recipient, &input.call_value, None)?;
        env.store.set(&input.caller, Some(encoded));
        Ok(())
    }

    fn un_stake(&self, env: &mut HostEnv<'_>, input: &CallInput) -> Result<(), CallError> {
        let data = env
            .store
            .get(&input.caller)
            .ok_or(CallError::UnknownAccount)?;
        let mut record = StakeRecord::decode(&data)?;
        if !record.staked {
            return Err(CallError::NotStaked);
        }

        record.staked = false;
        record.unstaked_height = env.heights.current_height();
        env.store.set(&input.caller, Some(record.encode()?));
        Ok(())
    }

    fn un_bound(&self, env: &mut HostEnv<'_>, input: &CallInput) -> Result<(), CallError> {
        let data = env
            .store
            .get(&input.caller)
            .ok_or(CallError::UnknownAccount)?;
        let record = StakeRecord::decode(&data)?;
        if record.staked {
            return Err(CallError::StillStaked);
        }
        if !record.unstake_is_valid() {
            return Err(CallError::NoValidUnstake);
        }

        let current = env.heights.current_height();
        if current.saturating_sub(record.unstaked_height) < self.unbond_period {
            return Err(CallError::UnbondPeriodNotElapsed);
        }

        // Refund goes to the unbonding staker. The record is deleted only
        // once the transfer out of custody has settled.
        env.transfers
            .transfer(&input.recipient, &input.caller, &record.stake_value, None)?;
        env.store.set(&input.caller, None);
        Ok(())
    }

    /// Owner-only penalty. The recorded stake is clamped at zero rather than
    /// rejecting over-penalization: a misbehaving validator must not dodge a
    /// penalty by holding less stake than the sanction.
    fn slash(&self, env: &mut HostEnv<'_>, input: &CallInput) -> Result<(), CallError> {
        let owner = env.store.get(OWNER_KEY).ok_or(CallError::NotOwner)?;
        if owner != input.caller {
            return Err(CallError::NotOwner);
        }
        if input.arguments.len() != 2 {
            return Err(CallError::WrongArgumentCount);
        }

        let target = &input.arguments[0];
        let penalty = BigUint::from_bytes_be(&input.arguments[1]);

        let data = env.store.get(target).ok_or(CallError::UnknownAccount)?;
        let mut record = StakeRecord::decode(&data)?;
        if !record.staked {
            return Err(CallError::NotStaked);
        }

        record.stake_value = if penalty < record.stake_value {
            &record.stake_value - &penalty
        } else {
            BigUint::default()
        };
        env.store.set(target, Some(record.encode()?));
        Ok(())
    }

    /// Read-only: appends the raw stored bytes for the requested key (empty
    /// when absent) to the output buffer.
    fn get(&self, env: &mut HostEnv<'_>, input: &CallInput) -> Result<Vec<Vec<u8>>, CallError> {
        let key = input
            .arguments
            .first()
            .ok_or(CallError::MissingArguments("get"))?;
        Ok(vec![env.store.get(key).unwrap_or_default()])
    }
}
