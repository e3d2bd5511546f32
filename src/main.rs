//! `stakingd-replay` — deterministic replay driver for the staking ledger.
//!
//! Reads a JSON script of call descriptors, executes them in order against an
//! in-memory environment, prints each outcome, and dumps the final storage.
//! Stands in for the dispatch runtime that hosts the contract on a real node:
//! replaying the same script with the same flags always yields an identical
//! dump.

use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use num_bigint::BigUint;
use serde::Deserialize;

use staking_ledger::call::{CallInput, ReturnCode};
use staking_ledger::contract::{HostEnv, StakingContract};
use staking_ledger::env::{BlockClock, MemStore, MemTransfers};

#[derive(Parser)]
#[command(
    name = "stakingd-replay",
    version,
    about = "Replay a staking call script against an in-memory chain environment"
)]
struct Cli {
    /// JSON call script: {"calls": [{"at_height": 7, "function": "stake", ...}]}
    script: PathBuf,

    /// Fixed deposit every validator must stake (decimal)
    #[arg(long, default_value = "2500")]
    required_stake: String,

    /// Heights that must elapse between unStake and unBound
    #[arg(long, default_value_t = 100)]
    unbond_period: u64,

    /// Pre-funded balance, hex address=decimal amount (repeatable)
    #[arg(long = "fund", value_name = "ADDR=AMOUNT")]
    funds: Vec<String>,
}

#[derive(Deserialize)]
struct Script {
    calls: Vec<Step>,
}

#[derive(Deserialize)]
struct Step {
    /// Height the clock advances to before this call; omitted keeps the
    /// current height.
    #[serde(default)]
    at_height: Option<u64>,

    #[serde(flatten)]
    input: CallInput,
}

fn parse_fund(spec: &str) -> Result<(Vec<u8>, BigUint), String> {
    let (addr, amount) = spec
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=AMOUNT, got {spec:?}"))?;
    let addr = hex::decode(addr).map_err(|err| format!("invalid address {addr:?}: {err}"))?;
    let amount = amount
        .parse()
        .map_err(|err| format!("invalid amount {amount:?}: {err}"))?;
    Ok((addr, amount))
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let required_stake: BigUint = match cli.required_stake.parse() {
        Ok(value) => value,
        Err(err) => return fail(format_args!("invalid --required-stake: {err}")),
    };
    let contract = match StakingContract::new(required_stake, cli.unbond_period) {
        Ok(contract) => contract,
        Err(err) => return fail(err),
    };

    let raw = match fs::read(&cli.script) {
        Ok(raw) => raw,
        Err(err) => return fail(format_args!("cannot read {}: {err}", cli.script.display())),
    };
    let script: Script = match serde_json::from_slice(&raw) {
        Ok(script) => script,
        Err(err) => return fail(format_args!("invalid script: {err}")),
    };

    let mut store = MemStore::new();
    let mut transfers = MemTransfers::new();
    let mut clock = BlockClock::new();
    for spec in &cli.funds {
        match parse_fund(spec) {
            Ok((addr, amount)) => transfers.credit(&addr, amount),
            Err(err) => return fail(err),
        }
    }

    for (idx, step) in script.calls.iter().enumerate() {
        if let Some(height) = step.at_height {
            clock.advance_to(height);
        }
        let outcome = {
            let mut env = HostEnv {
                store: &mut store,
                transfers: &mut transfers,
                heights: &clock,
            };
            contract.execute(&mut env, &step.input)
        };
        let code = match outcome.code {
            ReturnCode::Ok => "ok",
            ReturnCode::UserError => "user-error",
        };
        println!(
            "#{idx} {} caller={} -> {code}",
            step.input.function,
            hex::encode(&step.input.caller)
        );
        for buffer in &outcome.output {
            println!("    out: {}", hex::encode(buffer));
        }
    }

    println!("-- final storage --");
    for (key, value) in store.iter() {
        println!("{} = {}", hex::encode(key), hex::encode(value));
    }
    ExitCode::SUCCESS
}
