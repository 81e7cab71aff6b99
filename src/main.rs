//! lockup-staker command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI command
//!       │
//!       ▼
//!   ┌──────────────────────────── Session ───────────────────────────┐
//!   │  config        chain (JSON-RPC)     index (helper)     store   │
//!   └────────────────────────────────────────────────────────────────┘
//!       │                  │                    │
//!       ▼                  ▼                    ▼
//!   scan: path range → device key → accounts → registry merge + save
//!   accounts: registry → lockup + pool reads (concurrent) → report
//!   select-pool / stake / unstake / withdraw:
//!       registry entry → fresh signer → one device-signed transaction
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lockup_staker::chain::{format_near_amount, parse_near_amount};
use lockup_staker::config::load_or_default;
use lockup_staker::device::ApduBridge;
use lockup_staker::discovery::{scan_range, StdinPrompt};
use lockup_staker::observability::{logging, metrics};
use lockup_staker::path::PathRange;
use lockup_staker::reconcile::{reconcile, ReconcileReport};
use lockup_staker::{operations, Session};

#[derive(Parser)]
#[command(name = "lockup-staker")]
#[command(about = "Discover hardware wallet accounts and stake their lockups", long_about = None)]
struct Cli {
    /// TOML configuration file; mainnet defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the paths a range expands to, without touching the device
    Paths {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Derive keys over a path range and register their accounts
    Scan {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Show registered accounts with lockup and pool balances
    Accounts {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Select the staking pool of an account's lockup
    SelectPool { account_id: String, pool_id: String },
    /// Deposit and stake NEAR from an account's lockup
    Stake { account_id: String, amount: String },
    /// Unstake NEAR held in the pool for an account's lockup
    Unstake { account_id: String, amount: String },
    /// Withdraw everything available from the pool back into the lockup
    Withdraw { account_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("lockup-staker v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    if let Commands::Paths { start, end } = &cli.command {
        let range = PathRange::parse(start, end)?;
        println!("Found {} paths", range.count_paths());
        for path in &range {
            println!("{}", path);
        }
        return Ok(());
    }

    let device = ApduBridge::new(&config.device)?;
    let session = Session::connect(config)?;

    match cli.command {
        Commands::Paths { .. } => {}
        Commands::Scan { start, end } => {
            let range = PathRange::parse(&start, &end)?;
            let report = scan_range(&session, &device, &StdinPrompt, &range).await?;
            for entry in &report.added {
                println!("added {} ({}) at {}", entry.account_id, entry.public_key, entry.path);
            }
            for failure in &report.failures {
                eprintln!("failed {}: {}", failure.path, failure.error);
            }
            println!(
                "{} paths, {} keys, {} accounts added",
                report.paths_scanned,
                report.keys_derived,
                report.added.len()
            );
        }
        Commands::Accounts { json } => {
            let registry = session.load_registry()?;
            let report = reconcile(
                session.chain(),
                &registry,
                &session.config().network.lockup_base,
            )
            .await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if let Some(elapsed) = operations::last_stake_elapsed(&session)? {
                println!("Last stake {:.1} minutes ago", elapsed.as_secs_f64() / 60.0);
            }
        }
        Commands::SelectPool { account_id, pool_id } => {
            let outcome = operations::select_pool(&session, &device, &account_id, &pool_id).await?;
            println!("{}", outcome.hash);
        }
        Commands::Stake { account_id, amount } => {
            let amount = parse_amount_arg(&amount)?;
            let outcome = operations::stake(&session, &device, &account_id, amount).await?;
            println!("{}", outcome.hash);
        }
        Commands::Unstake { account_id, amount } => {
            let amount = parse_amount_arg(&amount)?;
            let outcome = operations::unstake(&session, &device, &account_id, amount).await?;
            println!("{}", outcome.hash);
        }
        Commands::Withdraw { account_id } => {
            let outcome = operations::withdraw_all(&session, &device, &account_id).await?;
            println!("{}", outcome.hash);
        }
    }

    Ok(())
}

fn parse_amount_arg(text: &str) -> Result<u128, Box<dyn std::error::Error>> {
    parse_near_amount(text).ok_or_else(|| format!("invalid NEAR amount '{}'", text).into())
}

fn print_report(report: &ReconcileReport) {
    for account in &report.accounts {
        let entry = &account.entry;
        println!("{}  {}  {}", entry.account_id, entry.path, entry.public_key);
        if let Some(error) = &account.error {
            println!("    error: {}", error);
            continue;
        }
        if !account.lockup_exists {
            println!("    no lockup ({})", account.lockup_account_id);
            continue;
        }
        println!(
            "    lockup {}: {} NEAR, deposited {}",
            account.lockup_account_id,
            format_near_amount(account.lockup_balance, 2),
            format_near_amount(account.deposited_balance, 2)
        );
        if let Some(pool) = &account.staking_pool {
            let active = match account.pool_active {
                Some(true) => "active",
                Some(false) => "inactive",
                None => "unknown",
            };
            println!(
                "    pool {} ({}): staked {}, unstaked {}{}",
                pool,
                active,
                format_near_amount(account.staked_balance, 2),
                format_near_amount(account.unstaked_balance, 2),
                if account.can_withdraw { ", withdrawable" } else { "" }
            );
        }
    }
    println!(
        "Total: available {}, staked {}, unstaked {}",
        format_near_amount(report.totals.total_available, 2),
        format_near_amount(report.totals.total_staked, 2),
        format_near_amount(report.totals.total_unstaked, 2)
    );
}
