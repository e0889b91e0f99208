//! Airdrop claimer
//!
//! ```text
//!   key file ──▶ wallets ──▶ runner ──▶ strategy ──┬──▶ relay:   indexer → backend → signer → relayer
//!                                                  └──▶ onchain: claim contract → tx submitter → receipt
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use airdrop_claimer::api::{AssetId, ClaimBackend};
use airdrop_claimer::claim::{ClaimRunner, FailureLog};
use airdrop_claimer::config::loader::load_or_default;
use airdrop_claimer::config::{ClaimMode, ClaimerConfig};
use airdrop_claimer::lifecycle::{load_wallets, spawn_ctrl_c_listener, Services, Shutdown};
use airdrop_claimer::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "airdrop-claimer")]
#[command(about = "Claims token airdrops for a list of wallets", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "claimer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Claim for every wallet in the key file
    Claim {
        /// Override the configured claim flow
        #[arg(long, value_enum)]
        mode: Option<ClaimMode>,
    },
    /// Show what each wallet could claim, without claiming
    Status {
        #[arg(long, value_enum)]
        mode: Option<ClaimMode>,
    },
    /// Check whether an NFT was already used for a claim
    CheckToken {
        /// NFT number
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(&cli.config)?;
    let _log_guard = init_logging(&config.observability);

    tracing::info!("airdrop-claimer v{} starting", env!("CARGO_PKG_VERSION"));
    if !cli.config.exists() {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let services = Services::build(&config)?;

    match cli.command {
        Commands::Claim { mode } => {
            let mode = mode.unwrap_or(config.claim.mode);
            run_claim(&config, &services, mode).await?;
        }
        Commands::Status { mode } => {
            let mode = mode.unwrap_or(config.claim.mode);
            show_status(&config, &services, mode).await?;
        }
        Commands::CheckToken { id } => {
            let asset = AssetId::new(id);
            let used = services.backend.check_token_used(&asset).await?;
            println!("NFT {}: {}", asset, if used { "already used" } else { "not used" });
        }
    }

    Ok(())
}

async fn run_claim(
    config: &ClaimerConfig,
    services: &Services,
    mode: ClaimMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallets = load_wallets(Path::new(&config.files.keys_file))?;
    if mode == ClaimMode::Onchain {
        services.check_chain().await;
    }

    let shutdown = Shutdown::new();
    spawn_ctrl_c_listener(shutdown.clone());

    let runner = ClaimRunner::new(
        services.strategy(mode),
        FailureLog::new(&config.files.failed_log),
        config.schedule.clone(),
        shutdown,
    );
    let summary = runner.run(wallets).await;

    println!("{}", summary);
    if summary.failed > 0 {
        println!("Failed wallets appended to {}", config.files.failed_log);
    }
    Ok(())
}

async fn show_status(
    config: &ClaimerConfig,
    services: &Services,
    mode: ClaimMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallets = load_wallets(Path::new(&config.files.keys_file))?;
    if mode == ClaimMode::Onchain {
        services.check_chain().await;
    }

    for wallet in &wallets {
        let address = wallet.address();
        match mode {
            ClaimMode::Relay => match services.relay.eligible_assets(address).await {
                Ok(assets) if assets.is_empty() => println!("{}  nothing to claim", address),
                Ok(assets) => {
                    let ids: Vec<&str> = assets.iter().map(AssetId::as_str).collect();
                    println!("{}  eligible: {}", address, ids.join(", "));
                }
                Err(e) => println!("{}  error: {}", address, e),
            },
            ClaimMode::Onchain => {
                let claimable = services.onchain.claimable_amount(address).await;
                let balance = services.chain.get_balance(address).await;
                match (claimable, balance) {
                    (Ok(amount), Ok(balance)) => {
                        println!("{}  claimable: {}  gas balance: {} wei", address, amount, balance)
                    }
                    (Err(e), _) | (_, Err(e)) => println!("{}  error: {}", address, e),
                }
            }
        }
    }
    Ok(())
}
