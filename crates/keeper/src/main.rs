use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use launchpad_core::constants::DEFAULT_CHART_SAMPLES;
use launchpad_keeper::{create_example_config, Keeper, LaunchpadConfig};

#[derive(Parser, Debug)]
#[command(name = "launchpad-keeper")]
#[command(about = "NFT launch pricing and sequencing bookkeeper")]
struct Args {
    /// Path to keeper configuration file
    #[arg(short, long, default_value = "launchpad.toml", global = true)]
    config: String,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an example configuration file
    Init,

    /// Price a mint without committing it
    QuoteBuy { collection: String, amount: u128 },

    /// Reserve a token id and commit a mint
    Buy {
        collection: String,
        amount: u128,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        mint: String,
    },

    /// Price a sale back into the curve
    QuoteSell { collection: String, nfts: u128 },

    /// Commit a sale back into the curve
    Sell { collection: String, nfts: u128 },

    /// Sample the price curve
    PriceCurve {
        collection: String,
        #[arg(long, default_value_t = DEFAULT_CHART_SAMPLES)]
        samples: usize,
        /// Chart up to this supply instead of the whole curve
        #[arg(long)]
        max_supply: Option<u128>,
    },

    /// Market summary of a collection
    Metrics { collection: String },

    /// Price a bridge redemption
    QuoteSwap { token: String, nfts: u128 },

    /// Redeem NFTs of a revealed collection for a token
    Swap {
        collection: String,
        token: String,
        nfts: u128,
    },

    /// Deposit into a bridge pool
    AddLiquidity {
        token: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        token_amount: u128,
        #[arg(long)]
        nft_amount: u128,
        /// Ratio tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u16>,
    },

    /// Withdraw from a bridge pool
    RemoveLiquidity {
        token: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        shares: u128,
    },

    /// Reserve the next token id without minting
    Reserve {
        collection: String,
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        mint: String,
    },

    /// Freeze token id issuance
    Lock {
        collection: String,
        #[arg(long)]
        actor: String,
    },

    /// Lift a sequence lock
    Unlock {
        collection: String,
        #[arg(long)]
        actor: String,
    },

    /// Change a collection's supply ceiling
    SetSupply {
        collection: String,
        total_supply: u64,
        #[arg(long)]
        actor: String,
    },

    /// Sequence status of a collection
    Status { collection: String },

    /// Check sequence and pool share consistency
    Audit { collection: String },

    /// Bridge-wide statistics
    Stats,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    if let Command::Init = args.command {
        create_example_config(&args.config)
            .with_context(|| format!("Failed to write example config to {}", args.config))?;
        log::info!("Wrote example configuration to {}", args.config);
        return Ok(());
    }

    // Load configuration
    let config = LaunchpadConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config))?;
    log::debug!(
        "Loaded configuration: {} collections, {} tokens",
        config.collections.len(),
        config.tokens.len()
    );

    let mut keeper = Keeper::open(config).context("Failed to open book")?;

    match args.command {
        Command::Init => return Ok(()),
        Command::QuoteBuy { collection, amount } => {
            print_json(&keeper.quote_buy(&collection, amount)?)?
        }
        Command::Buy {
            collection,
            amount,
            wallet,
            mint,
        } => {
            let receipt = keeper
                .buy(&collection, amount, &wallet, &mint)
                .with_context(|| format!("Mint on {} failed", collection))?;
            print_json(&receipt)?;
        }
        Command::QuoteSell { collection, nfts } => {
            print_json(&keeper.quote_sell(&collection, nfts)?)?
        }
        Command::Sell { collection, nfts } => print_json(&keeper.sell(&collection, nfts)?)?,
        Command::PriceCurve {
            collection,
            samples,
            max_supply,
        } => print_json(&keeper.price_curve(&collection, samples, max_supply)?)?,
        Command::Metrics { collection } => print_json(&keeper.metrics(&collection)?)?,
        Command::QuoteSwap { token, nfts } => print_json(&keeper.quote_swap(&token, nfts)?)?,
        Command::Swap {
            collection,
            token,
            nfts,
        } => print_json(&keeper.swap(&collection, &token, nfts)?)?,
        Command::AddLiquidity {
            token,
            provider,
            token_amount,
            nft_amount,
            slippage_bps,
        } => {
            let receipt =
                keeper.add_liquidity(&token, &provider, token_amount, nft_amount, slippage_bps)?;
            print_json(&receipt)?;
        }
        Command::RemoveLiquidity {
            token,
            provider,
            shares,
        } => print_json(&keeper.remove_liquidity(&token, &provider, shares)?)?,
        Command::Reserve {
            collection,
            wallet,
            mint,
        } => print_json(&keeper.reserve(&collection, &mint, &wallet)?)?,
        Command::Lock { collection, actor } => print_json(&keeper.lock(&collection, &actor)?)?,
        Command::Unlock { collection, actor } => print_json(&keeper.unlock(&collection, &actor)?)?,
        Command::SetSupply {
            collection,
            total_supply,
            actor,
        } => print_json(&keeper.set_supply(&collection, &actor, total_supply)?)?,
        Command::Status { collection } => print_json(&keeper.sequence_status(&collection)?)?,
        Command::Audit { collection } => {
            let report = keeper.audit(&collection)?;
            if !report.sequence.valid {
                for issue in &report.sequence.issues {
                    log::warn!("{}: {}", collection, issue);
                }
            }
            print_json(&report)?;
        }
        Command::Stats => print_json(&keeper.bridge_statistics()?)?,
    }

    keeper.persist().context("Failed to write book")?;
    Ok(())
}
