//! Loot Survivor client binary.
//!
//! Composition root that assembles:
//! 1. Read model (GraphQL indexer, or the in-process devnet source)
//! 2. Account transport (devnet only; `watch` is read-only)
//! 3. Client context, session and action controller from `client-frontend-core`
//!
//! # Commands
//!
//! ```bash
//! # Follow an adventurer on a live indexer
//! INDEXER_URL=https://indexer.example/graphql survivor watch --adventurer 42
//!
//! # Fight a beast on the simulated chain
//! survivor devnet --name Loaf --till-death
//! ```

#[cfg(feature = "devnet")]
mod devnet;
mod logging;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_blockchain_core::{BlockchainConfig, ChainConfig, GameContract, LordsContract};
use client_frontend_core::{ClientContext, Event, FrontendConfig, Session, SessionEvent, Topic};
use client_indexer::{GraphqlIndexer, IndexerConfig, QueryKind};
use survivor_core::AdventurerId;
use tokio::sync::broadcast::error::RecvError;

/// Loot Survivor client
#[derive(Parser)]
#[command(name = "survivor")]
#[command(about = "Follow and play Loot Survivor adventurers", long_about = None)]
#[command(version)]
struct Cli {
    /// Log session name (default: timestamped)
    #[arg(long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the indexer and print an adventurer's screens as they change
    Watch {
        #[arg(long)]
        adventurer: AdventurerId,
    },

    /// Play against an in-process simulated chain
    #[cfg(feature = "devnet")]
    Devnet {
        /// Adventurer name
        #[arg(long, default_value = "Loaf")]
        name: String,

        /// Send every attack with the till-death flag
        #[arg(long)]
        till_death: bool,

        /// Maximum number of attack batches
        #[arg(long, default_value_t = 10)]
        rounds: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.session, true)?;

    match cli.command {
        Command::Watch { adventurer } => watch(adventurer).await,
        #[cfg(feature = "devnet")]
        Command::Devnet {
            name,
            till_death,
            rounds,
        } => run_devnet(name, till_death, rounds).await,
    }
}

async fn watch(adventurer_id: AdventurerId) -> Result<()> {
    let indexer_config = IndexerConfig::from_env()?;
    let chain = ChainConfig::from_env().map_err(anyhow::Error::msg)?;
    chain.validate().map_err(anyhow::Error::msg)?;

    tracing::info!("Starting watcher");
    tracing::info!("Indexer: {}", indexer_config.url);
    tracing::info!("Network: {}", chain.network_name());

    let source = GraphqlIndexer::new(indexer_config).context("Failed to build indexer client")?;
    let ctx = ClientContext::new(
        FrontendConfig::from_env(),
        Arc::new(source),
        GameContract::new(chain.game_contract.clone()),
        LordsContract::new(chain.lords_contract.clone()),
    );
    let mut queries = ctx.events().subscribe(Topic::Query);
    let mut sessions = ctx.events().subscribe(Topic::Session);

    let mut session = Session::new(ctx.clone());
    session
        .select_adventurer(adventurer_id)
        .await
        .with_context(|| format!("Failed to load adventurer {adventurer_id}"))?;
    print_screens(&ctx);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = queries.recv() => match event {
                // Battles are the last query of each refetch round.
                Ok(Event::Query(update)) if update.kind == QueryKind::BattlesByBeast => {
                    print_screens(&ctx);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Watcher lagged behind query updates");
                }
                Err(RecvError::Closed) => break,
            },
            event = sessions.recv() => match event {
                Ok(Event::Session(SessionEvent::AdventurerUpdated(_))) => print_screens(&ctx),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Watcher lagged behind session updates");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.disconnect();
    tracing::info!("Watcher stopped");
    Ok(())
}

#[cfg(feature = "devnet")]
async fn run_devnet(name: String, till_death: bool, rounds: u32) -> Result<()> {
    use client_blockchain_core::{ContractAddress, MockTransport, Network};
    use client_frontend_core::{ActionError, Syscalls};
    use client_indexer::MockSource;

    let chain = ChainConfig::new(Network::Devnet).with_contracts(
        ContractAddress::new("0x05a1"),
        ContractAddress::new("0x0b2"),
    );
    chain.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Starting devnet: network={}", chain.network_name());

    let source = MockSource::new();
    devnet::seed(&source, &name);
    let transport = MockTransport::with_address(ContractAddress::new("0x0de7e7a11ce"));
    devnet::install(&transport, &source);

    let ctx = ClientContext::new(
        FrontendConfig::from_env(),
        Arc::new(source),
        GameContract::new(chain.game_contract.clone()),
        LordsContract::new(chain.lords_contract.clone()),
    );
    ctx.connect(Arc::new(transport));

    let mut session = Session::new(ctx.clone());
    let syscalls = Syscalls::new(ctx.clone());
    session.select_adventurer(devnet::DEVNET_ADVENTURER).await?;

    syscalls.mint_lords().await?;
    print_screens(&ctx);

    for round in 1..=rounds {
        match syscalls.attack(till_death).await {
            Ok(report) => {
                tracing::info!(round, hash = %report.hash, "Attack confirmed");
                print_notification(&ctx);
                print_screens(&ctx);
                if report.died {
                    break;
                }
            }
            Err(ActionError::Gated(reason)) => {
                println!("Battle over: {reason}");
                break;
            }
            Err(error) => return Err(error.into()),
        }
    }

    session.disconnect();
    Ok(())
}

fn print_screens(ctx: &ClientContext) {
    println!("{}", render::header(&ctx.header_view(chrono::Utc::now())));
    println!("{}", render::info(&ctx.info_view()));
    println!("{}", render::beast_screen(&ctx.beast_screen_view()));
    println!();
}

#[cfg(feature = "devnet")]
fn print_notification(ctx: &ClientContext) {
    ctx.loading().read(|loading| {
        if let Some(message) = &loading.death_message {
            println!(">> {message}");
        } else if let Some(latest) = loading.notifications.latest() {
            println!(">> {}", latest.text);
        }
    });
}
