#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The playable bot binary.
//!
//! Wires the agent to a match server over the stdin/stdout line protocol:
//! greeting, opening state, name, first action, then one action per turn
//! frame until the server closes the stream. Logs go to stderr; stdout
//! belongs to the wire.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use grimhold_agent::{Agent, AgentConfig, DEFAULT_NAME};
use grimhold_protocol::ServerLink;
use grimhold_system_strategy::RecruitMode;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Command-line options of the bot.
#[derive(Debug, Parser)]
#[command(name = "grimhold", about = "Tower-defense match bot")]
struct Options {
    /// Seed for the decision randomness; drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Display name reported to the server.
    #[arg(long, default_value = DEFAULT_NAME)]
    name: String,
    /// Disable mercenary hiring and run the structural policy alone.
    #[arg(long)]
    no_mercs: bool,
}

/// Entry point for the bot.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let options = Options::parse();
    let rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let config = AgentConfig {
        name: options.name,
        recruit_mode: if options.no_mercs {
            RecruitMode::Disabled
        } else {
            RecruitMode::BestLane
        },
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut link = ServerLink::new(stdin.lock(), stdout.lock());

    let team = link.read_team().context("reading the team greeting")?;
    info!(%team, "assigned side");
    let state = link.read_initial_state().context("reading the opening state")?;

    let (mut agent, name) = Agent::initialize(&state, team, config, rng);
    link.send_name(&name).context("sending the display name")?;
    let action = agent.act(&state);
    link.send_action(&action).context("sending the opening action")?;

    while let Some(state) = link.next_turn().context("reading a turn frame")? {
        let action = agent.act(&state);
        link.send_action(&action).context("sending a turn action")?;
    }
    info!("match stream ended");
    Ok(())
}
