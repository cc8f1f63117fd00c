//! capitalisk-deployer: run and extend a multi-network Capitalisk node.
//!
//! # Usage
//!
//! ```text
//! capitalisk-deployer deploy
//! capitalisk-deployer undeploy
//! capitalisk-deployer update
//! capitalisk-deployer genesis <file> [--network <symbol>]
//! capitalisk-deployer config show
//! capitalisk-deployer config write <module.json> [--module-project <name>]
//! capitalisk-deployer database create <name>
//! capitalisk-deployer add-network <genesis.json> <module.json> [--module-project <name>]
//! capitalisk-deployer status [--json]
//! ```
//!
//! Every subcommand accepts `--config`, `--root`, `--project`, `--network`
//! and `--repo`; see [`settings`].

mod commands;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    add_network::AddNetworkArgs, config::ConfigCommand, database::DatabaseCommand,
    genesis::GenesisArgs, status::StatusArgs,
};
use settings::GlobalArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "capitalisk-deployer",
    version,
    about = "Deploy a Capitalisk node and register additional chains on it",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone if needed, build and start the stack, then create every configured database.
    Deploy,

    /// Stop and remove the running stack.
    Undeploy,

    /// Recreate the stack's containers to pick up new configuration.
    Update,

    /// Write a genesis file into the deployment.
    Genesis(GenesisArgs),

    /// Inspect or edit the node's config.json.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage databases inside the project's Postgres container.
    Database {
        #[command(subcommand)]
        command: DatabaseCommand,
    },

    /// Onboard a chain: genesis, module config, database, then recreate the stack.
    AddNetwork(AddNetworkArgs),

    /// Show deployment state and registered modules. Never changes anything.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let global = cli.global;
    match cli.command {
        Commands::Deploy => commands::lifecycle::deploy(&global),
        Commands::Undeploy => commands::lifecycle::undeploy(&global),
        Commands::Update => commands::lifecycle::update(&global),
        Commands::Genesis(args) => args.run(&global),
        Commands::Config { command } => commands::config::run(command, &global),
        Commands::Database { command } => commands::database::run(command, &global),
        Commands::AddNetwork(args) => args.run(&global),
        Commands::Status(args) => args.run(&global),
    }
}

/// Logs go to stderr so command output on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
