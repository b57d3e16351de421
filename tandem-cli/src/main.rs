mod call;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use tandem_agent::{DEFAULT_SENDER_LABEL, DEFAULT_SIGNALING_URL};
use tandem_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cargo-tandem")]
#[command(bin_name = "cargo-tandem")]
enum Cli {
    Tandem(TandemArgs),
}

#[derive(clap::Args)]
struct TandemArgs {
    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long, env = "TANDEM_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,

        #[arg(long, default_value_t = 256)]
        command_capacity: usize,
    },

    /// Join a room and talk to whoever else joins it.
    Call {
        #[arg(long, env = "TANDEM_URL", default_value = DEFAULT_SIGNALING_URL)]
        url: String,

        #[arg(short, long, env = "TANDEM_ROOM")]
        room: String,

        #[arg(short, long, default_value = DEFAULT_SENDER_LABEL)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli::Tandem(args) = Cli::parse();
    init_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            bind,
            command_capacity,
        } => {
            println!("{}", format!("Tandem relay on ws://{bind}/ws").green().bold());
            let config = ServerConfig {
                bind,
                command_capacity,
            };
            tandem_server::serve(config, shutdown_signal()).await?;
        }

        Commands::Call { url, room, name } => {
            call::run(url, room, name).await?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("{}", "Shutting down...".yellow());
}
