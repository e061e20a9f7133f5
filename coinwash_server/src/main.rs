use ::core::num::NonZeroU32;

use ::clap::{Parser, Subcommand};
use ::coinwash_common::{
    config::load_config,
    database::{surrealdb_client::SurrealDBClient, Database},
    error::Result,
    tokio::{self, net::TcpListener},
    tracing::info,
    tracing_subscriber,
};
use ::coinwash_server::{get_server, seed_machines, ServerConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Coinwash laundromat server
struct Cli {
    /// path to the config file
    #[arg(long)]
    config_path: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the http api (default)
    Serve,
    /// Remove all machines and create the configured fleet
    Seed,
    /// Set the cycle length of every machine
    SetDuration {
        /// minutes per cycle, at least 1
        minutes: NonZeroU32,
    },
}

#[tokio::main]
/// Start Coinwash server
async fn main() -> Result<()> {
    // setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ServerConfig {
        listen,
        database,
        fleet,
    } = load_config(&cli.config_path)?;
    let db = SurrealDBClient::connect(&database).await?;
    info!("Using database {}", db.get_uri());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = get_server(db, fleet);
            let listener = TcpListener::bind(listen).await?;
            info!("Coinwash server is listening on {}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        Command::Seed => {
            seed_machines(&db, &fleet).await?;
        }
        Command::SetDuration { minutes } => {
            let count = db.set_all_durations(minutes).await?;
            info!("Set duration of {} machines to {} minutes", count, minutes);
        }
    }
    Ok(())
}
