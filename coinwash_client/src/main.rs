use ::std::process::ExitCode;

use ::clap::{Parser, Subcommand};
use ::coinwash_client::{coin::CoinTray, ClientError, MachineApi, MachineClient, Result};
use ::coinwash_common::{
    machine::{Machine, MachineId, MachineStatus, MachineTime},
    tokio,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Command line client of the Coinwash server
struct Cli {
    /// base url of the Coinwash server
    #[arg(long, default_value = "http://localhost:3000")]
    server_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all machines
    List,
    /// Create the default machines if there is none
    Init,
    /// Insert coins and start a machine
    Start {
        id: u32,
        /// number of 1 coins
        #[arg(long, default_value_t = 0)]
        one: u32,
        /// number of 5 coins
        #[arg(long, default_value_t = 0)]
        five: u32,
        /// number of 10 coins
        #[arg(long, default_value_t = 0)]
        ten: u32,
    },
    /// Set the status of a machine, e.g. AVAILABLE or MAINTENANCE
    Status { id: u32, status: MachineStatus },
}

fn machine_id(id: u32) -> Result<MachineId> {
    MachineId::new(id).map_err(|e| ClientError::Rejected(e.to_string()))
}

fn print_machines(machines: &[Machine]) {
    let now = MachineTime::now();
    for Machine { id, info } in machines {
        let remaining = info
            .remaining_secs(&now)
            .map(|secs| format!("{} min left", secs.div_ceil(60)))
            .unwrap_or_default();
        println!(
            "{:>3}  {:<12} {:<12} {:>4} coins  {:>3} min  {}",
            id, info.name, info.status, info.price, info.duration, remaining
        );
    }
}

async fn start<A: MachineApi>(api: &A, id: MachineId, mut tray: CoinTray) -> Result<()> {
    let machines = api.list_machines().await?;
    let machine = machines
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| ClientError::Rejected(format!("Machine {} not found", id)))?;
    let price = machine.info.price;
    println!("{}", tray.summary(price));
    let amount = tray
        .confirm(price)
        .ok_or_else(|| ClientError::Rejected(format!("Not enough coins for {}", machine.info.name)))?;
    let response = api.start_machine(id, amount).await?;
    println!(
        "{} started, change {}",
        response.machine.info.name, response.change
    );
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let api = MachineClient::new(&cli.server_url);
    match cli.command {
        Command::List => print_machines(&api.list_machines().await?),
        Command::Init => print_machines(&api.initialize_machines().await?),
        Command::Start { id, one, five, ten } => {
            start(&api, machine_id(id)?, CoinTray::with_counts(one, five, ten)).await?
        }
        Command::Status { id, status } => {
            let machine = api.set_status(machine_id(id)?, status).await?;
            print_machines(&[machine]);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
