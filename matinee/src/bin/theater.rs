//! Binary target for the theater queueing simulation.
//!
//! Reads the staffing of the three service stations, runs the simulation to
//! the horizon, and prints the average wait time.

use clap::Parser;
use matinee::{SimulationError, TheaterConfig, TheaterSimulation, from_minutes};

#[derive(Debug, Parser)]
#[command(name = "theater")]
struct Args {
    /// Number of cashier stations selling tickets.
    #[arg(long, default_value_t = 1)]
    cashiers: i64,

    /// Number of snack counter servers.
    #[arg(long, default_value_t = 1)]
    servers: i64,

    /// Number of ushers checking tickets.
    #[arg(long, default_value_t = 1)]
    ushers: i64,

    /// Simulated duration of the run, in minutes.
    #[arg(long, default_value_t = 600.0)]
    horizon_minutes: f64,

    /// Seed for service-time and snack-choice draws.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();

    let args = Args::parse();

    let (config, defaulted) = TheaterConfig::from_input(args.cashiers, args.servers, args.ushers);
    if defaulted {
        eprintln!(
            "Could not honor the requested staffing. The simulation will use default values: \
             1 cashier, 1 server, 1 usher."
        );
    }

    let horizon =
        from_minutes(args.horizon_minutes).expect("horizon must be finite and non-negative");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");
    let local = tokio::task::LocalSet::new();

    let records = local
        .block_on(
            &runtime,
            TheaterSimulation::new(config)
                .horizon(horizon)
                .seed(args.seed)
                .run(),
        )
        .expect("simulation failed");

    println!("{} moviegoers made it to their seats.", records.len());
    match records.summary() {
        Ok(summary) => println!("Average wait time is: {summary}"),
        Err(SimulationError::EmptyStatistics) => println!("Average wait time is: no data"),
        Err(error) => eprintln!("Could not summarize wait times: {error}"),
    }
}
