//! Cargodesk CLI
//!
//! Command-line consumer of the Cargodesk store: authentication, delivery
//! lifecycle, and driver tracking. All data semantics live in
//! `cargodesk-core`; this binary only renders results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cargodesk_core::Store;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "cargodesk")]
#[command(about = "Cargodesk - fleet and delivery tracking")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and start a session
    Login {
        /// Account email
        email: String,
        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the currently logged-in profile
    Whoami,
    /// Manage deliveries
    Pod {
        #[command(subcommand)]
        command: PodCommands,
    },
    /// Manage and track drivers
    Driver {
        #[command(subcommand)]
        command: DriverCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show store status and collection counts
    Status,
}

#[derive(Subcommand)]
enum PodCommands {
    /// List deliveries
    #[command(alias = "ls")]
    List {
        /// Filter by assigned driver id
        #[arg(long)]
        driver: Option<String>,
        /// Filter by status (pending, in_transit, delivered)
        #[arg(long)]
        status: Option<String>,
        /// Show at most this many deliveries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one delivery
    Show {
        /// Delivery id
        id: String,
    },
    /// Create a new delivery
    #[command(alias = "add")]
    Create {
        /// Waybill number
        #[arg(long)]
        awb: String,
        /// Move type (local, international)
        #[arg(long, default_value = "local")]
        move_type: String,
        /// Piece count
        #[arg(long, default_value_t = 1)]
        pieces: u32,
        /// Weight in kg
        #[arg(long)]
        weight: f64,
        /// Origin address
        #[arg(long)]
        origin: String,
        /// Destination address
        #[arg(long)]
        destination: String,
        /// Cargo description
        #[arg(long, default_value = "")]
        description: String,
        /// Assigned driver id
        #[arg(long)]
        driver: String,
    },
    /// Mark a delivery as picked up (in transit)
    Dispatch {
        /// Delivery id
        id: String,
    },
    /// Mark a delivery as delivered
    Deliver {
        /// Delivery id
        id: String,
        /// Recipient name
        #[arg(long)]
        recipient: String,
        /// Signature artifact URL
        #[arg(long)]
        signature: Option<String>,
    },
}

#[derive(Subcommand)]
enum DriverCommands {
    /// List driver profiles
    #[command(alias = "ls")]
    List,
    /// Register a new driver
    Add {
        /// Display name
        name: String,
        /// Login email
        #[arg(long)]
        email: String,
        /// Initial password
        #[arg(long)]
        password: String,
    },
    /// Show a driver's recent location history
    Track {
        /// Driver profile id
        id: String,
        /// Number of samples to show
        #[arg(long, default_value_t = 12)]
        limit: usize,
    },
    /// Report a driver's current position
    Report {
        /// Driver profile id
        id: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        /// Speed in km/h
        #[arg(long)]
        speed: Option<f64>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, simulated_latency_ms, duplicate_ids)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return commands::config::handle(command.clone(), &output);
    }

    let store = Store::open()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&store, &email, &password, &output)
        }
        Commands::Logout => commands::auth::logout(&store, &output),
        Commands::Whoami => commands::auth::whoami(&store, &output),
        Commands::Pod { command } => handle_pod_command(command, &store, &output),
        Commands::Driver { command } => handle_driver_command(command, &store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
    }
}

fn handle_pod_command(command: PodCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        PodCommands::List {
            driver,
            status,
            limit,
        } => commands::pod::list(store, driver, status, limit, output),
        PodCommands::Show { id } => commands::pod::show(store, &id, output),
        PodCommands::Create {
            awb,
            move_type,
            pieces,
            weight,
            origin,
            destination,
            description,
            driver,
        } => commands::pod::create(
            store,
            commands::pod::CreateArgs {
                awb,
                move_type,
                pieces,
                weight,
                origin,
                destination,
                description,
                driver,
            },
            output,
        ),
        PodCommands::Dispatch { id } => commands::pod::dispatch(store, &id, output),
        PodCommands::Deliver {
            id,
            recipient,
            signature,
        } => commands::pod::deliver(store, &id, &recipient, signature, output),
    }
}

fn handle_driver_command(command: DriverCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        DriverCommands::List => commands::driver::list(store, output),
        DriverCommands::Add {
            name,
            email,
            password,
        } => commands::driver::add(store, &name, &email, &password, output),
        DriverCommands::Track { id, limit } => commands::driver::track(store, &id, limit, output),
        DriverCommands::Report {
            id,
            lat,
            lng,
            speed,
        } => commands::driver::report(store, &id, lat, lng, speed, output),
    }
}
