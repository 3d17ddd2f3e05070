//! Tweezer Command-Line Interface
//!
//! The main entry point for the tweezer CLI tool: ingest transpiler output,
//! merge single-qubit gates into a placement solution, and synthesize the
//! Steane fault-tolerant layout.
//!
//! ```text
//!   qobj.json ──extract──► gates.json + program.json ──► (placement solver)
//!                                                            │
//!   scheduled.json ◄──schedule── gates.json + solution.json ◄┘
//!        │
//!        └──encode──► encoded.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{compile, encode, extract, schedule, version};
use config::Config;

/// Tweezer - layer scheduling and fault-tolerant layout for neutral-atom arrays
#[derive(Parser)]
#[command(name = "tweezer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read transpiler output and write the gate stream and solver program
    Extract {
        /// Assembled qobj (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file for the gate stream
        #[arg(short, long)]
        gates: String,

        /// Output file for the two-qubit program
        #[arg(short, long)]
        program: String,
    },

    /// Merge single-qubit gates into a placement solution
    Schedule {
        /// Gate stream written by `extract`
        #[arg(short, long)]
        gates: String,

        /// Placement solver output
        #[arg(short, long)]
        solution: String,

        /// Output file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Steane-encode a scheduled circuit
    Encode {
        /// Scheduled circuit written by `schedule`
        #[arg(short, long)]
        input: String,

        /// Output file
        #[arg(short, long)]
        output: Option<String>,

        /// Fail instead of warning when the device capacity is exceeded
        #[arg(long)]
        strict_capacity: bool,

        /// Put the Hadamard rotations in the last intra-block CZ layer
        #[arg(long)]
        co_schedule_rotations: bool,

        /// Append a layer moving ancillas to the readout zone
        #[arg(long)]
        readout: bool,
    },

    /// Run the whole pipeline from transpiler output to final layout
    Compile {
        /// Assembled qobj (JSON)
        #[arg(short, long)]
        input: String,

        /// Placement solver output
        #[arg(short, long)]
        solution: String,

        /// Steane-encode the scheduled circuit
        #[arg(long)]
        steane: bool,

        /// Output file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose, &config);
    debug!(?config, "Loaded configuration");

    // Execute command
    let result = match cli.command {
        Commands::Extract {
            input,
            gates,
            program,
        } => extract::execute(&input, &gates, &program).await,

        Commands::Schedule {
            gates,
            solution,
            output,
        } => schedule::execute(&gates, &solution, output.as_deref(), &config).await,

        Commands::Encode {
            input,
            output,
            strict_capacity,
            co_schedule_rotations,
            readout,
        } => {
            let options = encode::EncodeOptions {
                strict_capacity,
                co_schedule_rotations,
                readout,
            };
            encode::execute(&input, output.as_deref(), options, &config).await
        }

        Commands::Compile {
            input,
            solution,
            steane,
            output,
        } => compile::execute(&input, &solution, steane, output.as_deref(), &config).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
