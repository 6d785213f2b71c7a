use anyhow::Result;
use clap::{Parser, Subcommand};
use dynseq_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dynseq")]
#[command(about = "Dynseq - Replay and inspect dynamic sequence behaviour", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON operation script against a tracked sequence
    Replay {
        /// Input JSON file (array of operations), or - for stdin
        #[arg(short, long)]
        input: String,

        /// Output JSON file for the replay report
        #[arg(short, long)]
        output: Option<String>,

        /// Stop at the first failed operation
        #[arg(long)]
        stop_on_error: bool,
    },

    /// Show how capacity grows over a run of pushes
    Growth {
        /// Number of values to push
        #[arg(short, long, default_value = "1000")]
        count: usize,

        /// Shrink to fit afterwards
        #[arg(long)]
        shrink: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Replay {
            input,
            output,
            stop_on_error,
        } => commands::replay::execute(&input, output.as_deref(), stop_on_error),

        Commands::Growth { count, shrink } => commands::growth::execute(count, shrink),
    }
}
