mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cumulate",
    about = "Flatten training-activity records and label cross-activity page reuse",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a directory of activity records into report files
    Run {
        /// Directory of source record files
        input_dir: PathBuf,

        /// Directory the report files are written into
        #[arg(long, short = 'o', default_value = "output")]
        out_dir: PathBuf,

        /// Write only the flat extract, skipping annotation and summary
        #[arg(long)]
        flat_only: bool,

        /// Optional YAML config file
        #[arg(long, env = "CUMULATE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Parse a single record file and show its extracted rows
    Inspect {
        /// Source record file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            input_dir,
            out_dir,
            flat_only,
            config,
        } => cmd::run::run(&input_dir, &out_dir, flat_only, config.as_deref(), cli.json),
        Commands::Inspect { file } => cmd::inspect::run(&file, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
