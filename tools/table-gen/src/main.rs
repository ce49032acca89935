//! table-gen - FPGA lookup table generator
//!
//! Writes the song ROM initialization file (.coe) and the Hann window
//! lookup module (.sv).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use table_gen::{build_hann_table, build_song_table, check_tables, load_config, TablesConfig};

#[derive(Parser)]
#[command(name = "table-gen")]
#[command(about = "Generate song ROM and Hann window lookup tables")]
#[command(version)]
struct Cli {
    /// Path to a tables.toml config (built-in tables are used if omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the song memory initialization file
    Song {
        /// Output .coe file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the Hann window lookup module
    Hann {
        /// Output .sv file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Index width in bits
        #[arg(long)]
        n_bits: Option<u32>,

        /// Coefficient width in bits
        #[arg(long)]
        out_bits: Option<u32>,

        /// Name of the generated module
        #[arg(long)]
        module: Option<String>,
    },

    /// Generate both tables
    All,

    /// Check that generated tables on disk are in sync with the config
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading config from {:?}", path);
            load_config(path)?
        }
        None => TablesConfig::default(),
    };

    match cli.command {
        Commands::Song { output } => {
            build_song_table(&config.song, output.as_deref())?;
        }

        Commands::Hann {
            output,
            n_bits,
            out_bits,
            module,
        } => {
            if let Some(n_bits) = n_bits {
                config.hann.n_bits = n_bits;
            }
            if let Some(out_bits) = out_bits {
                config.hann.out_bits = out_bits;
            }
            if let Some(module) = module {
                config.hann.module = module;
            }
            build_hann_table(&config.hann, output.as_deref())?;
        }

        Commands::All => {
            build_song_table(&config.song, None)?;
            build_hann_table(&config.hann, None)?;
        }

        Commands::Check => {
            if !check_tables(&config)? {
                anyhow::bail!("Tables are out of sync. Run 'table-gen all' to regenerate.");
            }
            tracing::info!("All tables are in sync!");
        }
    }

    Ok(())
}
