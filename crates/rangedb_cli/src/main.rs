//! RangeDB CLI
//!
//! Command-line tools for planning and creating RangeDB indexes.
//!
//! # Commands
//!
//! - `plan` - Validate a block size and order for a record length
//! - `create` - Build an index at a location
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use rangedb_storage::FileMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RangeDB command-line index tools.
#[derive(Parser)]
#[command(name = "rangedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate index geometry without touching storage
    Plan {
        /// Block size in bytes
        #[arg(short, long)]
        block_size: u32,

        /// Record length in bytes
        #[arg(short, long)]
        record_length: usize,

        /// Expected tree order
        #[arg(short, long)]
        order: Option<u32>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build an index and close it
    Create {
        /// Directory for the index files
        #[arg(short, long, required_unless_present = "mem")]
        path: Option<PathBuf>,

        /// Base name of the index files
        #[arg(short, long)]
        name: String,

        /// Build in memory instead of on disk
        #[arg(long)]
        mem: bool,

        /// Key length in bytes
        #[arg(short, long)]
        key_length: usize,

        /// Value length in bytes
        #[arg(long, default_value = "0")]
        value_length: usize,

        /// Block size in bytes
        #[arg(short, long, default_value_t = rangedb_core::DEFAULT_BLOCK_SIZE)]
        block_size: u32,

        /// Expected tree order
        #[arg(short, long)]
        order: Option<u32>,

        /// Read cache size in blocks
        #[arg(long, default_value_t = rangedb_core::DEFAULT_READ_CACHE_SIZE)]
        read_cache: usize,

        /// Write cache size in blocks
        #[arg(long, default_value_t = rangedb_core::DEFAULT_WRITE_CACHE_SIZE)]
        write_cache: usize,

        /// File access mode (mapped, direct)
        #[arg(short, long, default_value = "mapped")]
        mode: FileMode,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Plan {
            block_size,
            record_length,
            order,
            format,
        } => {
            commands::plan::run(block_size, record_length, order, &format)?;
        }
        Commands::Create {
            path,
            name,
            mem,
            key_length,
            value_length,
            block_size,
            order,
            read_cache,
            write_cache,
            mode,
            format,
        } => {
            let location = commands::create::location(path, &name, mem)?;
            let mut params = rangedb_core::IndexParams::new()
                .block_size(block_size)
                .read_cache_size(read_cache)
                .write_cache_size(write_cache)
                .file_mode(mode);
            if let Some(order) = order {
                params = params.order(order);
            }
            commands::create::run(&location, key_length, value_length, &params, &format)?;
        }
        Commands::Version => {
            println!("RangeDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("RangeDB Core v{}", rangedb_core::VERSION);
        }
    }

    Ok(())
}
