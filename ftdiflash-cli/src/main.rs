//! ftdiflash CLI - SPI NOR flash programmer for FTDI MPSSE bridges.
//!
//! ## Features
//!
//! - Erase, program, and verify raw binary images
//! - Read flash contents back to a file
//! - Channel enumeration and JEDEC ID/status queries
//! - Optional bit-order reversal for reverse-wired boards
//! - Shell completion generation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use env_logger::Env;
use ftdiflash::bridge::mpsse::MpsseBridge;
use ftdiflash::{DeviceParams, Flash};
use std::path::PathBuf;

mod commands;

/// ftdiflash - program SPI NOR flash memories over FTDI MPSSE bridges.
///
/// Environment variables:
///   FTDIFLASH_CHANNEL - Default FTDI channel index
#[derive(Parser)]
#[command(name = "ftdiflash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// FTDI channel index to use.
    #[arg(
        short,
        long,
        global = true,
        default_value = "0",
        env = "FTDIFLASH_CHANNEL"
    )]
    channel: u32,

    /// Reverse the bit order of every data byte on the bus.
    #[arg(long, global = true)]
    bit_swap: bool,

    /// Verbose output level (-v, -vv, -vvv for increasing detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List available FTDI channels.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the JEDEC ID and status register of the attached memory.
    Info,

    /// Erase the entire memory to 0xFF.
    Erase,

    /// Erase the memory, program an image, and verify it by read-back.
    Write {
        /// Path to the raw binary image.
        file: PathBuf,

        /// Skip the read-back verification pass.
        #[arg(long)]
        no_verify: bool,
    },

    /// Read flash contents into a file.
    Read {
        /// Output file path.
        file: PathBuf,

        /// Number of bytes to read (defaults to the whole capacity).
        #[arg(short = 'n', long)]
        length: Option<usize>,
    },

    /// Check whether the whole memory reads as erased (all 0xFF).
    Empty,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("{} {err:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List { json } => commands::list::cmd_list(*json),
        Commands::Info => commands::info::cmd_info(cli),
        Commands::Erase => commands::erase::cmd_erase(cli),
        Commands::Write { file, no_verify } => commands::write::cmd_write(cli, file, *no_verify),
        Commands::Read { file, length } => commands::read::cmd_read(cli, file, *length),
        Commands::Empty => commands::empty::cmd_empty(cli),
        Commands::Completions { shell } => commands::completions::cmd_completions(*shell),
    }
}

/// Map `-v` counts onto env_logger filter levels.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Open the configured FTDI channel and wrap it in a protocol engine.
fn open_flash(cli: &Cli) -> Result<Flash<MpsseBridge>> {
    let params = DeviceParams::default();
    let bridge = MpsseBridge::open(cli.channel, &params)
        .with_context(|| format!("could not open FTDI channel {}", cli.channel))?;

    if !cli.quiet {
        eprintln!("{} Using {}", style("->").cyan(), bridge.name());
    }

    Ok(Flash::new(bridge, params).with_bit_swap(cli.bit_swap))
}
