use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use emu8vm::{Config, Machine, Quirks, TIMER_FREQUENCY};

mod keymap;
mod logger;
mod run;

/// Runs a CHIP-8 program in a window.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Microseconds between instruction cycles
    #[arg(long, default_value_t = 1000)]
    cycle_us: u64,

    /// Delay and sound timer rate in ticks per second
    #[arg(long, default_value_t = TIMER_FREQUENCY)]
    timer_hz: u32,

    /// Mask RND results with the instruction's byte
    #[arg(long)]
    mask_random: bool,

    /// Size multiplier for each pixel
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    scale: u32,

    /// More logging; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less logging
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            cycle_interval: Duration::from_micros(self.cycle_us),
            timer_interval: Config::timer_interval_for(self.timer_hz),
            quirks: Quirks {
                mask_random: self.mask_random,
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::level_for(args.verbose, args.quiet))?;

    let program = std::fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;
    let machine = Machine::with_config(&program, args.config())
        .with_context(|| format!("unable to load ROM {}", args.rom.display()))?;
    info!("loaded {} bytes from {}", program.len(), args.rom.display());

    run::run(machine, args.scale)
}
