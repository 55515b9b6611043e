//! Headless command-line front end for the chip8 interpreter.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use chip8_core::{
    disassemble, display, CoreConfig, Key, Keypad, Machine, Quirks, Rom, DEFAULT_INSTRUCTIONS_PER_FRAME,
    DEFAULT_RNG_SEED, PROGRAM_ADDRESS,
};
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(test)]
use tempfile as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chip8", version, about = "Run or disassemble CHIP-8 ROMs without a frontend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a ROM for a number of frames and print the final screen
    Run(RunArgs),
    /// Print a listing of a ROM
    Disasm(DisasmArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// ROM image to load
    rom: PathBuf,

    /// Number of 60 Hz frames to run
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Instructions executed per frame
    #[arg(long, value_name = "N", default_value_t = DEFAULT_INSTRUCTIONS_PER_FRAME)]
    ipf: u32,

    /// Interpreter compatibility preset
    #[arg(long, value_enum, default_value_t = QuirksArg::Modern)]
    quirks: QuirksArg,

    /// Seed for the RND instruction
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    seed: u32,

    /// Hold a key (hex digit 0-F) for the whole run; repeatable
    #[arg(long = "key", value_name = "HEX", value_parser = parse_key)]
    keys: Vec<Key>,

    /// Print the final machine state as JSON instead of the screen
    #[arg(long, action = clap::ArgAction::SetTrue)]
    dump_state: bool,

    /// Write a save state after the run
    #[arg(long, value_name = "PATH")]
    save_state: Option<PathBuf>,

    /// Restore a save state before the run
    #[arg(long, value_name = "PATH")]
    load_state: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct DisasmArgs {
    /// ROM image to list
    rom: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum QuirksArg {
    Modern,
    Cosmac,
    Schip,
}

impl QuirksArg {
    const fn quirks(self) -> Quirks {
        match self {
            Self::Modern => Quirks::modern(),
            Self::Cosmac => Quirks::cosmac(),
            Self::Schip => Quirks::schip(),
        }
    }
}

fn parse_key(text: &str) -> Result<Key, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    match u8::from_str_radix(digits, 16) {
        Ok(value) if value < 16 => Ok(Key::from_nibble(value)),
        _ => Err(format!("expected a hex digit 0-F, got {text:?}")),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(&args),
        Command::Disasm(args) => disasm(&args.rom),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_rom(path: &Path) -> anyhow::Result<Rom> {
    Rom::from_path(path).with_context(|| format!("read rom {}", path.display()))
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let config = CoreConfig {
        instructions_per_frame: args.ipf,
        quirks: args.quirks.quirks(),
        rng_seed: args.seed,
    };
    let mut machine = Machine::new(config);
    let rom = load_rom(&args.rom)?;
    let name = rom.name.clone();
    machine
        .load_rom(rom)
        .with_context(|| format!("load rom {}", args.rom.display()))?;

    if let Some(path) = &args.load_state {
        let bytes = fs::read(path).with_context(|| format!("read state {}", path.display()))?;
        machine
            .restore(&bytes)
            .with_context(|| format!("restore state {}", path.display()))?;
    }

    let mut keys = Keypad::default();
    for key in &args.keys {
        keys.press(*key);
    }

    tracing::info!(rom = %name, frames = args.frames, "running");
    for frame in 0..args.frames {
        let outcome = machine.run_frame(keys);
        if let Some(fault) = outcome.fault {
            tracing::warn!(frame, %fault, "machine halted");
            break;
        }
    }

    if let Some(path) = &args.save_state {
        fs::write(path, machine.snapshot())
            .with_context(|| format!("write state {}", path.display()))?;
    }

    if args.dump_state {
        let json = serde_json::to_string_pretty(machine.state()).context("encode state")?;
        println!("{json}");
    } else {
        print!("{}", display::to_text(machine.video_memory()));
    }
    Ok(())
}

fn disasm(path: &Path) -> anyhow::Result<()> {
    let rom = load_rom(path)?;
    if rom.data.is_empty() {
        bail!("rom {} is empty", path.display());
    }
    for row in disassemble(&rom.data, PROGRAM_ADDRESS) {
        println!("{row}");
    }
    Ok(())
}
