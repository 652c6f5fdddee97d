//! stemseq - terminal host for the stem sequencer
//!
//! Run with: cargo run -- play

mod app;
mod bounce;
mod demo;
mod ui;

use std::{fs::File, path::PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};

#[derive(Parser)]
#[command(name = "stemseq")]
#[command(about = "Play or bounce the stemseq demo arrangement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the demo through the default output device
    Play {
        /// Tempo in beats per minute
        #[arg(short, long, default_value = "120")]
        bpm: f64,

        /// Write logs to this file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Render the demo offline to a WAV file
    Bounce {
        /// Output WAV file path
        output: PathBuf,

        /// Number of bars to render (default: one arrangement loop)
        #[arg(long)]
        bars: Option<u32>,

        /// Tempo in beats per minute
        #[arg(short, long, default_value = "120")]
        bpm: f64,

        /// Sample rate in Hz
        #[arg(short, long, default_value = "48000")]
        sample_rate: u32,
    },
}

fn init_logging(log_file: Option<&PathBuf>) -> EyreResult<()> {
    let mut builder = env_logger::Builder::new();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            builder
                .filter_level(log::LevelFilter::Info)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.parse_default_env().init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { bpm, log_file } => {
            // Without a log file, logs only reach stderr when RUST_LOG asks
            // for them, so they do not tear the TUI.
            init_logging(log_file.as_ref())?;
            app::run(bpm)
        }
        Commands::Bounce {
            output,
            bars,
            bpm,
            sample_rate,
        } => {
            env_logger::Builder::new()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .init();
            bounce::run(&output, bars, bpm, sample_rate)
        }
    }
}
