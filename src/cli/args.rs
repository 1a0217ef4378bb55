use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use zaytools::ResampleFilter;
use zaytools::core::params::{
    DEFAULT_ENGINE, DEFAULT_HEIGHT, DEFAULT_INPUT_DIR, DEFAULT_PROBE_TIMEOUT_MS,
    DEFAULT_SHUTDOWN_GRACE_MS, DEFAULT_WIDTH,
};

#[derive(Parser)]
#[command(name = "zaytools", version, about = "PNG batch resizer and UCI engine prober")]
pub struct CliArgs {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stretch every PNG in a folder to exact dimensions, writing to <input>/../resized
    Resize(ResizeArgs),
    /// Launch a UCI engine, send `uci` and list what it answers
    Probe(ProbeArgs),
}

#[derive(Args)]
pub struct ResizeArgs {
    /// Folder containing the PNGs to resize
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// Target width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Target height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Resampling filter (nearest, bilinear, catmull-rom, mitchell, lanczos3)
    #[arg(long, value_enum, default_value_t = ResampleFilter::Lanczos3)]
    pub filter: ResampleFilter,

    /// Print the batch report as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Engine JAR (run through java) or native executable
    #[arg(short, long, default_value = DEFAULT_ENGINE)]
    pub engine: PathBuf,

    /// Read window after the handshake, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Time the engine gets to exit after `quit` before it is killed, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SHUTDOWN_GRACE_MS)]
    pub grace_ms: u64,

    /// Print the probe result as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
