//! Command Line Interface (CLI) layer for zaytools.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the `resize` and `probe`
//! subcommands. It wires user-provided options to the library
//! functionality exposed via `zaytools::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
