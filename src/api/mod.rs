//! High-level, ergonomic library API: batch-resize a folder of PNGs and probe a
//! UCI engine's startup listing. Prefer these entrypoints over the low-level
//! `core` and `io` modules when integrating zaytools.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::params::{ProbeParams, ResizeParams};
use crate::core::resize::{is_png_file_name, output_dir_for, resize_to_exact};
use crate::core::uci::{EngineId, HANDSHAKE, SENTINEL, UciOption, is_option_line};
use crate::error::{Error, Result};
use crate::io::engine::{EngineCommand, EngineProcess, LineEvent, ShutdownReport};
use crate::io::png::{read_image, write_png};
use crate::types::{ProbeOutcome, ResampleFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub reason: String,
}

/// Summary of a resize batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub processed: usize,
    /// Entries that are not PNG files (directories included)
    pub skipped: usize,
    pub errors: usize,
    pub resized: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

/// Resize every PNG in `input_folder` to exactly `target_width` x `target_height`
/// with Lanczos3, writing into `input_folder/../resized`.
pub fn resize_images(
    input_folder: &Path,
    target_width: u32,
    target_height: u32,
) -> Result<BatchReport> {
    resize_images_with_params(&ResizeParams {
        input_dir: input_folder.to_path_buf(),
        width: target_width,
        height: target_height,
        filter: ResampleFilter::Lanczos3,
    })
}

pub fn resize_images_with_params(params: &ResizeParams) -> Result<BatchReport> {
    if params.width == 0 {
        return Err(Error::ZeroSize { arg: "width" });
    }
    if params.height == 0 {
        return Err(Error::ZeroSize { arg: "height" });
    }

    // Must list before create_dir_all: `input/../resized` would also create a missing `input`.
    let mut entries = fs::read_dir(&params.input_dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let output_dir = output_dir_for(&params.input_dir);
    if output_dir.is_dir() {
        info!("Saving to existing folder: {}", output_dir.display());
    } else {
        fs::create_dir_all(&output_dir)?;
        info!("Created output folder: {}", output_dir.display());
    }
    if fs::canonicalize(&output_dir)? == fs::canonicalize(&params.input_dir)? {
        return Err(Error::Processing(format!(
            "output folder {} is the input folder",
            output_dir.display()
        )));
    }

    info!(
        "Starting resize to {}x{} pixels ({})...",
        params.width, params.height, params.filter
    );

    let mut report = BatchReport {
        output_dir,
        ..BatchReport::default()
    };

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();

        if !path.is_file() || !is_png_file_name(&file_name) {
            debug!("Skipping: {:?}", path);
            report.skipped += 1;
            continue;
        }

        let output_path = report.output_dir.join(&file_name);
        let name = file_name.to_string_lossy().into_owned();

        match resize_one(&path, &output_path, params) {
            Ok(()) => {
                info!("Resized: {}", name);
                report.processed += 1;
                report.resized.push(output_path);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", name, e);
                report.errors += 1;
                report.failures.push(FileFailure {
                    file: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "--- Processing Complete. {} images resized. ---",
        report.processed
    );
    Ok(report)
}

fn resize_one(input: &Path, output: &Path, params: &ResizeParams) -> Result<()> {
    let image = read_image(input)?;
    debug!(
        "{:?}: {}x{} {:?}",
        input,
        image.width(),
        image.height(),
        image.color()
    );
    let resized = resize_to_exact(&image, params.width, params.height, params.filter)?;
    write_png(output, &resized)
}

/// What an engine said between the handshake and the end of the read window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineProbe {
    pub outcome: ProbeOutcome,
    /// Every stdout line received, in order, without line terminators
    pub lines: Vec<String>,
    pub id: EngineId,
    pub options: Vec<UciOption>,
    pub shutdown: ShutdownReport,
}

/// Launch `path_to_executable` (a JAR or native engine), send `uci` and collect
/// its answer for up to 5 seconds.
pub fn get_engine_options(path_to_executable: &Path) -> Result<EngineProbe> {
    get_engine_options_with_params(&ProbeParams {
        engine: path_to_executable.to_path_buf(),
        ..ProbeParams::default()
    })
}

pub fn get_engine_options_with_params(params: &ProbeParams) -> Result<EngineProbe> {
    let command = EngineCommand::for_engine(&params.engine);
    probe_engine(&command, params.timeout(), params.shutdown_grace())
}

/// Runs the handshake against an explicit launch command.
///
/// The engine is shut down before this returns, on success and on error alike.
pub fn probe_engine(
    command: &EngineCommand,
    timeout: Duration,
    shutdown_grace: Duration,
) -> Result<EngineProbe> {
    let mut engine = EngineProcess::spawn(command, shutdown_grace)?;
    engine.send(HANDSHAKE)?;

    let deadline = Instant::now() + timeout;
    let mut lines = Vec::new();
    let mut id = EngineId::default();
    let mut options = Vec::new();

    let outcome = loop {
        let line = match engine.next_line(deadline)? {
            LineEvent::Line(line) => line,
            LineEvent::Closed => break ProbeOutcome::StreamClosed,
            LineEvent::TimedOut => break ProbeOutcome::TimedOut,
        };

        info!("{}", line.trim());

        if is_option_line(&line) {
            match UciOption::parse(&line) {
                Ok(option) => options.push(option),
                Err(e) => warn!("Ignoring option declaration: {}", e),
            }
        } else {
            id.absorb(&line);
        }

        let found = line.contains(SENTINEL);
        lines.push(line);
        if found {
            break ProbeOutcome::SentinelFound;
        }
    };

    match outcome {
        ProbeOutcome::SentinelFound => debug!("Engine {} answered {}", command, SENTINEL),
        ProbeOutcome::StreamClosed => warn!("Engine {} closed its output before {}", command, SENTINEL),
        ProbeOutcome::TimedOut => warn!("No {} from {} within {:?}", SENTINEL, command, timeout),
    }

    let shutdown = engine.shutdown();
    Ok(EngineProbe {
        outcome,
        lines,
        id,
        options,
        shutdown,
    })
}
