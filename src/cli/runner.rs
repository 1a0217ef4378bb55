use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zaytools::{
    EngineProbe, ProbeParams, ResizeParams, get_engine_options_with_params,
    resize_images_with_params,
};

use super::args::{CliArgs, Command, ProbeArgs, ResizeArgs};
use super::errors::AppError;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_resize(args: ResizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.is_dir() {
        error!("Error: The specified folder path does not exist.");
        return Err(AppError::InputDirNotFound { path: args.input }.into());
    }

    let params = ResizeParams {
        input_dir: args.input,
        width: args.width,
        height: args.height,
        filter: args.filter,
    };
    let report = resize_images_with_params(&params)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(AppError::from)?);
    }
    Ok(())
}

fn summarize(probe: &EngineProbe) {
    let name = probe.id.name.as_deref().unwrap_or("<unnamed engine>");
    match &probe.id.author {
        Some(author) => info!("Engine: {} by {}", name, author),
        None => info!("Engine: {}", name),
    }
    info!(
        "Outcome: {}, {} lines, {} options",
        probe.outcome,
        probe.lines.len(),
        probe.options.len()
    );
}

fn run_probe(args: ProbeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = ProbeParams {
        engine: args.engine,
        timeout_ms: args.timeout_ms,
        shutdown_grace_ms: args.grace_ms,
    };
    info!("Probing engine: {}", params.engine.display());

    let probe = get_engine_options_with_params(&params)?;
    summarize(&probe);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&probe).map_err(AppError::from)?);
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    match args.command {
        Command::Resize(resize) => run_resize(resize),
        Command::Probe(probe) => run_probe(probe),
    }
}
