use anyhow::{Context, Result};
use colored::Colorize;
use prefixer::cli::parse_args;
use prefixer::error::PrefixerError;
use prefixer::{config, logger, output, pipeline};
use std::io::{self, Read};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let config = config::load_config()?;

    logger::init_logging(logger::debug_requested() || config.logging.debug)?;
    tracing::debug!(argv = ?std::env::args().collect::<Vec<_>>(), "starting");
    match config::config_file_path().filter(|path| path.exists()) {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file, using defaults"),
    }

    // Range errors abort here, before any input is read
    let options = args.into_options(&config)?;
    tracing::debug!(?options, "resolved options");

    let input = read_input()?;
    tracing::debug!(bytes = input.len(), "read input");

    let result = pipeline::transform(&options, &input);

    output::write_output(io::stdout().lock(), &result.output).context("Failed to write output")?;

    if let Some(sink) = &options.location {
        result.locations.flush(sink)?;
    }

    Ok(())
}

/// Read all of stdin as raw bytes
fn read_input() -> Result<Vec<u8>, PrefixerError> {
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .map_err(PrefixerError::InputRead)?;
    Ok(bytes)
}
