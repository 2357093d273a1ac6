mod cli;

use stashnfo::{
    config,
    processor::{self, Job, Source},
};

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "stashnfo=debug,stashnfo_nfo=debug,stashnfo_common=debug".to_string()
        } else {
            "warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = cli.output_path();
    // Checked before the config is read or anything is parsed
    let source = Source::select(cli.input, cli.stash_id, cli.search)?;

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(key) = cli.api_key {
        config.stash.api_key = Some(key);
    }

    let job = Job {
        source,
        output,
        kind_override: cli.kind.kind(),
        pretty: cli.pretty,
        extract_images: cli.extract_images,
        overwrite: cli.overwrite,
    };

    let report = processor::run(&job, &config)?;
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    println!(
        "Wrote {} NFO to {} ({} bytes)",
        report.kind,
        report.output.display(),
        report.bytes
    );

    Ok(())
}

/// Exit status for a failed run: 2 for usage errors, 1 for everything else.
fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<stashnfo_common::Error>())
        .map(|e| e.exit_code())
        .unwrap_or(1)
}
