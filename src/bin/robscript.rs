// src/bin/robscript.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use robscript::{
    constants,
    core::{automaton, dispatch::ConsoleDispatcher, parameters, template},
    models::RunOutcome,
    system::log_sink::FileSink,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Renders a rob-script template against a JSON parameter file, then executes
/// it, reporting uploads and status updates as prefixed console lines.
#[derive(Parser, Debug)]
#[command(name = "robscript", version, about)]
struct Cli {
    /// Path to the rob-script template to run.
    script: PathBuf,

    /// Path to a JSON file with the template parameters.
    params: PathBuf,

    /// Worker name used when naming the log reported after a failure.
    #[arg(long, default_value = "")]
    worker_name: String,
}

/// The main entry point of the stand-alone `robscript` runner.
/// It sets up logging, parses arguments, and performs centralized error
/// handling: pre-execution errors and failed runs both exit non-zero.
fn main() {
    env_logger::init();

    match run_cli(Cli::parse()) {
        Ok(RunOutcome::Completed) => {}
        Ok(RunOutcome::Failed) => {
            // The automaton already reported the failure through the
            // dispatcher; the exit code is the only thing left to say.
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_cli(cli: Cli) -> Result<RunOutcome> {
    log::debug!("CLI args parsed: {:?}", cli);

    let raw_script = fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script '{}'", cli.script.display()))?;
    let context = parameters::load_context_file(&cli.params)?;

    // Template sanity runs inside the renderer; a submission referencing an
    // undeclared variable is rejected before the automaton ever steps.
    let script = template::render_script(&raw_script, &context)?;

    let sink = FileSink::create(Path::new(constants::LOG_FILE_NAME))
        .with_context(|| format!("Failed to create build log '{}'", constants::LOG_FILE_NAME))?;

    let mut dispatcher = ConsoleDispatcher;
    Ok(automaton::run_script(
        &script,
        &mut dispatcher,
        Box::new(sink),
        &cli.worker_name,
    ))
}
