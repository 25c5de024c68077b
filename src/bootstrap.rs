//! Wires the adapters together and drives one import run.

use anyhow::{Context, Result};
use bundle_import_domain::ImportConfig;
use bundle_import_infra::{HibBundleSink, backend_for};
use bundle_import_usecase::{ImportOutcome, ImportSession};
use tracing::debug;

use crate::{
    cli::{self, Args},
    presentation::{self, ConsoleProgress},
};

pub fn run(args: &Args) -> Result<()> {
    let config = cli::build_config(args).context("invalid arguments")?;
    run_with_config(&config)
}

pub fn run_with_config(config: &ImportConfig) -> Result<()> {
    presentation::print_banner(config);

    let backend = backend_for(config).context("failed to set up the input filesystem")?;
    let sink = HibBundleSink::new();
    let progress = ConsoleProgress::stdout();

    debug!(backend = %config.backend, jobs = config.jobs, "session wired");
    let outcome = ImportSession::new(config, backend.as_ref(), &sink)
        .with_progress(&progress)
        .run()
        .with_context(|| format!("import into {} failed", config.destination.display()))?;

    match outcome {
        ImportOutcome::NoEntries => presentation::print_no_entries(config),
        ImportOutcome::Completed(_) => presentation::print_created(&config.destination),
    }
    Ok(())
}
