mod args;

use std::time::Duration;

pub use args::Args;
use bundle_import_domain::{Backend, ImportConfig, WebHdfsConfig};
use bundle_import_shared_kernel::{PresentationError, Result};
use clap::Parser;

const MAX_JOBS: usize = 512;

/// Parse the process arguments. Exits with usage on malformed input.
pub fn parse_args() -> Args {
    Args::parse()
}

/// Build the run configuration from parsed arguments.
pub fn build_config(args: &Args) -> Result<ImportConfig> {
    validate_jobs("--jobs", args.jobs)?;
    if args.http_timeout == 0 {
        return Err(PresentationError::InvalidValue {
            flag: "--http-timeout".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into());
    }

    let webhdfs = WebHdfsConfig {
        endpoint: args.webhdfs_url.clone(),
        user: args.hdfs_user.clone().filter(|u| !u.trim().is_empty()),
        timeout: Duration::from_secs(args.http_timeout),
    };
    let config = ImportConfig::new(args.image_directory.clone(), args.output_bundle.clone())
        .with_overwrite(args.force)
        .with_backend(Backend::from_hdfs_flag(args.hdfs_input))
        .with_jobs(args.jobs.unwrap_or_else(num_cpus::get).clamp(1, MAX_JOBS))
        .with_webhdfs(webhdfs);

    config.validate().map_err(|e| PresentationError::ConfigBuildFailed(e.to_string()))?;
    Ok(config)
}

fn validate_jobs(flag: &str, jobs: Option<usize>) -> Result<()> {
    match jobs {
        Some(j) if j == 0 || j > MAX_JOBS => Err(PresentationError::InvalidValue {
            flag: flag.to_string(),
            value: j.to_string(),
            reason: format!("must be between 1 and {MAX_JOBS}"),
        }
        .into()),
        _ => Ok(()),
    }
}
