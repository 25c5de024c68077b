// src/cli/args.rs
use std::path::PathBuf;

use bundle_import_domain::config::DEFAULT_WEBHDFS_ENDPOINT;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bundle-import",
    version = crate::VERSION,
    about = "Import a directory of JPEG, PNG, NIfTI and DICOM images into an image bundle",
    disable_help_flag = true
)]
pub struct Args {
    /// Directory holding the images (local path, or HDFS path with --hdfs-input)
    #[arg(value_name = "IMAGE_DIRECTORY")]
    pub image_directory: String,

    /// Bundle to create; a sibling <OUTPUT_BUNDLE>.dat is written too
    #[arg(value_name = "OUTPUT_BUNDLE")]
    pub output_bundle: PathBuf,

    /// Overwrite the output bundle if it already exists
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Read the image directory from HDFS instead of the local filesystem
    #[arg(short = 'h', long = "hdfs-input")]
    pub hdfs_input: bool,

    /// Number of source streams opened ahead of the writer (default: CPU count)
    #[arg(short = 'j', long, env = "BUNDLE_IMPORT_JOBS")]
    pub jobs: Option<usize>,

    /// WebHDFS endpoint of the namenode
    #[arg(long, env = "WEBHDFS_URL", default_value = DEFAULT_WEBHDFS_ENDPOINT)]
    pub webhdfs_url: String,

    /// HDFS user name sent with WebHDFS requests
    #[arg(long, env = "HADOOP_USER_NAME")]
    pub hdfs_user: Option<String>,

    /// Timeout for each WebHDFS request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub http_timeout: u64,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}
