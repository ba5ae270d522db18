//! # career-timeline CLI
//!
//! Command parsing and orchestration for the two operator commands:
//!
//! - `sync-env`: write the deployed API URL into the project's `.env.local`.
//! - `upload-data`: validate the career data JSON and upload it to the
//!   stack's S3 bucket.
//!
//! Business logic lives in `career-timeline-core`; this module wires the
//! AWS-backed collaborators into it and reports progress to the operator.
//! [`run`] is the programmatic entrypoint used by `main` and the tests. It
//! returns errors instead of exiting; `main` maps them to exit status 1.

use crate::aws::{AwsContext, CloudFormationDescriber, S3ObjectStore};
use crate::report;
use anyhow::Result;
use career_timeline_core::config::{load_settings, resolve_data_path, Settings};
use career_timeline_core::env_sync::sync_env_file;
use career_timeline_core::upload::{put_career_data, read_career_data, resolve_bucket};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "../data/careerEvents.json";
pub const DEFAULT_PROFILE: &str = "default";

/// Operator tooling for the career-timeline site.
#[derive(Parser, Debug)]
#[clap(
    name = "career-timeline",
    version,
    about = "Sync the career-timeline API URL into .env.local and upload career data to S3"
)]
pub struct Cli {
    /// Optional YAML settings file overriding stack and naming defaults
    #[clap(long, global = true, env = "CAREER_TIMELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root holding .env.local and the scripts/ and data/ directories
    #[clap(
        long,
        global = true,
        env = "CAREER_TIMELINE_ROOT",
        default_value = "."
    )]
    pub project_root: PathBuf,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the API URL from the stack outputs and update .env.local
    SyncEnv {
        /// AWS profile to use (defaults to the ambient AWS configuration)
        #[clap(long)]
        profile: Option<String>,
        /// AWS region (defaults to the ambient AWS configuration)
        #[clap(long)]
        region: Option<String>,
    },
    /// Upload career data to S3 without going through the site repository
    UploadData(UploadArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Path to career data JSON file, relative to <project-root>/scripts
    #[clap(short, long, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,
    /// AWS profile to use
    #[clap(short, long, default_value = DEFAULT_PROFILE)]
    pub profile: String,
    /// AWS region [default: eu-west-1, or default_region from the settings file]
    #[clap(short, long)]
    pub region: Option<String>,
}

pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let Cli {
        config,
        project_root,
        command,
    } = cli;
    let settings = match load_settings(config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            report::failure("Error loading settings:", &e);
            return Err(e);
        }
    };
    settings.trace_loaded();

    match command {
        Commands::SyncEnv { profile, region } => {
            tracing::info!(command = "sync-env", "Starting env sync");
            sync_env(&settings, &project_root, AwsContext { profile, region }).await
        }
        Commands::UploadData(args) => {
            tracing::info!(command = "upload-data", file = %args.file.display(), "Starting career data upload");
            upload_data(&settings, &project_root, args).await
        }
    }
}

async fn sync_env(settings: &Settings, project_root: &Path, aws: AwsContext) -> Result<()> {
    report::progress("Fetching API URL from AWS CloudFormation...");
    let sdk_config = aws.load().await;
    let describer = CloudFormationDescriber::new(&sdk_config);
    let env_path = settings.env_file_path(project_root);

    match sync_env_file(&describer, settings, &env_path).await {
        Ok(outcome) => {
            report::detail(format!("Retrieved API URL: {}", outcome.value()));
            if outcome.wrote_file() {
                report::success(format!(
                    "{} file has been updated with the latest API URL.",
                    settings.env_file_name
                ));
            } else {
                report::success(format!(
                    "{} is already up-to-date, no changes needed.",
                    settings.env_file_name
                ));
            }
            tracing::info!(command = "sync-env", ?outcome, "Env sync complete");
            Ok(())
        }
        Err(e) => {
            report::failure("Error updating API URL:", &e);
            Err(e.into())
        }
    }
}

async fn upload_data(settings: &Settings, project_root: &Path, args: UploadArgs) -> Result<()> {
    report::progress("🚀 Starting career data upload to S3...");

    let path = resolve_data_path(project_root, &args.file);
    report::detail(format!("Reading data from {}", path.display()));

    // Validate locally before any AWS client exists.
    let body = match read_career_data(&path) {
        Ok(body) => body,
        Err(e) => {
            report::failure("Error:", &e);
            return Err(e.into());
        }
    };
    report::success("✅ Career data file is valid JSON");

    let region = args
        .region
        .unwrap_or_else(|| settings.default_region.clone());
    report::progress(format!("Using AWS profile: {}", args.profile));
    let aws = AwsContext {
        profile: Some(args.profile),
        region: Some(region),
    };
    let sdk_config = aws.load().await;
    let describer = CloudFormationDescriber::new(&sdk_config);

    report::detail("Fetching S3 bucket name from CloudFormation stack...");
    let bucket = match resolve_bucket(&describer, settings).await {
        Ok(bucket) => bucket,
        Err(e) => {
            report::failure("Error uploading career data to S3:", &e);
            return Err(e.into());
        }
    };
    report::progress(format!("Found S3 bucket: {bucket}"));

    report::detail("Initializing S3 client...");
    let store = S3ObjectStore::new(&sdk_config);

    report::detail("Uploading data to S3...");
    match put_career_data(&store, settings, bucket, body).await {
        Ok(upload) => {
            report::success("✅ Career data successfully uploaded to S3!");
            report::detail(format!("Bucket: {}", upload.bucket));
            report::detail(format!("File: {}", upload.key));
            tracing::info!(command = "upload-data", ?upload, "Upload complete");
            Ok(())
        }
        Err(e) => {
            report::failure("Error uploading career data to S3:", &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_defaults_match_operator_expectations() {
        let cli = Cli::try_parse_from(["career-timeline", "upload-data"]).unwrap();
        match cli.command {
            Commands::UploadData(args) => {
                assert_eq!(args.file, PathBuf::from("../data/careerEvents.json"));
                assert_eq!(args.profile, "default");
                assert_eq!(args.region, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.project_root, PathBuf::from("."));
    }

    #[test]
    fn upload_short_flags_are_accepted() {
        let cli = Cli::try_parse_from([
            "career-timeline",
            "upload-data",
            "-f",
            "/tmp/events.json",
            "-p",
            "personal",
            "-r",
            "us-east-1",
        ])
        .unwrap();
        match cli.command {
            Commands::UploadData(args) => {
                assert_eq!(args.file, PathBuf::from("/tmp/events.json"));
                assert_eq!(args.profile, "personal");
                assert_eq!(args.region.as_deref(), Some("us-east-1"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "career-timeline",
            "sync-env",
            "--project-root",
            "/srv/site",
            "--region",
            "eu-west-1",
        ])
        .unwrap();
        assert_eq!(cli.project_root, PathBuf::from("/srv/site"));
        match cli.command {
            Commands::SyncEnv { profile, region } => {
                assert_eq!(profile, None);
                assert_eq!(region.as_deref(), Some("eu-west-1"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
