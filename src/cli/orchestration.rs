//! Main workflow orchestration logic
//!
//! Turns command-line arguments and the configuration file into a
//! [PublishOptions] value, opens the repository and runs the publisher.
//! Kept apart from clap so the workflow can be driven programmatically.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

use crate::config::{load_config, Config};
use crate::domain::VersionBump;
use crate::git::Git2Repository;
use crate::publisher::{publish_bump, PublishOptions, PublishOutcome};
use crate::resolver::ResolutionStrategy;
use crate::ui;

/// Arguments for the publish workflow
///
/// `None` and `false` leave the configured value in place.
#[derive(Clone, PartialEq)]
pub struct PublishWorkflowArgs {
    pub bump: VersionBump,

    /// Directory inside the repository to tag
    pub repo_path: PathBuf,

    /// Path to custom config file
    pub config_path: Option<String>,

    pub remote: Option<String>,

    pub ssh_key: Option<PathBuf>,

    pub ssh_password: Option<String>,

    pub strategy: Option<ResolutionStrategy>,

    /// Stop when HEAD already carries the latest tag
    pub abort_if_tagged: bool,

    /// Preview mode - don't create tags or push
    pub dry_run: bool,
}

impl PublishWorkflowArgs {
    pub fn new(bump: VersionBump) -> Self {
        PublishWorkflowArgs {
            bump,
            repo_path: PathBuf::from("."),
            config_path: None,
            remote: None,
            ssh_key: None,
            ssh_password: None,
            strategy: None,
            abort_if_tagged: false,
            dry_run: false,
        }
    }
}

impl fmt::Debug for PublishWorkflowArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishWorkflowArgs")
            .field("bump", &self.bump)
            .field("repo_path", &self.repo_path)
            .field("config_path", &self.config_path)
            .field("remote", &self.remote)
            .field("ssh_key", &self.ssh_key)
            .field("ssh_password", &self.ssh_password.as_ref().map(|_| "<redacted>"))
            .field("strategy", &self.strategy)
            .field("abort_if_tagged", &self.abort_if_tagged)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Merge command-line overrides into the loaded configuration
pub fn build_options(args: &PublishWorkflowArgs, mut config: Config) -> PublishOptions {
    if let Some(remote) = &args.remote {
        config.remote = remote.clone();
    }
    if let Some(ssh_key) = &args.ssh_key {
        config.ssh_key = ssh_key.clone();
    }
    if let Some(password) = &args.ssh_password {
        config.ssh_password = password.clone();
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if args.abort_if_tagged {
        config.abort_if_head_tagged = true;
    }

    PublishOptions::from_config(&config, args.bump, args.dry_run)
}

/// Main publish workflow
///
/// 1. Load configuration and apply overrides
/// 2. Open the git repository
/// 3. Resolve, bump, tag and push
pub fn run_publish_workflow(args: PublishWorkflowArgs) -> Result<PublishOutcome> {
    ui::display_status(&format!("tag {} version", args.bump));

    let config = load_config(args.config_path.as_deref()).context("Error loading config")?;
    let options = build_options(&args, config);
    tracing::debug!(strategy = %options.strategy, remote = %options.remote, dry_run = options.dry_run, "publish options");

    let repo = Git2Repository::open(&args.repo_path)?;
    let outcome = publish_bump(&repo, &options)
        .with_context(|| format!("Cannot publish {} version", args.bump))?;

    Ok(outcome)
}
