use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gat::cli::{run_publish_workflow, PublishWorkflowArgs};
use gat::domain::VersionBump;
use gat::resolver::ResolutionStrategy;
use gat::ui;

#[derive(clap::Parser)]
#[command(
    name = "gat",
    version,
    about = "Gat is a tagging tool for git.",
    long_about = "Gat is a tagging tool for git. It gets the last version and tags it for you automatically"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(
        long,
        visible_alias = "dryrun",
        global = true,
        help = "Avoid touching the current git repository"
    )]
    dry_run: bool,

    #[arg(long, global = true, help = "Remote to push the tag to [default: origin]")]
    remote: Option<String>,

    #[arg(
        long = "sshfile",
        global = true,
        help = "SSH key used to authenticate on the git remote [default: ~/.ssh/id_rsa]"
    )]
    ssh_file: Option<PathBuf>,

    #[arg(long = "sshpwd", global = true, help = "SSH key password")]
    ssh_password: Option<String>,

    #[arg(
        long,
        global = true,
        help = "How to pick the latest tag: semantic or recency [default: semantic]"
    )]
    strategy: Option<ResolutionStrategy>,

    #[arg(long, global = true, help = "Do nothing when HEAD already has the latest tag")]
    abort_if_tagged: bool,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Print debug logs")]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Bumps the major version of your software
    Major,
    /// Bumps the minor version of your software
    Minor,
    /// Bumps the patch version of your software
    Patch,
}

impl From<Command> for VersionBump {
    fn from(command: Command) -> Self {
        match command {
            Command::Major => VersionBump::Major,
            Command::Minor => VersionBump::Minor,
            Command::Patch => VersionBump::Patch,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let workflow_args = PublishWorkflowArgs {
        bump: args.command.into(),
        repo_path: PathBuf::from("."),
        config_path: args.config,
        remote: args.remote,
        ssh_key: args.ssh_file,
        ssh_password: args.ssh_password,
        strategy: args.strategy,
        abort_if_tagged: args.abort_if_tagged,
        dry_run: args.dry_run,
    };

    if let Err(e) = run_publish_workflow(workflow_args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
