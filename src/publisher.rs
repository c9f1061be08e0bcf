//! Bump, tag and push.
//!
//! [publish_bump] runs the whole release step against a [Repository]:
//! resolve the latest version, compute the next one, report the change,
//! then (unless this is a dry run) create an annotated tag on HEAD and push
//! it. A failed push leaves the local tag in place; nothing is rolled back.

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{tag_ref_name, tag_refspec, TaggedVersion, VersionBump};
use crate::error::Result;
use crate::git::{PushStatus, Repository, SshCredential};
use crate::resolver::{head_status, resolve_latest, HeadStatus, ResolutionStrategy};
use crate::ui;
use std::fmt;
use std::path::PathBuf;

/// Everything one publish run needs, fixed before it starts
#[derive(Clone, PartialEq)]
pub struct PublishOptions {
    pub bump: VersionBump,
    pub remote: String,
    pub dry_run: bool,
    pub strategy: ResolutionStrategy,
    pub abort_if_head_tagged: bool,
    pub ssh_key: PathBuf,
    pub ssh_password: String,
    pub ssh_user: String,
}

impl PublishOptions {
    pub fn from_config(config: &Config, bump: VersionBump, dry_run: bool) -> Self {
        PublishOptions {
            bump,
            remote: config.remote.clone(),
            dry_run,
            strategy: config.strategy,
            abort_if_head_tagged: config.abort_if_head_tagged,
            ssh_key: config.ssh_key.clone(),
            ssh_password: config.ssh_password.clone(),
            ssh_user: config.ssh_user.clone(),
        }
    }

    fn load_credential(&self) -> Result<SshCredential> {
        Ok(SshCredential::load(&self.ssh_key, &self.ssh_password)?
            .with_username(self.ssh_user.as_str()))
    }
}

impl fmt::Debug for PublishOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishOptions")
            .field("bump", &self.bump)
            .field("remote", &self.remote)
            .field("dry_run", &self.dry_run)
            .field("strategy", &self.strategy)
            .field("abort_if_head_tagged", &self.abort_if_head_tagged)
            .field("ssh_key", &self.ssh_key)
            .field("ssh_password", &"<redacted>")
            .field("ssh_user", &self.ssh_user)
            .finish()
    }
}

/// What a publish run did
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    /// Version the bump started from
    pub previous: TaggedVersion,
    /// Version that was (or would be) tagged
    pub next: TaggedVersion,
    pub head: HeadStatus,
    /// Tags ignored because they are not versions
    pub skipped: Vec<String>,
    /// Whether a tag was written to the repository
    pub created: bool,
    /// Push result, `None` when nothing was pushed
    pub push: Option<PushStatus>,
}

impl PublishOutcome {
    /// New tag name
    pub fn tag(&self) -> String {
        self.next.tag_name()
    }

    /// "<old> => <new>"
    pub fn transition(&self) -> String {
        ui::format_transition(&self.previous.to_string(), &self.next.tag_name())
    }
}

/// Compute the next version and, unless `dry_run`, tag HEAD with it and push.
///
/// # Errors
/// * `Resolution` - tags or HEAD cannot be read, or the bumped component
///   would overflow
/// * `Credential` - the SSH key cannot be loaded, or the remote refuses it
/// * `TagCreation` - the tag cannot be written
/// * `Push` - the remote rejected or could not receive the tag
///
/// A remote that already has the tag is not an error; the outcome carries
/// [PushStatus::UpToDate].
pub fn publish_bump<R: Repository + ?Sized>(
    repo: &R,
    options: &PublishOptions,
) -> Result<PublishOutcome> {
    let resolved = resolve_latest(repo, options.strategy)?;
    for tag in &resolved.skipped {
        ui::display_boundary_warning(&BoundaryWarning::MalformedTag { tag: tag.clone() });
    }

    let head = head_status(repo, &resolved)?;
    if head == HeadStatus::AlreadyTagged {
        let current_commit_hash = resolved
            .source_commit()
            .map(|oid| oid.to_string())
            .unwrap_or_default();
        ui::display_boundary_warning(&BoundaryWarning::HeadAlreadyTagged {
            latest_tag: resolved.latest.to_string(),
            current_commit_hash,
        });
    }

    let next = resolved.latest.bump(options.bump)?;
    let tag = next.tag_name();

    let mut outcome = PublishOutcome {
        previous: resolved.latest,
        next,
        head,
        skipped: resolved.skipped,
        created: false,
        push: None,
    };
    ui::display_transition(&outcome.previous.to_string(), &tag);

    if options.dry_run {
        tracing::info!(%tag, "dry run, repository left untouched");
        return Ok(outcome);
    }

    if head == HeadStatus::AlreadyTagged && options.abort_if_head_tagged {
        tracing::info!(%tag, "HEAD already tagged, not tagging again");
        return Ok(outcome);
    }

    let credential = options.load_credential()?;
    tracing::debug!(
        key = %credential.key_path().display(),
        passphrase = credential.has_passphrase(),
        user = credential.username(),
        "using SSH credential"
    );

    ui::display_status(&format!("tagging repo version {}...", tag));
    let target = repo.head_oid()?;
    let tag_oid = repo.create_annotated_tag(&tag, target, &tag)?;
    outcome.created = true;
    tracing::debug!(%tag, object = %tag_oid, commit = %target, "created annotated tag");

    ui::display_status(&format!(
        "pushing {} to {}...",
        tag_ref_name(&tag),
        options.remote
    ));
    let status = match repo.push_refspec(&options.remote, &tag_refspec(&tag), &credential) {
        Ok(status) => status,
        Err(e) => {
            ui::display_manual_push_instruction(&tag, &options.remote);
            return Err(e);
        }
    };
    if status == PushStatus::UpToDate {
        ui::display_boundary_warning(&BoundaryWarning::RemoteUpToDate {
            remote: options.remote.clone(),
        });
    }
    outcome.push = Some(status);

    ui::display_success("done");
    Ok(outcome)
}
