//! Latest-version resolution from repository tags
//!
//! Two policies decide which tag is "latest":
//!
//! - [ResolutionStrategy::Semantic] picks the highest semantic version.
//! - [ResolutionStrategy::Recency] picks the tag whose target commit has the
//!   newest committer time, regardless of the version it names.
//!
//! Both skip tags that are not versions and fall back to `0.0.0` when
//! nothing usable is left.

use crate::domain::{TagRecord, TaggedVersion};
use crate::error::{GatError, Result};
use crate::git::Repository;
use git2::Oid;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Policy used to pick the latest tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// Highest version under semantic-version ordering
    #[default]
    Semantic,
    /// Tag on the most recently committed commit
    Recency,
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStrategy::Semantic => f.write_str("semantic"),
            ResolutionStrategy::Recency => f.write_str("recency"),
        }
    }
}

impl FromStr for ResolutionStrategy {
    type Err = GatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "semantic" | "semver" => Ok(ResolutionStrategy::Semantic),
            "recency" | "recent" | "time" => Ok(ResolutionStrategy::Recency),
            other => Err(GatError::config(format!(
                "Unknown resolution strategy '{}' (expected 'semantic' or 'recency')",
                other
            ))),
        }
    }
}

/// Outcome of resolving the latest version of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Latest version, `0.0.0` when no tag qualified
    pub latest: TaggedVersion,
    /// Tag the version was read from
    pub tag: Option<TagRecord>,
    /// Names of tags skipped because they are not versions
    pub skipped: Vec<String>,
}

impl ResolvedVersion {
    fn floor(skipped: Vec<String>) -> Self {
        ResolvedVersion {
            latest: TaggedVersion::floor(),
            tag: None,
            skipped,
        }
    }

    /// Commit the latest tag points at
    pub fn source_commit(&self) -> Option<Oid> {
        self.tag.as_ref().map(|t| t.target)
    }
}

/// Whether HEAD already carries the latest tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadStatus {
    Proceed,
    AlreadyTagged,
}

/// Find the latest version among the repository's tags.
///
/// Tags that fail to parse are skipped and listed in
/// [ResolvedVersion::skipped]. A repository without any
/// version tag resolves to `0.0.0` with no prefix. Ties (equal versions, or
/// equal commit times under [ResolutionStrategy::Recency]) go to the tag
/// enumerated first.
pub fn resolve_latest<R: Repository + ?Sized>(
    repo: &R,
    strategy: ResolutionStrategy,
) -> Result<ResolvedVersion> {
    let tags = repo.list_tags()?;
    tracing::debug!(count = tags.len(), %strategy, "resolving latest tag");

    let mut skipped = Vec::new();
    let mut best: Option<(TagRecord, TaggedVersion)> = None;

    for tag in tags {
        let version = match tag.version() {
            Ok(version) => version,
            Err(e) if e.is_recoverable() => {
                tracing::debug!(tag = %tag.name, reason = %e, "skipping tag");
                skipped.push(tag.name);
                continue;
            }
            Err(e) => return Err(e),
        };

        let replace = match &best {
            None => true,
            Some((best_tag, best_version)) => match strategy {
                ResolutionStrategy::Semantic => {
                    version.compare(best_version) == Ordering::Greater
                }
                ResolutionStrategy::Recency => tag.commit_time > best_tag.commit_time,
            },
        };

        if replace {
            best = Some((tag, version));
        }
    }

    let resolved = match best {
        Some((tag, latest)) => ResolvedVersion {
            latest,
            tag: Some(tag),
            skipped,
        },
        None => ResolvedVersion::floor(skipped),
    };

    tracing::debug!(latest = %resolved.latest, "resolved latest version");
    Ok(resolved)
}

/// Compare HEAD with `commit`.
pub fn is_head_already_tagged<R: Repository + ?Sized>(repo: &R, commit: Oid) -> Result<bool> {
    Ok(repo.head_oid()? == commit)
}

/// Decide whether HEAD is already covered by the resolved tag.
///
/// This only reports; the caller chooses whether to stop.
pub fn head_status<R: Repository + ?Sized>(
    repo: &R,
    resolved: &ResolvedVersion,
) -> Result<HeadStatus> {
    match resolved.source_commit() {
        Some(commit) if is_head_already_tagged(repo, commit)? => Ok(HeadStatus::AlreadyTagged),
        _ => Ok(HeadStatus::Proceed),
    }
}
