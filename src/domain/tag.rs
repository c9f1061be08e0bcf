use crate::domain::version::TaggedVersion;
use crate::error::Result;
use git2::Oid;

/// A tag reference as read from the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    /// Short tag name (e.g. "v1.2.3")
    pub name: String,
    /// Commit the tag points at, after peeling annotated tags
    pub target: Oid,
    /// Committer time of `target`, seconds since the epoch
    pub commit_time: i64,
}

impl TagRecord {
    pub fn new(name: impl Into<String>, target: Oid, commit_time: i64) -> Self {
        TagRecord {
            name: name.into(),
            target,
            commit_time,
        }
    }

    /// Parse the tag name as a version
    pub fn version(&self) -> Result<TaggedVersion> {
        TaggedVersion::parse(&self.name)
    }
}

/// Full reference name of a tag (e.g. "v1.2.3" -> "refs/tags/v1.2.3")
pub fn tag_ref_name(tag_name: &str) -> String {
    format!("refs/tags/{}", tag_name)
}

/// Refspec pushing a tag to the same reference on the remote
pub fn tag_refspec(tag_name: &str) -> String {
    let reference = tag_ref_name(tag_name);
    format!("{}:{}", reference, reference)
}
