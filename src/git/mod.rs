//! Git operations abstraction layer
//!
//! The tagging workflow only needs four things from a repository: enumerate
//! tags, read HEAD, create an annotated tag and push a refspec. They are
//! captured by the [Repository] trait so that the resolver and publisher can
//! run against a real repository or an in-memory one.
//!
//! - [repository::Git2Repository]: implementation backed by the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! ```rust
//! # use gat::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gat::Result<()> {
//! let head = repo.head_oid()?;
//! let tagged = repo.list_tags()?.iter().any(|t| t.target == head);
//! # let _ = tagged;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod mock;
pub mod repository;

pub use credentials::SshCredential;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagRecord;
use crate::error::Result;
use git2::Oid;

/// Result of a successful push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    /// The remote reference was created or moved
    Pushed,
    /// The remote already had the reference at the same commit
    UpToDate,
}

/// Tag identity written into annotated tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagger {
    pub name: String,
    pub email: String,
}

/// Repository operations needed to resolve, create and publish version tags
///
/// Implementations map their underlying errors onto the
/// [crate::error::GatError] taxonomy: failures to read state are
/// `Resolution`, tag writes are `TagCreation`, pushes are `Push`.
pub trait Repository {
    /// Enumerate every tag reference, peeled to the commit it points at
    ///
    /// Order is whatever the storage iterates in. References that do not
    /// peel to a commit are left out.
    fn list_tags(&self) -> Result<Vec<TagRecord>>;

    /// Commit currently checked out at HEAD
    fn head_oid(&self) -> Result<Oid>;

    /// Identity used as tagger, taken from the repository configuration
    fn tagger(&self) -> Result<Tagger>;

    /// Create an annotated tag `name` on `target`
    ///
    /// Fails if a tag with the same name already exists.
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the new tag object
    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<Oid>;

    /// Push a single refspec to a named remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    /// * `refspec` - e.g. "refs/tags/v1.0.0:refs/tags/v1.0.0"
    /// * `credential` - Key used if the transport asks for SSH authentication
    fn push_refspec(
        &self,
        remote: &str,
        refspec: &str,
        credential: &SshCredential,
    ) -> Result<PushStatus>;
}
