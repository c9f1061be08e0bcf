use crate::domain::{tag_ref_name, TagRecord};
use crate::error::{GatError, Result};
use crate::git::{PushStatus, Repository, SshCredential, Tagger};
use git2::{CredentialType, ObjectType, Oid, Repository as Git2Repo, Signature};
use std::cell::{Cell, RefCell};
use std::path::Path;

/// Credential callbacks answered per push before giving up.
/// Key auth takes one round, plus one when the URL carries no user name.
const MAX_AUTH_ATTEMPTS: u32 = 2;

/// Bounds the credential callback: libgit2 calls it again after every
/// rejected credential.
#[derive(Default)]
struct AuthAttempts {
    count: Cell<u32>,
}

impl AuthAttempts {
    fn next(&self, url: &str) -> std::result::Result<(), git2::Error> {
        self.count.set(self.count.get() + 1);
        if self.exhausted() {
            return Err(git2::Error::from_str(&format!(
                "authentication to {} rejected",
                url
            )));
        }
        Ok(())
    }

    fn exhausted(&self) -> bool {
        self.count.get() > MAX_AUTH_ATTEMPTS
    }
}

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository containing `path`, searching parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            GatError::resolution(format!(
                "Not in a git repository ({}): {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<TagRecord>> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| GatError::resolution(format!("Cannot list tags: {}", e)))?;

        let mut records = Vec::with_capacity(names.len());
        for name in names.iter().flatten() {
            let reference = self
                .repo
                .find_reference(&tag_ref_name(name))
                .map_err(|e| GatError::resolution(format!("Cannot read tag '{}': {}", name, e)))?;

            // Tags on trees or blobs carry no version history.
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    tracing::debug!(tag = name, error = %e, "tag does not point at a commit");
                    continue;
                }
            };

            records.push(TagRecord::new(name, commit.id(), commit.time().seconds()));
        }

        Ok(records)
    }

    fn head_oid(&self) -> Result<Oid> {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| GatError::resolution(format!("Cannot resolve HEAD: {}", e)))?;

        Ok(head.id())
    }

    fn tagger(&self) -> Result<Tagger> {
        let signature = self.repo.signature().map_err(|e| {
            GatError::tag_creation(format!(
                "No tagger identity, set user.name and user.email: {}",
                e
            ))
        })?;

        Ok(Tagger {
            name: signature.name().unwrap_or_default().to_string(),
            email: signature.email().unwrap_or_default().to_string(),
        })
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<Oid> {
        let tagger = self.tagger()?;
        let signature = Signature::now(&tagger.name, &tagger.email)
            .map_err(|e| GatError::tag_creation(format!("Invalid tagger identity: {}", e)))?;

        let object = self
            .repo
            .find_object(target, Some(ObjectType::Commit))
            .map_err(|e| GatError::tag_creation(format!("Cannot find commit {}: {}", target, e)))?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| GatError::tag_creation(format!("Cannot create tag '{}': {}", name, e)))
    }

    fn push_refspec(
        &self,
        remote_name: &str,
        refspec: &str,
        credential: &SshCredential,
    ) -> Result<PushStatus> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| GatError::push(format!("No remote named '{}': {}", remote_name, e)))?;

        let up_to_date = Cell::new(false);
        let rejected: RefCell<Option<String>> = RefCell::new(None);
        let auth = AuthAttempts::default();

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|url, username_from_url, allowed_types| {
            auth.next(url)?;
            if allowed_types.contains(CredentialType::SSH_KEY) {
                credential.to_cred(username_from_url)
            } else if allowed_types.contains(CredentialType::USERNAME) {
                git2::Cred::username(username_from_url.unwrap_or(credential.username()))
            } else {
                git2::Cred::default()
            }
        });

        // An update whose old and new targets match is a no-op on the remote.
        callbacks.push_negotiation(|updates| {
            up_to_date.set(!updates.is_empty() && updates.iter().all(|u| u.src() == u.dst()));
            Ok(())
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                *rejected.borrow_mut() = Some(format!("{} rejected: {}", refname, status));
                Err(git2::Error::from_str(&format!("Push rejected for {}", refname)))
            }
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let pushed = remote.push(&[refspec], Some(&mut push_options));

        if let Some(reason) = rejected.borrow_mut().take() {
            return Err(GatError::push(reason));
        }

        match pushed {
            Ok(()) if up_to_date.get() => Ok(PushStatus::UpToDate),
            Ok(()) => Ok(PushStatus::Pushed),
            Err(e) if auth.exhausted() => Err(GatError::credential(format!(
                "SSH key '{}' was not accepted by '{}': {}",
                credential.key_path().display(),
                remote_name,
                e
            ))),
            Err(e) => {
                let context = match e.class() {
                    git2::ErrorClass::Net => "Network error",
                    git2::ErrorClass::Ssh => "SSH error",
                    git2::ErrorClass::Reference => "Reference error",
                    _ => "Cannot push",
                };
                Err(GatError::push(format!(
                    "{} while pushing '{}' to '{}': {}",
                    context, refspec, remote_name, e
                )))
            }
        }
    }
}
