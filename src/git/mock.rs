use crate::domain::TagRecord;
use crate::error::{GatError, Result};
use crate::git::{PushStatus, Repository, SshCredential, Tagger};
use git2::Oid;
use std::cell::RefCell;

/// A tag created through [Repository::create_annotated_tag]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub target: Oid,
    pub message: String,
}

/// A push issued through [Repository::push_refspec]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    pub remote: String,
    pub refspec: String,
}

/// Mock repository for testing without actual git operations
///
/// Tags are returned in insertion order. Writes are recorded so tests can
/// assert on what the workflow did.
pub struct MockRepository {
    tags: Vec<TagRecord>,
    head: Option<Oid>,
    tagger: Option<Tagger>,
    push_status: PushStatus,
    push_error: Option<String>,
    created: RefCell<Vec<CreatedTag>>,
    pushes: RefCell<Vec<PushRecord>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            head: None,
            tagger: Some(Tagger {
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
            }),
            push_status: PushStatus::Pushed,
            push_error: None,
            created: RefCell::new(Vec::new()),
            pushes: RefCell::new(Vec::new()),
        }
    }

    /// Add a tag pointing to a commit made at `commit_time`
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid, commit_time: i64) {
        self.tags.push(TagRecord::new(name, target, commit_time));
    }

    pub fn set_head(&mut self, oid: Oid) {
        self.head = Some(oid);
    }

    pub fn set_tagger(&mut self, tagger: Option<Tagger>) {
        self.tagger = tagger;
    }

    /// Status reported by every successful push
    pub fn set_push_status(&mut self, status: PushStatus) {
        self.push_status = status;
    }

    /// Make every push fail with `message`
    pub fn fail_push(&mut self, message: impl Into<String>) {
        self.push_error = Some(message.into());
    }

    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.created.borrow().clone()
    }

    pub fn pushes(&self) -> Vec<PushRecord> {
        self.pushes.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<TagRecord>> {
        let mut tags = self.tags.clone();
        for created in self.created.borrow().iter() {
            tags.push(TagRecord::new(created.name.clone(), created.target, 0));
        }
        Ok(tags)
    }

    fn head_oid(&self) -> Result<Oid> {
        self.head
            .ok_or_else(|| GatError::resolution("Cannot resolve HEAD: reference not found"))
    }

    fn tagger(&self) -> Result<Tagger> {
        self.tagger
            .clone()
            .ok_or_else(|| GatError::tag_creation("No tagger identity, set user.name and user.email"))
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<Oid> {
        self.tagger()?;

        let exists = self.tags.iter().any(|t| t.name == name)
            || self.created.borrow().iter().any(|t| t.name == name);
        if exists {
            return Err(GatError::tag_creation(format!(
                "Cannot create tag '{}': tag already exists",
                name
            )));
        }

        self.created.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            target,
            message: message.to_string(),
        });

        Ok(target)
    }

    fn push_refspec(
        &self,
        remote: &str,
        refspec: &str,
        _credential: &SshCredential,
    ) -> Result<PushStatus> {
        self.pushes.borrow_mut().push(PushRecord {
            remote: remote.to_string(),
            refspec: refspec.to_string(),
        });

        match &self.push_error {
            Some(message) => Err(GatError::push(message.clone())),
            None => Ok(self.push_status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn test_mock_repository_tags_in_insertion_order() {
        let mut repo = MockRepository::new();
        repo.add_tag("v2.0.0", oid(2), 20);
        repo.add_tag("v1.0.0", oid(1), 10);

        let names: Vec<_> = repo.list_tags().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["v2.0.0", "v1.0.0"]);
    }

    #[test]
    fn test_mock_repository_head() {
        let mut repo = MockRepository::new();
        assert!(repo.head_oid().is_err());

        repo.set_head(oid(7));
        assert_eq!(repo.head_oid().unwrap(), oid(7));
    }

    #[test]
    fn test_mock_repository_records_created_tags() {
        let repo = MockRepository::new();
        repo.create_annotated_tag("v1.0.0", oid(1), "v1.0.0").unwrap();

        assert_eq!(
            repo.created_tags(),
            vec![CreatedTag {
                name: "v1.0.0".to_string(),
                target: oid(1),
                message: "v1.0.0".to_string(),
            }]
        );
        assert!(repo.create_annotated_tag("v1.0.0", oid(1), "again").is_err());
    }

    #[test]
    fn test_mock_repository_without_tagger() {
        let mut repo = MockRepository::new();
        repo.set_tagger(None);
        let err = repo.create_annotated_tag("v1.0.0", oid(1), "v1.0.0").unwrap_err();
        assert!(matches!(err, GatError::TagCreation(_)));
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags().unwrap().is_empty());
        assert!(repo.pushes().is_empty());
    }
}
