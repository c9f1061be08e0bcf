#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use ssh_key::rand_core::OsRng;
use ssh_key::{Algorithm, LineEnding, PrivateKey};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway repository with a configured user identity
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn init_repo() -> TestRepo {
    let dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    TestRepo { dir, repo }
}

/// Commit the empty tree on top of HEAD with committer time `time`
pub fn commit_at(repo: &Repository, message: &str, time: i64) -> Oid {
    let signature = Signature::new("Test User", "test@example.com", &Time::new(time, 0))
        .expect("Could not build signature");

    let tree_id = repo
        .index()
        .expect("Could not get index")
        .write_tree()
        .expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("HEAD is not a commit")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<_> = parents.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .expect("Could not create commit")
}

pub fn lightweight_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).expect("Could not find object");
    repo.tag_lightweight(name, &object, false)
        .expect("Could not create tag");
}

pub fn annotated_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).expect("Could not find object");
    let signature = repo.signature().expect("Could not get signature");
    repo.tag(name, &object, &signature, name, false)
        .expect("Could not create annotated tag");
}

/// Create a bare repository and register it as remote `name`
pub fn add_bare_remote(repo: &Repository, name: &str) -> (TempDir, Repository) {
    let dir = TempDir::new().expect("Could not create temp dir");
    let bare = Repository::init_bare(dir.path()).expect("Could not init bare repo");
    repo.remote(name, dir.path().to_str().expect("temp path is not UTF-8"))
        .expect("Could not add remote");
    (dir, bare)
}

/// Write a private key placeholder; local remotes never ask for it
pub fn test_key(dir: &Path) -> PathBuf {
    let key = PrivateKey::random(&mut OsRng, Algorithm::Ed25519).expect("Could not generate key");
    let pem = key.to_openssh(LineEnding::LF).expect("Could not encode key");
    let path = dir.join("id_test");
    fs::write(&path, pem.as_bytes()).expect("Could not write key");
    path
}
