use crate::error::{GatError, Result};
use ssh_key::PrivateKey;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// User name presented to the SSH server when the remote URL carries none
pub const DEFAULT_SSH_USER: &str = "git";

/// Private key material read from disk, ready to authenticate a push
#[derive(Clone)]
pub struct SshCredential {
    key_path: PathBuf,
    private_key: String,
    passphrase: Option<String>,
    username: String,
}

impl SshCredential {
    /// Read a private key from `path`.
    ///
    /// The key must be in OpenSSH format. It is parsed, and decrypted with
    /// `passphrase` when encrypted, so that a bad key or passphrase fails here
    /// rather than during the push. An empty `passphrase` means none was given;
    /// it is ignored for keys that are not encrypted.
    pub fn load(path: impl AsRef<Path>, passphrase: &str) -> Result<Self> {
        let key_path = path.as_ref().to_path_buf();
        let private_key = fs::read_to_string(&key_path).map_err(|e| {
            GatError::credential(format!(
                "Cannot read SSH key '{}': {}",
                key_path.display(),
                e
            ))
        })?;

        let key = PrivateKey::from_openssh(&private_key).map_err(|e| {
            GatError::credential(format!(
                "Cannot parse SSH key '{}' (OpenSSH format expected): {}",
                key_path.display(),
                e
            ))
        })?;

        let passphrase = if key.is_encrypted() {
            if passphrase.is_empty() {
                return Err(GatError::credential(format!(
                    "SSH key '{}' is encrypted, a password is required",
                    key_path.display()
                )));
            }
            key.decrypt(passphrase).map_err(|e| {
                GatError::credential(format!(
                    "Cannot decrypt SSH key '{}', wrong password? ({})",
                    key_path.display(),
                    e
                ))
            })?;
            Some(passphrase.to_string())
        } else {
            None
        };

        tracing::debug!(
            key = %key_path.display(),
            algorithm = %key.algorithm(),
            encrypted = passphrase.is_some(),
            "loaded SSH key"
        );

        Ok(SshCredential {
            key_path,
            private_key,
            passphrase,
            username: DEFAULT_SSH_USER.to_string(),
        })
    }

    /// Override the user name used when the remote URL does not specify one
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn has_passphrase(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Build a libgit2 credential for a transport callback.
    ///
    /// The user embedded in the remote URL (`git@host:...`) wins over the
    /// configured one.
    pub fn to_cred(&self, username_from_url: Option<&str>) -> std::result::Result<git2::Cred, git2::Error> {
        git2::Cred::ssh_key_from_memory(
            username_from_url.unwrap_or(&self.username),
            None,
            &self.private_key,
            self.passphrase.as_deref(),
        )
    }
}

impl fmt::Debug for SshCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshCredential")
            .field("key_path", &self.key_path)
            .field("username", &self.username)
            .field("has_passphrase", &self.passphrase.is_some())
            .finish()
    }
}
