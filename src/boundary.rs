use std::fmt;

/// Non-fatal conditions met while publishing a tag.
/// These are reported to the user and never abort the run on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A tag that is not a version was ignored during resolution
    MalformedTag { tag: String },
    /// The latest tag already points at HEAD
    HeadAlreadyTagged {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// The remote already had the pushed reference
    RemoteUpToDate { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::MalformedTag { tag } => {
                write!(f, "found malformed tag '{}', skipped", tag)
            }
            BoundaryWarning::HeadAlreadyTagged {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "nothing to tag: latest commit is already tagged as '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
            BoundaryWarning::RemoteUpToDate { remote } => {
                write!(f, "{} remote was up to date, no push done", remote)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_tag() {
        let warning = BoundaryWarning::MalformedTag {
            tag: "nightly".to_string(),
        };
        assert_eq!(warning.to_string(), "found malformed tag 'nightly', skipped");
    }

    #[test]
    fn test_head_already_tagged_shortens_hash() {
        let warning = BoundaryWarning::HeadAlreadyTagged {
            latest_tag: "v1.0.0".to_string(),
            current_commit_hash: "abc1234def5678".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("already tagged"));
        assert!(msg.contains("v1.0.0"));
        assert!(msg.contains("abc1234"));
        assert!(!msg.contains("abc1234d"));
    }

    #[test]
    fn test_head_already_tagged_short_hash_kept() {
        let warning = BoundaryWarning::HeadAlreadyTagged {
            latest_tag: "1.0.0".to_string(),
            current_commit_hash: "abc".to_string(),
        };
        assert!(warning.to_string().contains("(current: abc)"));
    }

    #[test]
    fn test_remote_up_to_date() {
        let warning = BoundaryWarning::RemoteUpToDate {
            remote: "origin".to_string(),
        };
        assert_eq!(warning.to_string(), "origin remote was up to date, no push done");
    }
}
