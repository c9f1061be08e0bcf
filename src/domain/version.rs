use crate::error::{GatError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;

/// Leading marker of a version tag, kept apart from the numeric version so
/// that a bumped tag keeps the spelling of the one it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VersionPrefix {
    #[default]
    None,
    V,
}

impl VersionPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionPrefix::None => "",
            VersionPrefix::V => "v",
        }
    }
}

impl fmt::Display for VersionPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantic version together with the prefix it was spelled with in a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVersion {
    pub prefix: VersionPrefix,
    pub version: Version,
}

impl TaggedVersion {
    pub fn new(prefix: VersionPrefix, version: Version) -> Self {
        TaggedVersion { prefix, version }
    }

    /// `0.0.0` without prefix: the version of a repository that has no tags yet.
    pub fn floor() -> Self {
        TaggedVersion::new(VersionPrefix::None, Version::new(0, 0, 0))
    }

    /// Parse a tag name such as `v1.2.3` or `1.2.3-rc.1+build.5`.
    ///
    /// Only a lowercase `v` is recognised as a prefix. The remainder must be a
    /// strict semantic version, anything else is a [`GatError::MalformedTag`].
    pub fn parse(tag: &str) -> Result<Self> {
        let (prefix, rest) = match tag.strip_prefix('v') {
            Some(rest) => (VersionPrefix::V, rest),
            None => (VersionPrefix::None, tag),
        };

        let version = Version::parse(rest)
            .map_err(|e| GatError::malformed_tag(format!("'{}': {}", tag, e)))?;

        Ok(TaggedVersion { prefix, version })
    }

    /// Return the next release for `bump_type`. The receiver is left untouched
    /// and pre-release/build metadata is dropped from the result.
    ///
    /// Fails with [`GatError::Resolution`] when the bumped component is
    /// already `u64::MAX`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let v = &self.version;
        let next = |value: u64| {
            value.checked_add(1).ok_or_else(|| {
                GatError::resolution(format!(
                    "{} version {} of '{}' cannot be incremented",
                    bump_type, value, self
                ))
            })
        };

        let (major, minor, patch) = match bump_type {
            VersionBump::Major => (next(v.major)?, 0, 0),
            VersionBump::Minor => (v.major, next(v.minor)?, 0),
            VersionBump::Patch => (v.major, v.minor, next(v.patch)?),
        };

        Ok(TaggedVersion {
            prefix: self.prefix,
            version: Version {
                major,
                minor,
                patch,
                pre: Prerelease::EMPTY,
                build: BuildMetadata::EMPTY,
            },
        })
    }

    /// Semantic-version ordering; the prefix does not take part.
    pub fn compare(&self, other: &TaggedVersion) -> Ordering {
        self.version.cmp(&other.version)
    }

    /// The tag name this version is published under.
    pub fn tag_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TaggedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tag: &str) -> TaggedVersion {
        TaggedVersion::parse(tag).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let v = parse("v1.2.3");
        assert_eq!(v.prefix, VersionPrefix::V);
        assert_eq!(v.version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = parse("1.2.3");
        assert_eq!(v.prefix, VersionPrefix::None);
        assert_eq!(v.version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_prerelease_and_build() {
        let v = parse("v2.0.0-rc.1+build.7");
        assert_eq!(v.version.pre.as_str(), "rc.1");
        assert_eq!(v.version.build.as_str(), "build.7");
    }

    #[test]
    fn test_version_parse_invalid() {
        for tag in ["bogus", "1.2", "v1.2.3.4", "V1.2.3", "release-1.2.3", "", "v", "01.2.3"] {
            let err = TaggedVersion::parse(tag).unwrap_err();
            assert!(
                matches!(err, GatError::MalformedTag(_)),
                "expected malformed tag for '{}', got {:?}",
                tag,
                err
            );
        }
    }

    #[test]
    fn test_version_bump_major() {
        assert_eq!(parse("1.2.3").bump(VersionBump::Major).unwrap(), parse("2.0.0"));
    }

    #[test]
    fn test_version_bump_minor() {
        assert_eq!(parse("1.2.3").bump(VersionBump::Minor).unwrap(), parse("1.3.0"));
    }

    #[test]
    fn test_version_bump_patch() {
        assert_eq!(parse("1.2.3").bump(VersionBump::Patch).unwrap(), parse("1.2.4"));
    }

    #[test]
    fn test_bump_does_not_touch_input() {
        let latest = parse("v1.2.3");
        let next = latest.bump(VersionBump::Minor).unwrap();
        assert_eq!(latest.to_string(), "v1.2.3");
        assert_eq!(next.to_string(), "v1.3.0");
    }

    #[test]
    fn test_bump_drops_prerelease_and_build() {
        let v = parse("v1.2.3-beta.2+sha.abc");
        assert_eq!(v.bump(VersionBump::Patch).unwrap().to_string(), "v1.2.4");
        assert_eq!(v.bump(VersionBump::Minor).unwrap().to_string(), "v1.3.0");
        assert_eq!(v.bump(VersionBump::Major).unwrap().to_string(), "v2.0.0");
    }

    #[test]
    fn test_bump_resets_lower_components() {
        for tag in ["0.0.0", "1.2.3", "v9.9.9", "3.0.17-alpha"] {
            let v = parse(tag);
            let major = v.bump(VersionBump::Major).unwrap().version;
            assert_eq!((major.minor, major.patch), (0, 0));

            let minor = v.bump(VersionBump::Minor).unwrap().version;
            assert_eq!(minor.major, v.version.major);
            assert_eq!(minor.patch, 0);
        }
    }

    #[test]
    fn test_patch_then_major_exceeds_original() {
        for tag in ["0.0.0", "1.2.3", "v10.0.1", "2.0.0-rc.1"] {
            let v = parse(tag);
            let bumped = v.bump(VersionBump::Patch).unwrap().bump(VersionBump::Major).unwrap();
            assert_eq!(bumped.compare(&v), Ordering::Greater, "for {}", tag);
        }
    }

    #[test]
    fn test_prefix_survives_every_bump() {
        let v = parse("v1.2.3");
        assert_eq!(v.bump(VersionBump::Major).unwrap().tag_name(), "v2.0.0");
        assert_eq!(v.bump(VersionBump::Minor).unwrap().tag_name(), "v1.3.0");
        assert_eq!(v.bump(VersionBump::Patch).unwrap().tag_name(), "v1.2.4");
    }

    #[test]
    fn test_floor_bumps() {
        let floor = TaggedVersion::floor();
        assert_eq!(floor.to_string(), "0.0.0");
        assert_eq!(floor.bump(VersionBump::Patch).unwrap().to_string(), "0.0.1");
        assert_eq!(floor.bump(VersionBump::Minor).unwrap().to_string(), "0.1.0");
        assert_eq!(floor.bump(VersionBump::Major).unwrap().to_string(), "1.0.0");
    }

    #[test]
    fn test_bump_major_overflow_is_resolution_error() {
        let v = parse("v18446744073709551615.2.3");
        let err = v.bump(VersionBump::Major).unwrap_err();
        assert!(matches!(err, GatError::Resolution(_)));
        assert!(err.to_string().contains("major version 18446744073709551615"));

        // Lower components still have room.
        assert_eq!(v.bump(VersionBump::Minor).unwrap().to_string(), "v18446744073709551615.3.0");
    }

    #[test]
    fn test_bump_minor_overflow_is_resolution_error() {
        let v = parse("1.18446744073709551615.0");
        let err = v.bump(VersionBump::Minor).unwrap_err();
        assert!(matches!(err, GatError::Resolution(_)));
        assert!(err.to_string().contains("minor version"));
        assert_eq!(v.bump(VersionBump::Major).unwrap().to_string(), "2.0.0");
    }

    #[test]
    fn test_bump_patch_overflow_is_resolution_error() {
        let v = parse("1.2.18446744073709551615");
        let err = v.bump(VersionBump::Patch).unwrap_err();
        assert!(matches!(err, GatError::Resolution(_)));
        assert!(err.to_string().contains("patch version"));
        assert_eq!(v.bump(VersionBump::Minor).unwrap().to_string(), "1.3.0");
    }

    #[test]
    fn test_compare() {
        assert_eq!(parse("1.2.3").compare(&parse("1.10.0")), Ordering::Less);
        assert_eq!(parse("v2.0.0").compare(&parse("1.99.99")), Ordering::Greater);
        assert_eq!(parse("v1.0.0").compare(&parse("1.0.0")), Ordering::Equal);
        assert_eq!(parse("1.0.0-rc.1").compare(&parse("1.0.0")), Ordering::Less);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(parse("1.2.3").to_string(), "1.2.3");
        assert_eq!(parse("v0.4.0-alpha").to_string(), "v0.4.0-alpha");
    }
}
