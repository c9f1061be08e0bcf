//! Domain logic - pure version rules independent of git operations

pub mod tag;
pub mod version;

pub use tag::{tag_ref_name, tag_refspec, TagRecord};
pub use version::{TaggedVersion, VersionBump, VersionPrefix};
