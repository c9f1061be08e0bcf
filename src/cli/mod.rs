pub mod orchestration;

pub use orchestration::{build_options, run_publish_workflow, PublishWorkflowArgs};
