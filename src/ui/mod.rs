//! User interface module - everything the tool prints for the user.
//!
//! Diagnostics go through `tracing`; this module is the user-facing channel.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction, display_status,
    display_success, display_transition, format_transition, styled_transition,
};
