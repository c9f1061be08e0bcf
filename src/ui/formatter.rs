//! Formatting functions for terminal output.
//!
//! Plain text is built by the `format_*` functions so it can be tested;
//! the `display_*` functions add styling and print it.

use console::{style, StyledObject};

use crate::boundary::BoundaryWarning;

/// The transition line, e.g. "v1.2.0 => v1.3.0".
pub fn format_transition(old: &str, new: &str) -> String {
    format!("{} => {}", old, new)
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// The transition line styled for the terminal.
pub fn styled_transition(old: &str, new: &str) -> StyledObject<String> {
    style(format_transition(old, new)).green().bold()
}

/// Print the old => new version transition.
pub fn display_transition(old: &str, new: &str) {
    println!("{}", styled_transition(old, new));
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Show how to retry a push by hand after a failure left a local tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} The tag exists locally. To push it later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} refs/tags/{}", remote, tag)).cyan()
    );
}
