//! Status line shown to the user

use colored::Colorize;
use std::fmt;

pub const READY: &str = "Ready.";
pub const ANALYZING: &str = "Analyzing logs...";
pub const COMPLETE: &str = "Analysis complete.";

/// Current status message; last write wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn new(message: impl Into<String>, is_error: bool) -> Self {
        Self {
            message: message.into(),
            is_error,
        }
    }

    pub fn ready() -> Self {
        Self::new(READY, false)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ready()
    }
}

impl fmt::Display for Status {
    /// Errors in red, everything else dimmed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error {
            write!(f, "{}", self.message.red())
        } else {
            write!(f, "{}", self.message.dimmed())
        }
    }
}
