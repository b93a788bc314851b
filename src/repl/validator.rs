//! Validator for reedline - a trailing `\` continues the input

use reedline::{ValidationResult, Validator};

/// Line validator for the symposium REPL
#[derive(Debug, Default)]
pub struct LineValidator;

impl LineValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for LineValidator {
    /// Validate input for completeness
    ///
    /// # Returns
    /// * `ValidationResult` - Incomplete while the last line ends in `\`
    fn validate(&self, line: &str) -> ValidationResult {
        if line.trim_end().ends_with('\\') {
            ValidationResult::Incomplete
        } else {
            ValidationResult::Complete
        }
    }
}

/// Join continued lines into one submission
pub fn join_continuations(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end().strip_suffix('\\').unwrap_or(line).trim_end())
        .collect::<Vec<_>>()
        .join(" ")
}
