//! Diagnostic formatting for better error messages
//!
//! This module renders a [`GatherError`] for the terminal, pointing at the
//! offending command-line argument when there is one and adding a hint on
//! how to fix the problem.

use super::GatherError;
use colored::Colorize;

/// Diagnostic information for displaying errors with context
pub struct Diagnostic {
    error: GatherError,
    arguments: Option<Vec<String>>,
    hint: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: GatherError) -> Self {
        Self {
            error,
            arguments: None,
            hint: None,
        }
    }

    /// Create a diagnostic with the task arguments the error position refers to
    pub fn with_arguments(error: GatherError, arguments: &[String]) -> Self {
        Self {
            error,
            arguments: Some(arguments.to_vec()),
            hint: None,
        }
    }

    /// Attach a hint shown below the error
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        // Error header
        let kind = self.error.kind().red().bold();
        output.push_str(&format!("{}: ", kind));
        output.push_str(self.error.message());
        output.push('\n');

        if let Some(position) = self.error.position() {
            output.push_str(&format!(
                "  {} task #{}\n",
                "-->".blue().bold(),
                position + 1
            ));

            if let Some(ref arguments) = self.arguments {
                output.push_str(&self.format_argument_context(arguments, position));
            }
        }

        if let Some(ref hint) = self.hint {
            output.push_str(&format!("  {} {}\n", "hint:".cyan().bold(), hint));
        }

        output
    }

    /// Underline the offending argument within the task argument list
    fn format_argument_context(&self, arguments: &[String], position: usize) -> String {
        let mut output = String::new();

        if position >= arguments.len() {
            return output;
        }

        let line = arguments.join(" ");
        let offset: usize = arguments[..position]
            .iter()
            .map(|arg| arg.chars().count() + 1)
            .sum();
        let width = arguments[position].chars().count().max(1);

        output.push_str(&format!("  {} {}\n", "|".blue().bold(), line));
        output.push_str(&format!(
            "  {} {}{}\n",
            "|".blue().bold(),
            " ".repeat(offset),
            "^".repeat(width).red().bold()
        ));

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_without_context() {
        colored::control::set_override(false);
        let err = GatherError::scheduling_error("admission refused");
        let diag = Diagnostic::new(err);

        let formatted = diag.format();
        assert!(formatted.contains("Scheduling Error"));
        assert!(formatted.contains("admission refused"));
        assert!(!formatted.contains("-->"));
    }

    #[test]
    fn test_diagnostic_with_arguments() {
        colored::control::set_override(false);
        let arguments = vec!["a:1".to_string(), "b:-2".to_string()];
        let err = GatherError::invalid_input_at("delay must not be negative", 1);
        let diag = Diagnostic::with_arguments(err, &arguments).hint("use LABEL:DELAY");

        let formatted = diag.format();
        assert!(formatted.contains("Invalid Input"));
        assert!(formatted.contains("task #2"));
        assert!(formatted.contains("a:1 b:-2"));
        assert!(formatted.contains("    ^^^^"));
        assert!(formatted.contains("hint: use LABEL:DELAY"));
    }

    #[test]
    fn test_diagnostic_underlines_after_wide_labels() {
        colored::control::set_override(false);
        let arguments = vec!["任务1:2".to_string(), "b:-2".to_string()];
        let err = GatherError::invalid_input_at("delay must not be negative", 1);
        let diag = Diagnostic::with_arguments(err, &arguments);

        let formatted = diag.format();
        let underline = formatted
            .lines()
            .find(|line| line.contains('^'))
            .unwrap();
        // "  | " + "任务1:2 " is 10 chars before the carets
        assert_eq!(underline, format!("  | {}^^^^", " ".repeat(6)));
    }

    #[test]
    fn test_diagnostic_position_out_of_range() {
        colored::control::set_override(false);
        let err = GatherError::invalid_input_at("bad", 5);
        let diag = Diagnostic::with_arguments(err, &["a:1".to_string()]);

        let formatted = diag.format();
        assert!(formatted.contains("task #6"));
        assert!(!formatted.contains("a:1"));
    }
}
