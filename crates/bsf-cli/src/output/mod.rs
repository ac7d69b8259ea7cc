//! Terminal output formatting.
//!
//! Query results go to stdout with no decoration so they can be captured by
//! shell scripts. Diagnostics go to stderr.

pub mod colors;
pub mod errors;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Output handler with an explicit color setting
    pub fn with_colors(colors: colors::ColorSupport) -> Self {
        Self { colors }
    }

    /// Print a query result
    pub fn value(&self, text: &str) {
        if !text.is_empty() {
            println!("{}", text);
        }
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{}", self.format_warning(message));
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{}: {}", self.colors.yellow("warning"), message)
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
