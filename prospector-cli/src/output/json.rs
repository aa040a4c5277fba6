//! JSON output formatting.

use serde::Serialize;

/// Formats values as JSON for scripting.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a formatter, optionally pretty-printing.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes any value.
    ///
    /// # Errors
    ///
    /// Returns the underlying serialization error.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
