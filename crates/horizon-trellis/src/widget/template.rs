//! Label templates.
//!
//! Widgets build user-facing labels such as `Add New Value: kiwi` from a
//! template containing a `{query}` placeholder. A template without the
//! placeholder gets the query appended, so `"Add: "` renders as `"Add: kiwi"`.

use std::fmt;

/// The placeholder substituted by [`LabelTemplate::render`].
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// A label with an optional `{query}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelTemplate(String);

impl LabelTemplate {
    /// Create a template.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute `query` into the template, appending it when the template
    /// has no placeholder.
    pub fn render(&self, query: &str) -> String {
        if self.0.contains(QUERY_PLACEHOLDER) {
            self.0.replace(QUERY_PLACEHOLDER, query)
        } else {
            format!("{}{query}", self.0)
        }
    }

    /// Substitute `query` for any placeholder; a template without one is
    /// returned as is.
    pub fn fill(&self, query: &str) -> String {
        self.0.replace(QUERY_PLACEHOLDER, query)
    }
}

impl From<&str> for LabelTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for LabelTemplate {
    fn from(template: String) -> Self {
        Self(template)
    }
}

impl fmt::Display for LabelTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
