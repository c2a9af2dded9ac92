//! Element ids derived from the bound control's id.
//!
//! Styling and tests rely on these exact patterns.

/// The ids of every element a MultipleSelect renders, derived from one
/// element-group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    group: String,
}

impl ElementIds {
    /// Derive ids from the bound control's id.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }

    /// The element-group id itself.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// `<id>-display`: the container replacing the native control.
    pub fn display(&self) -> String {
        format!("{}-display", self.group)
    }

    /// `<id>-option-list`: the chip list.
    pub fn option_list(&self) -> String {
        format!("{}-option-list", self.group)
    }

    /// `<id>-input-option`: the row holding the search input.
    pub fn input_option(&self) -> String {
        format!("{}-input-option", self.group)
    }

    /// `<id>-input`: the search input.
    pub fn input(&self) -> String {
        format!("{}-input", self.group)
    }

    /// `<id>-search-results`: the results dropdown.
    pub fn search_results(&self) -> String {
        format!("{}-search-results", self.group)
    }

    /// `<id>-custom-add`: the custom-add row.
    pub fn custom_add(&self) -> String {
        format!("{}-custom-add", self.group)
    }

    /// `<id>-option-<value>`: the chip for `value`, spaces replaced by `-`.
    pub fn chip(&self, value: &str) -> String {
        format!("{}-option-{}", self.group, value.replace(' ', "-"))
    }
}
