//! MultipleSelect configuration.

use serde::Deserialize;

use crate::error::SearchFunctionError;
use crate::widget::template::LabelTemplate;

/// Name of the attribute a bound control may carry its options in, as JSON.
pub const OPTIONS_ATTRIBUTE: &str = "data-options";

/// The outcome of a search function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Candidate display texts, in the order they should be shown.
    pub results: Vec<String>,
    /// Whether the function withheld matches because there were too many.
    pub too_many_results: bool,
}

impl SearchResults {
    /// Results with no truncation.
    pub fn new(results: Vec<String>) -> Self {
        Self {
            results,
            too_many_results: false,
        }
    }

    /// Results that were truncated by the search function.
    pub fn truncated(results: Vec<String>) -> Self {
        Self {
            results,
            too_many_results: true,
        }
    }
}

/// A caller-supplied search function.
///
/// It receives the trimmed query and returns the rows to show. Returned
/// texts are rendered in the given order.
pub type SearchFunction = Box<dyn Fn(&str) -> Result<SearchResults, SearchFunctionError>>;

/// Resolved MultipleSelect configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleSelectOptions {
    /// Placeholder text of the search input.
    pub placeholder: String,
    /// Whether free text may be added as a new option.
    pub custom_add_enabled: bool,
    /// Label of the custom-add row.
    pub custom_add_label: LabelTemplate,
    /// Whether the same value may be chosen (and added) more than once.
    pub allow_duplicates: bool,
    /// Label of the row shown when a search has no matches.
    pub no_search_results_label: LabelTemplate,
    /// Label of the hint row shown when a search function truncated results.
    pub too_many_results_label: LabelTemplate,
    /// Text of the remove control on each chip.
    pub remove_icon: String,
}

impl Default for MultipleSelectOptions {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            custom_add_enabled: false,
            custom_add_label: LabelTemplate::new("Add New Value: {query}"),
            allow_duplicates: false,
            no_search_results_label: LabelTemplate::new("No matches for \"{query}\""),
            too_many_results_label: LabelTemplate::new(
                "Too many results, keep typing to narrow the search",
            ),
            remove_icon: "\u{00d7}".to_string(),
        }
    }
}

/// A partial set of options.
///
/// Used twice: deserialized from the bound control's `data-options`
/// attribute, and filled in by the widget's `with_*` setters. Unset keys
/// leave the underlying value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionOverrides {
    pub placeholder: Option<String>,
    pub custom_add_enabled: Option<bool>,
    pub custom_add_label: Option<String>,
    pub allow_duplicates: Option<bool>,
    pub no_search_results_label: Option<String>,
    pub too_many_results_label: Option<String>,
    pub remove_icon: Option<String>,
}

impl OptionOverrides {
    /// Parse overrides from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write every set key into `options`.
    pub fn apply_to(&self, options: &mut MultipleSelectOptions) {
        if let Some(placeholder) = &self.placeholder {
            options.placeholder = placeholder.clone();
        }
        if let Some(enabled) = self.custom_add_enabled {
            options.custom_add_enabled = enabled;
        }
        if let Some(label) = &self.custom_add_label {
            options.custom_add_label = LabelTemplate::new(label.as_str());
        }
        if let Some(allow) = self.allow_duplicates {
            options.allow_duplicates = allow;
        }
        if let Some(label) = &self.no_search_results_label {
            options.no_search_results_label = LabelTemplate::new(label.as_str());
        }
        if let Some(label) = &self.too_many_results_label {
            options.too_many_results_label = LabelTemplate::new(label.as_str());
        }
        if let Some(icon) = &self.remove_icon {
            options.remove_icon = icon.clone();
        }
    }

    /// Resolve `attribute` overrides and then `self` over the defaults.
    pub fn resolve(&self, attribute: Option<&OptionOverrides>) -> MultipleSelectOptions {
        let mut options = MultipleSelectOptions::default();
        if let Some(attribute) = attribute {
            attribute.apply_to(&mut options);
        }
        self.apply_to(&mut options);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MultipleSelectOptions::default();
        assert!(!options.custom_add_enabled);
        assert!(!options.allow_duplicates);
        assert_eq!(options.custom_add_label.render("t"), "Add New Value: t");
        assert_eq!(options.remove_icon, "×");
    }

    #[test]
    fn test_from_json_camel_case() {
        let overrides = OptionOverrides::from_json(
            r#"{"placeholder": "Pick fruit", "customAddEnabled": true, "allowDuplicates": true}"#,
        )
        .unwrap();
        assert_eq!(overrides.placeholder.as_deref(), Some("Pick fruit"));
        assert_eq!(overrides.custom_add_enabled, Some(true));
        assert_eq!(overrides.allow_duplicates, Some(true));
        assert_eq!(overrides.remove_icon, None);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        assert!(OptionOverrides::from_json(r#"{"colour": "red"}"#).is_err());
        assert!(OptionOverrides::from_json(r#"{"placeholder": 3}"#).is_err());
    }

    #[test]
    fn test_setters_win_over_attribute() {
        let attribute = OptionOverrides {
            placeholder: Some("from attribute".into()),
            remove_icon: Some("x".into()),
            ..OptionOverrides::default()
        };
        let setters = OptionOverrides {
            placeholder: Some("from setter".into()),
            ..OptionOverrides::default()
        };

        let options = setters.resolve(Some(&attribute));
        assert_eq!(options.placeholder, "from setter");
        assert_eq!(options.remove_icon, "x");
        assert!(!options.custom_add_enabled);
    }
}
