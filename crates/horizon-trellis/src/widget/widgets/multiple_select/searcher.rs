//! Type-ahead search for [`MultipleSelect`](super::MultipleSelect).
//!
//! The [`Searcher`] owns the search input and the results dropdown. On every
//! query change it asks a [`CandidateSource`] for matches, rebuilds the row
//! elements, and places the highlight cursor. It never changes the option
//! set: activating a row yields an [`Activation`] the widget applies.
//!
//! Rows are the search results (in the order the search function returned
//! them) followed by an optional custom-add row. Non-interactive notice rows
//! ("no matches", "too many results") are rendered after them and can never
//! be highlighted.

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{Dom, ElementId};

use super::classes;
use super::options::SearchResults;
use crate::error::SearchFunctionError;
use crate::widget::template::LabelTemplate;

/// Where the searcher gets its candidates.
pub(crate) trait CandidateSource {
    /// Number of options a search could still offer.
    fn selectable_count(&self) -> usize;

    /// Whether an offerable option has exactly this value.
    fn is_selectable_value(&self, value: &str) -> bool;

    /// Run the active search function.
    fn search(&self, query: &str) -> Result<SearchResults, SearchFunctionError>;
}

/// An interactive row of the results dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRow {
    /// A search result, by display text.
    Result(String),
    /// The synthetic row offering to add the query as a new option.
    CustomAdd(String),
}

impl SearchRow {
    /// The result's display text, or the custom value.
    pub fn text(&self) -> &str {
        match self {
            Self::Result(text) | Self::CustomAdd(text) => text,
        }
    }
}

/// What activating the highlighted row asks the widget to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Activation {
    /// Select the option with this display text.
    Select(String),
    /// Add this text as a new option, then select it.
    AddCustom(String),
}

/// Labels and switches the searcher reads from the widget configuration.
#[derive(Debug, Clone)]
pub(crate) struct SearcherConfig {
    pub custom_add_enabled: bool,
    pub custom_add_label: LabelTemplate,
    pub no_results_label: LabelTemplate,
    pub too_many_results_label: LabelTemplate,
}

#[derive(Debug)]
struct RenderedRow {
    row: SearchRow,
    element: ElementId,
}

/// Search input and results dropdown state.
#[derive(Debug)]
pub struct Searcher {
    input: ElementId,
    results_list: ElementId,
    custom_add_id: String,
    config: SearcherConfig,

    /// The query of the last search, untrimmed.
    query: String,
    /// Interactive rows in display order.
    rows: Vec<RenderedRow>,
    /// Non-interactive rows rendered after `rows`.
    notices: Vec<ElementId>,
    /// Index into `rows`.
    highlighted: Option<usize>,
    visible: bool,
    no_results_shown: bool,
    too_many_results: bool,
}

impl Searcher {
    pub(crate) fn new(
        input: ElementId,
        results_list: ElementId,
        custom_add_id: String,
        config: SearcherConfig,
    ) -> Self {
        Self {
            input,
            results_list,
            custom_add_id,
            config,
            query: String::new(),
            rows: Vec::new(),
            notices: Vec::new(),
            highlighted: None,
            visible: false,
            no_results_shown: false,
            too_many_results: false,
        }
    }

    // =========================================================================
    // State queries
    // =========================================================================

    /// The search input element.
    pub fn input(&self) -> ElementId {
        self.input
    }

    /// The results dropdown element.
    pub fn results_list(&self) -> ElementId {
        self.results_list
    }

    /// The query of the most recent search.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the results dropdown is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the dropdown is open and shows a custom-add row.
    pub fn is_custom_add_visible(&self) -> bool {
        self.visible && self.custom_add_value().is_some()
    }

    /// The value the custom-add row would add, if the row is rendered.
    pub fn custom_add_value(&self) -> Option<&str> {
        self.rows.iter().find_map(|r| match &r.row {
            SearchRow::CustomAdd(value) => Some(value.as_str()),
            SearchRow::Result(_) => None,
        })
    }

    /// Display texts of the rendered search results.
    pub fn results(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| match &r.row {
                SearchRow::Result(text) => Some(text.as_str()),
                SearchRow::CustomAdd(_) => None,
            })
            .collect()
    }

    /// Every interactive row, in display order.
    pub fn rows(&self) -> impl Iterator<Item = &SearchRow> {
        self.rows.iter().map(|r| &r.row)
    }

    /// Number of interactive rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The element rendering interactive row `index`.
    pub fn row_element(&self, index: usize) -> Option<ElementId> {
        self.rows.get(index).map(|r| r.element)
    }

    /// Index of the highlighted row.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    /// The highlighted row.
    pub fn highlighted_row(&self) -> Option<&SearchRow> {
        self.highlighted
            .and_then(|i| self.rows.get(i))
            .map(|r| &r.row)
    }

    /// Whether the "no matches" row is rendered.
    pub fn is_no_results_shown(&self) -> bool {
        self.no_results_shown
    }

    /// Whether the last search function reported truncated results.
    pub fn is_too_many_results(&self) -> bool {
        self.too_many_results
    }

    pub(crate) fn row_index_of(&self, element: ElementId) -> Option<usize> {
        self.rows.iter().position(|r| r.element == element)
    }

    pub(crate) fn highlighted_activation(&self) -> Option<Activation> {
        self.highlighted_row().map(|row| match row {
            SearchRow::Result(text) => Activation::Select(text.clone()),
            SearchRow::CustomAdd(value) => Activation::AddCustom(value.clone()),
        })
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Recompute and render the results for `query`.
    pub(crate) fn search(&mut self, dom: &mut dyn Dom, source: &dyn CandidateSource, query: &str) {
        let _span = tracing::trace_span!(target: targets::SEARCHER, span_names::SEARCH, query)
            .entered();
        self.query = query.to_string();
        let trimmed = query.trim();

        // Stray whitespace must not open an empty dropdown.
        if !query.is_empty() && trimmed.is_empty() {
            self.clear_rows(dom);
            self.close(dom);
            return;
        }

        if trimmed.is_empty() && source.selectable_count() == 0 {
            self.clear_rows(dom);
            self.close(dom);
            return;
        }

        let outcome = match source.search(trimmed) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    target: targets::SEARCHER,
                    error = %err,
                    query = trimmed,
                    "search function failed, showing no results"
                );
                SearchResults::default()
            }
        };

        let custom_add = (self.config.custom_add_enabled
            && !trimmed.is_empty()
            && !outcome.results.iter().any(|r| r == trimmed)
            && !source.is_selectable_value(trimmed))
        .then(|| trimmed.to_string());

        self.render(dom, outcome, custom_add);
    }

    fn render(&mut self, dom: &mut dyn Dom, outcome: SearchResults, custom_add: Option<String>) {
        self.clear_rows(dom);

        for text in outcome.results {
            let element = self.create_row(dom, &text, &[classes::SEARCH_RESULT]);
            self.rows.push(RenderedRow {
                row: SearchRow::Result(text),
                element,
            });
        }

        if let Some(value) = custom_add {
            let label = self.config.custom_add_label.render(&value);
            let element = self.create_row(dom, &label, &[classes::SEARCH_RESULT, classes::CUSTOM_ADD]);
            dom.set_attribute(element, "id", &self.custom_add_id);
            self.rows.push(RenderedRow {
                row: SearchRow::CustomAdd(value),
                element,
            });
        }

        if self.rows.is_empty() {
            let label = self.config.no_results_label.render(self.query.trim());
            let element = self.create_row(dom, &label, &[classes::NO_RESULTS]);
            self.notices.push(element);
            self.no_results_shown = true;
        }

        if outcome.too_many_results {
            let label = self.config.too_many_results_label.fill(self.query.trim());
            let element = self.create_row(dom, &label, &[classes::TOO_MANY_RESULTS]);
            self.notices.push(element);
            self.too_many_results = true;
        }

        tracing::trace!(
            target: targets::SEARCHER,
            rows = self.rows.len(),
            no_results = self.no_results_shown,
            too_many_results = self.too_many_results,
            "rendered search results"
        );

        dom.set_scroll_top(self.results_list, 0.0);
        let first = (!self.rows.is_empty()).then_some(0);
        self.set_highlighted(dom, first);

        if self.rows.is_empty() {
            self.close(dom);
        } else {
            self.set_visible(dom, true);
        }
    }

    fn create_row(&self, dom: &mut dyn Dom, text: &str, row_classes: &[&str]) -> ElementId {
        let element = dom.create_element("li");
        for class in row_classes {
            dom.add_class(element, class);
        }
        dom.set_text(element, text);
        if let Err(err) = dom.append_child(self.results_list, element) {
            tracing::warn!(target: targets::SEARCHER, error = %err, "failed to attach result row");
        }
        element
    }

    fn clear_rows(&mut self, dom: &mut dyn Dom) {
        for row in self.rows.drain(..) {
            dom.remove_element(row.element);
        }
        for notice in self.notices.drain(..) {
            dom.remove_element(notice);
        }
        self.highlighted = None;
        self.no_results_shown = false;
        self.too_many_results = false;
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Open the dropdown and focus the input.
    pub(crate) fn open(&mut self, dom: &mut dyn Dom) {
        self.set_visible(dom, true);
        dom.focus(self.input);
    }

    /// Close the dropdown. Focus is left alone.
    pub(crate) fn close(&mut self, dom: &mut dyn Dom) {
        self.set_visible(dom, false);
    }

    fn set_visible(&mut self, dom: &mut dyn Dom, visible: bool) {
        self.visible = visible;
        dom.toggle_class(self.results_list, classes::HIDDEN, !visible);
    }

    /// Replace the input's text without searching.
    pub(crate) fn set_input_text(&mut self, dom: &mut dyn Dom, text: &str) {
        dom.set_value(self.input, text);
    }

    /// Remove every row and close the dropdown.
    pub(crate) fn reset(&mut self, dom: &mut dyn Dom) {
        self.clear_rows(dom);
        self.query.clear();
        self.close(dom);
    }

    // =========================================================================
    // Highlight
    // =========================================================================

    /// Move the highlight one row down, stopping at the last row.
    pub(crate) fn highlight_next(&mut self, dom: &mut dyn Dom) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.highlighted {
            Some(index) => (index + 1).min(self.rows.len() - 1),
            None => 0,
        };
        self.set_highlighted(dom, Some(next));
    }

    /// Move the highlight one row up, stopping at the first row.
    pub(crate) fn highlight_previous(&mut self, dom: &mut dyn Dom) {
        if self.rows.is_empty() {
            return;
        }
        let previous = self.highlighted.map_or(0, |index| index.saturating_sub(1));
        self.set_highlighted(dom, Some(previous));
    }

    /// Highlight row `index`; out-of-range indices are ignored.
    pub(crate) fn highlight(&mut self, dom: &mut dyn Dom, index: usize) {
        if index < self.rows.len() {
            self.set_highlighted(dom, Some(index));
        }
    }

    fn set_highlighted(&mut self, dom: &mut dyn Dom, index: Option<usize>) {
        if let Some(old) = self.highlighted.and_then(|i| self.rows.get(i)) {
            dom.remove_class(old.element, classes::HIGHLIGHTED);
        }
        self.highlighted = index;
        if let Some(new) = index.and_then(|i| self.rows.get(i)) {
            dom.add_class(new.element, classes::HIGHLIGHTED);
            tracing::trace!(target: targets::SEARCHER, index = ?index, row = new.row.text(), "highlighted row");
        }
        self.ensure_highlighted_visible(dom);
    }

    fn ensure_highlighted_visible(&self, dom: &mut dyn Dom) {
        let Some(row) = self.highlighted.and_then(|i| self.rows.get(i)) else {
            return;
        };
        let top = dom.offset_top(row.element);
        let bottom = top + dom.height(row.element);
        let viewport = dom.height(self.results_list);
        let scroll = dom.scroll_top(self.results_list);

        if top < scroll {
            dom.set_scroll_top(self.results_list, top);
        } else if viewport > 0.0 && bottom > scroll + viewport {
            dom.set_scroll_top(self.results_list, bottom - viewport);
        }
    }
}
