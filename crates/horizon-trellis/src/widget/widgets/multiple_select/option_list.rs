//! Option and chip bookkeeping.
//!
//! [`OptionList`] mirrors the `<option>` children of the bound native control;
//! [`ChosenList`] records the rendered chips in selection order. Neither
//! touches the document; the widget keeps them in step with it.

use horizon_trellis_core::ElementId;

use super::options::SearchResults;

// ============================================================================
// Options
// ============================================================================

/// One entry of the backing native control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    value: String,
    display_text: String,
    selected: bool,
    element: ElementId,
}

impl SelectOption {
    pub(crate) fn new(
        value: impl Into<String>,
        display_text: impl Into<String>,
        selected: bool,
        element: ElementId,
    ) -> Self {
        Self {
            value: value.into(),
            display_text: display_text.into(),
            selected,
            element,
        }
    }

    /// The submitted value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The text shown to the user.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Whether at least one chip currently represents this option.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The native `<option>` element backing this option.
    pub fn element(&self) -> ElementId {
        self.element
    }
}

/// The options of the native control, in native order.
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionList {
    options: Vec<SelectOption>,
}

impl OptionList {
    pub fn iter(&self) -> impl Iterator<Item = &SelectOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn get(&self, index: usize) -> Option<&SelectOption> {
        self.options.get(index)
    }

    pub fn push(&mut self, option: SelectOption) {
        self.options.push(option);
    }

    pub fn remove(&mut self, index: usize) -> SelectOption {
        self.options.remove(index)
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(option) = self.options.get_mut(index) {
            option.selected = selected;
        }
    }

    pub fn position_by_value(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    pub fn position_by_element(&self, element: ElementId) -> Option<usize> {
        self.options.iter().position(|o| o.element == element)
    }

    pub fn position_by_display(&self, display_text: &str) -> Option<usize> {
        self.options.iter().position(|o| o.display_text == display_text)
    }

    /// The first selectable option with exactly this display text.
    pub fn position_selectable_by_display(
        &self,
        display_text: &str,
        allow_duplicates: bool,
    ) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.display_text == display_text && is_selectable(o, allow_duplicates))
    }

    /// Options a search may offer: unselected ones, or all of them when the
    /// same value may be chosen repeatedly.
    pub fn selectable(&self, allow_duplicates: bool) -> impl Iterator<Item = &SelectOption> {
        self.options
            .iter()
            .filter(move |o| is_selectable(o, allow_duplicates))
    }

    /// The default search: selectable display texts containing `query`
    /// (case-insensitively), sorted alphabetically ignoring case.
    pub fn default_search(&self, query: &str, allow_duplicates: bool) -> SearchResults {
        let needle = query.to_lowercase();
        let mut results: Vec<String> = self
            .selectable(allow_duplicates)
            .filter(|o| needle.is_empty() || o.display_text.to_lowercase().contains(&needle))
            .map(|o| o.display_text.clone())
            .collect();
        results.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        SearchResults::new(results)
    }
}

fn is_selectable(option: &SelectOption, allow_duplicates: bool) -> bool {
    allow_duplicates || !option.selected
}

// ============================================================================
// Chips
// ============================================================================

/// A rendered chip for one selection of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chip {
    pub value: String,
    /// The native `<option>` this chip selects.
    pub option: ElementId,
    /// The chip's `<li>` element.
    pub element: ElementId,
}

/// Chips in selection order, plus the highlighted-for-unselect marker, which
/// can only ever sit on the last chip.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChosenList {
    chips: Vec<Chip>,
    last_highlighted: bool,
}

impl ChosenList {
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chip> {
        self.chips.iter()
    }

    pub fn last(&self) -> Option<&Chip> {
        self.chips.last()
    }

    pub fn values(&self) -> Vec<String> {
        self.chips.iter().map(|c| c.value.clone()).collect()
    }

    pub fn push(&mut self, chip: Chip) {
        self.chips.push(chip);
    }

    pub fn remove(&mut self, index: usize) -> Chip {
        self.chips.remove(index)
    }

    pub fn take_all(&mut self) -> Vec<Chip> {
        self.last_highlighted = false;
        std::mem::take(&mut self.chips)
    }

    /// Replace the chip order. `chips` must be a permutation of the current
    /// chips.
    pub fn reorder(&mut self, chips: Vec<Chip>) {
        debug_assert_eq!(chips.len(), self.chips.len());
        self.chips = chips;
    }

    pub fn position_by_value(&self, value: &str) -> Option<usize> {
        self.chips.iter().position(|c| c.value == value)
    }

    pub fn position_by_option(&self, option: ElementId) -> Option<usize> {
        self.chips.iter().position(|c| c.option == option)
    }

    pub fn position_by_element(&self, element: ElementId) -> Option<usize> {
        self.chips.iter().position(|c| c.element == element)
    }

    pub fn contains_option(&self, option: ElementId) -> bool {
        self.position_by_option(option).is_some()
    }

    pub fn is_last_highlighted(&self) -> bool {
        self.last_highlighted && !self.chips.is_empty()
    }

    pub fn set_last_highlighted(&mut self, highlighted: bool) {
        self.last_highlighted = highlighted && !self.chips.is_empty();
    }
}
