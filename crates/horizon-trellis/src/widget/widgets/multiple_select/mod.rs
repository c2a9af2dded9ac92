//! Multiple-value select widget with type-ahead search.
//!
//! `MultipleSelect` replaces a native `<select multiple>` control with a row
//! of chips (one per chosen value) followed by a search input. Typing into
//! the input filters the options through a [`Searcher`]; choosing a result
//! adds a chip and selects the matching native `<option>`, so the native
//! control keeps reflecting the selection for form submission.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::{Dom, MemoryDom, WidgetFactory};
//!
//! let mut dom = MemoryDom::new();
//! let select = dom.create_element("select");
//! dom.set_attribute(select, "id", "fruits");
//! dom.set_attribute(select, "multiple", "");
//! dom.append_child(dom.body(), select).unwrap();
//!
//! let factory = WidgetFactory::new();
//! let mut fruits = factory
//!     .multiple_select(dom, select)
//!     .unwrap()
//!     .with_placeholder("Pick fruit")
//!     .with_custom_add_enabled(true);
//! fruits.initialize().unwrap();
//!
//! fruits.add_option("apple", "Apple").unwrap();
//! fruits.select_option_with_value("apple").unwrap();
//! assert_eq!(fruits.get_selected_values(), vec!["apple"]);
//! ```
//!
//! # Signals
//!
//! - `option_added(OptionEvent)`: an option was appended
//! - `option_selected(OptionEvent)`: a chip was added for a value
//! - `option_deselected(OptionEvent)`: a chip was removed

mod element_ids;
mod events;
mod option_list;
mod options;
mod searcher;

pub use element_ids::ElementIds;
pub use option_list::SelectOption;
pub use options::{
    MultipleSelectOptions, OPTIONS_ATTRIBUTE, OptionOverrides, SearchFunction, SearchResults,
};
pub use searcher::{SearchRow, Searcher};

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Dom, ElementId, EventKind, IdAllocator, Selector, Signal, WidgetId};

use crate::error::{Error, Result, SearchFunctionError};
use option_list::{Chip, ChosenList, OptionList};
use searcher::{Activation, CandidateSource, SearcherConfig};

/// Namespace every listener of the widget is registered under.
pub const LISTENER_NAMESPACE: &str = "multiple-select";

/// Prefix of generated element-group ids.
const GROUP_ID_PREFIX: &str = "multiple-select";

/// Class names of rendered elements.
pub mod classes {
    /// Hides an element.
    pub const HIDDEN: &str = "hidden";
    /// The container replacing the native control.
    pub const DISPLAY: &str = "multiple-select-display";
    /// The chip list.
    pub const OPTION_LIST: &str = "option-list";
    /// The row holding the search input.
    pub const INPUT_OPTION: &str = "input-option";
    /// The search input.
    pub const INPUT: &str = "search-input";
    /// The results dropdown.
    pub const SEARCH_RESULTS: &str = "search-results";
    /// A chip.
    pub const CHOSEN_OPTION: &str = "chosen-option";
    /// The text of a chip.
    pub const OPTION_LABEL: &str = "option-label";
    /// The remove control of a chip.
    pub const REMOVE_OPTION: &str = "remove-option";
    /// The last chip, armed for removal by the next backspace.
    pub const HIGHLIGHTED_FOR_UNSELECT: &str = "highlighted-for-unselect";
    /// An interactive results row.
    pub const SEARCH_RESULT: &str = "search-result";
    /// The custom-add row.
    pub const CUSTOM_ADD: &str = "custom-add";
    /// The "no matches" row.
    pub const NO_RESULTS: &str = "no-results";
    /// The "too many results" hint row.
    pub const TOO_MANY_RESULTS: &str = "too-many-results";
    /// The highlighted results row.
    pub const HIGHLIGHTED: &str = "highlighted";
}

/// Payload of the widget's signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEvent {
    /// The emitting widget.
    pub widget: WidgetId,
    /// The option value concerned.
    pub value: String,
}

/// Elements rendered by `initialize`.
#[derive(Debug)]
struct View {
    ids: ElementIds,
    display: ElementId,
    option_list: ElementId,
    input_option: ElementId,
    searcher: Searcher,
    /// Elements created (rather than found) during initialize, outermost
    /// first.
    created: Vec<ElementId>,
}

/// Candidate options as seen by the searcher.
struct Candidates<'a> {
    options: &'a OptionList,
    allow_duplicates: bool,
    search_function: Option<&'a SearchFunction>,
}

impl CandidateSource for Candidates<'_> {
    fn selectable_count(&self) -> usize {
        self.options.selectable(self.allow_duplicates).count()
    }

    fn is_selectable_value(&self, value: &str) -> bool {
        self.options
            .selectable(self.allow_duplicates)
            .any(|o| o.value() == value)
    }

    fn search(&self, query: &str) -> std::result::Result<SearchResults, SearchFunctionError> {
        match self.search_function {
            Some(search) => search(query),
            None => Ok(self.options.default_search(query, self.allow_duplicates)),
        }
    }
}

/// A chip-based multiple select bound to a native `<select multiple>`.
///
/// Created by [`WidgetFactory::multiple_select`](crate::WidgetFactory::multiple_select),
/// configured with the `with_*` builder methods, then rendered with
/// [`initialize`](Self::initialize).
pub struct MultipleSelect<D: Dom> {
    dom: D,
    id: WidgetId,
    /// The native control.
    element: ElementId,
    group_id: String,
    /// Whether the native control's `id` was assigned by the widget.
    generated_group_id: bool,

    overrides: OptionOverrides,
    options: MultipleSelectOptions,
    search_function: Option<SearchFunction>,

    option_list: OptionList,
    chosen: ChosenList,
    view: Option<View>,

    /// Emitted when an option is appended.
    pub option_added: Signal<OptionEvent>,
    /// Emitted when a chip is added.
    pub option_selected: Signal<OptionEvent>,
    /// Emitted when a chip is removed.
    pub option_deselected: Signal<OptionEvent>,
}

impl<D: Dom> MultipleSelect<D> {
    /// Bind to `element`, which must be a `<select>` with the `multiple`
    /// attribute. Nothing is rendered until [`initialize`](Self::initialize).
    pub(crate) fn bind(mut dom: D, element: ElementId, ids: &IdAllocator) -> Result<Self> {
        match dom.tag_name(element) {
            None => return Err(Error::configuration("bound element does not exist")),
            Some(tag) if tag != "select" => {
                return Err(Error::configuration(format!(
                    "expected a <select> element, found <{tag}>"
                )));
            }
            Some(_) => {}
        }
        if dom.attribute(element, "multiple").is_none() {
            return Err(Error::configuration(
                "bound <select> element lacks the multiple attribute",
            ));
        }

        let id = ids.allocate();
        let (group_id, generated_group_id) = match dom.attribute(element, "id") {
            Some(existing) if !existing.is_empty() => (existing, false),
            _ => {
                let generated = ids.element_group_id(GROUP_ID_PREFIX, id);
                dom.set_attribute(element, "id", &generated);
                (generated, true)
            }
        };

        let mut option_list = OptionList::default();
        for native in dom.query_selector_all(element, &Selector::Tag("option".into())) {
            let text = dom.text(native);
            let value = Some(dom.value(native))
                .filter(|v| !v.is_empty())
                .or_else(|| dom.attribute(native, "value"))
                .unwrap_or_else(|| text.clone());
            let selected = dom.is_selected(native) || dom.attribute(native, "selected").is_some();
            option_list.push(SelectOption::new(value, text, selected, native));
        }

        tracing::debug!(
            target: targets::MULTIPLE_SELECT,
            widget = %id,
            group_id = %group_id,
            options = option_list.len(),
            "bound multiple select"
        );

        Ok(Self {
            dom,
            id,
            element,
            group_id,
            generated_group_id,
            overrides: OptionOverrides::default(),
            options: MultipleSelectOptions::default(),
            search_function: None,
            option_list,
            chosen: ChosenList::default(),
            view: None,
            option_added: Signal::new(),
            option_selected: Signal::new(),
            option_deselected: Signal::new(),
        })
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    fn configure(mut self, setting: &str, apply: impl FnOnce(&mut Self)) -> Self {
        if self.view.is_some() {
            tracing::warn!(
                target: targets::MULTIPLE_SELECT,
                widget = %self.id,
                setting,
                "ignoring configuration change on an initialized widget"
            );
        } else {
            apply(&mut self);
        }
        self
    }

    /// Set the placeholder of the search input.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        self.configure("placeholder", |s| s.overrides.placeholder = Some(placeholder))
    }

    /// Allow typed text to be added as a new option.
    pub fn with_custom_add_enabled(self, enabled: bool) -> Self {
        self.configure("custom_add_enabled", |s| {
            s.overrides.custom_add_enabled = Some(enabled)
        })
    }

    /// Set the label template of the custom-add row.
    pub fn with_custom_add_label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.configure("custom_add_label", |s| s.overrides.custom_add_label = Some(label))
    }

    /// Allow the same value to be chosen (and added) more than once.
    pub fn with_allow_duplicates(self, allow: bool) -> Self {
        self.configure("allow_duplicates", |s| s.overrides.allow_duplicates = Some(allow))
    }

    /// Set the label template of the "no matches" row.
    pub fn with_no_search_results_label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.configure("no_search_results_label", |s| {
            s.overrides.no_search_results_label = Some(label)
        })
    }

    /// Set the label template of the "too many results" hint row.
    pub fn with_too_many_results_label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.configure("too_many_results_label", |s| {
            s.overrides.too_many_results_label = Some(label)
        })
    }

    /// Set the text of each chip's remove control.
    pub fn with_remove_icon(self, icon: impl Into<String>) -> Self {
        let icon = icon.into();
        self.configure("remove_icon", |s| s.overrides.remove_icon = Some(icon))
    }

    /// Replace the default search with `search`.
    ///
    /// The function receives the trimmed query. An `Err` is logged and
    /// treated as an empty result set.
    pub fn with_search_function<F>(self, search: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<SearchResults, SearchFunctionError> + 'static,
    {
        self.configure("search_function", |s| s.search_function = Some(Box::new(search)))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Render the widget.
    ///
    /// Resolves the configuration (defaults, then the control's
    /// `data-options` JSON, then the `with_*` setters), hides the native
    /// control, finds or creates the display elements, renders a chip for
    /// every option already selected in the native control, and registers
    /// the event listeners. Calling it again does nothing.
    pub fn initialize(&mut self) -> Result<()> {
        if self.view.is_some() {
            return Ok(());
        }

        let attribute = self
            .dom
            .attribute(self.element, OPTIONS_ATTRIBUTE)
            .map(|json| OptionOverrides::from_json(&json))
            .transpose()
            .map_err(|source| Error::InvalidOptions { source })?;
        self.options = self.overrides.resolve(attribute.as_ref());

        let mut created = Vec::new();
        let view = match self.build_view(&mut created) {
            Ok(view) => view,
            Err(err) => {
                for element in created.into_iter().rev() {
                    self.dom.remove_element(element);
                }
                return Err(err);
            }
        };
        self.dom.add_class(self.element, classes::HIDDEN);
        self.view = Some(view);

        for index in 0..self.option_list.len() {
            if self.option_list.get(index).is_some_and(|o| o.is_selected()) {
                self.push_chip(index)?;
            }
        }

        tracing::debug!(
            target: targets::MULTIPLE_SELECT,
            widget = %self.id,
            chips = self.chosen.len(),
            "initialized multiple select"
        );
        Ok(())
    }

    fn build_view(&mut self, created: &mut Vec<ElementId>) -> Result<View> {
        let ids = ElementIds::new(&self.group_id);
        let dom = &mut self.dom;

        let display = match dom.element_by_id(&ids.display()) {
            Some(existing) => existing,
            None => {
                let display = new_element(dom, "div", &ids.display(), &[classes::DISPLAY]);
                created.push(display);
                let parent = dom.parent(self.element).unwrap_or_else(|| dom.body());
                let after = dom.next_sibling(self.element);
                dom.insert_before(parent, display, after)?;
                display
            }
        };
        let option_list = find_or_append(
            dom,
            display,
            "ul",
            &ids.option_list(),
            &[classes::OPTION_LIST],
            created,
        )?;
        let input_option = find_or_append(
            dom,
            option_list,
            "li",
            &ids.input_option(),
            &[classes::INPUT_OPTION],
            created,
        )?;
        let input = find_or_append(dom, input_option, "input", &ids.input(), &[classes::INPUT], created)?;
        dom.set_attribute(input, "type", "text");
        dom.set_attribute(input, "autocomplete", "off");
        dom.set_attribute(input, "placeholder", &self.options.placeholder);
        let results = find_or_append(
            dom,
            display,
            "ul",
            &ids.search_results(),
            &[classes::SEARCH_RESULTS, classes::HIDDEN],
            created,
        )?;

        for kind in [
            EventKind::KeyDown,
            EventKind::KeyUp,
            EventKind::Input,
            EventKind::Focus,
            EventKind::Blur,
        ] {
            dom.add_listener(input, kind, LISTENER_NAMESPACE);
        }
        dom.add_listener(display, EventKind::Click, LISTENER_NAMESPACE);
        dom.add_listener(display, EventKind::MouseOver, LISTENER_NAMESPACE);

        let searcher = Searcher::new(
            input,
            results,
            ids.custom_add(),
            SearcherConfig {
                custom_add_enabled: self.options.custom_add_enabled,
                custom_add_label: self.options.custom_add_label.clone(),
                no_results_label: self.options.no_search_results_label.clone(),
                too_many_results_label: self.options.too_many_results_label.clone(),
            },
        );

        Ok(View {
            ids,
            display,
            option_list,
            input_option,
            searcher,
            created: std::mem::take(created),
        })
    }

    /// Remove everything `initialize` rendered, unhide the native control and
    /// hand the document back.
    ///
    /// The native control keeps the current selection.
    pub fn destroy(mut self) -> D {
        if let Some(mut view) = self.view.take() {
            view.searcher.reset(&mut self.dom);
            for chip in self.chosen.take_all() {
                self.dom.remove_element(chip.element);
            }
            self.dom
                .remove_listeners(view.searcher.input(), LISTENER_NAMESPACE);
            self.dom.remove_listeners(view.display, LISTENER_NAMESPACE);
            for element in view.created.into_iter().rev() {
                self.dom.remove_element(element);
            }
        }
        self.dom.remove_class(self.element, classes::HIDDEN);
        if self.generated_group_id {
            self.dom.remove_attribute(self.element, "id");
        }
        tracing::debug!(target: targets::MULTIPLE_SELECT, widget = %self.id, "destroyed multiple select");
        self.dom
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The widget's id.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The bound native control.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The element-group id rendered ids derive from.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The rendered element ids.
    pub fn element_ids(&self) -> ElementIds {
        ElementIds::new(&self.group_id)
    }

    /// The resolved configuration. Defaults until `initialize` runs.
    pub fn configuration(&self) -> &MultipleSelectOptions {
        &self.options
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.view.is_some()
    }

    /// The document.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// The document, mutably. Changing rendered elements behind the widget's
    /// back is not supported.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// The searcher, once initialized.
    pub fn searcher(&self) -> Option<&Searcher> {
        self.view.as_ref().map(|v| &v.searcher)
    }

    /// Every option, in native order.
    pub fn options(&self) -> impl Iterator<Item = &SelectOption> {
        self.option_list.iter()
    }

    /// Options with at least one chip, in native order.
    pub fn selected_options(&self) -> impl Iterator<Item = &SelectOption> {
        self.option_list.iter().filter(|o| o.is_selected())
    }

    /// The first option with `value`.
    pub fn option_with_value(&self, value: &str) -> Option<&SelectOption> {
        self.option_list
            .position_by_value(value)
            .and_then(|i| self.option_list.get(i))
    }

    /// Whether an option with `value` exists.
    pub fn contains_option_with_value(&self, value: &str) -> bool {
        self.option_list.position_by_value(value).is_some()
    }

    /// Chosen values in chip order.
    ///
    /// Before `initialize` this lists the options selected in the native
    /// control.
    pub fn get_selected_values(&self) -> Vec<String> {
        if self.view.is_some() {
            self.chosen.values()
        } else {
            self.selected_options().map(|o| o.value().to_string()).collect()
        }
    }

    /// The default search: display texts of selectable options containing
    /// `query` (ignoring case), sorted alphabetically ignoring case.
    ///
    /// Selectable means not yet chosen, or any option when duplicates are
    /// allowed.
    pub fn search(&self, query: &str) -> SearchResults {
        self.option_list
            .default_search(query, self.options.allow_duplicates)
    }

    // =========================================================================
    // Option set
    // =========================================================================

    /// Append an option.
    ///
    /// Does nothing and returns `None` when `value` exists and duplicates are
    /// not allowed. Otherwise returns the new native `<option>` element.
    pub fn add_option(&mut self, value: &str, display_text: &str) -> Result<Option<ElementId>> {
        let added = self.add_option_inner(value, display_text)?;
        if added.is_some() {
            self.refresh_search();
        }
        Ok(added)
    }

    fn add_option_inner(&mut self, value: &str, display_text: &str) -> Result<Option<ElementId>> {
        if !self.options.allow_duplicates && self.contains_option_with_value(value) {
            tracing::debug!(
                target: targets::MULTIPLE_SELECT,
                widget = %self.id,
                value,
                "option already present"
            );
            return Ok(None);
        }

        let native = self.dom.create_element("option");
        self.dom.set_attribute(native, "value", value);
        self.dom.set_value(native, value);
        self.dom.set_text(native, display_text);
        if let Err(err) = self.dom.append_child(self.element, native) {
            self.dom.remove_element(native);
            return Err(err.into());
        }
        self.option_list
            .push(SelectOption::new(value, display_text, false, native));

        tracing::debug!(target: targets::MULTIPLE_SELECT, widget = %self.id, value, "added option");
        self.option_added.emit(OptionEvent {
            widget: self.id,
            value: value.to_string(),
        });
        Ok(Some(native))
    }

    /// Remove the option backed by `option` and all of its chips. Unknown
    /// handles are ignored.
    pub fn remove_option(&mut self, option: ElementId) {
        if let Some(index) = self.option_list.position_by_element(option) {
            self.remove_option_at(index);
            self.refresh_search();
        }
    }

    /// Remove the first option with `value` and all of its chips.
    pub fn remove_option_with_value(&mut self, value: &str) -> Result<()> {
        let index = self
            .option_list
            .position_by_value(value)
            .ok_or_else(|| Error::not_found(value))?;
        self.remove_option_at(index);
        self.refresh_search();
        Ok(())
    }

    /// Remove every option and chip.
    pub fn remove_all_options(&mut self) {
        while let Some(last) = self.option_list.len().checked_sub(1) {
            self.remove_option_at(last);
        }
        self.refresh_search();
    }

    fn remove_option_at(&mut self, index: usize) {
        let Some(native) = self.option_list.get(index).map(|o| o.element()) else {
            return;
        };
        while let Some(chip_index) = self.chosen.position_by_option(native) {
            self.remove_chip(chip_index);
        }
        let removed = self.option_list.remove(index);
        self.dom.remove_element(native);
        tracing::debug!(
            target: targets::MULTIPLE_SELECT,
            widget = %self.id,
            value = removed.value(),
            "removed option"
        );
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Add a chip for the option backed by `option`.
    ///
    /// Does nothing when the option is already chosen and duplicates are not
    /// allowed, or when the handle is unknown.
    pub fn select_option(&mut self, option: ElementId) -> Result<()> {
        self.require_view()?;
        if let Some(index) = self.option_list.position_by_element(option) {
            self.push_chip(index)?;
            self.refresh_search();
        }
        Ok(())
    }

    /// Add a chip for the first option with `value`.
    pub fn select_option_with_value(&mut self, value: &str) -> Result<()> {
        self.require_view()?;
        let index = self
            .option_list
            .position_by_value(value)
            .ok_or_else(|| Error::not_found(value))?;
        self.push_chip(index)?;
        self.refresh_search();
        Ok(())
    }

    /// Remove the first chip for the option backed by `option`.
    pub fn deselect_option(&mut self, option: ElementId) -> Result<()> {
        self.require_view()?;
        if let Some(chip_index) = self.chosen.position_by_option(option) {
            self.remove_chip(chip_index);
            self.refresh_search();
        }
        Ok(())
    }

    /// Remove the first chip (in display order) with `value`.
    pub fn deselect_option_with_value(&mut self, value: &str) -> Result<()> {
        self.require_view()?;
        if !self.contains_option_with_value(value) {
            return Err(Error::not_found(value));
        }
        if let Some(chip_index) = self.chosen.position_by_value(value) {
            self.remove_chip(chip_index);
            self.refresh_search();
        }
        Ok(())
    }

    /// Remove every chip.
    pub fn deselect_all(&mut self) -> Result<()> {
        self.require_view()?;
        while !self.chosen.is_empty() {
            self.remove_chip(self.chosen.len() - 1);
        }
        self.refresh_search();
        Ok(())
    }

    /// Make the chips read exactly `values`, in that order.
    ///
    /// Existing chips for values in the list are kept; the rest are removed
    /// and missing values are selected. Duplicated entries collapse to one
    /// unless duplicates are allowed. Fails with [`Error::NotFound`] before
    /// changing anything if a value has no option.
    pub fn set_selected_values<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        self.require_view()?;
        if let Some(missing) = values
            .iter()
            .map(|v| v.as_ref())
            .find(|v| !self.contains_option_with_value(v))
        {
            return Err(Error::not_found(missing));
        }

        let mut wanted: Vec<&str> = Vec::with_capacity(values.len());
        for value in values.iter().map(|v| v.as_ref()) {
            if self.options.allow_duplicates || !wanted.contains(&value) {
                wanted.push(value);
            }
        }

        // Pair each wanted slot with an unused chip of the same value.
        let mut slots: Vec<Option<ElementId>> = Vec::with_capacity(wanted.len());
        let mut used = vec![false; self.chosen.len()];
        for value in &wanted {
            let matched = self
                .chosen
                .iter()
                .enumerate()
                .find(|(i, chip)| !used[*i] && chip.value == *value)
                .map(|(i, chip)| {
                    used[i] = true;
                    chip.element
                });
            slots.push(matched);
        }

        let stale: Vec<ElementId> = self
            .chosen
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(chip, _)| chip.element)
            .collect();
        for element in stale {
            if let Some(chip_index) = self.chosen.position_by_element(element) {
                self.remove_chip(chip_index);
            }
        }

        for (slot, value) in slots.iter_mut().zip(&wanted) {
            if slot.is_none()
                && let Some(index) = self.option_list.position_by_value(value)
                && self.push_chip(index)?
            {
                *slot = self.chosen.last().map(|c| c.element);
            }
        }

        self.reorder_chips(&slots)?;
        tracing::debug!(
            target: targets::MULTIPLE_SELECT,
            widget = %self.id,
            values = ?wanted,
            "set selected values"
        );
        self.refresh_search();
        Ok(())
    }

    fn reorder_chips(&mut self, order: &[Option<ElementId>]) -> Result<()> {
        let view = self.view.as_ref().ok_or(Error::NotInitialized)?;
        let mut ordered: Vec<Chip> = Vec::with_capacity(self.chosen.len());
        for element in order.iter().flatten() {
            if let Some(chip) = self.chosen.iter().find(|c| c.element == *element) {
                self.dom
                    .insert_before(view.option_list, chip.element, Some(view.input_option))?;
                ordered.push(chip.clone());
            }
        }
        self.chosen.reorder(ordered);
        Ok(())
    }

    /// Render a chip for option `index` and mark the option selected.
    ///
    /// Returns `false` when the option is already chosen and duplicates are
    /// not allowed.
    fn push_chip(&mut self, index: usize) -> Result<bool> {
        let view = self.view.as_ref().ok_or(Error::NotInitialized)?;
        let Some(option) = self.option_list.get(index) else {
            return Ok(false);
        };
        if !self.options.allow_duplicates && self.chosen.contains_option(option.element()) {
            return Ok(false);
        }
        let value = option.value().to_string();
        let native = option.element();

        let chip = self.dom.create_element("li");
        self.dom.set_attribute(chip, "id", &view.ids.chip(&value));
        self.dom.set_attribute(chip, "data-value", &value);
        self.dom.add_class(chip, classes::CHOSEN_OPTION);
        let label = self.dom.create_element("span");
        self.dom.add_class(label, classes::OPTION_LABEL);
        self.dom.set_text(label, option.display_text());
        let remove = self.dom.create_element("span");
        self.dom.add_class(remove, classes::REMOVE_OPTION);
        self.dom.set_text(remove, &self.options.remove_icon);
        self.dom.append_child(chip, label)?;
        self.dom.append_child(chip, remove)?;
        if let Err(err) = self
            .dom
            .insert_before(view.option_list, chip, Some(view.input_option))
        {
            self.dom.remove_element(chip);
            return Err(err.into());
        }

        self.clear_chip_highlight();
        self.chosen.push(Chip {
            value: value.clone(),
            option: native,
            element: chip,
        });
        self.option_list.set_selected(index, true);
        self.dom.set_selected(native, true);

        tracing::debug!(target: targets::MULTIPLE_SELECT, widget = %self.id, value = %value, "selected option");
        self.option_selected.emit(OptionEvent {
            widget: self.id,
            value,
        });
        Ok(true)
    }

    /// Remove chip `chip_index`; the option stays selected while another
    /// chip still refers to it.
    fn remove_chip(&mut self, chip_index: usize) {
        self.clear_chip_highlight();
        let chip = self.chosen.remove(chip_index);
        self.dom.remove_element(chip.element);
        if !self.chosen.contains_option(chip.option) {
            if let Some(index) = self.option_list.position_by_element(chip.option) {
                self.option_list.set_selected(index, false);
            }
            self.dom.set_selected(chip.option, false);
        }

        tracing::debug!(
            target: targets::MULTIPLE_SELECT,
            widget = %self.id,
            value = %chip.value,
            "deselected option"
        );
        self.option_deselected.emit(OptionEvent {
            widget: self.id,
            value: chip.value,
        });
    }

    // =========================================================================
    // Chip highlight
    // =========================================================================

    /// Arm the last chip for removal.
    ///
    /// Only possible while the search input is empty and a chip exists.
    /// Returns whether the last chip is now highlighted.
    pub fn highlight_option_for_unselect(&mut self) -> bool {
        let Some(view) = &self.view else {
            return false;
        };
        if !self.dom.value(view.searcher.input()).is_empty() {
            return false;
        }
        let Some(last) = self.chosen.last().map(|c| c.element) else {
            return false;
        };
        self.chosen.set_last_highlighted(true);
        self.dom.add_class(last, classes::HIGHLIGHTED_FOR_UNSELECT);
        tracing::trace!(target: targets::MULTIPLE_SELECT, widget = %self.id, "highlighted last chip");
        true
    }

    /// Whether the last chip is armed for removal.
    pub fn is_last_option_highlighted_for_unselect(&self) -> bool {
        self.chosen.is_last_highlighted()
    }

    /// Remove the armed chip. Returns whether a chip was removed.
    pub fn remove_highlighted_option(&mut self) -> bool {
        if !self.chosen.is_last_highlighted() {
            return false;
        }
        self.remove_chip(self.chosen.len() - 1);
        self.refresh_search();
        true
    }

    /// Disarm the last chip.
    pub fn unhighlight_option_for_unselect(&mut self) {
        self.clear_chip_highlight();
    }

    fn clear_chip_highlight(&mut self) {
        if !self.chosen.is_last_highlighted() {
            return;
        }
        if let Some(last) = self.chosen.last().map(|c| c.element) {
            self.dom.remove_class(last, classes::HIGHLIGHTED_FOR_UNSELECT);
        }
        self.chosen.set_last_highlighted(false);
    }

    // =========================================================================
    // Search results
    // =========================================================================

    /// Search for `query` and show the results. The input is updated to read
    /// `query`.
    pub fn update_search(&mut self, query: &str) -> Result<()> {
        let view = self.view.as_mut().ok_or(Error::NotInitialized)?;
        if self.dom.value(view.searcher.input()) != query {
            view.searcher.set_input_text(&mut self.dom, query);
        }
        if !query.is_empty() {
            self.clear_chip_highlight();
        }
        self.run_search(query)
    }

    /// Move the results highlight down one row.
    pub fn highlight_next_search_result(&mut self) -> Result<()> {
        let view = self.view.as_mut().ok_or(Error::NotInitialized)?;
        view.searcher.highlight_next(&mut self.dom);
        Ok(())
    }

    /// Move the results highlight up one row.
    pub fn highlight_previous_search_result(&mut self) -> Result<()> {
        let view = self.view.as_mut().ok_or(Error::NotInitialized)?;
        view.searcher.highlight_previous(&mut self.dom);
        Ok(())
    }

    /// Activate the highlighted row.
    ///
    /// A search result selects its option; the custom-add row adds the query
    /// as a new option and selects it. The input is then cleared and the
    /// results refreshed for the empty query. Returns whether a row was
    /// highlighted.
    pub fn select_highlighted_search_result(&mut self) -> Result<bool> {
        let view = self.view.as_ref().ok_or(Error::NotInitialized)?;
        let Some(activation) = view.searcher.highlighted_activation() else {
            return Ok(false);
        };

        match activation {
            Activation::Select(text) => {
                let index = self
                    .option_list
                    .position_selectable_by_display(&text, self.options.allow_duplicates)
                    .or_else(|| self.option_list.position_by_display(&text));
                match index {
                    // Already chosen options are left as they are.
                    Some(index) => {
                        self.push_chip(index)?;
                    }
                    // Search functions may offer texts that have no option yet.
                    None => self.add_and_select(&text)?,
                }
            }
            Activation::AddCustom(value) => self.add_and_select(&value)?,
        }

        if let Some(view) = self.view.as_mut() {
            view.searcher.set_input_text(&mut self.dom, "");
        }
        self.run_search("")?;
        Ok(true)
    }

    fn add_and_select(&mut self, value: &str) -> Result<()> {
        let index = match self.add_option_inner(value, value)? {
            Some(native) => self.option_list.position_by_element(native),
            None => self.option_list.position_by_value(value),
        };
        if let Some(index) = index {
            self.push_chip(index)?;
        }
        Ok(())
    }

    /// Show the results dropdown and focus the input.
    pub fn open_search_results(&mut self) -> Result<()> {
        let view = self.view.as_mut().ok_or(Error::NotInitialized)?;
        view.searcher.open(&mut self.dom);
        Ok(())
    }

    /// Hide the results dropdown. Focus stays where it is.
    pub fn close_search_results(&mut self) -> Result<()> {
        let view = self.view.as_mut().ok_or(Error::NotInitialized)?;
        view.searcher.close(&mut self.dom);
        Ok(())
    }

    /// Whether the results dropdown is open.
    pub fn is_search_results_visible(&self) -> bool {
        self.searcher().is_some_and(Searcher::is_visible)
    }

    /// Whether the open dropdown shows a custom-add row.
    pub fn is_custom_add_visible(&self) -> bool {
        self.searcher().is_some_and(Searcher::is_custom_add_visible)
    }

    fn run_search(&mut self, query: &str) -> Result<()> {
        let view = self.view.as_mut().ok_or(Error::NotInitialized)?;
        let candidates = Candidates {
            options: &self.option_list,
            allow_duplicates: self.options.allow_duplicates,
            search_function: self.search_function.as_ref(),
        };
        view.searcher.search(&mut self.dom, &candidates, query);
        Ok(())
    }

    /// Re-run the current search so an open dropdown reflects option changes.
    fn refresh_search(&mut self) {
        let Some(view) = self.view.as_mut().filter(|v| v.searcher.is_visible()) else {
            return;
        };
        let query = view.searcher.query().to_string();
        let candidates = Candidates {
            options: &self.option_list,
            allow_duplicates: self.options.allow_duplicates,
            search_function: self.search_function.as_ref(),
        };
        view.searcher.search(&mut self.dom, &candidates, &query);
    }

    fn require_view(&self) -> Result<&View> {
        self.view.as_ref().ok_or(Error::NotInitialized)
    }
}

impl<D: Dom> std::fmt::Debug for MultipleSelect<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipleSelect")
            .field("id", &self.id)
            .field("group_id", &self.group_id)
            .field("options", &self.option_list.len())
            .field("selected", &self.chosen.values())
            .field("initialized", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

/// Create a detached element with an id and classes.
fn new_element(dom: &mut impl Dom, tag: &str, id: &str, element_classes: &[&str]) -> ElementId {
    let element = dom.create_element(tag);
    dom.set_attribute(element, "id", id);
    for class in element_classes {
        dom.add_class(element, class);
    }
    element
}

/// Look `id` up, or create it as the last child of `parent`.
fn find_or_append(
    dom: &mut impl Dom,
    parent: ElementId,
    tag: &str,
    id: &str,
    element_classes: &[&str],
    created: &mut Vec<ElementId>,
) -> Result<ElementId> {
    if let Some(existing) = dom.element_by_id(id) {
        return Ok(existing);
    }
    let element = new_element(dom, tag, id, element_classes);
    created.push(element);
    dom.append_child(parent, element)?;
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_trellis_core::MemoryDom;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn fixture(values: &[(&str, &str)]) -> MultipleSelect<MemoryDom> {
        let mut dom = MemoryDom::new();
        let select = dom.create_element("select");
        dom.set_attribute(select, "id", "fruits");
        dom.set_attribute(select, "multiple", "");
        dom.append_child(dom.body(), select).unwrap();
        for (value, text) in values {
            let option = dom.create_element("option");
            dom.set_value(option, value);
            dom.set_text(option, text);
            dom.append_child(select, option).unwrap();
        }
        MultipleSelect::bind(dom, select, &IdAllocator::new()).unwrap()
    }

    fn fruits() -> MultipleSelect<MemoryDom> {
        let mut widget = fixture(&[("one", "One"), ("two", "Two"), ("three", "Three")]);
        widget.initialize().unwrap();
        widget
    }

    #[test]
    fn test_bind_rejects_non_select() {
        let mut dom = MemoryDom::new();
        let div = dom.create_element("div");
        dom.set_attribute(div, "multiple", "");
        let err = MultipleSelect::bind(dom, div, &IdAllocator::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_bind_requires_multiple() {
        let mut dom = MemoryDom::new();
        let select = dom.create_element("select");
        let ids = IdAllocator::new();
        let err = MultipleSelect::bind(dom, select, &ids).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(ids.allocated(), 0);
    }

    #[test]
    fn test_initialize_renders_layout() {
        let widget = fruits();
        let dom = widget.dom();
        for id in [
            "fruits-display",
            "fruits-option-list",
            "fruits-input-option",
            "fruits-input",
            "fruits-search-results",
        ] {
            assert!(dom.element_by_id(id).is_some(), "missing {id}");
        }
        assert!(dom.has_class(widget.element(), classes::HIDDEN));
        let display = dom.element_by_id("fruits-display").unwrap();
        assert_eq!(dom.next_sibling(widget.element()), Some(display));
    }

    #[test]
    fn test_chip_markup() {
        let mut widget = fruits();
        widget.add_option("blood orange", "Blood Orange").unwrap();
        widget.select_option_with_value("blood orange").unwrap();

        let dom = widget.dom();
        let chip = dom.element_by_id("fruits-option-blood-orange").unwrap();
        assert!(dom.has_class(chip, classes::CHOSEN_OPTION));
        assert_eq!(dom.text(chip), "Blood Orange×");
        let input_option = dom.element_by_id("fruits-input-option").unwrap();
        assert_eq!(dom.next_sibling(chip), Some(input_option));
    }

    #[test]
    fn test_select_reflects_in_native_control() {
        let mut widget = fruits();
        widget.select_option_with_value("two").unwrap();
        let native = widget.option_with_value("two").unwrap().element();
        assert!(widget.dom().is_selected(native));

        widget.deselect_option_with_value("two").unwrap();
        assert!(!widget.dom().is_selected(native));
        assert!(!widget.option_with_value("two").unwrap().is_selected());
    }

    #[test]
    fn test_select_twice_without_duplicates_is_noop() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        widget.select_option_with_value("one").unwrap();
        assert_eq!(widget.get_selected_values(), vec!["one"]);
    }

    #[test]
    fn test_unknown_value_errors() {
        let mut widget = fruits();
        assert!(widget.select_option_with_value("kiwi").unwrap_err().is_not_found());
        assert!(widget.deselect_option_with_value("kiwi").unwrap_err().is_not_found());
        assert!(widget.remove_option_with_value("kiwi").unwrap_err().is_not_found());
    }

    #[test]
    fn test_selection_before_initialize() {
        let mut widget = fixture(&[("one", "One")]);
        assert!(matches!(
            widget.select_option_with_value("one"),
            Err(Error::NotInitialized)
        ));
        assert!(!widget.highlight_option_for_unselect());
    }

    #[test]
    fn test_signals_carry_widget_id() {
        let mut widget = fruits();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        widget.option_selected.connect(move |event: &OptionEvent| {
            sink.lock().push((event.widget, event.value.clone()));
        });
        widget.select_option_with_value("three").unwrap();
        assert_eq!(*seen.lock(), vec![(widget.id(), "three".to_string())]);
    }

    #[test]
    fn test_chip_highlight_requires_empty_input() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        widget.update_search("o").unwrap();
        assert!(!widget.highlight_option_for_unselect());

        widget.update_search("").unwrap();
        assert!(widget.highlight_option_for_unselect());
        let chip = widget.dom().element_by_id("fruits-option-one").unwrap();
        assert!(widget.dom().has_class(chip, classes::HIGHLIGHTED_FOR_UNSELECT));
    }

    #[test]
    fn test_selecting_clears_chip_highlight() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        assert!(widget.highlight_option_for_unselect());
        widget.select_option_with_value("two").unwrap();
        assert!(!widget.is_last_option_highlighted_for_unselect());
        let first = widget.dom().element_by_id("fruits-option-one").unwrap();
        assert!(!widget.dom().has_class(first, classes::HIGHLIGHTED_FOR_UNSELECT));
    }

    #[test]
    fn test_remove_option_drops_its_chips() {
        let mut widget = fruits();
        widget.select_option_with_value("two").unwrap();
        widget.remove_option_with_value("two").unwrap();
        assert!(widget.get_selected_values().is_empty());
        assert!(!widget.contains_option_with_value("two"));
        assert!(widget.dom().element_by_id("fruits-option-two").is_none());
    }

    #[test]
    fn test_remove_option_by_handle_is_idempotent() {
        let mut widget = fruits();
        let native = widget.option_with_value("one").unwrap().element();
        widget.remove_option(native);
        widget.remove_option(native);
        assert_eq!(widget.options().count(), 2);
    }

    #[test]
    fn test_initialize_renders_preselected_options() {
        let mut dom = MemoryDom::new();
        let select = dom.create_element("select");
        dom.set_attribute(select, "id", "fruits");
        dom.set_attribute(select, "multiple", "");
        dom.append_child(dom.body(), select).unwrap();
        for (value, selected) in [("one", false), ("two", true)] {
            let option = dom.create_element("option");
            dom.set_attribute(option, "value", value);
            dom.set_text(option, value);
            dom.set_selected(option, selected);
            dom.append_child(select, option).unwrap();
        }

        let mut widget = MultipleSelect::bind(dom, select, &IdAllocator::new()).unwrap();
        assert_eq!(widget.get_selected_values(), vec!["two"]);
        widget.initialize().unwrap();
        assert_eq!(widget.get_selected_values(), vec!["two"]);
        assert!(widget.dom().element_by_id("fruits-option-two").is_some());
    }

    #[test]
    fn test_custom_search_function_result_without_option_is_added() {
        let mut widget = fixture(&[("one", "One")])
            .with_search_function(|_| Ok(SearchResults::new(vec!["Remote".into()])));
        widget.initialize().unwrap();
        widget.update_search("re").unwrap();
        assert!(widget.select_highlighted_search_result().unwrap());
        assert_eq!(widget.get_selected_values(), vec!["Remote"]);
        assert!(widget.contains_option_with_value("Remote"));
    }

    #[test]
    fn test_typing_through_update_search_clears_chip_highlight() {
        let mut widget = fruits();
        widget.select_option_with_value("one").unwrap();
        assert!(widget.highlight_option_for_unselect());

        widget.update_search("t").unwrap();
        assert!(!widget.is_last_option_highlighted_for_unselect());
        let chip = widget.dom().element_by_id("fruits-option-one").unwrap();
        assert!(!widget.dom().has_class(chip, classes::HIGHLIGHTED_FOR_UNSELECT));

        // Clearing the input leaves the disarmed state alone.
        widget.update_search("").unwrap();
        assert!(!widget.is_last_option_highlighted_for_unselect());
        assert_eq!(widget.get_selected_values(), vec!["one"]);
    }

    #[test]
    fn test_custom_search_result_naming_chosen_option_is_not_added() {
        let mut widget = fixture(&[("one", "One"), ("two", "Two"), ("three", "Three")])
            .with_search_function(|_| Ok(SearchResults::new(vec!["Two".into()])));
        widget.initialize().unwrap();
        widget.select_option_with_value("two").unwrap();

        widget.update_search("tw").unwrap();
        assert!(widget.select_highlighted_search_result().unwrap());
        assert_eq!(widget.get_selected_values(), vec!["two"]);
        assert_eq!(widget.options().count(), 3);
        assert!(!widget.contains_option_with_value("Two"));
        let input = widget.dom().element_by_id("fruits-input").unwrap();
        assert_eq!(widget.dom().value(input), "");
    }
}
