//! The element contract widgets are written against.
//!
//! Widgets never talk to a browser directly. Everything they need from a
//! document (creating and removing elements, reading and writing attributes,
//! classes, text and form values, listening for events, measuring geometry,
//! moving focus) goes through the [`Dom`] trait. [`MemoryDom`] is a complete
//! headless implementation used by the test suites and by hosts that render
//! the document themselves.
//!
//! Elements are addressed by [`ElementId`] handles. Operations that only read
//! or tweak a single element are lenient: a stale handle reads as empty and
//! writes are ignored. Tree mutations report errors through [`DomResult`].

mod event;
mod memory;

pub use event::{DomEvent, EventKind, Key, KeyboardModifiers};
pub use memory::MemoryDom;

use slotmap::new_key_type;

use crate::error::DomResult;

new_key_type! {
    /// Handle to an element owned by a [`Dom`].
    pub struct ElementId;
}

/// A simple element selector.
///
/// Only the forms widgets need are supported: a tag name, a single class, an
/// id, or an attribute (optionally with an exact value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements with this tag name (case-insensitive).
    Tag(String),
    /// Matches elements carrying this class.
    Class(String),
    /// Matches the element whose `id` attribute equals this value.
    Id(String),
    /// Matches elements with this attribute, optionally with an exact value.
    Attribute {
        /// Attribute name.
        name: String,
        /// Required value, or `None` to match on presence.
        value: Option<String>,
    },
}

impl Selector {
    /// Parse `tag`, `.class`, `#id`, `[name]` or `[name=value]`.
    ///
    /// Returns `None` for empty input or unsupported syntax.
    pub fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if let Some(class) = selector.strip_prefix('.') {
            return (!class.is_empty()).then(|| Self::Class(class.to_string()));
        }
        if let Some(id) = selector.strip_prefix('#') {
            return (!id.is_empty()).then(|| Self::Id(id.to_string()));
        }
        if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return match inner.split_once('=') {
                Some((name, value)) if !name.is_empty() => Some(Self::Attribute {
                    name: name.to_string(),
                    value: Some(value.trim_matches(|c| c == '"' || c == '\'').to_string()),
                }),
                Some(_) => None,
                None if !inner.is_empty() => Some(Self::Attribute {
                    name: inner.to_string(),
                    value: None,
                }),
                None => None,
            };
        }
        let valid_tag = !selector.is_empty()
            && selector.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid_tag.then(|| Self::Tag(selector.to_ascii_lowercase()))
    }

    /// Check whether `element` in `dom` matches this selector.
    pub fn matches(&self, dom: &(impl Dom + ?Sized), element: ElementId) -> bool {
        match self {
            Self::Tag(tag) => dom
                .tag_name(element)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
            Self::Class(class) => dom.has_class(element, class),
            Self::Id(id) => dom.attribute(element, "id").as_deref() == Some(id.as_str()),
            Self::Attribute { name, value } => match (dom.attribute(element, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => &actual == expected,
                (None, _) => false,
            },
        }
    }
}

/// Capability contract for a document of elements.
///
/// The trait is object safe; widgets hold a concrete `Dom` and hand
/// sub-components a `&mut dyn Dom`.
pub trait Dom {
    /// The root element new trees are attached under.
    fn body(&self) -> ElementId;

    /// Create a detached element with the given tag name.
    fn create_element(&mut self, tag: &str) -> ElementId;

    /// Detach `element` and destroy it together with its descendants.
    fn remove_element(&mut self, element: ElementId);

    /// Whether `element` refers to a live element.
    fn contains(&self, element: ElementId) -> bool;

    /// Lower-case tag name of `element`.
    fn tag_name(&self, element: ElementId) -> Option<String>;

    /// Parent of `element`, if attached.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Children of `element` in document order.
    fn children(&self, element: ElementId) -> Vec<ElementId>;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()>;

    /// Insert `child` under `parent` before `reference`, or at the end when
    /// `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> DomResult<()>;

    /// Read an attribute.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Remove an attribute.
    fn remove_attribute(&mut self, element: ElementId, name: &str);

    /// Whether `element` carries `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Add `class` to `element` (no-op if present).
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Remove `class` from `element` (no-op if absent).
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Text content of `element` and its descendants, in document order.
    fn text(&self, element: ElementId) -> String;

    /// Set the element's own text.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Form value of an input or option element.
    fn value(&self, element: ElementId) -> String;

    /// Set the form value of an input or option element.
    fn set_value(&mut self, element: ElementId, value: &str);

    /// The boolean `selected` flag of an option element.
    fn is_selected(&self, element: ElementId) -> bool;

    /// Set the boolean `selected` flag of an option element.
    fn set_selected(&mut self, element: ElementId, selected: bool);

    /// Subscribe to `kind` events on `element` under a listener namespace.
    fn add_listener(&mut self, element: ElementId, kind: EventKind, namespace: &str);

    /// Remove every listener on `element` registered under `namespace`.
    fn remove_listeners(&mut self, element: ElementId, namespace: &str);

    /// Whether a `kind` listener is registered on `element` under `namespace`.
    fn has_listener(&self, element: ElementId, kind: EventKind, namespace: &str) -> bool;

    /// Rendered height of `element`.
    fn height(&self, element: ElementId) -> f32;

    /// Vertical offset of `element` within its parent's content.
    fn offset_top(&self, element: ElementId) -> f32;

    /// Vertical scroll offset of a scrollable element.
    fn scroll_top(&self, element: ElementId) -> f32;

    /// Set the vertical scroll offset of a scrollable element.
    fn set_scroll_top(&mut self, element: ElementId, offset: f32);

    /// Move keyboard focus to `element`.
    fn focus(&mut self, element: ElementId);

    /// Remove keyboard focus from `element` if it has it.
    fn blur(&mut self, element: ElementId);

    /// The element holding keyboard focus.
    fn focused(&self) -> Option<ElementId>;

    // =========================================================================
    // Provided helpers
    // =========================================================================

    /// The first descendant of `root` (excluding `root`) matching `selector`,
    /// in document order.
    fn query_selector(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut stack: Vec<ElementId> = self.children(root).into_iter().rev().collect();
        while let Some(element) = stack.pop() {
            if selector.matches(self, element) {
                return Some(element);
            }
            stack.extend(self.children(element).into_iter().rev());
        }
        None
    }

    /// Every descendant of `root` matching `selector`, in document order.
    fn query_selector_all(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).into_iter().rev().collect();
        while let Some(element) = stack.pop() {
            if selector.matches(self, element) {
                found.push(element);
            }
            stack.extend(self.children(element).into_iter().rev());
        }
        found
    }

    /// Look an element up by its `id` attribute anywhere under the body.
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        let body = self.body();
        let selector = Selector::Id(id.to_string());
        if selector.matches(self, body) {
            return Some(body);
        }
        self.query_selector(body, &selector)
    }

    /// The sibling following `element`, if any.
    fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.parent(element)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&e| e == element)?;
        siblings.get(index + 1).copied()
    }

    /// Add or remove `class` depending on `on`.
    fn toggle_class(&mut self, element: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(element, class);
        } else {
            self.remove_class(element, class);
        }
    }
}

/// Widgets may borrow a document instead of owning it.
impl<T: Dom + ?Sized> Dom for &mut T {
    fn body(&self) -> ElementId {
        (**self).body()
    }
    fn create_element(&mut self, tag: &str) -> ElementId {
        (**self).create_element(tag)
    }
    fn remove_element(&mut self, element: ElementId) {
        (**self).remove_element(element)
    }
    fn contains(&self, element: ElementId) -> bool {
        (**self).contains(element)
    }
    fn tag_name(&self, element: ElementId) -> Option<String> {
        (**self).tag_name(element)
    }
    fn parent(&self, element: ElementId) -> Option<ElementId> {
        (**self).parent(element)
    }
    fn children(&self, element: ElementId) -> Vec<ElementId> {
        (**self).children(element)
    }
    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        (**self).append_child(parent, child)
    }
    fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> DomResult<()> {
        (**self).insert_before(parent, child, reference)
    }
    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        (**self).attribute(element, name)
    }
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        (**self).set_attribute(element, name, value)
    }
    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        (**self).remove_attribute(element, name)
    }
    fn has_class(&self, element: ElementId, class: &str) -> bool {
        (**self).has_class(element, class)
    }
    fn add_class(&mut self, element: ElementId, class: &str) {
        (**self).add_class(element, class)
    }
    fn remove_class(&mut self, element: ElementId, class: &str) {
        (**self).remove_class(element, class)
    }
    fn text(&self, element: ElementId) -> String {
        (**self).text(element)
    }
    fn set_text(&mut self, element: ElementId, text: &str) {
        (**self).set_text(element, text)
    }
    fn value(&self, element: ElementId) -> String {
        (**self).value(element)
    }
    fn set_value(&mut self, element: ElementId, value: &str) {
        (**self).set_value(element, value)
    }
    fn is_selected(&self, element: ElementId) -> bool {
        (**self).is_selected(element)
    }
    fn set_selected(&mut self, element: ElementId, selected: bool) {
        (**self).set_selected(element, selected)
    }
    fn add_listener(&mut self, element: ElementId, kind: EventKind, namespace: &str) {
        (**self).add_listener(element, kind, namespace)
    }
    fn remove_listeners(&mut self, element: ElementId, namespace: &str) {
        (**self).remove_listeners(element, namespace)
    }
    fn has_listener(&self, element: ElementId, kind: EventKind, namespace: &str) -> bool {
        (**self).has_listener(element, kind, namespace)
    }
    fn height(&self, element: ElementId) -> f32 {
        (**self).height(element)
    }
    fn offset_top(&self, element: ElementId) -> f32 {
        (**self).offset_top(element)
    }
    fn scroll_top(&self, element: ElementId) -> f32 {
        (**self).scroll_top(element)
    }
    fn set_scroll_top(&mut self, element: ElementId, offset: f32) {
        (**self).set_scroll_top(element, offset)
    }
    fn focus(&mut self, element: ElementId) {
        (**self).focus(element)
    }
    fn blur(&mut self, element: ElementId) {
        (**self).blur(element)
    }
    fn focused(&self) -> Option<ElementId> {
        (**self).focused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parse() {
        assert_eq!(Selector::parse("li"), Some(Selector::Tag("li".into())));
        assert_eq!(Selector::parse("LI"), Some(Selector::Tag("li".into())));
        assert_eq!(
            Selector::parse(".chosen-option"),
            Some(Selector::Class("chosen-option".into()))
        );
        assert_eq!(Selector::parse("#fruits"), Some(Selector::Id("fruits".into())));
        assert_eq!(
            Selector::parse("[data-value=\"two\"]"),
            Some(Selector::Attribute {
                name: "data-value".into(),
                value: Some("two".into())
            })
        );
        assert_eq!(
            Selector::parse("[multiple]"),
            Some(Selector::Attribute {
                name: "multiple".into(),
                value: None
            })
        );
        assert_eq!(Selector::parse(""), None);
        assert_eq!(Selector::parse("."), None);
        assert_eq!(Selector::parse("[=x]"), None);
        assert_eq!(Selector::parse("ul li"), None);
    }
}
