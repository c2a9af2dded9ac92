//! A deterministic in-memory document.

use slotmap::SlotMap;

use super::{Dom, ElementId, EventKind};
use crate::error::{DomError, DomResult};
use crate::logging::targets;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    value: String,
    selected: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    listeners: Vec<(EventKind, String)>,
    height: f32,
    scroll_top: f32,
}

/// A headless [`Dom`] backed by a slot map of nodes.
///
/// Geometry is explicit: every element has a height (zero unless set with
/// [`MemoryDom::set_height`]), and an element's offset is the sum of the
/// heights of its preceding siblings.
///
/// # Example
///
/// ```
/// use horizon_trellis_core::{Dom, MemoryDom};
///
/// let mut dom = MemoryDom::new();
/// let list = dom.create_element("ul");
/// dom.append_child(dom.body(), list).unwrap();
///
/// let item = dom.create_element("li");
/// dom.set_text(item, "One");
/// dom.append_child(list, item).unwrap();
///
/// assert_eq!(dom.text(list), "One");
/// ```
#[derive(Debug)]
pub struct MemoryDom {
    nodes: SlotMap<ElementId, Node>,
    body: ElementId,
    focused: Option<ElementId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create an empty document containing only a `body` element.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            tag: "body".to_string(),
            ..Node::default()
        });
        Self {
            nodes,
            body,
            focused: None,
        }
    }

    /// Number of live elements, including the body.
    pub fn element_count(&self) -> usize {
        self.nodes.len()
    }

    /// Set the rendered height of `element`.
    pub fn set_height(&mut self, element: ElementId, height: f32) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.height = height.max(0.0);
        }
    }

    /// Every listener registered on `element`.
    pub fn listeners(&self, element: ElementId) -> Vec<(EventKind, String)> {
        self.nodes
            .get(element)
            .map(|node| node.listeners.clone())
            .unwrap_or_default()
    }

    /// Whether `ancestor` is `element` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, element: ElementId) {
        let parent = self.nodes.get_mut(element).and_then(|n| n.parent.take());
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.retain(|&c| c != element);
        }
    }

    fn collect_text(&self, element: ElementId, out: &mut String) {
        if let Some(node) = self.nodes.get(element) {
            out.push_str(&node.text);
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }
}

impl Dom for MemoryDom {
    fn body(&self) -> ElementId {
        self.body
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        })
    }

    fn remove_element(&mut self, element: ElementId) {
        if element == self.body || !self.nodes.contains_key(element) {
            return;
        }
        self.detach(element);

        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend(node.children);
            }
            if self.focused == Some(id) {
                self.focused = None;
            }
        }
        tracing::trace!(target: targets::DOM, ?element, "removed element subtree");
    }

    fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(element)
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        self.nodes.get(element).map(|n| n.tag.clone())
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element).and_then(|n| n.parent)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> DomResult<()> {
        if !self.nodes.contains_key(parent) {
            return Err(DomError::UnknownElement(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(DomError::UnknownElement(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::cycle(parent, child));
        }
        if let Some(reference) = reference
            && self.parent(reference) != Some(parent)
        {
            return Err(DomError::not_a_child(parent, reference));
        }
        if reference == Some(child) {
            return Ok(());
        }

        self.detach(child);
        let siblings = &mut self.nodes[parent].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.get(element).and_then(|n| {
            n.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(element) else {
            return;
        };
        match node.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.attributes.retain(|(k, _)| k != name);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn text(&self, element: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(element, &mut out);
        out
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.text = text.to_string();
        }
    }

    fn value(&self, element: ElementId) -> String {
        self.nodes
            .get(element)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, element: ElementId, value: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.value = value.to_string();
        }
    }

    fn is_selected(&self, element: ElementId) -> bool {
        self.nodes.get(element).is_some_and(|n| n.selected)
    }

    fn set_selected(&mut self, element: ElementId, selected: bool) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.selected = selected;
        }
    }

    fn add_listener(&mut self, element: ElementId, kind: EventKind, namespace: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.listeners.push((kind, namespace.to_string()));
        }
    }

    fn remove_listeners(&mut self, element: ElementId, namespace: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.listeners.retain(|(_, ns)| ns != namespace);
        }
    }

    fn has_listener(&self, element: ElementId, kind: EventKind, namespace: &str) -> bool {
        self.nodes.get(element).is_some_and(|n| {
            n.listeners
                .iter()
                .any(|(k, ns)| *k == kind && ns == namespace)
        })
    }

    fn height(&self, element: ElementId) -> f32 {
        self.nodes.get(element).map_or(0.0, |n| n.height)
    }

    fn offset_top(&self, element: ElementId) -> f32 {
        let Some(parent) = self.parent(element) else {
            return 0.0;
        };
        self.nodes[parent]
            .children
            .iter()
            .take_while(|&&c| c != element)
            .map(|&c| self.height(c))
            .sum()
    }

    fn scroll_top(&self, element: ElementId) -> f32 {
        self.nodes.get(element).map_or(0.0, |n| n.scroll_top)
    }

    fn set_scroll_top(&mut self, element: ElementId, offset: f32) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.scroll_top = offset.max(0.0);
        }
    }

    fn focus(&mut self, element: ElementId) {
        if self.nodes.contains_key(element) {
            self.focused = Some(element);
        }
    }

    fn blur(&mut self, element: ElementId) {
        if self.focused == Some(element) {
            self.focused = None;
        }
    }

    fn focused(&self) -> Option<ElementId> {
        self.focused
    }
}
