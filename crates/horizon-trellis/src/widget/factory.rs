//! Widget construction.

use horizon_trellis_core::{Dom, ElementId, IdAllocator};

use super::widgets::MultipleSelect;
use crate::error::Result;

/// Creates widgets and hands out their ids.
///
/// Ids are unique per factory. Applications normally keep one factory per
/// document so generated element ids never collide.
///
/// # Example
///
/// ```
/// use horizon_trellis::{Dom, MemoryDom, WidgetFactory};
///
/// let mut dom = MemoryDom::new();
/// let select = dom.create_element("select");
/// dom.set_attribute(select, "multiple", "");
/// dom.append_child(dom.body(), select).unwrap();
///
/// let factory = WidgetFactory::new();
/// let widget = factory.multiple_select(dom, select).unwrap();
/// assert_eq!(widget.group_id(), "multiple-select-1");
/// ```
#[derive(Debug, Default)]
pub struct WidgetFactory {
    ids: IdAllocator,
}

impl WidgetFactory {
    /// Create a factory whose first widget id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a [`MultipleSelect`] to `element`.
    ///
    /// Fails with a configuration error unless `element` is a `<select>`
    /// carrying the `multiple` attribute. When the element has no `id`, one
    /// of the form `multiple-select-<n>` is assigned.
    pub fn multiple_select<D: Dom>(&self, dom: D, element: ElementId) -> Result<MultipleSelect<D>> {
        MultipleSelect::bind(dom, element, &self.ids)
    }

    /// Number of widgets created so far.
    pub fn widgets_created(&self) -> u64 {
        self.ids.allocated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_trellis_core::MemoryDom;

    fn select(dom: &mut MemoryDom) -> ElementId {
        let select = dom.create_element("select");
        dom.set_attribute(select, "multiple", "");
        dom.append_child(dom.body(), select).unwrap();
        select
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let factory = WidgetFactory::new();
        let mut dom = MemoryDom::new();
        let first = select(&mut dom);
        let second = select(&mut dom);

        let (a_group, a_id) = {
            let a = factory.multiple_select(&mut dom, first).unwrap();
            (a.group_id().to_string(), a.id())
        };
        let b = factory.multiple_select(&mut dom, second).unwrap();

        assert_eq!(a_group, "multiple-select-1");
        assert_eq!(b.group_id(), "multiple-select-2");
        assert_ne!(a_id, b.id());
        assert_eq!(factory.widgets_created(), 2);
    }

    #[test]
    fn test_failed_bind_allocates_nothing() {
        let factory = WidgetFactory::new();
        let mut dom = MemoryDom::new();
        let div = dom.create_element("div");
        assert!(factory.multiple_select(&mut dom, div).is_err());
        assert_eq!(factory.widgets_created(), 0);
    }
}
