//! Horizon Trellis - DOM-backed widgets.
//!
//! This is the main umbrella crate: it re-exports the core element contract
//! and signal system from `horizon-trellis-core` and provides the widgets.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::{Dom, DomEvent, EventKind, MemoryDom, WidgetFactory};
//!
//! let mut dom = MemoryDom::new();
//! let select = dom.create_element("select");
//! dom.set_attribute(select, "id", "tags");
//! dom.set_attribute(select, "multiple", "");
//! dom.append_child(dom.body(), select).unwrap();
//!
//! let factory = WidgetFactory::new();
//! let mut tags = factory
//!     .multiple_select(dom, select)?
//!     .with_custom_add_enabled(true);
//! tags.initialize()?;
//!
//! // The user types "rust" and presses Enter on the custom-add row.
//! let input = tags.dom().element_by_id("tags-input").unwrap();
//! tags.dom_mut().set_value(input, "rust");
//! tags.handle_event(&mut DomEvent::new(EventKind::Input, input));
//! assert!(tags.is_custom_add_visible());
//! tags.handle_event(&mut DomEvent::key_down(input, horizon_trellis::Key::Enter));
//!
//! assert_eq!(tags.get_selected_values(), vec!["rust"]);
//! # Ok::<(), horizon_trellis::Error>(())
//! ```

pub use horizon_trellis_core::*;

mod error;
pub mod widget;

pub use error::{Error, Result, SearchFunctionError};
pub use widget::widgets::{
    ElementIds, MultipleSelect, MultipleSelectOptions, OptionEvent, OptionOverrides,
    SearchFunction, SearchResults, SearchRow, Searcher, SelectOption,
};
pub use widget::{LabelTemplate, WidgetFactory};
