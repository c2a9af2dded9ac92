//! Widget system for Horizon Trellis.
//!
//! Widgets bind to an element of a [`Dom`](horizon_trellis_core::Dom) and
//! render their own elements next to it. Every widget instance is created
//! through a [`WidgetFactory`], which owns the counter widget ids and
//! generated element ids come from.
//!
//! # Lifecycle
//!
//! 1. Bind with a factory method, which validates the bound element
//! 2. Configure with the widget's `with_*` builder methods
//! 3. Render with `initialize()`
//! 4. Feed document events to `handle_event()`
//! 5. Tear down with `destroy()`, which hands the document back

mod factory;
pub mod template;
pub mod widgets;

pub use factory::WidgetFactory;
pub use template::LabelTemplate;
