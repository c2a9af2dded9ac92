//! Core systems for Horizon Trellis.
//!
//! This crate provides the foundational pieces the Horizon Trellis widgets are
//! built on:
//!
//! - **Element Contract**: The [`Dom`] trait, the capability surface widgets use
//!   to create, mutate, query and listen to document elements
//! - **Headless Document**: [`MemoryDom`], a deterministic in-memory [`Dom`]
//! - **Signal/Slot System**: Type-safe notification of widget state changes
//! - **Widget Identity**: [`WidgetId`] values and the [`IdAllocator`] counter
//!
//! # Signal Example
//!
//! ```
//! use horizon_trellis_core::Signal;
//!
//! let value_added = Signal::<String>::new();
//!
//! let conn_id = value_added.connect(|value| {
//!     println!("Added: {}", value);
//! });
//!
//! value_added.emit("apple".to_string());
//! value_added.disconnect(conn_id);
//! ```
//!
//! # Element Example
//!
//! ```
//! use horizon_trellis_core::{Dom, MemoryDom};
//!
//! let mut dom = MemoryDom::new();
//! let select = dom.create_element("select");
//! dom.set_attribute(select, "id", "fruits");
//! dom.append_child(dom.body(), select).unwrap();
//!
//! assert_eq!(dom.element_by_id("fruits"), Some(select));
//! ```

pub mod dom;
mod error;
mod ids;
pub mod logging;
pub mod signal;

pub use dom::{Dom, DomEvent, ElementId, EventKind, Key, KeyboardModifiers, MemoryDom, Selector};
pub use error::{DomError, DomResult};
pub use ids::{IdAllocator, WidgetId};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
