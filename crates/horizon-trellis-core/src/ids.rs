//! Widget identity.
//!
//! Every widget instance receives a [`WidgetId`] from an [`IdAllocator`]. The
//! allocator is an ordinary value owned by whoever creates widgets (normally a
//! widget factory); there is no process-global counter. The same counter
//! backs generated element-group ids for bound elements that have no `id`
//! attribute of their own.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one widget instance. Carried by widget signals so slots can
/// tell which widget emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// The raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// Monotonic counter handing out widget ids.
///
/// Ids start at 1 and are never reused for the lifetime of the allocator.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Create an allocator whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next widget id.
    pub fn allocate(&self) -> WidgetId {
        WidgetId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Build an element id of the form `<prefix>-<n>` for `widget`.
    pub fn element_group_id(&self, prefix: &str, widget: WidgetId) -> String {
        format!("{prefix}-{}", widget.0)
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}
