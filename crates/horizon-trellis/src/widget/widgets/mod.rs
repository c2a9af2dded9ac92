//! Standard widgets for Horizon Trellis.
//!
//! - [`MultipleSelect`]: chip-based multiple select with type-ahead search

pub mod multiple_select;

pub use multiple_select::{
    ElementIds, MultipleSelect, MultipleSelectOptions, OptionEvent, OptionOverrides, SearchFunction,
    SearchResults, SearchRow, Searcher, SelectOption,
};
