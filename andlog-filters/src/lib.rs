//! # andlog-filters
//!
//! Filtering and composition engine for Android log records.
//!
//! Filters live in an ordered [`MutableFilterModel`]. Decision engines observe
//! the model and keep their own projection of it:
//!
//! - [`FilterChain`] decides visibility from the SHOW and HIDE filters.
//! - [`LogRecordHighlighter`] picks a highlight color from the HIGHLIGHT filters.
//! - WINDOW filters own a nested model; [`CompoundFilterModel`] joins it with
//!   the filters that precede the window in the parent model.
//!
//! Filters are immutable values. Toggling a filter creates a copy with the same
//! id and the model replaces the old copy in place:
//!
//! ```
//! use andlog_filters::{Filter, FilterChain, MutableFilterModel};
//! use andlog_logmodel::{LogRecord, Priority};
//!
//! let model = MutableFilterModel::new();
//! let chain = FilterChain::with_model(&model);
//! let noisy = Filter::hide(|r: &LogRecord| r.tag() == "chatty");
//! model.add_filter(noisy.clone());
//!
//! let record = LogRecord::new(Priority::Info, "chatty", "uid=1000 expire 3 lines");
//! assert!(!chain.should_show(&record));
//!
//! model.replace_filter(&noisy, noisy.disabled()).unwrap();
//! assert!(chain.should_show(&record));
//! ```
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); only record predicates
//! are `Send + Sync`, which lets [`LogModelFilter::visible_indices`] fan out
//! over rayon.

pub mod buffer_filter;
pub mod buffer_filter_model;
pub mod chain;
pub mod collection;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod filter_data;
pub mod highlighter;
pub mod log_model_filter;
pub mod mode;
pub mod model;
pub mod observable;
pub mod saved_filters;
pub mod search;

#[cfg(test)]
mod test_data;

pub use buffer_filter::BufferFilter;
pub use buffer_filter_model::BufferFilterModel;
pub use chain::FilterChain;
pub use collection::{FilterCollection, FiltersChangeObserver, TransformingObserver};
pub use color::Color;
pub use config::{ConfigStorage, InMemoryConfigStorage, Preference};
pub use error::FilterModelError;
pub use filter::{
    ChildModelFilter, ColoringFilter, Filter, FilterId, PredicateFilter, RecordPredicate,
};
pub use filter_data::{FilterData, FilterDataError};
pub use highlighter::LogRecordHighlighter;
pub use log_model_filter::LogModelFilter;
pub use mode::FilteringMode;
pub use model::{CompoundFilterModel, FilterModel, FilterModelObserver, MutableFilterModel};
pub use observable::Subscription;
pub use saved_filters::SavedFilterData;
pub use search::{RequestCompilationError, SearchRequestParser, SearcherBuilder};
