//! Ordered filter models and their change notifications.
//!
//! A [`FilterModel`] is an ordered, duplicate-free list of [`Filter`]s that
//! reports every structural change to its [`FilterModelObserver`]s. The mutable
//! implementation lives in [`MutableFilterModel`]; [`CompoundFilterModel`] is a
//! read-only concatenation used to evaluate the filters of a WINDOW scope.
//!
//! Every callback receives the model that produced it, so a single observer
//! can be attached to several models.

mod compound;
mod mutable;

pub use compound::CompoundFilterModel;
pub use mutable::MutableFilterModel;

use crate::{
    filter::{ChildModelFilter, Filter},
    observable::Subscription,
};
use std::rc::Rc;

pub trait FilterModel {
    /// snapshot of the filters in model order
    fn filters(&self) -> Vec<Filter>;

    fn subscribe(&self, observer: Rc<dyn FilterModelObserver>) -> Subscription;
}

/// Receives structural changes of a [`FilterModel`].
///
/// All methods default to doing nothing.
pub trait FilterModelObserver {
    /// `before` is the filter the new one was inserted in front of, `None` when
    /// it was appended
    fn on_filter_added(
        &self,
        _model: &dyn FilterModel,
        _new_filter: &Filter,
        _before: Option<&Filter>,
    ) {
    }

    fn on_filter_removed(&self, _model: &dyn FilterModel, _removed_filter: &Filter) {}

    fn on_filter_replaced(
        &self,
        _model: &dyn FilterModel,
        _old_filter: &Filter,
        _new_filter: &Filter,
    ) {
    }

    fn on_filter_moved(&self, _model: &dyn FilterModel, _moved_filter: &Filter) {}

    /// fired before the `on_filter_added`/`on_filter_replaced` that introduced `filter`
    fn on_sub_model_created(
        &self,
        _model: &dyn FilterModel,
        _sub_model: &Rc<dyn FilterModel>,
        _filter: &ChildModelFilter,
    ) {
    }

    fn on_sub_model_removed(
        &self,
        _model: &dyn FilterModel,
        _sub_model: &Rc<dyn FilterModel>,
        _filter: &ChildModelFilter,
    ) {
    }
}
