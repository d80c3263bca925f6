//! Adapting filter models to engines that only care about some filters.
//!
//! An engine implements [`FilterCollection<T>`] for the representation `T` it
//! works with, and [`bind_collection`] keeps it in sync with a model through a
//! [`TransformingObserver`]. The transform decides which filters are relevant:
//! it returns `None` for everything else.

use crate::{
    filter::Filter,
    model::{FilterModel, FilterModelObserver},
    observable::Subscription,
};
use std::rc::{Rc, Weak};

/// transform from a model filter to the representation an engine stores
pub type FilterTransform<T> = fn(&Filter) -> Option<T>;

pub trait FilterCollection<T> {
    fn on_my_filter_added(&self, model: &dyn FilterModel, new_filter: T);

    fn on_my_filter_removed(&self, model: &dyn FilterModel, removed_filter: T);

    fn on_my_filter_replaced(&self, model: &dyn FilterModel, old_filter: T, new_filter: T) {
        self.on_my_filter_removed(model, old_filter);
        self.on_my_filter_added(model, new_filter);
    }

    fn on_my_filter_moved(&self, _model: &dyn FilterModel, _moved_filter: T) {}

    /// called once with the relevant filters of a freshly bound model, in model order
    fn on_model_attached(&self, model: &dyn FilterModel, filters: Vec<T>) {
        for filter in filters {
            self.on_my_filter_added(model, filter);
        }
    }
}

/// Model observer that forwards relevant events to a [`FilterCollection`].
///
/// Holds the collection weakly: a dropped engine silently stops receiving events.
pub struct TransformingObserver<T, C: ?Sized> {
    transform: FilterTransform<T>,
    collection: Weak<C>,
}

impl<T, C: FilterCollection<T> + ?Sized> TransformingObserver<T, C> {
    pub fn new(transform: FilterTransform<T>, collection: Weak<C>) -> Self {
        Self {
            transform,
            collection,
        }
    }

    fn with_collection(&self, f: impl FnOnce(&C)) {
        if let Some(collection) = self.collection.upgrade() {
            f(&*collection);
        }
    }
}

impl<T, C: FilterCollection<T> + ?Sized> FilterModelObserver for TransformingObserver<T, C> {
    fn on_filter_added(
        &self,
        model: &dyn FilterModel,
        new_filter: &Filter,
        _before: Option<&Filter>,
    ) {
        if let Some(filter) = (self.transform)(new_filter) {
            self.with_collection(|c| c.on_my_filter_added(model, filter));
        }
    }

    fn on_filter_removed(&self, model: &dyn FilterModel, removed_filter: &Filter) {
        if let Some(filter) = (self.transform)(removed_filter) {
            self.with_collection(|c| c.on_my_filter_removed(model, filter));
        }
    }

    fn on_filter_replaced(
        &self,
        model: &dyn FilterModel,
        old_filter: &Filter,
        new_filter: &Filter,
    ) {
        match ((self.transform)(old_filter), (self.transform)(new_filter)) {
            (Some(old), Some(new)) => {
                self.with_collection(|c| c.on_my_filter_replaced(model, old, new))
            }
            (Some(old), None) => self.with_collection(|c| c.on_my_filter_removed(model, old)),
            (None, Some(new)) => self.with_collection(|c| c.on_my_filter_added(model, new)),
            (None, None) => {}
        }
    }

    fn on_filter_moved(&self, model: &dyn FilterModel, moved_filter: &Filter) {
        if let Some(filter) = (self.transform)(moved_filter) {
            self.with_collection(|c| c.on_my_filter_moved(model, filter));
        }
    }
}

/// Seeds `collection` with the relevant filters of `model`, then subscribes it
/// to the model's changes.
pub fn bind_collection<T: 'static, C: FilterCollection<T> + 'static>(
    collection: &Rc<C>,
    model: &dyn FilterModel,
    transform: FilterTransform<T>,
) -> Subscription {
    let filters = model.filters().iter().filter_map(transform).collect();
    collection.on_model_attached(model, filters);
    model.subscribe(Rc::new(TransformingObserver::new(
        transform,
        Rc::downgrade(collection),
    )))
}

/// Listener of decision engines ([`FilterChain`](crate::FilterChain),
/// [`LogRecordHighlighter`](crate::LogRecordHighlighter)...).
pub trait FiltersChangeObserver {
    fn on_filters_changed(&self);
}

impl<F: Fn()> FiltersChangeObserver for F {
    fn on_filters_changed(&self) {
        self()
    }
}
