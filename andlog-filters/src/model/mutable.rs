use super::{FilterModel, FilterModelObserver};
use crate::{
    error::FilterModelError,
    filter::{ChildModelFilter, Filter},
    observable::{Subject, Subscription},
};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

#[derive(Default)]
struct ModelState {
    filters: Vec<Filter>,
    sub_models: HashMap<ChildModelFilter, Rc<SubModel>>,
}

impl ModelState {
    fn position(&self, filter: &Filter) -> Option<usize> {
        self.filters.iter().position(|f| f == filter)
    }

    /// sub-models of the child-model filters located at `start..`, in model order
    fn sub_models_from(&self, start: usize) -> Vec<Rc<SubModel>> {
        self.filters
            .get(start..)
            .unwrap_or(&[])
            .iter()
            .filter_map(Filter::as_child_model)
            .filter_map(|child| self.sub_models.get(child).cloned())
            .collect()
    }
}

struct ModelInner {
    state: RefCell<ModelState>,
    observers: Subject<dyn FilterModelObserver>,
}

/// filters preceding `child` in `filters`
fn prefix<'a>(filters: &'a [Filter], child: &ChildModelFilter) -> &'a [Filter] {
    let end = filters
        .iter()
        .position(|f| f.as_child_model() == Some(child))
        .unwrap_or(filters.len());
    &filters[..end]
}

#[derive(Debug)]
enum SubModelChange {
    Added(Filter, Option<Filter>),
    Removed(Filter),
    Moved(Filter),
}

/// Changes a sub-model observes when its prefix goes from `old` to `new`.
///
/// When the prefix holds the same filters in a different order, `moved` is the
/// filter that was relocated.
fn diff_prefixes(old: &[Filter], new: &[Filter], moved: &Filter) -> Vec<SubModelChange> {
    if old == new {
        return Vec::new();
    }
    let mut changes: Vec<SubModelChange> = old
        .iter()
        .filter(|f| !new.contains(f))
        .map(|f| SubModelChange::Removed(f.clone()))
        .collect();
    for (i, f) in new.iter().enumerate() {
        if !old.contains(f) {
            changes.push(SubModelChange::Added(f.clone(), new.get(i + 1).cloned()));
        }
    }
    if changes.is_empty() {
        changes.push(SubModelChange::Moved(moved.clone()));
    }
    changes
}

/// View of the parent's filters that precede a child-model filter.
///
/// Once its filter leaves the parent the view is invalid and reports no filters.
struct SubModel {
    parent: Weak<ModelInner>,
    filter: ChildModelFilter,
    observers: Subject<dyn FilterModelObserver>,
    valid: Cell<bool>,
}

impl SubModel {
    fn notify(&self, f: impl Fn(&dyn FilterModelObserver, &dyn FilterModel)) {
        self.observers.for_each(|observer| f(observer, self));
    }

    fn apply(&self, change: &SubModelChange) {
        match change {
            SubModelChange::Added(filter, before) => {
                self.notify(|o, m| o.on_filter_added(m, filter, before.as_ref()))
            }
            SubModelChange::Removed(filter) => self.notify(|o, m| o.on_filter_removed(m, filter)),
            SubModelChange::Moved(filter) => self.notify(|o, m| o.on_filter_moved(m, filter)),
        }
    }
}

impl FilterModel for SubModel {
    fn filters(&self) -> Vec<Filter> {
        if !self.valid.get() {
            log::error!("sub-model of {:?} is used after its filter was removed", self.filter);
            return Vec::new();
        }
        let Some(parent) = self.parent.upgrade() else {
            log::error!("sub-model of {:?} outlived its parent model", self.filter);
            return Vec::new();
        };
        let state = parent.state.borrow();
        prefix(&state.filters, &self.filter).to_vec()
    }

    fn subscribe(&self, observer: Rc<dyn FilterModelObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }
}

/// The mutable, ordered filter model.
///
/// `MutableFilterModel` is a cheap handle: clones refer to the same list of
/// filters and the same observers. Observers are notified after the change is
/// applied, so they can read (or even modify) the model from the callback.
///
/// For every WINDOW filter in the list the model keeps a sub-model exposing the
/// filters placed before it; see [`MutableFilterModel::find_sub_model`].
#[derive(Clone)]
pub struct MutableFilterModel {
    inner: Rc<ModelInner>,
}

impl MutableFilterModel {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ModelInner {
                state: RefCell::new(ModelState::default()),
                observers: Subject::new(),
            }),
        }
    }

    /// builds a model from `filters`, skipping duplicates
    pub fn with_filters(filters: impl IntoIterator<Item = Filter>) -> Self {
        let model = Self::new();
        for filter in filters {
            model.add_filter(filter);
        }
        model
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().filters.is_empty()
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.inner.state.borrow().position(filter).is_some()
    }

    /// whether both handles refer to the same model
    pub fn ptr_eq(&self, other: &MutableFilterModel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// appends `filter`; does nothing if it is already in the model
    pub fn add_filter(&self, filter: Filter) {
        let created = {
            let mut state = self.inner.state.borrow_mut();
            if state.position(&filter).is_some() {
                log::debug!("filter {:?} is already in the model", filter);
                return;
            }
            state.filters.push(filter.clone());
            filter
                .as_child_model()
                .map(|child| self.create_sub_model(&mut state, child))
        };
        log::debug!("added filter {:?}", filter);

        if let Some(sub_model) = &created {
            self.notify_sub_model_created(sub_model);
        }
        self.inner
            .observers
            .for_each(|o| o.on_filter_added(self, &filter, None));
    }

    /// removes `filter`; does nothing if it is not in the model
    pub fn remove_filter(&self, filter: &Filter) {
        let (removed, following) = {
            let mut state = self.inner.state.borrow_mut();
            let Some(position) = state.position(filter) else {
                log::debug!("filter {:?} is not in the model, nothing to remove", filter);
                return;
            };
            state.filters.remove(position);
            let removed = filter
                .as_child_model()
                .and_then(|child| state.sub_models.remove(child));
            (removed, state.sub_models_from(position))
        };
        log::debug!("removed filter {:?}", filter);

        if let Some(sub_model) = &removed {
            self.notify_sub_model_removed(sub_model);
        }
        self.inner
            .observers
            .for_each(|o| o.on_filter_removed(self, filter));
        for sub_model in following {
            sub_model.notify(|o, m| o.on_filter_removed(m, filter));
        }
        if let Some(sub_model) = removed {
            sub_model.valid.set(false);
        }
    }

    /// Puts `new_filter` at the position of `to_replace`.
    ///
    /// Replacing a filter with itself is a no-op. Fails if `to_replace` is
    /// missing or `new_filter` is already in the model.
    pub fn replace_filter(
        &self,
        to_replace: &Filter,
        new_filter: Filter) -> Result<(), FilterModelError> {
        let (removed, created, following) = {
            let mut state = self.inner.state.borrow_mut();
            let position = state
                .position(to_replace)
                .ok_or(FilterModelError::NotInModel { id: to_replace.id() })?;
            if *to_replace == new_filter {
                return Ok(());
            }
            if state.position(&new_filter).is_some() {
                return Err(FilterModelError::AlreadyInModel { id: new_filter.id() });
            }
            state.filters[position] = new_filter.clone();
            let removed = to_replace
                .as_child_model()
                .and_then(|child| state.sub_models.remove(child));
            let created = new_filter
                .as_child_model()
                .map(|child| self.create_sub_model(&mut state, child));
            (removed, created, state.sub_models_from(position + 1))
        };
        log::debug!("replaced filter {:?} with {:?}", to_replace, new_filter);

        if let Some(sub_model) = &removed {
            self.notify_sub_model_removed(sub_model);
        }
        if let Some(sub_model) = &created {
            self.notify_sub_model_created(sub_model);
        }
        self.inner
            .observers
            .for_each(|o| o.on_filter_replaced(self, to_replace, &new_filter));
        for sub_model in following {
            sub_model.notify(|o, m| o.on_filter_replaced(m, to_replace, &new_filter));
        }
        if let Some(sub_model) = removed {
            sub_model.valid.set(false);
        }
        Ok(())
    }

    /// Places `filter` immediately before `before`.
    ///
    /// A filter that is not yet in the model is inserted (`on_filter_added`),
    /// one that is already there is moved (`on_filter_moved`). Sub-models whose
    /// view changes get the corresponding events. Fails if `before` is missing.
    pub fn insert_filter_before(
        &self,
        filter: Filter,
        before: &Filter) -> Result<(), FilterModelError> {
        let (moved, created, sub_model_changes) = {
            let mut state = self.inner.state.borrow_mut();
            let anchor = state
                .position(before)
                .ok_or(FilterModelError::NotInModel { id: before.id() })?;
            if filter == *before {
                return Ok(());
            }
            let old_filters = state.filters.clone();
            let moved = match state.position(&filter) {
                Some(current) => {
                    let target = if current < anchor { anchor - 1 } else { anchor };
                    if target == current {
                        return Ok(());
                    }
                    let f = state.filters.remove(current);
                    state.filters.insert(target, f);
                    true
                }
                None => {
                    state.filters.insert(anchor, filter.clone());
                    false
                }
            };
            let created = if moved {
                None
            } else {
                filter
                    .as_child_model()
                    .map(|child| self.create_sub_model(&mut state, child))
            };
            let sub_model_changes: Vec<(Rc<SubModel>, Vec<SubModelChange>)> = state
                .sub_models_from(0)
                .into_iter()
                .filter(|sub_model| created.as_ref().is_none_or(|c| !Rc::ptr_eq(c, sub_model)))
                .map(|sub_model| {
                    let changes = diff_prefixes(
                        prefix(&old_filters, &sub_model.filter),
                        prefix(&state.filters, &sub_model.filter),
                        &filter,
                    );
                    (sub_model, changes)
                })
                .filter(|(_, changes)| !changes.is_empty())
                .collect();
            (moved, created, sub_model_changes)
        };

        if moved {
            log::debug!("moved filter {:?} before {:?}", filter, before);
            self.inner
                .observers
                .for_each(|o| o.on_filter_moved(self, &filter));
        } else {
            log::debug!("inserted filter {:?} before {:?}", filter, before);
            if let Some(sub_model) = &created {
                self.notify_sub_model_created(sub_model);
            }
            self.inner
                .observers
                .for_each(|o| o.on_filter_added(self, &filter, Some(before)));
        }
        for (sub_model, changes) in sub_model_changes {
            for change in &changes {
                sub_model.apply(change);
            }
        }
        Ok(())
    }

    /// the sub-model created for `filter`, if `filter` is in this model
    pub fn find_sub_model(&self, filter: &ChildModelFilter) -> Option<Rc<dyn FilterModel>> {
        self.inner
            .state
            .borrow()
            .sub_models
            .get(filter)
            .map(|sub_model| sub_model.clone() as Rc<dyn FilterModel>)
    }

    fn create_sub_model(&self, state: &mut ModelState, filter: &ChildModelFilter) -> Rc<SubModel> {
        let sub_model = Rc::new(SubModel {
            parent: Rc::downgrade(&self.inner),
            filter: filter.clone(),
            observers: Subject::new(),
            valid: Cell::new(true),
        });
        state.sub_models.insert(filter.clone(), sub_model.clone());
        sub_model
    }

    fn notify_sub_model_created(&self, sub_model: &Rc<SubModel>) {
        let as_model: Rc<dyn FilterModel> = sub_model.clone();
        self.inner
            .observers
            .for_each(|o| o.on_sub_model_created(self, &as_model, &sub_model.filter));
    }

    fn notify_sub_model_removed(&self, sub_model: &Rc<SubModel>) {
        let as_model: Rc<dyn FilterModel> = sub_model.clone();
        self.inner
            .observers
            .for_each(|o| o.on_sub_model_removed(self, &as_model, &sub_model.filter));
    }
}

impl Default for MutableFilterModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterModel for MutableFilterModel {
    fn filters(&self) -> Vec<Filter> {
        self.inner.state.borrow().filters.clone()
    }

    fn subscribe(&self, observer: Rc<dyn FilterModelObserver>) -> Subscription {
        self.inner.observers.subscribe(observer)
    }
}
