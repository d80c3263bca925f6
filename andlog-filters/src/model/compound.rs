use super::{FilterModel, FilterModelObserver};
use crate::{
    filter::{ChildModelFilter, Filter},
    observable::{LazySubject, Subscription},
};
use std::rc::{Rc, Weak};

struct CompoundInner {
    parent: Rc<dyn FilterModel>,
    child: ChildModelFilter,
    observers: LazySubject<dyn FilterModelObserver>,
}

impl FilterModel for CompoundInner {
    fn filters(&self) -> Vec<Filter> {
        let mut filters = self.parent.filters();
        filters.extend(self.child.children().filters());
        filters
    }

    fn subscribe(&self, observer: Rc<dyn FilterModelObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }
}

#[derive(Clone, Copy)]
enum Source {
    Parent,
    Children,
}

/// re-emits upstream filter events as events of the compound model
struct Forwarder {
    target: Weak<CompoundInner>,
    source: Source,
}

impl Forwarder {
    fn forward(&self, f: impl Fn(&dyn FilterModelObserver, &CompoundInner)) {
        if let Some(target) = self.target.upgrade() {
            let compound: &CompoundInner = &target;
            compound.observers.for_each(|o| f(o, compound));
        }
    }
}

impl FilterModelObserver for Forwarder {
    fn on_filter_added(
        &self,
        _model: &dyn FilterModel,
        new_filter: &Filter,
        before: Option<&Filter>,
    ) {
        self.forward(|o, compound| match (self.source, before) {
            // appending to the parent lands in front of the first child filter
            (Source::Parent, None) => {
                let first_child = compound.child.children().filters().into_iter().next();
                o.on_filter_added(compound, new_filter, first_child.as_ref())
            }
            _ => o.on_filter_added(compound, new_filter, before),
        });
    }

    fn on_filter_removed(&self, _model: &dyn FilterModel, removed_filter: &Filter) {
        self.forward(|o, compound| o.on_filter_removed(compound, removed_filter));
    }

    fn on_filter_replaced(
        &self,
        _model: &dyn FilterModel,
        old_filter: &Filter,
        new_filter: &Filter,
    ) {
        self.forward(|o, compound| o.on_filter_replaced(compound, old_filter, new_filter));
    }

    fn on_filter_moved(&self, _model: &dyn FilterModel, moved_filter: &Filter) {
        self.forward(|o, compound| o.on_filter_moved(compound, moved_filter));
    }
}

/// Read-only model of the filters that apply inside a WINDOW scope.
///
/// Its list is the parent's filters followed by the child filter's children.
/// Upstream models are only observed while the compound model itself has
/// observers; sub-model events of the upstream models are not forwarded.
#[derive(Clone)]
pub struct CompoundFilterModel {
    inner: Rc<CompoundInner>,
}

impl CompoundFilterModel {
    pub fn new(parent: Rc<dyn FilterModel>, child: &ChildModelFilter) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<CompoundInner>| {
            let upstream_parent = parent.clone();
            let children = child.children().clone();
            let target = weak.clone();
            CompoundInner {
                parent,
                child: child.clone(),
                observers: LazySubject::new(move || {
                    log::trace!("compound filter model subscribes to its sources");
                    vec![
                        upstream_parent.subscribe(Rc::new(Forwarder {
                            target: target.clone(),
                            source: Source::Parent,
                        })),
                        children.subscribe(Rc::new(Forwarder {
                            target: target.clone(),
                            source: Source::Children,
                        })),
                    ]
                }),
            }
        });
        Self { inner }
    }

    pub fn child(&self) -> &ChildModelFilter {
        &self.inner.child
    }

    pub fn is_observing_sources(&self) -> bool {
        self.inner.observers.is_connected()
    }
}

impl FilterModel for CompoundFilterModel {
    fn filters(&self) -> Vec<Filter> {
        self.inner.filters()
    }

    fn subscribe(&self, observer: Rc<dyn FilterModelObserver>) -> Subscription {
        self.inner.subscribe(observer)
    }
}
