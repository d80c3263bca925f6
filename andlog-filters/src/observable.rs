//! Single-threaded observer lists.
//!
//! A [`Subject`] keeps a list of `Rc` observers and hands out [`Subscription`]
//! guards. Dropping (or [`Subscription::close`]-ing) a guard unregisters its
//! observer. Notification iterates a snapshot of the list, so an observer may
//! unsubscribe itself from inside a callback.
//!
//! [`LazySubject`] additionally owns a set of upstream subscriptions that only
//! exist while at least one downstream observer is registered.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

/// Registration handle; the observer stays registered until this is dropped.
#[must_use = "dropping a Subscription unregisters the observer immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// a subscription that is not attached to anything
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

struct SubjectInner<O: ?Sized> {
    observers: RefCell<Vec<(u64, Rc<O>)>>,
    next_key: Cell<u64>,
}

/// list of observers of type `O` (usually a `dyn Trait`)
pub struct Subject<O: ?Sized> {
    inner: Rc<SubjectInner<O>>,
}

impl<O: ?Sized + 'static> Subject<O> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                observers: RefCell::new(Vec::new()),
                next_key: Cell::new(0),
            }),
        }
    }

    pub fn subscribe(&self, observer: Rc<O>) -> Subscription {
        let key = self.inner.next_key.get();
        self.inner.next_key.set(key + 1);
        self.inner.observers.borrow_mut().push((key, observer));

        let weak: Weak<SubjectInner<O>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.observers.borrow_mut().retain(|(k, _)| *k != key);
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.inner.observers.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// calls `f` for every observer registered at the moment of the call
    pub fn for_each(&self, mut f: impl FnMut(&O)) {
        let snapshot: Vec<Rc<O>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| o.clone())
            .collect();
        for observer in snapshot {
            f(&*observer);
        }
    }
}

impl<O: ?Sized + 'static> Default for Subject<O> {
    fn default() -> Self {
        Self::new()
    }
}

enum UpstreamState {
    Idle,
    Subscribed(Vec<Subscription>),
}

struct LazyInner<O: ?Sized> {
    subject: Subject<O>,
    upstream: RefCell<UpstreamState>,
    connect: Box<dyn Fn() -> Vec<Subscription>>,
}

/// A [`Subject`] that subscribes to its upstream sources on demand.
///
/// State machine: `Idle` until the first observer arrives, then `connect` is
/// called and the returned upstream subscriptions are held (`Subscribed`). When
/// the last observer leaves, they are dropped and the state returns to `Idle`.
pub struct LazySubject<O: ?Sized> {
    inner: Rc<LazyInner<O>>,
}

impl<O: ?Sized + 'static> LazySubject<O> {
    pub fn new(connect: impl Fn() -> Vec<Subscription> + 'static) -> Self {
        Self {
            inner: Rc::new(LazyInner {
                subject: Subject::new(),
                upstream: RefCell::new(UpstreamState::Idle),
                connect: Box::new(connect),
            }),
        }
    }

    pub fn subscribe(&self, observer: Rc<O>) -> Subscription {
        let downstream = self.inner.subject.subscribe(observer);
        let idle = matches!(*self.inner.upstream.borrow(), UpstreamState::Idle);
        if idle {
            let upstream = (self.inner.connect)();
            *self.inner.upstream.borrow_mut() = UpstreamState::Subscribed(upstream);
        }

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            drop(downstream);
            if let Some(inner) = weak.upgrade()
                && inner.subject.is_empty()
            {
                let previous = inner.upstream.replace(UpstreamState::Idle);
                drop(previous);
            }
        })
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.inner.upstream.borrow(), UpstreamState::Subscribed(_))
    }

    pub fn for_each(&self, f: impl FnMut(&O)) {
        self.inner.subject.for_each(f);
    }
}
