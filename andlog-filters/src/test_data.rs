//! shared fixtures for unit tests

use crate::{
    filter::{ChildModelFilter, Filter},
    model::{FilterModel, FilterModelObserver},
};
use andlog_logmodel::{Buffer, LogRecord, Priority};
use std::{cell::RefCell, rc::Rc};

pub(crate) const MATCH_ALL: fn(&LogRecord) -> bool = |_| true;
pub(crate) const MATCH_NONE: fn(&LogRecord) -> bool = |_| false;
/// matches [`record1`] but not [`record2`]
pub(crate) const MATCH_FIRST: fn(&LogRecord) -> bool = |r| r.tag() == "AndroidRuntime";
/// matches [`record2`] but not [`record1`]
pub(crate) const MATCH_SECOND: fn(&LogRecord) -> bool = |r| r.tag() == "ActivityManager";

pub(crate) fn record1() -> LogRecord {
    LogRecord::new(Priority::Error, "AndroidRuntime", "FATAL EXCEPTION: main")
        .with_pid(1234)
        .with_tid(1234)
        .with_buffer(Buffer::Main)
        .with_app_name("com.example.app")
}

pub(crate) fn record2() -> LogRecord {
    LogRecord::new(Priority::Info, "ActivityManager", "Start proc 5678:com.example.other/u0a12")
        .with_pid(590)
        .with_tid(612)
        .with_buffer(Buffer::System)
        .with_app_name("system_server")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ModelEvent {
    Added(Filter, Option<Filter>),
    Removed(Filter),
    Replaced(Filter, Filter),
    Moved(Filter),
    SubModelCreated(ChildModelFilter),
    SubModelRemoved(ChildModelFilter),
}

/// records every model callback it receives
#[derive(Default)]
pub(crate) struct ModelEvents {
    events: RefCell<Vec<ModelEvent>>,
    sub_models: RefCell<Vec<Rc<dyn FilterModel>>>,
}

impl ModelEvents {
    pub(crate) fn take(&self) -> Vec<ModelEvent> {
        self.events.take()
    }

    pub(crate) fn sub_models(&self) -> Vec<Rc<dyn FilterModel>> {
        self.sub_models.borrow().clone()
    }

    fn push(&self, event: ModelEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl FilterModelObserver for ModelEvents {
    fn on_filter_added(
        &self,
        _model: &dyn FilterModel,
        new_filter: &Filter,
        before: Option<&Filter>,
    ) {
        self.push(ModelEvent::Added(new_filter.clone(), before.cloned()));
    }

    fn on_filter_removed(&self, _model: &dyn FilterModel, removed_filter: &Filter) {
        self.push(ModelEvent::Removed(removed_filter.clone()));
    }

    fn on_filter_replaced(
        &self,
        _model: &dyn FilterModel,
        old_filter: &Filter,
        new_filter: &Filter,
    ) {
        self.push(ModelEvent::Replaced(old_filter.clone(), new_filter.clone()));
    }

    fn on_filter_moved(&self, _model: &dyn FilterModel, moved_filter: &Filter) {
        self.push(ModelEvent::Moved(moved_filter.clone()));
    }

    fn on_sub_model_created(
        &self,
        _model: &dyn FilterModel,
        sub_model: &Rc<dyn FilterModel>,
        filter: &ChildModelFilter,
    ) {
        self.sub_models.borrow_mut().push(sub_model.clone());
        self.push(ModelEvent::SubModelCreated(filter.clone()));
    }

    fn on_sub_model_removed(
        &self,
        _model: &dyn FilterModel,
        _sub_model: &Rc<dyn FilterModel>,
        filter: &ChildModelFilter,
    ) {
        self.push(ModelEvent::SubModelRemoved(filter.clone()));
    }
}
