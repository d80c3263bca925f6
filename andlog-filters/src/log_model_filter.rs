use crate::{
    chain::FilterChain,
    collection::FiltersChangeObserver,
    color::Color,
    filter::Filter,
    highlighter::LogRecordHighlighter,
    model::{FilterModel, FilterModelObserver},
    observable::{Subject, Subscription},
};
use andlog_logmodel::LogRecord;
use std::rc::{Rc, Weak};

/// reports any filter change of the model as one "filters changed" event
struct ModelChangeForwarder {
    observers: Weak<Subject<dyn FiltersChangeObserver>>,
}

impl ModelChangeForwarder {
    fn notify(&self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.for_each(|o| o.on_filters_changed());
        }
    }
}

impl FilterModelObserver for ModelChangeForwarder {
    fn on_filter_added(
        &self,
        _model: &dyn FilterModel,
        _new_filter: &Filter,
        _before: Option<&Filter>,
    ) {
        self.notify();
    }

    fn on_filter_removed(&self, _model: &dyn FilterModel, _removed_filter: &Filter) {
        self.notify();
    }

    fn on_filter_replaced(
        &self,
        _model: &dyn FilterModel,
        _old_filter: &Filter,
        _new_filter: &Filter,
    ) {
        self.notify();
    }

    fn on_filter_moved(&self, _model: &dyn FilterModel, _moved_filter: &Filter) {
        self.notify();
    }
}

/// What a log view asks about its records: visibility and highlight color.
///
/// The chain and the highlighter subscribe to the model before the change
/// forwarder does, so observers of this filter always see both up to date.
pub struct LogModelFilter {
    chain: FilterChain,
    highlighter: LogRecordHighlighter,
    observers: Rc<Subject<dyn FiltersChangeObserver>>,
    _model_subscription: Subscription,
}

impl LogModelFilter {
    pub fn new(model: &dyn FilterModel) -> Self {
        let chain = FilterChain::with_model(model);
        let highlighter = LogRecordHighlighter::with_model(model);
        let observers = Rc::new(Subject::new());
        let model_subscription = model.subscribe(Rc::new(ModelChangeForwarder {
            observers: Rc::downgrade(&observers),
        }));
        Self {
            chain,
            highlighter,
            observers,
            _model_subscription: model_subscription,
        }
    }

    pub fn should_show_record(&self, record: &LogRecord) -> bool {
        self.chain.should_show(record)
    }

    pub fn highlight_color(&self, record: &LogRecord) -> Option<Color> {
        self.highlighter.get_color(record)
    }

    /// indices of the records to display, in order
    pub fn visible_indices(&self, records: &[LogRecord]) -> Vec<usize> {
        self.chain.visible_indices(records)
    }

    pub fn subscribe(&self, observer: Rc<dyn FiltersChangeObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }
}
