use crate::{
    collection::{FilterCollection, FiltersChangeObserver, bind_collection},
    filter::{Filter, PredicateFilter},
    mode::FilteringMode,
    model::FilterModel,
    observable::{Subject, Subscription},
};
use andlog_logmodel::LogRecord;
use rayon::prelude::*;
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

/// inputs larger than this are evaluated on the rayon pool
pub const PARALLEL_THRESHOLD: usize = 1000;

type ChainFilters = HashMap<FilteringMode, HashSet<PredicateFilter>>;

/// whether any enabled filter of `mode` matches, or the mode's default when there is none
fn include(filters: &ChainFilters, mode: FilteringMode, record: &LogRecord) -> bool {
    match filters.get(&mode) {
        Some(set) if !set.is_empty() => set.iter().any(|f| f.test(record)),
        _ => mode.default_result(),
    }
}

fn decide(filters: &ChainFilters, record: &LogRecord) -> bool {
    !include(filters, FilteringMode::Hide, record) && include(filters, FilteringMode::Show, record)
}

#[derive(Default)]
struct ChainInner {
    filters: RefCell<ChainFilters>,
    observers: Subject<dyn FiltersChangeObserver>,
}

impl ChainInner {
    fn insert(&self, mode: FilteringMode, filter: PredicateFilter) -> bool {
        if !filter.is_enabled() {
            log::trace!("ignoring disabled filter {:?}", filter);
            return false;
        }
        self.filters.borrow_mut().entry(mode).or_default().insert(filter)
    }

    fn remove(&self, mode: FilteringMode, filter: &PredicateFilter) -> bool {
        self.filters
            .borrow_mut()
            .get_mut(&mode)
            .is_some_and(|set| set.remove(filter))
    }

    fn notify(&self, changed: bool) {
        if changed {
            self.observers.for_each(|o| o.on_filters_changed());
        }
    }
}

type ChainEntry = (FilteringMode, PredicateFilter);

impl FilterCollection<ChainEntry> for ChainInner {
    fn on_my_filter_added(&self, _model: &dyn FilterModel, (mode, filter): ChainEntry) {
        let changed = self.insert(mode, filter);
        self.notify(changed);
    }

    fn on_my_filter_removed(&self, _model: &dyn FilterModel, (mode, filter): ChainEntry) {
        let changed = self.remove(mode, &filter);
        self.notify(changed);
    }

    fn on_my_filter_replaced(
        &self,
        _model: &dyn FilterModel,
        (old_mode, old): ChainEntry,
        (new_mode, new): ChainEntry,
    ) {
        let removed = self.remove(old_mode, &old);
        let added = self.insert(new_mode, new);
        self.notify(removed || added);
    }

    fn on_model_attached(&self, _model: &dyn FilterModel, filters: Vec<ChainEntry>) {
        let mut changed = false;
        for (mode, filter) in filters {
            changed |= self.insert(mode, filter);
        }
        self.notify(changed);
    }
}

/// Decides record visibility from the SHOW and HIDE filters of a model.
///
/// A record is shown when no enabled HIDE filter matches it and either there
/// are no enabled SHOW filters or one of them matches. Disabled filters are
/// never stored; toggling a filter in the model arrives here as a replace.
#[derive(Default)]
pub struct FilterChain {
    inner: Rc<ChainInner>,
    subscription: Option<Subscription>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: &dyn FilterModel) -> Self {
        let mut chain = Self::new();
        chain.set_model(model);
        chain
    }

    /// Keeps the chain in sync with `model`, replacing the previous binding.
    pub fn set_model(&mut self, model: &dyn FilterModel) {
        self.close();
        let had_filters = {
            let mut filters = self.inner.filters.borrow_mut();
            let had_filters = filters.values().any(|set| !set.is_empty());
            filters.clear();
            had_filters
        };
        self.inner.notify(had_filters);
        self.subscription = Some(bind_collection(&self.inner, model, Self::transform_filter));
    }

    /// stops following the bound model; the current filters are kept
    pub fn close(&mut self) {
        self.subscription.take();
    }

    /// the chain's view of a model filter: SHOW and HIDE filters only
    pub fn transform_filter(filter: &Filter) -> Option<(FilteringMode, PredicateFilter)> {
        match filter {
            Filter::Show(f) | Filter::Hide(f) => Some((filter.mode(), f.clone())),
            Filter::Highlight(_) | Filter::Window(_) => None,
        }
    }

    pub fn add_filter(&self, filter: &Filter) {
        if let Some((mode, filter)) = Self::transform_filter(filter) {
            let changed = self.inner.insert(mode, filter);
            self.inner.notify(changed);
        }
    }

    pub fn remove_filter(&self, filter: &Filter) {
        if let Some((mode, filter)) = Self::transform_filter(filter) {
            let changed = self.inner.remove(mode, &filter);
            self.inner.notify(changed);
        }
    }

    pub fn replace_filter(&self, old_filter: &Filter, new_filter: &Filter) {
        let removed = Self::transform_filter(old_filter)
            .is_some_and(|(mode, filter)| self.inner.remove(mode, &filter));
        let added = Self::transform_filter(new_filter)
            .is_some_and(|(mode, filter)| self.inner.insert(mode, filter));
        self.inner.notify(removed || added);
    }

    pub fn should_show(&self, record: &LogRecord) -> bool {
        decide(&self.inner.filters.borrow(), record)
    }

    /// indices of the visible records, in order
    pub fn visible_indices(&self, records: &[LogRecord]) -> Vec<usize> {
        let filters = self.inner.filters.borrow();
        let filters: &ChainFilters = &filters;
        if records.len() > PARALLEL_THRESHOLD {
            records
                .par_iter()
                .enumerate()
                .filter(|(_, record)| decide(filters, record))
                .map(|(i, _)| i)
                .collect()
        } else {
            records
                .iter()
                .enumerate()
                .filter(|(_, record)| decide(filters, record))
                .map(|(i, _)| i)
                .collect()
        }
    }

    pub fn subscribe(&self, observer: Rc<dyn FiltersChangeObserver>) -> Subscription {
        self.inner.observers.subscribe(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        model::MutableFilterModel,
        test_data::{MATCH_ALL, MATCH_FIRST, MATCH_NONE, MATCH_SECOND, record1, record2},
    };
    use std::cell::Cell;

    fn counter(chain: &FilterChain) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let observer = {
            let count = count.clone();
            Rc::new(move || count.set(count.get() + 1))
        };
        (count, chain.subscribe(observer))
    }

    #[test]
    fn test_empty_chain_shows_everything() {
        let chain = FilterChain::new();
        assert!(chain.should_show(&record1()));
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_hide_filter() {
        let chain = FilterChain::new();
        chain.add_filter(&Filter::hide(MATCH_FIRST));
        assert!(!chain.should_show(&record1()));
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_show_filter_is_allowlist() {
        let chain = FilterChain::new();
        chain.add_filter(&Filter::show(MATCH_FIRST));
        assert!(chain.should_show(&record1()));
        assert!(!chain.should_show(&record2()));
    }

    #[test]
    fn test_show_filters_are_ored() {
        let chain = FilterChain::new();
        chain.add_filter(&Filter::show(MATCH_FIRST));
        chain.add_filter(&Filter::show(MATCH_SECOND));
        assert!(chain.should_show(&record1()));
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_hide_wins_over_show() {
        let chain = FilterChain::new();
        chain.add_filter(&Filter::show(MATCH_ALL));
        chain.add_filter(&Filter::hide(MATCH_FIRST));
        assert!(!chain.should_show(&record1()));
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_hide_and_show_by_tag() {
        use andlog_logmodel::Priority;

        let chain = FilterChain::new();
        chain.add_filter(&Filter::hide(|r: &LogRecord| r.tag() == "Verbose"));
        chain.add_filter(&Filter::show(|r: &LogRecord| r.tag() == "Error"));

        let tagged = |tag: &str| LogRecord::new(Priority::Info, tag, "message");
        assert!(!chain.should_show(&tagged("Verbose")));
        assert!(!chain.should_show(&tagged("Info")));
        assert!(chain.should_show(&tagged("Error")));
    }

    #[test]
    fn test_show_filter_matching_nothing_hides_everything() {
        let chain = FilterChain::new();
        chain.add_filter(&Filter::show(MATCH_NONE));
        assert!(!chain.should_show(&record1()));
        assert!(!chain.should_show(&record2()));
    }

    #[test]
    fn test_disabled_filters_are_ignored() {
        let chain = FilterChain::new();
        let (count, _s) = counter(&chain);
        chain.add_filter(&Filter::hide(MATCH_ALL).disabled());
        chain.add_filter(&Filter::show(MATCH_NONE).disabled());

        assert!(chain.should_show(&record1()));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_removing_filter_restores_default() {
        let chain = FilterChain::new();
        let filter = Filter::show(MATCH_FIRST);
        chain.add_filter(&filter);
        chain.remove_filter(&filter);
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_other_modes_do_not_affect_visibility() {
        let chain = FilterChain::new();
        let (count, _s) = counter(&chain);
        chain.add_filter(&Filter::highlight(Color::RED, MATCH_NONE));
        chain.add_filter(&Filter::window(MATCH_NONE));

        assert!(chain.should_show(&record1()));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_notifies_only_on_actual_change() {
        let chain = FilterChain::new();
        let (count, _s) = counter(&chain);
        let filter = Filter::hide(MATCH_FIRST);

        chain.add_filter(&filter);
        chain.add_filter(&filter);
        assert_eq!(count.get(), 1);

        chain.remove_filter(&filter);
        chain.remove_filter(&filter);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_follows_model() {
        let model = MutableFilterModel::new();
        let chain = FilterChain::with_model(&model);
        let (count, _s) = counter(&chain);
        let hide = Filter::hide(MATCH_FIRST);

        model.add_filter(hide.clone());
        assert!(!chain.should_show(&record1()));

        model.replace_filter(&hide, hide.disabled()).expect("filter present");
        assert!(chain.should_show(&record1()));

        model.replace_filter(&hide.disabled(), hide.clone()).expect("filter present");
        assert!(!chain.should_show(&record1()));

        model.remove_filter(&hide);
        assert!(chain.should_show(&record1()));
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn test_seeded_from_model() {
        let model = MutableFilterModel::with_filters([
            Filter::hide(MATCH_FIRST),
            Filter::hide(MATCH_SECOND).disabled(),
        ]);
        let chain = FilterChain::with_model(&model);
        assert!(!chain.should_show(&record1()));
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_replacing_show_with_hide_changes_mode() {
        let model = MutableFilterModel::new();
        let chain = FilterChain::with_model(&model);
        let show = Filter::show(MATCH_FIRST);
        model.add_filter(show.clone());
        assert!(!chain.should_show(&record2()));

        let hide = Filter::hide(MATCH_FIRST);
        model.replace_filter(&show, hide).expect("filter present");

        assert!(!chain.should_show(&record1()));
        assert!(chain.should_show(&record2()));
    }

    #[test]
    fn test_closed_chain_stops_following() {
        let model = MutableFilterModel::new();
        let mut chain = FilterChain::with_model(&model);
        chain.close();

        model.add_filter(Filter::hide(MATCH_ALL));

        assert!(chain.should_show(&record1()));
    }

    #[test]
    fn test_set_model_rebinds() {
        let first = MutableFilterModel::with_filters([Filter::hide(MATCH_FIRST)]);
        let second = MutableFilterModel::with_filters([Filter::hide(MATCH_SECOND)]);
        let mut chain = FilterChain::with_model(&first);

        chain.set_model(&second);
        first.add_filter(Filter::hide(MATCH_ALL));

        assert!(chain.should_show(&record1()));
        assert!(!chain.should_show(&record2()));
    }

    #[test]
    fn test_visible_indices_sequential_and_parallel() {
        let chain = FilterChain::new();
        chain.add_filter(&Filter::hide(MATCH_FIRST));

        let small = vec![record1(), record2(), record1(), record2()];
        assert_eq!(chain.visible_indices(&small), vec![1, 3]);

        let large: Vec<LogRecord> = (0..PARALLEL_THRESHOLD * 2)
            .map(|i| if i % 2 == 0 { record1() } else { record2() })
            .collect();
        let expected: Vec<usize> = (0..PARALLEL_THRESHOLD * 2).filter(|i| i % 2 == 1).collect();
        assert_eq!(chain.visible_indices(&large), expected);
    }
}
