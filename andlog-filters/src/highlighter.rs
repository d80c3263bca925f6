use crate::{
    collection::{FilterCollection, FiltersChangeObserver, bind_collection},
    color::Color,
    filter::{ColoringFilter, Filter},
    model::FilterModel,
    observable::{Subject, Subscription},
};
use andlog_logmodel::LogRecord;
use std::{cell::RefCell, rc::Rc};

#[derive(Default)]
struct HighlighterInner {
    /// enabled coloring filters, last model filter first
    filters: RefCell<Vec<ColoringFilter>>,
    observers: Subject<dyn FiltersChangeObserver>,
}

impl HighlighterInner {
    /// Rebuilds the list from the model, which is the only source of ordering.
    fn rebuild(&self, model: &dyn FilterModel) {
        let mut filters: Vec<ColoringFilter> = model
            .filters()
            .iter()
            .filter_map(LogRecordHighlighter::transform_filter)
            .filter(ColoringFilter::is_enabled)
            .collect();
        filters.reverse();
        log::trace!("highlighter now has {} active filters", filters.len());
        *self.filters.borrow_mut() = filters;
        self.observers.for_each(|o| o.on_filters_changed());
    }
}

impl FilterCollection<ColoringFilter> for HighlighterInner {
    fn on_my_filter_added(&self, model: &dyn FilterModel, _new_filter: ColoringFilter) {
        self.rebuild(model);
    }

    fn on_my_filter_removed(&self, model: &dyn FilterModel, _removed_filter: ColoringFilter) {
        self.rebuild(model);
    }

    fn on_my_filter_replaced(
        &self,
        model: &dyn FilterModel,
        _old_filter: ColoringFilter,
        _new_filter: ColoringFilter,
    ) {
        self.rebuild(model);
    }

    fn on_my_filter_moved(&self, model: &dyn FilterModel, _moved_filter: ColoringFilter) {
        self.rebuild(model);
    }

    fn on_model_attached(&self, model: &dyn FilterModel, _filters: Vec<ColoringFilter>) {
        self.rebuild(model);
    }
}

/// Picks the highlight color of a record from the HIGHLIGHT filters of a model.
///
/// When several enabled filters match, the one placed last in the model wins.
/// Toggling or replacing a filter keeps its position.
#[derive(Default)]
pub struct LogRecordHighlighter {
    inner: Rc<HighlighterInner>,
    subscription: Option<Subscription>,
}

impl LogRecordHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: &dyn FilterModel) -> Self {
        let mut highlighter = Self::new();
        highlighter.set_model(model);
        highlighter
    }

    pub fn set_model(&mut self, model: &dyn FilterModel) {
        self.close();
        self.subscription = Some(bind_collection(&self.inner, model, Self::transform_filter));
    }

    /// stops following the bound model; the current filters are kept
    pub fn close(&mut self) {
        self.subscription.take();
    }

    pub fn transform_filter(filter: &Filter) -> Option<ColoringFilter> {
        filter.as_coloring().cloned()
    }

    pub fn get_color(&self, record: &LogRecord) -> Option<Color> {
        self.inner
            .filters
            .borrow()
            .iter()
            .find(|f| f.test(record))
            .map(ColoringFilter::color)
    }

    /// enabled coloring filters in model order
    pub fn filters(&self) -> Vec<ColoringFilter> {
        self.inner.filters.borrow().iter().rev().cloned().collect()
    }

    pub fn subscribe(&self, observer: Rc<dyn FiltersChangeObserver>) -> Subscription {
        self.inner.observers.subscribe(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::MutableFilterModel,
        test_data::{MATCH_ALL, MATCH_FIRST, MATCH_NONE, record1, record2},
    };
    use std::cell::Cell;

    fn counter(highlighter: &LogRecordHighlighter) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let observer = {
            let count = count.clone();
            Rc::new(move || count.set(count.get() + 1))
        };
        (count, highlighter.subscribe(observer))
    }

    #[test]
    fn test_unbound_highlighter_has_no_color() {
        assert_eq!(LogRecordHighlighter::new().get_color(&record1()), None);
    }

    #[test]
    fn test_matching_filter_gives_color() {
        let model = MutableFilterModel::with_filters([Filter::highlight(Color::RED, MATCH_FIRST)]);
        let highlighter = LogRecordHighlighter::with_model(&model);

        assert_eq!(highlighter.get_color(&record1()), Some(Color::RED));
        assert_eq!(highlighter.get_color(&record2()), None);
    }

    #[test]
    fn test_last_filter_wins() {
        let model = MutableFilterModel::new();
        let highlighter = LogRecordHighlighter::with_model(&model);
        model.add_filter(Filter::highlight(Color::RED, MATCH_ALL));
        model.add_filter(Filter::highlight(Color::BLUE, MATCH_ALL));

        assert_eq!(highlighter.get_color(&record1()), Some(Color::BLUE));
    }

    #[test]
    fn test_removing_narrow_filter_restores_broad_one() {
        let broad = Filter::highlight(Color::RED, MATCH_ALL);
        let narrow = Filter::highlight(Color::BLUE, MATCH_FIRST);
        let model = MutableFilterModel::with_filters([broad, narrow.clone()]);
        let highlighter = LogRecordHighlighter::with_model(&model);
        assert_eq!(highlighter.get_color(&record1()), Some(Color::BLUE));
        assert_eq!(highlighter.get_color(&record2()), Some(Color::RED));

        model.remove_filter(&narrow);

        assert_eq!(highlighter.get_color(&record1()), Some(Color::RED));
    }

    #[test]
    fn test_non_matching_later_filter_does_not_hide_earlier_one() {
        let model = MutableFilterModel::with_filters([
            Filter::highlight(Color::RED, MATCH_ALL),
            Filter::highlight(Color::BLUE, MATCH_NONE),
        ]);
        let highlighter = LogRecordHighlighter::with_model(&model);

        assert_eq!(highlighter.get_color(&record1()), Some(Color::RED));
    }

    #[test]
    fn test_disabled_filter_is_skipped() {
        let red = Filter::highlight(Color::RED, MATCH_ALL);
        let blue = Filter::highlight(Color::BLUE, MATCH_ALL);
        let model = MutableFilterModel::with_filters([red, blue.clone()]);
        let highlighter = LogRecordHighlighter::with_model(&model);

        model.replace_filter(&blue, blue.disabled()).expect("filter present");

        assert_eq!(highlighter.get_color(&record1()), Some(Color::RED));
    }

    #[test]
    fn test_enabling_keeps_position() {
        let red = Filter::highlight(Color::RED, MATCH_ALL);
        let blue = Filter::highlight(Color::BLUE, MATCH_ALL);
        let model = MutableFilterModel::with_filters([red.clone(), blue]);
        let highlighter = LogRecordHighlighter::with_model(&model);

        model.replace_filter(&red, red.disabled()).expect("filter present");
        model.replace_filter(&red.disabled(), red.clone()).expect("filter present");

        assert_eq!(highlighter.get_color(&record1()), Some(Color::BLUE));
    }

    #[test]
    fn test_replacing_keeps_position() {
        let red = Filter::highlight(Color::RED, MATCH_ALL);
        let blue = Filter::highlight(Color::BLUE, MATCH_ALL);
        let model = MutableFilterModel::with_filters([red.clone(), blue]);
        let highlighter = LogRecordHighlighter::with_model(&model);

        model
            .replace_filter(&red, Filter::highlight(Color::GREEN, MATCH_ALL))
            .expect("filter present");
        assert_eq!(highlighter.get_color(&record1()), Some(Color::BLUE));

        let broad_first =
            MutableFilterModel::with_filters([Filter::highlight(Color::RED, MATCH_ALL)]);
        let narrow = Filter::highlight(Color::BLUE, MATCH_FIRST);
        broad_first.add_filter(narrow.clone());
        let highlighter = LogRecordHighlighter::with_model(&broad_first);
        broad_first
            .replace_filter(&narrow, Filter::highlight(Color::GREEN, MATCH_FIRST))
            .expect("filter present");
        assert_eq!(highlighter.get_color(&record1()), Some(Color::GREEN));
    }

    #[test]
    fn test_insert_before_changes_winner() {
        let red = Filter::highlight(Color::RED, MATCH_ALL);
        let blue = Filter::highlight(Color::BLUE, MATCH_ALL);
        let model = MutableFilterModel::with_filters([red.clone(), blue.clone()]);
        let highlighter = LogRecordHighlighter::with_model(&model);
        let (count, _s) = counter(&highlighter);

        model.insert_filter_before(blue, &red).expect("anchor present");

        assert_eq!(count.get(), 1);
        assert_eq!(highlighter.get_color(&record1()), Some(Color::RED));
    }

    #[test]
    fn test_other_filters_do_not_notify() {
        let model = MutableFilterModel::new();
        let highlighter = LogRecordHighlighter::with_model(&model);
        let (count, _s) = counter(&highlighter);

        model.add_filter(Filter::hide(MATCH_ALL));
        model.add_filter(Filter::show(MATCH_ALL));

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_removal_notifies_and_clears() {
        let red = Filter::highlight(Color::RED, MATCH_ALL);
        let model = MutableFilterModel::with_filters([red.clone()]);
        let highlighter = LogRecordHighlighter::with_model(&model);
        let (count, _s) = counter(&highlighter);

        model.remove_filter(&red);

        assert_eq!(count.get(), 1);
        assert_eq!(highlighter.get_color(&record1()), None);
        assert!(highlighter.filters().is_empty());
    }

    #[test]
    fn test_filters_in_model_order() {
        let red = Filter::highlight(Color::RED, MATCH_ALL);
        let blue = Filter::highlight(Color::BLUE, MATCH_ALL);
        let model = MutableFilterModel::with_filters([red.clone(), blue.clone()]);
        let highlighter = LogRecordHighlighter::with_model(&model);

        let colors: Vec<Color> = highlighter.filters().iter().map(ColoringFilter::color).collect();
        assert_eq!(colors, vec![Color::RED, Color::BLUE]);
    }
}
