//! The filter value types.
//!
//! A [`Filter`] is an immutable value tagged with its [`FilteringMode`]. Each
//! variant carries the capability its consumers need: SHOW and HIDE filters are
//! plain [`PredicateFilter`]s, HIGHLIGHT filters are [`ColoringFilter`]s and
//! WINDOW filters are [`ChildModelFilter`]s owning a nested model.
//!
//! Enabling or disabling a filter produces a copy with the same [`FilterId`].
//! Two filters are equal when they have the same variant, id and enabled flag,
//! so `f.disabled().enabled() == f` holds while `f.disabled() != f`.

use crate::{color::Color, filter_data::FilterData, mode::FilteringMode, model::MutableFilterModel};
use andlog_logmodel::{LogRecord, predicates::BoxedRecordPredicate};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};
use uuid::Uuid;

/// identity of a filter, shared by its enabled and disabled copies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(Uuid);

impl FilterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FilterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// shareable predicate over log records
#[derive(Clone)]
pub struct RecordPredicate(Arc<dyn Fn(&LogRecord) -> bool + Send + Sync>);

impl RecordPredicate {
    pub fn new(predicate: impl Fn(&LogRecord) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn from_boxed(predicate: BoxedRecordPredicate) -> Self {
        Self(Arc::from(predicate))
    }

    pub fn test(&self, record: &LogRecord) -> bool {
        (self.0)(record)
    }

    pub fn negate(&self) -> Self {
        let inner = self.0.clone();
        Self(Arc::new(move |record| !inner(record)))
    }
}

impl fmt::Debug for RecordPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecordPredicate")
    }
}

/// State common to every filter kind.
#[derive(Clone)]
struct FilterCore {
    id: FilterId,
    enabled: bool,
    predicate: RecordPredicate,
    data: Option<Arc<FilterData>>,
}

impl FilterCore {
    fn new(predicate: RecordPredicate, enabled: bool, data: Option<Arc<FilterData>>) -> Self {
        Self {
            id: FilterId::new(),
            enabled,
            predicate,
            data,
        }
    }

    fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }
}

impl PartialEq for FilterCore {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.enabled == other.enabled
    }
}

impl Eq for FilterCore {}

impl Hash for FilterCore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.enabled.hash(state);
    }
}

impl fmt::Debug for FilterCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.enabled {
            f.write_str(" (disabled)")?;
        }
        if let Some(name) = self.data.as_ref().and_then(|d| d.name.as_deref()) {
            write!(f, " '{}'", name)?;
        }
        Ok(())
    }
}

/// filter usable by the show/hide chain
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PredicateFilter {
    core: FilterCore,
}

impl PredicateFilter {
    pub fn new(predicate: RecordPredicate, enabled: bool) -> Self {
        Self {
            core: FilterCore::new(predicate, enabled, None),
        }
    }

    pub(crate) fn with_data(
        predicate: RecordPredicate,
        enabled: bool,
        data: Arc<FilterData>,
    ) -> Self {
        Self {
            core: FilterCore::new(predicate, enabled, Some(data)),
        }
    }

    pub fn id(&self) -> FilterId {
        self.core.id
    }

    pub fn is_enabled(&self) -> bool {
        self.core.enabled
    }

    pub fn test(&self, record: &LogRecord) -> bool {
        self.core.predicate.test(record)
    }

    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            core: self.core.with_enabled(enabled),
        }
    }
}

impl fmt::Debug for PredicateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.core, f)
    }
}

/// filter that also yields a highlight color
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ColoringFilter {
    core: FilterCore,
    color: Color,
}

impl ColoringFilter {
    pub fn new(predicate: RecordPredicate, color: Color, enabled: bool) -> Self {
        Self {
            core: FilterCore::new(predicate, enabled, None),
            color,
        }
    }

    pub(crate) fn with_data(
        predicate: RecordPredicate,
        color: Color,
        enabled: bool,
        data: Arc<FilterData>,
    ) -> Self {
        Self {
            core: FilterCore::new(predicate, enabled, Some(data)),
            color,
        }
    }

    pub fn id(&self) -> FilterId {
        self.core.id
    }

    pub fn is_enabled(&self) -> bool {
        self.core.enabled
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn test(&self, record: &LogRecord) -> bool {
        self.core.predicate.test(record)
    }

    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            core: self.core.with_enabled(enabled),
            color: self.color,
        }
    }
}

impl fmt::Debug for ColoringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.core, self.color)
    }
}

/// Filter owning a nested model of filters that apply only within its scope.
///
/// Enabled and disabled copies share the same children model.
#[derive(Clone)]
pub struct ChildModelFilter {
    core: FilterCore,
    children: MutableFilterModel,
}

impl ChildModelFilter {
    pub fn new(predicate: RecordPredicate, children: MutableFilterModel, enabled: bool) -> Self {
        Self {
            core: FilterCore::new(predicate, enabled, None),
            children,
        }
    }

    pub(crate) fn with_data(
        predicate: RecordPredicate,
        children: MutableFilterModel,
        enabled: bool,
        data: Arc<FilterData>,
    ) -> Self {
        Self {
            core: FilterCore::new(predicate, enabled, Some(data)),
            children,
        }
    }

    pub fn id(&self) -> FilterId {
        self.core.id
    }

    pub fn is_enabled(&self) -> bool {
        self.core.enabled
    }

    /// whether the record belongs to this filter's scope
    pub fn test(&self, record: &LogRecord) -> bool {
        self.core.predicate.test(record)
    }

    pub fn children(&self) -> &MutableFilterModel {
        &self.children
    }

    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            core: self.core.with_enabled(enabled),
            children: self.children.clone(),
        }
    }
}

impl PartialEq for ChildModelFilter {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl Eq for ChildModelFilter {}

impl Hash for ChildModelFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.hash(state);
    }
}

impl fmt::Debug for ChildModelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.core, f)
    }
}

/// A filter tagged with its mode.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    Show(PredicateFilter),
    Hide(PredicateFilter),
    Highlight(ColoringFilter),
    Window(ChildModelFilter),
}

impl Filter {
    pub fn show(predicate: impl Fn(&LogRecord) -> bool + Send + Sync + 'static) -> Self {
        Filter::Show(PredicateFilter::new(RecordPredicate::new(predicate), true))
    }

    pub fn hide(predicate: impl Fn(&LogRecord) -> bool + Send + Sync + 'static) -> Self {
        Filter::Hide(PredicateFilter::new(RecordPredicate::new(predicate), true))
    }

    pub fn highlight(
        color: Color,
        predicate: impl Fn(&LogRecord) -> bool + Send + Sync + 'static,
    ) -> Self {
        Filter::Highlight(ColoringFilter::new(RecordPredicate::new(predicate), color, true))
    }

    /// creates a WINDOW filter with an empty children model
    pub fn window(predicate: impl Fn(&LogRecord) -> bool + Send + Sync + 'static) -> Self {
        Filter::Window(ChildModelFilter::new(
            RecordPredicate::new(predicate),
            MutableFilterModel::new(),
            true,
        ))
    }

    pub fn mode(&self) -> FilteringMode {
        match self {
            Filter::Show(_) => FilteringMode::Show,
            Filter::Hide(_) => FilteringMode::Hide,
            Filter::Highlight(_) => FilteringMode::Highlight,
            Filter::Window(_) => FilteringMode::Window,
        }
    }

    fn core(&self) -> &FilterCore {
        match self {
            Filter::Show(f) | Filter::Hide(f) => &f.core,
            Filter::Highlight(f) => &f.core,
            Filter::Window(f) => &f.core,
        }
    }

    pub fn id(&self) -> FilterId {
        self.core().id
    }

    pub fn is_enabled(&self) -> bool {
        self.core().enabled
    }

    pub fn test(&self, record: &LogRecord) -> bool {
        self.core().predicate.test(record)
    }

    /// the data this filter was built from, if it came from [`FilterData`]
    pub fn data(&self) -> Option<&FilterData> {
        self.core().data.as_deref()
    }

    pub fn with_enabled(&self, enabled: bool) -> Self {
        match self {
            Filter::Show(f) => Filter::Show(f.with_enabled(enabled)),
            Filter::Hide(f) => Filter::Hide(f.with_enabled(enabled)),
            Filter::Highlight(f) => Filter::Highlight(f.with_enabled(enabled)),
            Filter::Window(f) => Filter::Window(f.with_enabled(enabled)),
        }
    }

    pub fn enabled(&self) -> Self {
        self.with_enabled(true)
    }

    pub fn disabled(&self) -> Self {
        self.with_enabled(false)
    }

    pub fn as_predicate(&self) -> Option<&PredicateFilter> {
        match self {
            Filter::Show(f) | Filter::Hide(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_coloring(&self) -> Option<&ColoringFilter> {
        match self {
            Filter::Highlight(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_child_model(&self) -> Option<&ChildModelFilter> {
        match self {
            Filter::Window(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Show(inner) => write!(f, "Show({:?})", inner),
            Filter::Hide(inner) => write!(f, "Hide({:?})", inner),
            Filter::Highlight(inner) => write!(f, "Highlight({:?})", inner),
            Filter::Window(inner) => write!(f, "Window({:?})", inner),
        }
    }
}
