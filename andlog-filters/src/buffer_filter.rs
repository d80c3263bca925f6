use crate::filter::{Filter, PredicateFilter, RecordPredicate};
use andlog_logmodel::{Buffer, LogRecord};
use std::{collections::BTreeSet, sync::Arc};

/// HIDE filter for records of the buffers the user turned off.
///
/// Records without a known buffer are always hidden while the filter is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferFilter {
    allowed: Arc<BTreeSet<Buffer>>,
    filter: PredicateFilter,
}

impl BufferFilter {
    /// a filter that allows no buffer at all
    pub fn new() -> Self {
        Self::with_allowed(BTreeSet::new(), true)
    }

    pub fn allowing(buffers: impl IntoIterator<Item = Buffer>) -> Self {
        Self::with_allowed(buffers.into_iter().collect(), true)
    }

    fn with_allowed(allowed: BTreeSet<Buffer>, enabled: bool) -> Self {
        let allowed = Arc::new(allowed);
        let predicate = {
            let allowed = allowed.clone();
            RecordPredicate::new(move |record: &LogRecord| {
                record.buffer().is_none_or(|b| !allowed.contains(&b))
            })
        };
        Self {
            allowed,
            filter: PredicateFilter::new(predicate, enabled),
        }
    }

    pub fn allowed_buffers(&self) -> &BTreeSet<Buffer> {
        &self.allowed
    }

    pub fn is_buffer_allowed(&self, buffer: Buffer) -> bool {
        self.allowed.contains(&buffer)
    }

    /// returns `self` unchanged when `buffer` is already allowed
    pub fn allow_buffer(&self, buffer: Buffer) -> Self {
        if self.is_buffer_allowed(buffer) {
            return self.clone();
        }
        let mut allowed = (*self.allowed).clone();
        allowed.insert(buffer);
        Self::with_allowed(allowed, self.is_enabled())
    }

    /// returns `self` unchanged when `buffer` is already disallowed
    pub fn disallow_buffer(&self, buffer: Buffer) -> Self {
        if !self.is_buffer_allowed(buffer) {
            return self.clone();
        }
        let mut allowed = (*self.allowed).clone();
        allowed.remove(&buffer);
        Self::with_allowed(allowed, self.is_enabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.filter.is_enabled()
    }

    pub fn enabled(&self) -> Self {
        self.with_enabled(true)
    }

    pub fn disabled(&self) -> Self {
        self.with_enabled(false)
    }

    fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            allowed: self.allowed.clone(),
            filter: self.filter.with_enabled(enabled),
        }
    }

    /// whether the record would be hidden
    pub fn test(&self, record: &LogRecord) -> bool {
        self.filter.test(record)
    }

    pub fn to_filter(&self) -> Filter {
        Filter::Hide(self.filter.clone())
    }
}

impl Default for BufferFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BufferFilter> for Filter {
    fn from(filter: BufferFilter) -> Self {
        filter.to_filter()
    }
}
