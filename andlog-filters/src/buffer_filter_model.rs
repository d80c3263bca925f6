use crate::{
    buffer_filter::BufferFilter,
    config::{ConfigStorage, Preference},
    error::FilterModelError,
    model::MutableFilterModel,
};
use andlog_logmodel::Buffer;
use std::{collections::BTreeSet, rc::Rc};

pub const ENABLED_BUFFERS_KEY: &str = "logcatBuffers";

pub fn default_enabled_buffers() -> BTreeSet<Buffer> {
    BTreeSet::from([Buffer::Main, Buffer::System, Buffer::Crash])
}

pub fn enabled_buffers_pref(storage: Rc<dyn ConfigStorage>) -> Preference<BTreeSet<Buffer>> {
    Preference::new(storage, ENABLED_BUFFERS_KEY, default_enabled_buffers)
}

/// Keeps the buffer filter of a model in sync with the user's buffer choice.
pub struct BufferFilterModel {
    model: MutableFilterModel,
    pref: Preference<BTreeSet<Buffer>>,
    filter: BufferFilter,
}

impl BufferFilterModel {
    /// adds the buffer filter restored from `pref` to `model`
    pub fn new(model: MutableFilterModel, pref: Preference<BTreeSet<Buffer>>) -> Self {
        let filter = BufferFilter::allowing(pref.get());
        model.add_filter(filter.to_filter());
        Self { model, pref, filter }
    }

    pub fn is_buffer_enabled(&self, buffer: Buffer) -> bool {
        self.filter.is_buffer_allowed(buffer)
    }

    pub fn is_buffer_filtering_enabled(&self) -> bool {
        self.filter.is_enabled()
    }

    pub fn filter(&self) -> &BufferFilter {
        &self.filter
    }

    pub fn set_buffer_enabled(
        &mut self,
        buffer: Buffer,
        enabled: bool) -> Result<(), FilterModelError> {
        let filter = if enabled {
            self.filter.allow_buffer(buffer)
        } else {
            self.filter.disallow_buffer(buffer)
        };
        self.replace(filter)?;
        self.pref.set(self.filter.allowed_buffers());
        Ok(())
    }

    /// turning filtering off shows records of every buffer
    pub fn set_buffer_filtering_enabled(&mut self, enabled: bool) -> Result<(), FilterModelError> {
        let filter = if enabled { self.filter.enabled() } else { self.filter.disabled() };
        self.replace(filter)
    }

    fn replace(&mut self, filter: BufferFilter) -> Result<(), FilterModelError> {
        self.model.replace_filter(&self.filter.to_filter(), filter.to_filter())?;
        self.filter = filter;
        Ok(())
    }
}
