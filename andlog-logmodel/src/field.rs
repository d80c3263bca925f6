use crate::record::{Buffer, LogRecord, Priority};
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// fields of a [`LogRecord`] that can be inspected or sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// optional, `None` when missing
    Time,
    /// optional, [`crate::NO_ID`] when missing
    Pid,
    /// optional, [`crate::NO_ID`] when missing
    Tid,
    Priority,
    /// empty string when missing
    Tag,
    Message,
    /// optional, `None` when the buffer is unknown
    Buffer,
    /// empty string when missing
    AppName,
}

/// value of a single field extracted from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Time(Option<NaiveDateTime>),
    Id(i32),
    Priority(Priority),
    Text(&'a str),
    Buffer(Option<Buffer>),
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Time,
        Field::Pid,
        Field::Tid,
        Field::Priority,
        Field::Tag,
        Field::Message,
        Field::Buffer,
        Field::AppName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Time => "TIME",
            Field::Pid => "PID",
            Field::Tid => "TID",
            Field::Priority => "PRIORITY",
            Field::Tag => "TAG",
            Field::Message => "MESSAGE",
            Field::Buffer => "BUFFER",
            Field::AppName => "APP_NAME",
        }
    }

    pub fn value(self, record: &LogRecord) -> FieldValue<'_> {
        match self {
            Field::Time => FieldValue::Time(record.time()),
            Field::Pid => FieldValue::Id(record.pid()),
            Field::Tid => FieldValue::Id(record.tid()),
            Field::Priority => FieldValue::Priority(record.priority()),
            Field::Tag => FieldValue::Text(record.tag()),
            Field::Message => FieldValue::Text(record.message()),
            Field::Buffer => FieldValue::Buffer(record.buffer()),
            Field::AppName => FieldValue::Text(record.app_name()),
        }
    }

    /// compares two records by this field; missing optional values sort first
    pub fn compare(self, a: &LogRecord, b: &LogRecord) -> Ordering {
        self.value(a).cmp(&self.value(b))
    }
}
