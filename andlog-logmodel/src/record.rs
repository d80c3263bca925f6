use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// value of pid/tid when the log source didn't provide one
pub const NO_ID: i32 = -1;

/// severity of a log record, ordered from the least to the most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol '{0}' doesn't correspond to valid priority value")]
pub struct ParsePriorityError(pub String);

impl Priority {
    pub const LOWEST: Priority = Priority::Verbose;

    pub const ALL: [Priority; 6] = [
        Priority::Verbose,
        Priority::Debug,
        Priority::Info,
        Priority::Warn,
        Priority::Error,
        Priority::Fatal,
    ];

    /// one-letter code as printed by logcat
    pub fn letter(self) -> &'static str {
        match self {
            Priority::Verbose => "V",
            Priority::Debug => "D",
            Priority::Info => "I",
            Priority::Warn => "W",
            Priority::Error => "E",
            Priority::Fatal => "F",
        }
    }

    pub fn from_letter(letter: &str) -> Result<Self, ParsePriorityError> {
        let trimmed = letter.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.letter().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePriorityError(trimmed.to_string()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Verbose => "VERBOSE",
            Priority::Debug => "DEBUG",
            Priority::Info => "INFO",
            Priority::Warn => "WARN",
            Priority::Error => "ERROR",
            Priority::Fatal => "FATAL",
        };
        f.write_str(name)
    }
}

/// logcat buffer the record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Buffer {
    Main,
    System,
    Radio,
    Events,
    Crash,
    Kernel,
}

impl Buffer {
    pub const ALL: [Buffer; 6] = [
        Buffer::Main,
        Buffer::System,
        Buffer::Radio,
        Buffer::Events,
        Buffer::Crash,
        Buffer::Kernel,
    ];

    pub fn caption(self) -> &'static str {
        match self {
            Buffer::Main => "Main",
            Buffer::System => "System",
            Buffer::Radio => "Radio",
            Buffer::Events => "Events",
            Buffer::Crash => "Crash",
            Buffer::Kernel => "Kernel",
        }
    }
}

/// represents a single parsed record from logcat or dumpstate
///
/// Records are immutable values: every `with_*`/`without_*` method returns a
/// modified copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    time: Option<NaiveDateTime>,
    pid: i32,
    tid: i32,
    priority: Priority,
    tag: String,
    message: String,
    buffer: Option<Buffer>,
    app_name: Option<String>,
}

impl LogRecord {
    pub fn new(priority: Priority, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            time: None,
            pid: NO_ID,
            tid: NO_ID,
            priority,
            tag: tag.into(),
            message: message.into(),
            buffer: None,
            app_name: None,
        }
    }

    pub fn time(&self) -> Option<NaiveDateTime> {
        self.time
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn tid(&self) -> i32 {
        self.tid
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `None` means the buffer is unknown
    pub fn buffer(&self) -> Option<Buffer> {
        self.buffer
    }

    pub fn has_app_name(&self) -> bool {
        self.app_name.is_some()
    }

    /// app name, or an empty string when the record has none
    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or("")
    }

    pub fn with_time(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn without_time(mut self) -> Self {
        self.time = None;
        self
    }

    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = pid;
        self
    }

    pub fn without_pid(self) -> Self {
        self.with_pid(NO_ID)
    }

    pub fn with_tid(mut self, tid: i32) -> Self {
        self.tid = tid;
        self
    }

    pub fn without_tid(self) -> Self {
        self.with_tid(NO_ID)
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_buffer(mut self, buffer: Buffer) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn without_buffer(mut self) -> Self {
        self.buffer = None;
        self
    }

    /// app names are trimmed of surrounding whitespace
    pub fn with_app_name(mut self, app_name: impl AsRef<str>) -> Self {
        self.app_name = Some(app_name.as_ref().trim().to_string());
        self
    }

    pub fn without_app_name(mut self) -> Self {
        self.app_name = None;
        self
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.buffer {
            Some(buffer) => write!(f, "[{:?}] ", buffer)?,
            None => f.write_str("[?] ")?,
        }
        if let Some(time) = self.time {
            write!(f, "{}\t", time.format("%m-%d %H:%M:%S%.3f"))?;
        }
        if self.pid != NO_ID {
            write!(f, "{}\t", self.pid)?;
        }
        if self.tid != NO_ID {
            write!(f, "{}\t", self.tid)?;
        }
        write!(f, "{}\t{}\t{}", self.priority.letter(), self.tag, self.message)
    }
}
