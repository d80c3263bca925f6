//! Common record predicates.
//!
//! Every predicate is `Send + Sync` so it can be evaluated from rayon workers.

use crate::record::{Buffer, LogRecord, Priority};
use std::collections::HashSet;

/// boxed predicate over a record
pub type BoxedRecordPredicate = Box<dyn Fn(&LogRecord) -> bool + Send + Sync>;

/// boxed predicate over a string field
pub type BoxedTextPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

pub fn match_tag(tag_matcher: BoxedTextPredicate) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| tag_matcher(record.tag()))
}

pub fn match_message(message_matcher: BoxedTextPredicate) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| message_matcher(record.message()))
}

pub fn match_app_name(app_name_matcher: BoxedTextPredicate) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| app_name_matcher(record.app_name()))
}

pub fn with_pid(pid: i32) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| record.pid() == pid)
}

pub fn with_any_of_pids(pids: impl IntoIterator<Item = i32>) -> BoxedRecordPredicate {
    let pids: HashSet<i32> = pids.into_iter().collect();
    Box::new(move |record: &LogRecord| pids.contains(&record.pid()))
}

/// matches records with priority at least as severe as `priority`
pub fn more_severe_than(priority: Priority) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| record.priority() >= priority)
}

pub fn with_buffer(buffer: Buffer) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| record.buffer() == Some(buffer))
}

/// matches when any of `predicates` matches; empty input never matches
pub fn any_of(predicates: Vec<BoxedRecordPredicate>) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| predicates.iter().any(|p| p(record)))
}

/// matches when all of `predicates` match; empty input always matches
pub fn all_of(predicates: Vec<BoxedRecordPredicate>) -> BoxedRecordPredicate {
    Box::new(move |record: &LogRecord| predicates.iter().all(|p| p(record)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LogRecord {
        LogRecord::new(Priority::Warn, "NetworkStack", "connection reset")
            .with_pid(1234)
            .with_buffer(Buffer::System)
            .with_app_name("com.example.net")
    }

    #[test]
    fn test_match_tag() {
        assert!(match_tag(Box::new(|tag| tag == "NetworkStack"))(&record()));
        assert!(!match_tag(Box::new(|tag| tag == "Other"))(&record()));
    }

    #[test]
    fn test_match_message_and_app() {
        assert!(match_message(Box::new(|m| m.contains("reset")))(&record()));
        assert!(match_app_name(Box::new(|a| a.starts_with("com.example")))(&record()));
    }

    #[test]
    fn test_pids() {
        assert!(with_pid(1234)(&record()));
        assert!(!with_pid(1)(&record()));
        assert!(with_any_of_pids([1, 1234])(&record()));
        assert!(!with_any_of_pids([1, 2])(&record()));
    }

    #[test]
    fn test_more_severe_than_is_inclusive() {
        assert!(more_severe_than(Priority::Warn)(&record()));
        assert!(more_severe_than(Priority::Info)(&record()));
        assert!(!more_severe_than(Priority::Error)(&record()));
    }

    #[test]
    fn test_with_buffer() {
        assert!(with_buffer(Buffer::System)(&record()));
        assert!(!with_buffer(Buffer::Main)(&record()));
        assert!(!with_buffer(Buffer::Main)(&record().without_buffer()));
    }

    #[test]
    fn test_combinators() {
        assert!(all_of(Vec::new())(&record()));
        assert!(!any_of(Vec::new())(&record()));
        assert!(any_of(vec![with_pid(1), with_pid(1234)])(&record()));
        assert!(!all_of(vec![with_pid(1), with_pid(1234)])(&record()));
    }
}
