//! # andlog-logmodel
//!
//! The structured shape of Android log records (logcat and dumpstate) as seen by
//! the filtering engine in `andlog-filters`.
//!
//! Parsing raw log text is left to log providers; this crate only describes the
//! result: a [`LogRecord`] with its [`Buffer`], [`Priority`] and the rest of the
//! fields, a [`Field`] table for generic access, and a set of reusable
//! [`predicates`].

pub mod field;
pub mod predicates;
pub mod record;

pub use field::{Field, FieldValue};
pub use record::{Buffer, LogRecord, NO_ID, ParsePriorityError, Priority};
