//! Text patterns typed by the user.
//!
//! A request wrapped in slashes (`/pattern/`) is a regular expression, anything
//! else is a plain string matched literally.

use andlog_logmodel::predicates::BoxedTextPredicate;
use regex::RegexBuilder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestCompilationError {
    #[error("search request is empty or blank")]
    BlankRequest,
    #[error("regular expression in '{request}' is blank")]
    BlankRegex { request: String },
    #[error("search pattern is empty")]
    EmptyPattern,
    #[error("invalid regular expression '{request}': {source}")]
    InvalidRegex {
        request: String,
        #[source]
        source: regex::Error,
    },
}

/// Builds text matchers from plain strings or regular expressions.
#[derive(Debug, Clone, Copy)]
pub struct SearcherBuilder {
    ignore_case: bool,
    match_whole_text: bool,
}

impl Default for SearcherBuilder {
    fn default() -> Self {
        Self {
            ignore_case: false,
            match_whole_text: true,
        }
    }
}

impl SearcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// `false` accepts a match anywhere in the text
    pub fn match_whole_text(mut self, match_whole_text: bool) -> Self {
        self.match_whole_text = match_whole_text;
        self
    }

    pub fn build_plain(
        &self,
        pattern: &str,
    ) -> Result<BoxedTextPredicate, RequestCompilationError> {
        if pattern.is_empty() {
            return Err(RequestCompilationError::EmptyPattern);
        }
        self.build(&regex::escape(pattern), pattern)
    }

    pub fn build_regex(
        &self,
        pattern: &str,
    ) -> Result<BoxedTextPredicate, RequestCompilationError> {
        if pattern.is_empty() {
            return Err(RequestCompilationError::EmptyPattern);
        }
        self.build(pattern, pattern)
    }

    fn build(
        &self,
        pattern: &str,
        request: &str,
    ) -> Result<BoxedTextPredicate, RequestCompilationError> {
        let source = if self.match_whole_text {
            format!("^(?:{})$", pattern)
        } else {
            pattern.to_string()
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(self.ignore_case)
            .build()
            .map_err(|source| RequestCompilationError::InvalidRegex {
                request: request.to_string(),
                source,
            })?;
        Ok(Box::new(move |text: &str| regex.is_match(text)))
    }
}

/// Turns a raw request into a matcher, choosing plain or regex mode from its shape.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequestParser {
    plain: SearcherBuilder,
    regex: SearcherBuilder,
}

impl SearchRequestParser {
    pub fn new(plain: SearcherBuilder, regex: SearcherBuilder) -> Self {
        Self { plain, regex }
    }

    /// tags and app names: plain requests must match the whole text, regexes any part;
    /// case is ignored
    pub fn for_tags() -> Self {
        Self::new(
            SearcherBuilder::new().ignore_case(true).match_whole_text(true),
            SearcherBuilder::new().ignore_case(true).match_whole_text(false),
        )
    }

    /// messages: plain requests are case-insensitive substrings, regexes are case-sensitive
    pub fn for_messages() -> Self {
        Self::new(
            SearcherBuilder::new().ignore_case(true).match_whole_text(false),
            SearcherBuilder::new().ignore_case(false).match_whole_text(false),
        )
    }

    pub fn is_regex_request(request: &str) -> bool {
        request.len() > 1 && request.starts_with('/') && request.ends_with('/')
    }

    pub fn parse(&self, request: &str) -> Result<BoxedTextPredicate, RequestCompilationError> {
        if request.trim().is_empty() {
            return Err(RequestCompilationError::BlankRequest);
        }
        if !Self::is_regex_request(request) {
            return self.plain.build_plain(request);
        }

        let pattern = &request[1..request.len() - 1];
        if pattern.trim().is_empty() {
            return Err(RequestCompilationError::BlankRegex {
                request: request.to_string(),
            });
        }
        self.regex.build_regex(pattern).map_err(|err| match err {
            RequestCompilationError::InvalidRegex { source, .. } => {
                RequestCompilationError::InvalidRegex {
                    request: request.to_string(),
                    source,
                }
            }
            other => other,
        })
    }
}
