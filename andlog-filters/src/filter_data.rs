//! Filter definitions as entered in a filter dialog.
//!
//! [`FilterData`] is the serializable description; [`FilterData::to_filter`]
//! compiles it into a [`Filter`] whose [`Filter::data`] points back to it.

use crate::{
    color::Color,
    filter::{ChildModelFilter, ColoringFilter, Filter, PredicateFilter, RecordPredicate},
    mode::FilteringMode,
    model::MutableFilterModel,
    search::{RequestCompilationError, SearchRequestParser},
};
use andlog_logmodel::{
    Priority,
    predicates::{
        BoxedRecordPredicate, BoxedTextPredicate, all_of, any_of, match_app_name, match_message,
        match_tag, more_severe_than, with_any_of_pids,
    },
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterDataError {
    #[error(transparent)]
    InvalidPattern(#[from] RequestCompilationError),
    #[error("highlight filter has no color")]
    MissingHighlightColor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub mode: FilteringMode,
    /// tag requests, any of them may match
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pids: Vec<i32>,
    /// app name requests, OR'ed together with `pids`
    #[serde(default)]
    pub apps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_pattern: Option<String>,
    /// minimal priority; VERBOSE is the same as none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<Color>,
}

fn any_text(matchers: Vec<BoxedTextPredicate>) -> BoxedTextPredicate {
    Box::new(move |text: &str| matchers.iter().any(|m| m(text)))
}

fn parse_all(
    parser: &SearchRequestParser,
    requests: &[String],
) -> Result<BoxedTextPredicate, RequestCompilationError> {
    let matchers = requests
        .iter()
        .map(|request| parser.parse(request))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(any_text(matchers))
}

impl FilterData {
    pub fn new(mode: FilteringMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Combines every non-empty criterion with AND; an empty definition matches everything.
    pub fn compile_predicate(&self) -> Result<RecordPredicate, RequestCompilationError> {
        let tag_parser = SearchRequestParser::for_tags();
        let mut predicates: Vec<BoxedRecordPredicate> = Vec::new();

        if !self.tags.is_empty() {
            predicates.push(match_tag(parse_all(&tag_parser, &self.tags)?));
        }

        let mut apps_or_pids: Vec<BoxedRecordPredicate> = Vec::new();
        if !self.pids.is_empty() {
            apps_or_pids.push(with_any_of_pids(self.pids.iter().copied()));
        }
        if !self.apps.is_empty() {
            apps_or_pids.push(match_app_name(parse_all(&tag_parser, &self.apps)?));
        }
        if !apps_or_pids.is_empty() {
            predicates.push(any_of(apps_or_pids));
        }

        if let Some(pattern) = self.message_pattern.as_deref().filter(|p| !p.is_empty()) {
            predicates.push(match_message(SearchRequestParser::for_messages().parse(pattern)?));
        }

        if let Some(priority) = self.priority
            && priority != Priority::LOWEST
        {
            predicates.push(more_severe_than(priority));
        }

        Ok(RecordPredicate::from_boxed(all_of(predicates)))
    }

    /// Compiles the definition into a filter of its mode.
    ///
    /// A WINDOW filter gets a fresh children model seeded with a HIDE filter for
    /// everything outside the window.
    pub fn to_filter(&self, enabled: bool) -> Result<Filter, FilterDataError> {
        let predicate = self.compile_predicate()?;
        let data = Arc::new(self.clone());
        let filter = match self.mode {
            FilteringMode::Show => {
                Filter::Show(PredicateFilter::with_data(predicate, enabled, data))
            }
            FilteringMode::Hide => {
                Filter::Hide(PredicateFilter::with_data(predicate, enabled, data))
            }
            FilteringMode::Highlight => {
                let color = self.highlight_color.ok_or(FilterDataError::MissingHighlightColor)?;
                Filter::Highlight(ColoringFilter::with_data(predicate, color, enabled, data))
            }
            FilteringMode::Window => {
                let outside = Filter::Hide(PredicateFilter::new(predicate.negate(), true));
                let children = MutableFilterModel::with_filters([outside]);
                Filter::Window(ChildModelFilter::with_data(predicate, children, enabled, data))
            }
        };
        Ok(filter)
    }

    /// human-readable summary, one criterion per line
    pub fn description(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(name) = &self.name {
            lines.push(name.clone());
        }
        lines.push(self.mode.description().to_string());
        if !self.tags.is_empty() {
            lines.push(format!("Tags: {}", self.tags.iter().join(", ")));
        }
        if !self.pids.is_empty() {
            lines.push(format!("PIDs: {}", self.pids.iter().join(", ")));
        }
        if !self.apps.is_empty() {
            lines.push(format!("App names like: {}", self.apps.iter().join(", ")));
        }
        if let Some(pattern) = &self.message_pattern {
            lines.push(format!("Message text like: {}", pattern));
        }
        if let Some(priority) = self.priority {
            lines.push(format!("Priority>={}", priority));
        }
        if let (FilteringMode::Highlight, Some(color)) = (self.mode, self.highlight_color) {
            lines.push(format!("Color: {}", color));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::FilterModel,
        test_data::{record1, record2},
    };

    fn matches(data: &FilterData, record: &andlog_logmodel::LogRecord) -> bool {
        data.compile_predicate().expect("valid filter data").test(record)
    }

    fn hide() -> FilterData {
        FilterData::new(FilteringMode::Hide)
    }

    #[test]
    fn test_empty_data_matches_everything() {
        assert!(matches(&hide(), &record1()));
        assert!(matches(&hide(), &record2()));
    }

    #[test]
    fn test_tags_are_ored() {
        let data = FilterData {
            tags: vec!["androidruntime".into(), "/^Activity/".into()],
            ..hide()
        };
        assert!(matches(&data, &record1()));
        assert!(matches(&data, &record2()));

        let data = FilterData {
            tags: vec!["Android".into()],
            ..hide()
        };
        assert!(!matches(&data, &record1()));
    }

    #[test]
    fn test_pids_and_apps_are_ored() {
        let data = FilterData {
            pids: vec![590],
            apps: vec!["com.example.app".into()],
            ..hide()
        };
        assert!(matches(&data, &record1()));
        assert!(matches(&data, &record2()));

        let data = FilterData {
            pids: vec![1],
            apps: vec!["/other/".into()],
            ..hide()
        };
        assert!(!matches(&data, &record1()));
    }

    #[test]
    fn test_criteria_are_anded() {
        let data = FilterData {
            tags: vec!["AndroidRuntime".into()],
            pids: vec![590],
            ..hide()
        };
        assert!(!matches(&data, &record1()));
        assert!(!matches(&data, &record2()));
    }

    #[test]
    fn test_message_pattern() {
        let data = FilterData {
            message_pattern: Some("fatal".into()),
            ..hide()
        };
        assert!(matches(&data, &record1()));
        assert!(!matches(&data, &record2()));

        let data = FilterData {
            message_pattern: Some("/fatal/".into()),
            ..hide()
        };
        assert!(!matches(&data, &record1()));
    }

    #[test]
    fn test_priority_is_inclusive_minimum() {
        let data = FilterData {
            priority: Some(Priority::Error),
            ..hide()
        };
        assert!(matches(&data, &record1()));
        assert!(!matches(&data, &record2()));

        let verbose = FilterData {
            priority: Some(Priority::Verbose),
            ..hide()
        };
        assert!(matches(&verbose, &record2()));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let data = FilterData {
            tags: vec!["//".into()],
            ..hide()
        };
        assert!(matches!(
            data.to_filter(true),
            Err(FilterDataError::InvalidPattern(RequestCompilationError::BlankRegex { .. }))
        ));
    }

    #[test]
    fn test_to_filter_per_mode() {
        let show = FilterData::new(FilteringMode::Show).to_filter(true).expect("valid");
        assert_eq!(show.mode(), FilteringMode::Show);
        assert!(show.is_enabled());

        let hide = hide().to_filter(false).expect("valid");
        assert_eq!(hide.mode(), FilteringMode::Hide);
        assert!(!hide.is_enabled());

        let highlight = FilterData {
            highlight_color: Some(Color::RED),
            ..FilterData::new(FilteringMode::Highlight)
        }
        .to_filter(true)
        .expect("valid");
        assert_eq!(highlight.as_coloring().map(|f| f.color()), Some(Color::RED));
    }

    #[test]
    fn test_highlight_without_color_fails() {
        assert!(matches!(
            FilterData::new(FilteringMode::Highlight).to_filter(true),
            Err(FilterDataError::MissingHighlightColor)
        ));
    }

    #[test]
    fn test_filter_remembers_its_data() {
        let data = FilterData {
            name: Some("crashes".into()),
            tags: vec!["AndroidRuntime".into()],
            ..hide()
        };
        let filter = data.to_filter(true).expect("valid");
        assert_eq!(filter.data(), Some(&data));
        assert_eq!(filter.disabled().data(), Some(&data));
    }

    #[test]
    fn test_window_children_hide_everything_outside() {
        let data = FilterData {
            tags: vec!["AndroidRuntime".into()],
            ..FilterData::new(FilteringMode::Window)
        };
        let window = data.to_filter(true).expect("valid");
        let child = window.as_child_model().expect("window filter");

        assert!(child.test(&record1()));
        let children = child.children().filters();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].mode(), FilteringMode::Hide);
        assert!(!children[0].test(&record1()));
        assert!(children[0].test(&record2()));
    }

    #[test]
    fn test_description() {
        let data = FilterData {
            name: Some("network".into()),
            tags: vec!["Net".into(), "/^Wifi/".into()],
            pids: vec![1, 2],
            priority: Some(Priority::Warn),
            ..hide()
        };
        assert_eq!(
            data.description(),
            "network\nHide\nTags: Net, /^Wifi/\nPIDs: 1, 2\nPriority>=WARN"
        );
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let data = FilterData {
            message_pattern: Some("oops".into()),
            highlight_color: Some(Color::rgb(1, 2, 3)),
            ..FilterData::new(FilteringMode::Highlight)
        };
        let json = serde_json::to_value(&data).expect("serializable");
        assert_eq!(json["mode"], "HIGHLIGHT");
        assert_eq!(json["messagePattern"], "oops");
        assert_eq!(json["highlightColor"]["g"], 2);

        let parsed: FilterData = serde_json::from_value(json).expect("deserializable");
        assert_eq!(parsed, data);
    }
}
