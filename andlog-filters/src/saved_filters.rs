use crate::{
    config::{ConfigStorage, Preference},
    filter::Filter,
    filter_data::{FilterData, FilterDataError},
    model::{FilterModel, MutableFilterModel},
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub const SAVED_FILTERS_KEY: &str = "filters";

/// persisted form of one model filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SavedFilterData {
    Dialog {
        enabled: bool,
        #[serde(flatten)]
        data: FilterData,
        /// filters added inside a WINDOW, after the generated "hide outside" one
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<SavedFilterData>,
    },
}

impl SavedFilterData {
    /// `None` for filters that were not built from [`FilterData`]
    pub fn from_filter(filter: &Filter) -> Option<Self> {
        let data = filter.data()?;
        let children = filter
            .as_child_model()
            .map(|window| saved_entries(window.children()))
            .unwrap_or_default();
        Some(SavedFilterData::Dialog {
            enabled: filter.is_enabled(),
            data: data.clone(),
            children,
        })
    }

    /// Rebuilds the filter. Saved children of a WINDOW are appended to its
    /// children model; the ones that no longer compile are dropped.
    pub fn to_filter(&self) -> Result<Filter, FilterDataError> {
        match self {
            SavedFilterData::Dialog {
                enabled,
                data,
                children,
            } => {
                let filter = data.to_filter(*enabled)?;
                if let Some(window) = filter.as_child_model() {
                    add_restored(window.children(), children);
                }
                Ok(filter)
            }
        }
    }
}

pub fn saved_filters_pref(storage: Rc<dyn ConfigStorage>) -> Preference<Vec<SavedFilterData>> {
    Preference::new(storage, SAVED_FILTERS_KEY, Vec::new)
}

/// data-backed filters only; the generated "hide outside" filter of a window has no data
fn saved_entries(model: &dyn FilterModel) -> Vec<SavedFilterData> {
    model
        .filters()
        .iter()
        .filter_map(SavedFilterData::from_filter)
        .collect()
}

fn add_restored(model: &MutableFilterModel, entries: &[SavedFilterData]) {
    for saved in entries {
        match saved.to_filter() {
            Ok(filter) => model.add_filter(filter),
            Err(e) => log::warn!("dropping saved filter {:?}: {}", saved, e),
        }
    }
}

/// writes every data-backed filter of `model`, in order
pub fn save_filters(model: &dyn FilterModel, pref: &Preference<Vec<SavedFilterData>>) {
    let saved = saved_entries(model);
    log::debug!("saving {} filters", saved.len());
    pref.set(&saved);
}

/// rebuilds a model from the stored filters, skipping entries that no longer compile
pub fn restore_filters(pref: &Preference<Vec<SavedFilterData>>) -> MutableFilterModel {
    let model = MutableFilterModel::new();
    add_restored(&model, &pref.get());
    model
}
