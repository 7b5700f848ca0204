//! Normalized drug records produced by the lookup layer

use serde::{Deserialize, Serialize};

pub mod display;

pub use display::{DrugDisplay, HistoryDisplay};

/// Flat drug record built from RxNav search or property lookups.
///
/// `base_names` and `dose_form_group_names` never hold duplicates; their order
/// is first-seen order from upstream and carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugSummary {
    pub rxcui: String,
    pub name: String,
    pub base_names: Vec<String>,
    pub dose_form_group_names: Vec<String>,
}

impl DrugSummary {
    /// Compose a summary from its identity and the history attributes for it
    pub fn new(rxcui: impl Into<String>, name: impl Into<String>, history: HistoryAttributes) -> Self {
        Self {
            rxcui: rxcui.into(),
            name: name.into(),
            base_names: history.base_names,
            dose_form_group_names: history.dose_form_group_names,
        }
    }
}

/// Ingredient and dose-form names pulled from `historystatus.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryAttributes {
    pub base_names: Vec<String>,
    pub dose_form_group_names: Vec<String>,
}

impl HistoryAttributes {
    pub fn is_empty(&self) -> bool {
        self.base_names.is_empty() && self.dose_form_group_names.is_empty()
    }
}
