//! Display models for table output

use serde::Serialize;
use tabled::Tabled;

use super::{DrugSummary, HistoryAttributes};

/// Separator used when flattening name lists into one cell
const LIST_SEPARATOR: &str = ", ";

/// Truncate string to max length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One drug per table row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct DrugDisplay {
    #[tabled(rename = "RXCUI")]
    pub rxcui: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "INGREDIENTS")]
    pub base_names: String,

    #[tabled(rename = "DOSE FORMS")]
    pub dose_forms: String,
}

impl From<&DrugSummary> for DrugDisplay {
    fn from(drug: &DrugSummary) -> Self {
        Self {
            rxcui: drug.rxcui.clone(),
            name: truncate_string(&drug.name, 60),
            base_names: drug.base_names.join(LIST_SEPARATOR),
            dose_forms: drug.dose_form_group_names.join(LIST_SEPARATOR),
        }
    }
}

/// One attribute per table row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct HistoryDisplay {
    #[tabled(rename = "KIND")]
    pub kind: String,

    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl HistoryDisplay {
    pub fn rows(history: &HistoryAttributes) -> Vec<Self> {
        let ingredients = history.base_names.iter().map(|v| Self {
            kind: "ingredient".to_string(),
            value: v.clone(),
        });
        let forms = history.dose_form_group_names.iter().map(|v| Self {
            kind: "dose form group".to_string(),
            value: v.clone(),
        });
        ingredients.chain(forms).collect()
    }
}
