//! Reshaping of RxNav documents into flat records
//!
//! RxNav sends a lone object where a list is expected whenever the list would
//! have one element. Every such field is read through `OneOrMany` so the rest
//! of the crate only ever sees sequences. List items are decoded one at a
//! time; an item of the wrong shape is dropped without touching its siblings.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::HistoryAttributes;

/// Term type of Semantic Branded Drug concept groups
pub const SBD_TTY: &str = "SBD";

/// Concept statuses that count as a valid RXCUI
pub const VALID_STATUSES: [&str; 2] = ["Active", "Remapped"];

/// A field RxNav sends as either one object or an array of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Flatten an optional object-or-array field into a sequence
fn sequence<T>(field: Option<OneOrMany<T>>) -> Vec<T> {
    field.map(OneOrMany::into_vec).unwrap_or_default()
}

/// Decode each raw item as `T`, skipping the ones that do not fit
fn decode_items<T, I>(items: I, what: &str) -> Vec<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = Value>,
{
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping malformed {} item: {}", what, e);
                None
            }
        })
        .collect()
}

/// Collect values in first-seen order, dropping exact duplicates
pub fn dedup_ordered<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

// ============================================================================
// drugs.json
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugsDocument {
    drug_group: Option<DrugGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugGroup {
    concept_group: Option<OneOrMany<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConceptGroup {
    concept_properties: Option<OneOrMany<Value>>,
}

#[derive(Debug, Deserialize)]
struct ConceptProperties {
    rxcui: Option<String>,
    name: Option<String>,
}

/// A branded drug hit from `drugs.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub rxcui: String,
    pub name: String,
}

/// Pick the first SBD group and return up to `limit` of its concepts.
///
/// Only the first group with `tty == "SBD"` is decoded; other groups are never
/// looked at beyond their `tty`. Entries without an rxcui, or of the wrong
/// shape, are skipped after the limit is applied. Errors mean the document is
/// not shaped like a `drugs.json` response at all.
pub fn sbd_concepts(doc: Value, limit: usize) -> Result<Vec<Concept>, serde_json::Error> {
    let doc: DrugsDocument = serde_json::from_value(doc)?;

    let groups = sequence(doc.drug_group.and_then(|g| g.concept_group));
    let Some(group) = groups
        .into_iter()
        .find(|g| g.get("tty").and_then(Value::as_str) == Some(SBD_TTY))
    else {
        return Ok(Vec::new());
    };
    let group: ConceptGroup = serde_json::from_value(group)?;

    let entries = sequence(group.concept_properties).into_iter().take(limit);
    let entries: Vec<ConceptProperties> = decode_items(entries, "SBD concept");
    let concepts = entries
        .into_iter()
        .filter_map(|c| match c.rxcui {
            Some(rxcui) => Some(Concept {
                rxcui,
                name: c.name.unwrap_or_default(),
            }),
            None => {
                log::warn!("Skipping SBD concept without rxcui: {:?}", c.name);
                None
            }
        })
        .collect();

    Ok(concepts)
}

// ============================================================================
// historystatus.json
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDocument {
    rxcui_status_history: Option<StatusHistory>,
}

#[derive(Debug, Deserialize)]
struct StatusHistory {
    attributes: Option<Attributes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Attributes {
    ingredient_and_strength: Option<OneOrMany<Value>>,
    dose_form_group_concept: Option<OneOrMany<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ingredient {
    base_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoseFormGroup {
    dose_form_group_name: Option<String>,
}

/// Extract ingredient base names and dose form group names.
///
/// A document without `rxcuiStatusHistory.attributes` yields empty lists.
pub fn history_attributes(doc: Value) -> Result<HistoryAttributes, serde_json::Error> {
    let doc: HistoryDocument = serde_json::from_value(doc)?;

    let Some(attributes) = doc.rxcui_status_history.and_then(|h| h.attributes) else {
        return Ok(HistoryAttributes::default());
    };

    let ingredients: Vec<Ingredient> =
        decode_items(sequence(attributes.ingredient_and_strength), "ingredient");
    let dose_forms: Vec<DoseFormGroup> =
        decode_items(sequence(attributes.dose_form_group_concept), "dose form group");

    let base_names = ingredients.into_iter().filter_map(|i| i.base_name);
    let dose_form_group_names = dose_forms.into_iter().filter_map(|d| d.dose_form_group_name);

    Ok(HistoryAttributes {
        base_names: dedup_ordered(base_names),
        dose_form_group_names: dedup_ordered(dose_form_group_names),
    })
}

// ============================================================================
// status.json / properties.json
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusDocument {
    rxcui_status: Option<RxcuiStatus>,
}

#[derive(Debug, Deserialize)]
struct RxcuiStatus {
    status: Option<String>,
}

/// `rxcuiStatus.status`, if present
pub fn concept_status(doc: Value) -> Result<Option<String>, serde_json::Error> {
    let doc: StatusDocument = serde_json::from_value(doc)?;
    Ok(doc.rxcui_status.and_then(|s| s.status))
}

/// Whether a concept status marks the RXCUI as usable
pub fn is_valid_status(status: Option<&str>) -> bool {
    status.is_some_and(|s| VALID_STATUSES.contains(&s))
}

#[derive(Debug, Deserialize)]
struct PropertiesDocument {
    properties: Option<ConceptPropertiesDetail>,
}

/// `properties` object of `properties.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptPropertiesDetail {
    pub name: Option<String>,
    pub suppress: Option<String>,
}

impl ConceptPropertiesDetail {
    /// A concept is unsuppressed only when `suppress` is explicitly "N"
    pub fn is_unsuppressed(&self) -> bool {
        self.suppress.as_deref() == Some("N")
    }
}

/// The `properties` object, if the document carries one
pub fn concept_properties(doc: Value) -> Result<Option<ConceptPropertiesDetail>, serde_json::Error> {
    let doc: PropertiesDocument = serde_json::from_value(doc)?;
    Ok(doc.properties)
}
