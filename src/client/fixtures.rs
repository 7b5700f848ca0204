//! Test fixtures for RxNav response documents
//!
//! Builders produce the JSON shapes the terminology service returns, including
//! its habit of sending a lone object where an array is expected.
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use serde_json::{Value, json};

// ============================================================================
// drugs.json
// ============================================================================

/// Builder for one `conceptGroup` entry.
///
/// # Example
/// ```ignore
/// let group = ConceptGroupBuilder::new("SBD")
///     .concept("123456", "Test Drug 10 MG Oral Tablet")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConceptGroupBuilder {
    tty: String,
    concepts: Vec<Value>,
    omit_properties: bool,
}

impl ConceptGroupBuilder {
    pub fn new(tty: impl Into<String>) -> Self {
        Self {
            tty: tty.into(),
            concepts: Vec::new(),
            omit_properties: false,
        }
    }

    /// Add a concept with the fields RxNav always sends alongside rxcui/name.
    pub fn concept(mut self, rxcui: &str, name: &str) -> Self {
        self.concepts.push(json!({
            "rxcui": rxcui,
            "name": name,
            "synonym": "",
            "tty": self.tty,
            "language": "ENG",
            "suppress": "N",
            "umlscui": ""
        }));
        self
    }

    /// Add `count` concepts with sequential ids starting at `first_rxcui`.
    pub fn concepts(mut self, first_rxcui: u32, count: u32) -> Self {
        for i in 0..count {
            let rxcui = (first_rxcui + i).to_string();
            let name = format!("Drug {} 10 MG Oral Tablet", rxcui);
            self = self.concept(&rxcui, &name);
        }
        self
    }

    /// Emit the group without a `conceptProperties` key.
    pub fn without_properties(mut self) -> Self {
        self.omit_properties = true;
        self
    }

    pub fn build(self) -> Value {
        if self.omit_properties {
            json!({ "tty": self.tty })
        } else {
            json!({ "tty": self.tty, "conceptProperties": self.concepts })
        }
    }
}

/// Wrap concept groups in a `drugs.json` document
pub fn drugs_response(groups: Vec<Value>) -> Value {
    json!({ "drugGroup": { "name": null, "conceptGroup": groups } })
}

// ============================================================================
// historystatus.json
// ============================================================================

/// `historystatus.json` with array-shaped attributes
pub fn history_response(base_names: &[&str], dose_form_group_names: &[&str]) -> Value {
    let ingredients: Vec<Value> = base_names
        .iter()
        .map(|n| json!({ "activeIngredientName": n, "baseName": n, "numeratorValue": "10" }))
        .collect();
    let forms: Vec<Value> = dose_form_group_names
        .iter()
        .map(|n| json!({ "doseFormGroupRxcui": "0", "doseFormGroupName": n }))
        .collect();

    history_with_attributes(json!({
        "ingredientAndStrength": ingredients,
        "doseFormGroupConcept": forms,
    }))
}

/// `historystatus.json` wrapping arbitrary attributes
pub fn history_with_attributes(attributes: Value) -> Value {
    json!({
        "rxcuiStatusHistory": {
            "metaData": { "status": "Active" },
            "attributes": attributes
        }
    })
}

// ============================================================================
// status.json / properties.json
// ============================================================================

pub fn status_response(status: &str) -> Value {
    json!({ "rxcuiStatus": { "status": status, "minConceptGroup": {} } })
}

pub fn properties_response(rxcui: &str, name: &str, suppress: &str) -> Value {
    json!({
        "properties": {
            "rxcui": rxcui,
            "name": name,
            "synonym": "",
            "tty": "SBD",
            "language": "ENG",
            "suppress": suppress,
            "umlscui": ""
        }
    })
}
