//! RxNav terminology client
//!
//! Four read-only endpoints, each returning the raw decoded JSON document.
//! No schema checks happen at this layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod rxnav;

#[cfg(test)]
pub use mock::MockTerminologyClient;
pub use rxnav::RxNavClient;

/// Result of a single upstream call
pub type FetchResult = std::result::Result<Value, ApiError>;

/// Upstream endpoints consumed by the lookup layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /drugs.json?name={name}`
    Drugs,
    /// `GET /rxcui/{rxcui}/historystatus.json`
    HistoryStatus,
    /// `GET /rxcui/{rxcui}/status.json`
    Status,
    /// `GET /rxcui/{rxcui}/properties.json`
    Properties,
}

impl Endpoint {
    /// Operation name used in diagnostics
    pub fn operation(&self) -> &'static str {
        match self {
            Endpoint::Drugs => "fetch_drugs_by_name",
            Endpoint::HistoryStatus => "fetch_history_status",
            Endpoint::Status => "fetch_status",
            Endpoint::Properties => "fetch_properties",
        }
    }

    /// Request path relative to the base URL
    pub fn path(&self, rxcui: &str) -> String {
        match self {
            Endpoint::Drugs => "/drugs.json".to_string(),
            Endpoint::HistoryStatus => format!("/rxcui/{}/historystatus.json", rxcui),
            Endpoint::Status => format!("/rxcui/{}/status.json", rxcui),
            Endpoint::Properties => format!("/rxcui/{}/properties.json", rxcui),
        }
    }
}

/// Terminology service client trait
///
/// Implementations report every failure (transport, timeout, non-2xx status,
/// undecodable body) as an `ApiError` after logging it; they never panic.
#[async_trait]
pub trait TerminologyApi: Send + Sync {
    /// Search concepts by drug name
    async fn fetch_drugs_by_name(&self, name: &str) -> FetchResult;

    /// Ingredient and dose-form history for one concept
    async fn fetch_history_status(&self, rxcui: &str) -> FetchResult;

    /// Current status (Active, Remapped, Retired, ...) for one concept
    async fn fetch_status(&self, rxcui: &str) -> FetchResult;

    /// Basic properties (name, suppress flag) for one concept
    async fn fetch_properties(&self, rxcui: &str) -> FetchResult;
}
