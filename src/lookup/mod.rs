//! Drug lookup service
//!
//! Orchestrates terminology calls, normalizes their documents and caches the
//! results. Every upstream problem degrades to an empty, false or absent
//! result; nothing here returns an error.

pub mod normalize;

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, Computed, DEFAULT_TTL, cache_key, remember};
use crate::client::TerminologyApi;
use crate::config::{Config, ValidationRule};
use crate::models::{DrugSummary, HistoryAttributes};

/// Maximum number of SBD concepts returned (and enriched) per search
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Name used for drugs whose properties carry no name
pub const UNKNOWN_DRUG_NAME: &str = "Unknown";

// Cache namespaces, one per cached operation
const SEARCH_OP: &str = "search_drugs";
const HISTORY_OP: &str = "rxcui_history_status";
const VALIDATE_STATUS_OP: &str = "validate_rxcui";
const VALIDATE_SUPPRESS_OP: &str = "validate_rxcui_suppress";

/// Tunables for `LookupService`
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Lifetime of each cached result
    pub ttl: Duration,
    /// Rule applied by `validate_rxcui`
    pub validation: ValidationRule,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            validation: ValidationRule::Status,
        }
    }
}

impl From<&Config> for LookupOptions {
    fn from(config: &Config) -> Self {
        Self {
            ttl: config.cache_ttl(),
            validation: config.validation,
        }
    }
}

/// Cached, normalizing front for any `TerminologyApi`.
pub struct LookupService<C: TerminologyApi> {
    client: Arc<C>,
    cache: Arc<dyn Cache>,
    options: LookupOptions,
}

impl<C: TerminologyApi> LookupService<C> {
    pub fn new(client: Arc<C>, cache: Arc<dyn Cache>, options: LookupOptions) -> Self {
        Self {
            client,
            cache,
            options,
        }
    }

    /// Search branded drugs by name.
    ///
    /// Returns at most `MAX_SEARCH_RESULTS` summaries in upstream order, each
    /// enriched with its history attributes. The name is used verbatim as the
    /// cache key. A failed search, or one with a failed enrichment, is not
    /// cached; a successful empty search is.
    pub async fn search_drugs(&self, name: &str) -> Vec<DrugSummary> {
        let key = cache_key(SEARCH_OP, name);

        remember(self.cache.as_ref(), &key, SEARCH_OP, self.options.ttl, || async {
            let doc = match self.client.fetch_drugs_by_name(name).await {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("search_drugs({:?}) degraded: {}", name, e);
                    return Computed::Degraded(Vec::new());
                }
            };

            let concepts = match normalize::sbd_concepts(doc, MAX_SEARCH_RESULTS) {
                Ok(concepts) => concepts,
                Err(e) => {
                    log::error!("search_drugs({:?}) unexpected document: {}", name, e);
                    return Computed::Degraded(Vec::new());
                }
            };

            let mut degraded = false;
            let mut results = Vec::with_capacity(concepts.len());
            for concept in concepts {
                let history = self.history(&concept.rxcui).await;
                degraded |= history.is_degraded();
                results.push(DrugSummary::new(
                    concept.rxcui,
                    concept.name,
                    history.into_inner(),
                ));
            }

            if degraded {
                Computed::Degraded(results)
            } else {
                Computed::Fresh(results)
            }
        })
        .await
        .into_inner()
    }

    /// Ingredient base names and dose form groups for an RXCUI.
    ///
    /// Never fails: upstream problems yield empty lists, which are not cached.
    pub async fn rxcui_history_status(&self, rxcui: &str) -> HistoryAttributes {
        self.history(rxcui).await.into_inner()
    }

    async fn history(&self, rxcui: &str) -> Computed<HistoryAttributes> {
        let key = cache_key(HISTORY_OP, rxcui);

        remember(self.cache.as_ref(), &key, HISTORY_OP, self.options.ttl, || async {
            let doc = match self.client.fetch_history_status(rxcui).await {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("rxcui_history_status({:?}) degraded: {}", rxcui, e);
                    return Computed::Degraded(HistoryAttributes::default());
                }
            };

            match normalize::history_attributes(doc) {
                Ok(history) => Computed::Fresh(history),
                Err(e) => {
                    log::error!("rxcui_history_status({:?}) unexpected document: {}", rxcui, e);
                    Computed::Degraded(HistoryAttributes::default())
                }
            }
        })
        .await
    }

    /// Whether an RXCUI names a usable concept, per the configured rule.
    pub async fn validate_rxcui(&self, rxcui: &str) -> bool {
        match self.options.validation {
            ValidationRule::Status => self.validate_by_status(rxcui).await,
            ValidationRule::Suppress => self.validate_by_suppress(rxcui).await,
        }
    }

    /// Valid iff `status.json` reports Active or Remapped
    async fn validate_by_status(&self, rxcui: &str) -> bool {
        let key = cache_key(VALIDATE_STATUS_OP, rxcui);

        remember(self.cache.as_ref(), &key, VALIDATE_STATUS_OP, self.options.ttl, || async {
            let doc = match self.client.fetch_status(rxcui).await {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("validate_rxcui({:?}) degraded: {}", rxcui, e);
                    return Computed::Degraded(false);
                }
            };

            match normalize::concept_status(doc) {
                Ok(status) => {
                    log::debug!("rxcui {} status {:?}", rxcui, status);
                    Computed::Fresh(normalize::is_valid_status(status.as_deref()))
                }
                Err(e) => {
                    log::error!("validate_rxcui({:?}) unexpected document: {}", rxcui, e);
                    Computed::Degraded(false)
                }
            }
        })
        .await
        .into_inner()
    }

    /// Valid iff `properties.json` reports suppress = N
    async fn validate_by_suppress(&self, rxcui: &str) -> bool {
        let key = cache_key(VALIDATE_SUPPRESS_OP, rxcui);

        remember(self.cache.as_ref(), &key, VALIDATE_SUPPRESS_OP, self.options.ttl, || async {
            let doc = match self.client.fetch_properties(rxcui).await {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("validate_rxcui({:?}) degraded: {}", rxcui, e);
                    return Computed::Degraded(false);
                }
            };

            match normalize::concept_properties(doc) {
                Ok(props) => Computed::Fresh(props.is_some_and(|p| p.is_unsuppressed())),
                Err(e) => {
                    log::error!("validate_rxcui({:?}) unexpected document: {}", rxcui, e);
                    Computed::Degraded(false)
                }
            }
        })
        .await
        .into_inner()
    }

    /// Name and history attributes for one RXCUI.
    ///
    /// Not cached itself; the history sub-lookup is. `None` when properties
    /// cannot be fetched or the document has no `properties` object.
    pub async fn drug_details(&self, rxcui: &str) -> Option<DrugSummary> {
        let doc = match self.client.fetch_properties(rxcui).await {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("drug_details({:?}) unavailable: {}", rxcui, e);
                return None;
            }
        };

        let properties = match normalize::concept_properties(doc) {
            Ok(Some(properties)) => properties,
            Ok(None) => {
                log::warn!("drug_details({:?}): no properties in response", rxcui);
                return None;
            }
            Err(e) => {
                log::error!("drug_details({:?}) unexpected document: {}", rxcui, e);
                return None;
            }
        };

        let name = properties
            .name
            .unwrap_or_else(|| UNKNOWN_DRUG_NAME.to_string());
        let history = self.rxcui_history_status(rxcui).await;

        Some(DrugSummary::new(rxcui, name, history))
    }
}
