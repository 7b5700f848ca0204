//! Command execution context
//!
//! Loads configuration and wires the terminology client, cache backend and
//! lookup service once per invocation.

use std::sync::Arc;

use crate::cache::{Cache, CacheStorage, MemoryCache, NoopCache};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::RxNavClient;
use crate::config::{CacheBackend, Config};
use crate::error::Result;
use crate::lookup::{LookupOptions, LookupService};

/// Context for command execution containing the lookup service and output
/// preference.
pub struct CommandContext {
    /// Cached lookup service over the RxNav client
    pub lookup: LookupService<RxNavClient>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or the HTTP client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let client = Arc::new(RxNavClient::from_config(&config)?);
        let cache = open_cache(&config, opts.no_cache);
        log::debug!(
            "Using {} (timeout {}s, validation {:?})",
            client.base_url(),
            config.timeout_secs,
            config.validation
        );
        let lookup = LookupService::new(client, cache, LookupOptions::from(&config));

        Ok(Self {
            lookup,
            format: opts.format,
        })
    }
}

/// Pick the cache backend. A SQLite cache that cannot be opened is skipped
/// rather than failing the command.
fn open_cache(config: &Config, no_cache: bool) -> Arc<dyn Cache> {
    if no_cache || !config.cache.enabled {
        log::debug!("Response cache disabled");
        return Arc::new(NoopCache);
    }

    match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Sqlite => match CacheStorage::open() {
            Ok(storage) => {
                log::debug!("Response cache at {}", storage.db_path().display());
                Arc::new(storage)
            }
            Err(e) => {
                log::warn!("Cache unavailable, continuing without it: {}", e);
                Arc::new(NoopCache)
            }
        },
    }
}
