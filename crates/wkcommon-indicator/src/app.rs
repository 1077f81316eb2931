//! Application assembly: store, transport and controller wired from config

use crate::{IndicatorConfig, IndicatorError, IndicatorWorker, LookupController};
use std::path::PathBuf;
use std::sync::Arc;
use wkcommon_cache::{CacheError, MemoryKvStore, SqliteKvStore};
use wkcommon_domain::traits::{IndicatorView, KeyValueStore};
use wkcommon_lookup::{ReqwestTransport, Transport};

/// Type-erased key-value store chosen at startup
pub type DynStore = Arc<dyn KeyValueStore<Error = CacheError> + Send + Sync>;

/// Controller as assembled by [`IndicatorApp`]
pub type AppController<V, T = ReqwestTransport> = LookupController<DynStore, T, V>;

/// Where cached verdicts live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite file, persistent across runs
    Sqlite(PathBuf),

    /// Process memory, discarded on exit
    Memory,
}

impl StorageBackend {
    /// Open the store, creating parent directories for a SQLite file
    pub fn open(&self) -> Result<DynStore, IndicatorError> {
        match self {
            StorageBackend::Sqlite(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                tracing::debug!("Opening verdict cache at {}", path.display());
                Ok(Arc::new(SqliteKvStore::new(path)?))
            }
            StorageBackend::Memory => {
                tracing::debug!("Using in-memory verdict cache");
                Ok(Arc::new(MemoryKvStore::new()))
            }
        }
    }
}

/// A fully wired indicator
pub struct IndicatorApp<V, T = ReqwestTransport> {
    controller: Arc<AppController<V, T>>,
}

impl<V: IndicatorView> IndicatorApp<V, ReqwestTransport> {
    /// Build the app with an HTTP transport
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, the store cannot be
    /// opened, or the HTTP client cannot be built.
    pub fn build(
        config: &IndicatorConfig,
        backend: StorageBackend,
        view: V,
    ) -> Result<Self, IndicatorError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(config, backend, transport, view)
    }
}

impl<V: IndicatorView, T: Transport> IndicatorApp<V, T> {
    /// Build the app around a caller-supplied transport
    pub fn with_transport(
        config: &IndicatorConfig,
        backend: StorageBackend,
        transport: T,
        view: V,
    ) -> Result<Self, IndicatorError> {
        config.validate()?;
        let store = backend.open()?;

        tracing::info!(
            endpoint = %config.endpoint,
            namespace = %config.cache_namespace,
            ttl_days = config.cache_ttl_days,
            "Indicator assembled"
        );

        Ok(Self {
            controller: Arc::new(LookupController::from_config(store, transport, view, config)),
        })
    }

    /// The shared controller
    pub fn controller(&self) -> &Arc<AppController<V, T>> {
        &self.controller
    }
}

impl<V, T> IndicatorApp<V, T>
where
    V: IndicatorView + Send + Sync + 'static,
    T: Transport + 'static,
{
    /// A worker driving this app's controller
    pub fn worker(&self) -> IndicatorWorker<DynStore, T, V, wkcommon_domain::SystemClock> {
        IndicatorWorker::new(Arc::clone(&self.controller))
    }
}
