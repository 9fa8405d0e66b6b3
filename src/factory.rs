//! Backend lookup by name.
//!
//! A [`BackendRegistry`] maps lower-cased backend names to constructors. A constructor is
//! only accepted if the client it builds supports every [`Capability`], so a backend that
//! cannot insert (for example) is rejected at registration instead of failing on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::{debug, warn};

use crate::database::{Capability, Database};
use crate::error::DbalError;
use crate::options::ClientOptions;

/// Builds a fresh, connectionless client.
pub type BackendConstructor = fn(ClientOptions) -> Box<dyn Database>;

static DEFAULT_REGISTRY: LazyLock<BackendRegistry> = LazyLock::new(BackendRegistry::with_defaults);

#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    constructors: HashMap<String, BackendConstructor>,
}

impl BackendRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every backend compiled into this build.
    #[must_use]
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "sqlite")]
        registry.insert_unchecked(crate::types::DatabaseType::Sqlite.as_str(), |options| {
            Box::new(crate::sqlite::SqliteClient::new(options))
        });
        #[cfg(feature = "postgres")]
        {
            let postgres: BackendConstructor =
                |options| Box::new(crate::postgres::PostgresClient::new(options));
            registry.insert_unchecked(crate::types::DatabaseType::Postgres.as_str(), postgres);
            registry.insert_unchecked("postgresql", postgres);
        }
        registry
    }

    fn insert_unchecked(&mut self, name: &str, constructor: BackendConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    /// Register `constructor` under `name` (case-insensitive), replacing any previous entry.
    ///
    /// # Errors
    /// `DbalError::ConfigError` for a blank name, `DbalError::InvalidImplementation` when the
    /// constructed client lacks any required capability.
    pub fn register(&mut self, name: &str, constructor: BackendConstructor) -> Result<(), DbalError> {
        let key = normalize(name)?;
        let sample = constructor(ClientOptions::default());
        let supported = sample.capabilities();
        let missing: Vec<&str> = Capability::ALL
            .iter()
            .filter(|cap| !supported.contains(cap))
            .map(|cap| cap.as_str())
            .collect();
        if !missing.is_empty() {
            warn!(backend = %key, missing = ?missing, "rejecting backend registration");
            return Err(DbalError::InvalidImplementation(format!(
                "backend '{key}' does not implement: {}",
                missing.join(", ")
            )));
        }
        debug!(backend = %key, "registered backend");
        self.constructors.insert(key, constructor);
        Ok(())
    }

    /// Build a client for `name` with default options.
    ///
    /// # Errors
    /// See [`BackendRegistry::create_with_options`].
    pub fn create(&self, name: &str) -> Result<Box<dyn Database>, DbalError> {
        self.create_with_options(name, ClientOptions::default())
    }

    /// Build a client for `name`.
    ///
    /// # Errors
    /// `DbalError::ConfigError` for a blank name, `DbalError::BackendNotFound` when nothing is
    /// registered under it.
    pub fn create_with_options(
        &self,
        name: &str,
        options: ClientOptions,
    ) -> Result<Box<dyn Database>, DbalError> {
        let key = normalize(name)?;
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| DbalError::BackendNotFound(name.trim().to_string()))?;
        debug!(backend = %key, "creating database client");
        Ok(constructor(options))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        normalize(name).is_ok_and(|key| self.constructors.contains_key(&key))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize(name: &str) -> Result<String, DbalError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DbalError::ConfigError("backend name is required".to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Build a client for a built-in backend, e.g. `create("sqlite")`.
///
/// # Errors
/// `DbalError::ConfigError` for a blank name, `DbalError::BackendNotFound` for an unknown or
/// disabled backend.
pub fn create(name: &str) -> Result<Box<dyn Database>, DbalError> {
    DEFAULT_REGISTRY.create(name)
}

/// [`create`] with explicit client options.
///
/// # Errors
/// Same as [`create`].
pub fn create_with_options(name: &str, options: ClientOptions) -> Result<Box<dyn Database>, DbalError> {
    DEFAULT_REGISTRY.create_with_options(name, options)
}
