//! Settings structures for mention-search configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `MENTION_SEARCH__SERVER__PORT`
pub const ENV_PREFIX: &str = "MENTION_SEARCH";

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub collections: CollectionsSettings,
    pub store: StoreSettings,
}

impl Settings {
    /// Load settings from defaults, an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.search.min_query_length == 0 {
            bail!("search.min_query_length must be at least 1");
        }
        if self.search.limit_per_kind == 0 {
            bail!("search.limit_per_kind must be at least 1");
        }
        if self.search.timeout_ms == 0 {
            bail!("search.timeout_ms must be greater than 0");
        }
        self.server
            .bind_address
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("invalid server.bind_address: {}", self.server.bind_address))?;

        for collection in [&self.collections.users, &self.collections.channels] {
            if collection.name.is_empty() || collection.field.is_empty() {
                bail!("collection name and field must not be empty");
            }
        }

        if let StoreSettings::Firestore(ref firestore) = self.store {
            if firestore.project_id.is_empty() {
                bail!("store.project_id is required for the firestore backend");
            }
            url::Url::parse(&firestore.base_url)
                .with_context(|| format!("invalid store.base_url: {}", firestore.base_url))?;
        }

        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported in logs
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "mention-search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Queries shorter than this are answered with an empty result
    pub min_query_length: usize,
    /// Store-level cap per entity kind
    pub limit_per_kind: usize,
    /// Bound on a whole aggregate search in milliseconds
    pub timeout_ms: u64,
    /// What to do when one entity lookup fails
    pub failure_policy: FailurePolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_length: crate::MIN_QUERY_LENGTH,
            limit_per_kind: crate::RESULTS_PER_KIND,
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Handling of a failed per-kind lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failed lookup fails the whole search
    #[default]
    FailFast,
    /// Return the kinds that succeeded and report the ones that did not
    BestEffort,
}

/// Collections searched for each entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsSettings {
    pub users: CollectionConfig,
    pub channels: CollectionConfig,
}

impl Default for CollectionsSettings {
    fn default() -> Self {
        Self {
            users: CollectionConfig::new("users", "username"),
            channels: CollectionConfig::new("channels", "title"),
        }
    }
}

/// A collection and the indexed field matched against
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection name
    pub name: String,
    /// Indexed string field holding the search key
    pub field: String,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }
}

/// Store backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreSettings {
    Memory(MemorySettings),
    Firestore(FirestoreSettings),
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings::Memory(MemorySettings::default())
    }
}

/// In-memory backend settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// YAML or JSON file with the initial collections
    pub seed_file: Option<PathBuf>,
}

/// Firestore backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreSettings {
    /// REST API root
    pub base_url: String,
    /// Google Cloud project id
    pub project_id: String,
    /// Database id
    pub database: String,
    /// OAuth2 bearer token
    pub access_token: Option<String>,
    /// Per-request HTTP timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            access_token: None,
            request_timeout_ms: 5000,
        }
    }
}
