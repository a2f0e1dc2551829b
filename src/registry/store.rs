use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::models::{ModuleRecord, RegistryConfig};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("module '{0}' not found")]
    NotFound(String),
    #[error("module '{0}' is already installed")]
    AlreadyExists(String),
    #[error("module '{module}' is used by rule '{rule}'")]
    InUse { module: String, rule: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and write access to the installed modules and the rules that use them.
#[async_trait]
pub trait ModuleStore: Send + Sync {
    async fn modules(&self) -> BTreeMap<String, ModuleRecord>;

    async fn used_modules(&self) -> BTreeMap<String, String>;

    async fn get(&self, name: &str) -> Option<ModuleRecord>;

    async fn install(&self, name: &str, record: ModuleRecord) -> Result<(), StoreError>;

    async fn update(&self, name: &str, record: ModuleRecord) -> Result<(), StoreError>;

    /// Removes a module unless a rule still references it.
    async fn remove(&self, name: &str) -> Result<ModuleRecord, StoreError>;
}

fn apply_install(
    config: &mut RegistryConfig,
    name: &str,
    record: ModuleRecord,
) -> Result<(), StoreError> {
    if config.modules.contains_key(name) {
        return Err(StoreError::AlreadyExists(name.to_string()));
    }
    config.modules.insert(name.to_string(), record);
    Ok(())
}

fn apply_update(
    config: &mut RegistryConfig,
    name: &str,
    record: ModuleRecord,
) -> Result<(), StoreError> {
    match config.modules.get_mut(name) {
        Some(existing) => {
            *existing = record;
            Ok(())
        }
        None => Err(StoreError::NotFound(name.to_string())),
    }
}

fn apply_remove(config: &mut RegistryConfig, name: &str) -> Result<ModuleRecord, StoreError> {
    if !config.modules.contains_key(name) {
        return Err(StoreError::NotFound(name.to_string()));
    }
    if let Some(rule) = config.used_modules().remove(name) {
        return Err(StoreError::InUse {
            module: name.to_string(),
            rule,
        });
    }
    config
        .modules
        .remove(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))
}

/// Store backed by a JSON file. Every mutation rewrites the whole file.
pub struct JsonFileStore {
    path: PathBuf,
    config: RwLock<RegistryConfig>,
}

impl JsonFileStore {
    /// Opens the store, treating a missing file as an empty configuration.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let config = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Store file {} does not exist yet, starting empty", path.display());
                RegistryConfig::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        info!(
            "Loaded {} modules and {} rules from {}",
            config.modules.len(),
            config.rules.len(),
            path.display()
        );

        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, config: &RegistryConfig) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let body = serde_json::to_vec_pretty(config).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        // Write next to the target and rename so readers never see a partial file.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        debug!("Persisted store to {}", self.path.display());
        Ok(())
    }

    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut RegistryConfig) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.config.write().await;
        let mut next = guard.clone();
        let out = op(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl ModuleStore for JsonFileStore {
    async fn modules(&self) -> BTreeMap<String, ModuleRecord> {
        self.config.read().await.modules.clone()
    }

    async fn used_modules(&self) -> BTreeMap<String, String> {
        self.config.read().await.used_modules()
    }

    async fn get(&self, name: &str) -> Option<ModuleRecord> {
        self.config.read().await.modules.get(name).cloned()
    }

    async fn install(&self, name: &str, record: ModuleRecord) -> Result<(), StoreError> {
        self.mutate(|config| apply_install(config, name, record)).await
    }

    async fn update(&self, name: &str, record: ModuleRecord) -> Result<(), StoreError> {
        self.mutate(|config| apply_update(config, name, record)).await
    }

    async fn remove(&self, name: &str) -> Result<ModuleRecord, StoreError> {
        self.mutate(|config| apply_remove(config, name)).await
    }
}

/// In-memory store, used by tests and for throwaway instances.
#[derive(Default)]
pub struct MemoryStore {
    config: RwLock<RegistryConfig>,
}

impl MemoryStore {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

#[async_trait]
impl ModuleStore for MemoryStore {
    async fn modules(&self) -> BTreeMap<String, ModuleRecord> {
        self.config.read().await.modules.clone()
    }

    async fn used_modules(&self) -> BTreeMap<String, String> {
        self.config.read().await.used_modules()
    }

    async fn get(&self, name: &str) -> Option<ModuleRecord> {
        self.config.read().await.modules.get(name).cloned()
    }

    async fn install(&self, name: &str, record: ModuleRecord) -> Result<(), StoreError> {
        apply_install(&mut *self.config.write().await, name, record)
    }

    async fn update(&self, name: &str, record: ModuleRecord) -> Result<(), StoreError> {
        apply_update(&mut *self.config.write().await, name, record)
    }

    async fn remove(&self, name: &str) -> Result<ModuleRecord, StoreError> {
        apply_remove(&mut *self.config.write().await, name)
    }
}
