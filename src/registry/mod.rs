mod models;
mod store;

pub use models::{ModuleRecord, RegistryConfig, Rule};
pub use store::{JsonFileStore, MemoryStore, ModuleStore, StoreError};
