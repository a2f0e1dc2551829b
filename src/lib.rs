pub mod api;
pub mod config;
pub mod frontend;
pub mod metrics;
pub mod registry;

pub use api::{create_router, ApiError, AppState};
pub use config::Settings;
pub use registry::{JsonFileStore, MemoryStore, ModuleRecord, ModuleStore};
