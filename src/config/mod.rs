mod settings;
mod validation;

pub use settings::{ApplicationSettings, AuthSettings, Settings, StoreSettings};
pub use validation::validate_settings;
