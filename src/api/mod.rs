pub mod auth;
mod handlers;
mod routes;
mod state;
mod types;
#[cfg(test)]
mod tests;

#[cfg(test)]
mod test_helpers;

pub use routes::create_router;
pub use state::AppState;
pub use types::{ApiError, EditForm, InstallForm, ListingQuery};
