use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;
use crate::frontend::create_static_router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/modules") }))
        .route(
            "/modules",
            get(handlers::list_modules).post(handlers::install_module),
        )
        .route(
            "/modules/edit/:name",
            get(handlers::edit_module_form).post(handlers::edit_module),
        )
        .route("/modules/delete/:name", post(handlers::delete_module))
        .route("/login", get(handlers::login))
        .route("/health", get(handlers::health))
        .merge(create_static_router::<AppState>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
