use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::{auth_middleware, metrics_middleware};
use super::{auth, handlers, pokemons};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything except login requires a session token
    let protected_routes = Router::new()
        .route("/pokemons", get(pokemons::list_pokemons))
        .route("/pokemons/{id}", get(pokemons::get_pokemon))
        .route("/metrics", get(handlers::metrics))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    Router::new()
        .route("/login", post(auth::login))
        .merge(protected_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
