pub mod error;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{Router, routing::get};

use crate::application::query::{DexQuery, EvolutionTypeQuery, ExtinctionLevelQuery, TypesQuery};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/status", get(handlers::status))
        .route("/api/types", get(handlers::lookup::<TypesQuery>))
        .route("/api/dex", get(handlers::lookup::<DexQuery>))
        .route(
            "/api/extinction-levels",
            get(handlers::lookup::<ExtinctionLevelQuery>),
        )
        .route(
            "/api/evolution-types",
            get(handlers::lookup::<EvolutionTypeQuery>),
        )
        .fallback(handlers::fallback)
        .with_state(state)
}
