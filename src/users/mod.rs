use axum::{
    routing::{get, patch},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod onboarding;
pub mod repo;

/// Profile and onboarding routes, mounted under `/api/v1/user`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route(
            "/onboarding-status/:email",
            get(handlers::onboarding_status),
        )
        .route("/onboarding-step", patch(handlers::mark_onboarding_step))
        .route(
            "/financial-health-score",
            get(handlers::get_financial_health_score),
        )
}
