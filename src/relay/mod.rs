use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod client;
pub mod handlers;
pub mod payload;

pub use client::ModelClient;

/// Model-service relay routes, mounted under `/api/v1`. The health probe is
/// public; everything else requires a session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/rag/ask", post(handlers::rag_ask))
        .route("/rag/retrieve", post(handlers::rag_retrieve))
        .route(
            "/score/financial-health",
            post(handlers::financial_health_score),
        )
        .route("/analytics/net-worth", post(handlers::net_worth))
        .route(
            "/analytics/goal-feasibility",
            post(handlers::goal_feasibility),
        )
        .route(
            "/analytics/portfolio-alignment",
            post(handlers::portfolio_alignment),
        )
        .route("/simulate/stress-test", post(handlers::stress_test))
        .route(
            "/user-based-retrieval",
            post(handlers::user_based_retrieval),
        )
}
