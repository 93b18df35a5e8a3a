use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

/// Per-entity CRUD routes, mounted under `/api/v1/user` by the app router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assets", get(handlers::list_assets))
        .route("/asset", post(handlers::create_asset))
        .route(
            "/asset/:id",
            put(handlers::update_asset).delete(handlers::delete_asset),
        )
        .route("/expenses", get(handlers::list_expenses))
        .route("/expense", post(handlers::create_expense))
        .route(
            "/expense/:id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        .route("/incomes", get(handlers::list_incomes))
        .route("/income", post(handlers::create_income))
        .route(
            "/income/:id",
            put(handlers::update_income).delete(handlers::delete_income),
        )
        .route("/liabilities", get(handlers::list_liabilities))
        .route("/liability", post(handlers::create_liability))
        .route(
            "/liability/:id",
            put(handlers::update_liability).delete(handlers::delete_liability),
        )
        .route("/insurances", get(handlers::list_insurances))
        .route("/insurance", post(handlers::create_insurance))
        .route(
            "/insurance/:id",
            put(handlers::update_insurance).delete(handlers::delete_insurance),
        )
        .route("/financial-goals", get(handlers::list_financial_goals))
        .route("/financial-goal", post(handlers::create_financial_goal))
        .route(
            "/financial-goal/:id",
            put(handlers::update_financial_goal).delete(handlers::delete_financial_goal),
        )
}
