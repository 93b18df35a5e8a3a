use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod jwt;
mod otp;
pub mod password;
pub mod repo;

/// Auth flows, mounted under `/api/v1/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/verify-email", post(handlers::verify_email))
        .route("/verify-otp", post(handlers::verify_otp))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/me", get(handlers::get_me))
        .route("/forgot-password", post(handlers::forgot_password))
        .route(
            "/forgot-password/verify-otp",
            post(handlers::forgot_password_verify_otp),
        )
        .route("/forgot-password/reset", post(handlers::reset_password))
        .route("/change-password", post(handlers::change_password))
}
