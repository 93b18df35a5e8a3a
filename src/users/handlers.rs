use axum::extract::State;
use serde_json::json;
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    extract::{Json, Path},
    finance::repo::FinancialHealthScore,
    state::AppState,
    users::{
        dto::{OnboardingStepRequest, UpdateProfileRequest},
        onboarding::{self, CategoryPresence},
        repo::User,
    },
};

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(json!({ "success": true, "user": user })))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(risk_profile) = payload.risk_profile.as_deref() {
        if !["conservative", "moderate", "aggressive"].contains(&risk_profile) {
            return Err(ApiError::BadRequest(format!(
                "'{risk_profile}' is not a valid risk profile"
            )));
        }
    }
    let user = User::update_profile(&state.db, user_id, &payload).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// Public endpoint polled by the wizard until the account counts as
/// onboarded. Derived from live record counts, not a stored flag.
#[instrument(skip(state))]
pub async fn onboarding_status(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let presence = CategoryPresence::for_user(&state.db, user.id).await?;
    Ok(Json(json!({
        "success": true,
        "onboarded": presence.is_onboarded(),
        "completedCategories": presence.completed(),
    })))
}

#[instrument(skip(state, payload))]
pub async fn mark_onboarding_step(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<OnboardingStepRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = payload
        .category
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("category is required".into()))?;

    if !onboarding::CATEGORIES.contains(&category.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "'{category}' is not a valid onboarding category"
        )));
    }

    let user = User::mark_onboarding_category(&state.db, user_id, &category).await?;
    Ok(Json(
        json!({ "success": true, "onboarding": user.onboarding }),
    ))
}

#[instrument(skip(state))]
pub async fn get_financial_health_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let score = FinancialHealthScore::latest_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No financial health score found. Generate one first.".into())
        })?;
    Ok(Json(json!({ "success": true, "financialHealthScore": score })))
}
