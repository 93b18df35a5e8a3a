use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    extract::{Json, Path},
    finance::{
        dto::{
            CreateAssetRequest, CreateExpenseRequest, CreateFinancialGoalRequest,
            CreateIncomeRequest, CreateInsuranceRequest, CreateLiabilityRequest, UpdateAsset,
            UpdateExpense, UpdateFinancialGoal, UpdateIncome, UpdateInsurance, UpdateLiability,
        },
        repo::{Asset, Expense, FinancialGoal, Income, Insurance, Liability},
    },
    state::AppState,
    users::onboarding,
    users::repo::User,
};

/// Mutations require the record to belong to the session user.
fn ensure_owner(owner: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    if owner == user_id {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(
            "You are not allowed to access this resource".into(),
        ))
    }
}

// ─── Assets ───

#[instrument(skip(state))]
pub async fn list_assets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let assets = Asset::list_by_user(&state.db, user_id).await?;
    Ok(Json(json!({ "success": true, "assets": assets })))
}

#[instrument(skip(state, payload))]
pub async fn create_asset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let new = payload.validate()?;
    let asset = Asset::create(&state.db, user_id, &new).await?;
    User::mark_onboarding_category(&state.db, user_id, onboarding::ASSET).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "asset": asset })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_asset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAsset>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate()?;
    let existing = Asset::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    let asset = Asset::update(&state.db, id, &payload).await?;
    Ok(Json(json!({ "success": true, "asset": asset })))
}

#[instrument(skip(state))]
pub async fn delete_asset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = Asset::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    Asset::delete(&state.db, id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Asset deleted successfully" }),
    ))
}

// ─── Expenses ───

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let expenses = Expense::list_by_user(&state.db, user_id).await?;
    Ok(Json(json!({ "success": true, "expenses": expenses })))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let new = payload.validate()?;
    let expense = Expense::create(&state.db, user_id, &new).await?;
    User::mark_onboarding_category(&state.db, user_id, onboarding::EXPENSE).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "expense": expense })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpense>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate()?;
    let existing = Expense::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    let expense = Expense::update(&state.db, id, &payload).await?;
    Ok(Json(json!({ "success": true, "expense": expense })))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = Expense::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Expense not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    Expense::delete(&state.db, id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Expense deleted successfully" }),
    ))
}

// ─── Incomes ───

#[instrument(skip(state))]
pub async fn list_incomes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let incomes = Income::list_by_user(&state.db, user_id).await?;
    Ok(Json(json!({ "success": true, "incomes": incomes })))
}

#[instrument(skip(state, payload))]
pub async fn create_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let new = payload.validate()?;
    let income = Income::create(&state.db, user_id, &new).await?;
    User::mark_onboarding_category(&state.db, user_id, onboarding::INCOME).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "income": income })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIncome>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate()?;
    let existing = Income::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    let income = Income::update(&state.db, id, &payload).await?;
    Ok(Json(json!({ "success": true, "income": income })))
}

#[instrument(skip(state))]
pub async fn delete_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = Income::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Income not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    Income::delete(&state.db, id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Income deleted successfully" }),
    ))
}

// ─── Liabilities ───

#[instrument(skip(state))]
pub async fn list_liabilities(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let liabilities = Liability::list_by_user(&state.db, user_id).await?;
    Ok(Json(json!({ "success": true, "liabilities": liabilities })))
}

#[instrument(skip(state, payload))]
pub async fn create_liability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateLiabilityRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let new = payload.validate()?;
    let liability = Liability::create(&state.db, user_id, &new).await?;
    User::mark_onboarding_category(&state.db, user_id, onboarding::LIABILITY).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "liability": liability })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_liability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLiability>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate()?;
    let existing = Liability::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Liability not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    let liability = Liability::update(&state.db, id, &payload).await?;
    Ok(Json(json!({ "success": true, "liability": liability })))
}

#[instrument(skip(state))]
pub async fn delete_liability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = Liability::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Liability not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    Liability::delete(&state.db, id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Liability deleted successfully" }),
    ))
}

// ─── Insurances ───

#[instrument(skip(state))]
pub async fn list_insurances(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let insurances = Insurance::list_by_user(&state.db, user_id).await?;
    Ok(Json(json!({ "success": true, "insurances": insurances })))
}

#[instrument(skip(state, payload))]
pub async fn create_insurance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateInsuranceRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let new = payload.validate()?;
    let insurance = Insurance::create(&state.db, user_id, &new).await?;
    User::mark_onboarding_category(&state.db, user_id, onboarding::INSURANCE).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "insurance": insurance })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_insurance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInsurance>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate()?;
    let existing = Insurance::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Insurance not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    let insurance = Insurance::update(&state.db, id, &payload).await?;
    Ok(Json(json!({ "success": true, "insurance": insurance })))
}

#[instrument(skip(state))]
pub async fn delete_insurance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = Insurance::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Insurance not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    Insurance::delete(&state.db, id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Insurance deleted successfully" }),
    ))
}

// ─── Financial goals ───

#[instrument(skip(state))]
pub async fn list_financial_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let goals = FinancialGoal::list_by_user(&state.db, user_id).await?;
    Ok(Json(json!({ "success": true, "financialGoals": goals })))
}

#[instrument(skip(state, payload))]
pub async fn create_financial_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateFinancialGoalRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let new = payload.validate()?;
    let goal = FinancialGoal::create(&state.db, user_id, &new).await?;
    User::mark_onboarding_category(&state.db, user_id, onboarding::FINANCIAL_GOAL).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "financialGoal": goal })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_financial_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFinancialGoal>,
) -> Result<Json<serde_json::Value>, ApiError> {
    payload.validate()?;
    let existing = FinancialGoal::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Financial goal not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    let goal = FinancialGoal::update(&state.db, id, &payload).await?;
    Ok(Json(json!({ "success": true, "financialGoal": goal })))
}

#[instrument(skip(state))]
pub async fn delete_financial_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = FinancialGoal::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Financial goal not found".into()))?;
    ensure_owner(existing.user_id, user_id)?;
    FinancialGoal::delete(&state.db, id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Financial goal deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn another_users_record_is_unauthorized() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let err = ensure_owner(owner, intruder).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "You are not allowed to access this resource"
        );
    }

    #[test]
    fn owner_passes_the_ownership_check() {
        let id = Uuid::new_v4();
        assert!(ensure_owner(id, id).is_ok());
    }
}
