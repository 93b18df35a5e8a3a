use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    extract::Json,
    finance::repo::{
        Asset, Expense, FinancialGoal, FinancialHealthScore, Income, Insurance, Liability,
    },
    relay::payload::{
        AnalyticsAsset, AnalyticsExpense, AnalyticsGoal, AnalyticsIncome, AnalyticsLiability,
        AssetOut, ExpenseOut, FinancialGoalOut, FinancialHealthPayload, GoalFeasibilityPayload,
        IncomeOut, InsuranceOut, LiabilityOut, NetWorthPayload, PortfolioAlignmentPayload,
        RagPayload, ScoreSnapshotOut, StressTestPayload, UserProfileOut, UserRetrievalPayload,
    },
    state::AppState,
    users::repo::User,
};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: Option<String>,
}

impl QueryRequest {
    fn query(self) -> Result<String, ApiError> {
        self.query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("query is required".into()))
    }
}

async fn current_user(state: &AppState, user_id: uuid::Uuid) -> Result<User, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

/// GET /api/v1/health: probes the model service with a short timeout and
/// relays its status body.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let status = state.model.health().await?;
    Ok(Json(status))
}

#[instrument(skip(state, payload))]
pub async fn rag_ask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let query = payload.query()?;
    let user = current_user(&state, user_id).await?;
    let result = state
        .model
        .forward_post(
            "/api/v1/rag/ask",
            &RagPayload {
                query,
                history: user.history,
            },
        )
        .await?;
    Ok(Json(result))
}

#[instrument(skip(state, payload))]
pub async fn rag_retrieve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let query = payload.query()?;
    let user = current_user(&state, user_id).await?;
    let result = state
        .model
        .forward_post(
            "/api/v1/rag/retrieve",
            &RagPayload {
                query,
                history: user.history,
            },
        )
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/score/financial-health: sends the full financial profile to
/// the scoring endpoint and records one score snapshot per successful call.
#[instrument(skip(state))]
pub async fn financial_health_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let (incomes, expenses, assets, liabilities, insurances, goals) = tokio::try_join!(
        Income::list_by_user(&state.db, user_id),
        Expense::list_by_user(&state.db, user_id),
        Asset::list_by_user(&state.db, user_id),
        Liability::list_by_user(&state.db, user_id),
        Insurance::list_by_user(&state.db, user_id),
        FinancialGoal::list_by_user(&state.db, user_id),
    )?;

    let payload = FinancialHealthPayload {
        user: UserProfileOut::from(&user),
        incomes: incomes.iter().map(IncomeOut::from).collect(),
        expenses: expenses.iter().map(ExpenseOut::from).collect(),
        assets: assets.iter().map(AssetOut::from).collect(),
        liabilities: liabilities.iter().map(LiabilityOut::from).collect(),
        insurances: insurances.iter().map(InsuranceOut::from).collect(),
        financial_goals: goals.iter().map(FinancialGoalOut::from).collect(),
    };

    let result = state
        .model
        .forward_post("/api/v1/score/financial-health", &payload)
        .await?;

    match extract_score(&result) {
        Some((score, breakdown)) => {
            FinancialHealthScore::insert(&state.db, user_id, score, breakdown).await?;
        }
        None => warn!(%user_id, "scoring response missing score fields, snapshot skipped"),
    }

    Ok(Json(result))
}

#[instrument(skip(state))]
pub async fn net_worth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let (assets, liabilities) = tokio::try_join!(
        Asset::list_by_user(&state.db, user_id),
        Liability::list_by_user(&state.db, user_id),
    )?;

    let payload = NetWorthPayload {
        user_id: user_id.to_string(),
        assets: assets.iter().map(AnalyticsAsset::from).collect(),
        liabilities: liabilities.iter().map(AnalyticsLiability::from).collect(),
    };
    let result = state
        .model
        .forward_post("/api/v1/analytics/net-worth", &payload)
        .await?;
    Ok(Json(result))
}

#[instrument(skip(state))]
pub async fn goal_feasibility(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let (incomes, expenses, goals) = tokio::try_join!(
        Income::list_by_user(&state.db, user_id),
        Expense::list_by_user(&state.db, user_id),
        FinancialGoal::list_by_user(&state.db, user_id),
    )?;

    let payload = GoalFeasibilityPayload {
        user_id: user_id.to_string(),
        incomes: incomes.iter().map(AnalyticsIncome::from).collect(),
        expenses: expenses.iter().map(AnalyticsExpense::from).collect(),
        financial_goals: goals.iter().map(AnalyticsGoal::from).collect(),
    };
    let result = state
        .model
        .forward_post("/api/v1/analytics/goal-feasibility", &payload)
        .await?;
    Ok(Json(result))
}

#[instrument(skip(state))]
pub async fn portfolio_alignment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let assets = Asset::list_by_user(&state.db, user_id).await?;

    let payload = PortfolioAlignmentPayload {
        user_id: user_id.to_string(),
        risk_profile: user.risk_profile,
        assets: assets.iter().map(AnalyticsAsset::from).collect(),
    };
    let result = state
        .model
        .forward_post("/api/v1/analytics/portfolio-alignment", &payload)
        .await?;
    Ok(Json(result))
}

#[instrument(skip(state))]
pub async fn stress_test(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let (incomes, expenses, assets, liabilities) = tokio::try_join!(
        Income::list_by_user(&state.db, user_id),
        Expense::list_by_user(&state.db, user_id),
        Asset::list_by_user(&state.db, user_id),
        Liability::list_by_user(&state.db, user_id),
    )?;

    let payload = StressTestPayload {
        user_id: user_id.to_string(),
        incomes: incomes.iter().map(AnalyticsIncome::from).collect(),
        expenses: expenses.iter().map(AnalyticsExpense::from).collect(),
        assets: assets.iter().map(AnalyticsAsset::from).collect(),
        liabilities: liabilities.iter().map(AnalyticsLiability::from).collect(),
    };
    let result = state
        .model
        .forward_post("/api/v1/simulate/stress-test", &payload)
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/user-based-retrieval: sends the query together with the whole
/// financial profile and the stored conversation history. When the response
/// carries an updated history blob it is written back to the user so the next
/// call continues the same conversation.
#[instrument(skip(state, payload))]
pub async fn user_based_retrieval(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let query = payload.query()?;
    let user = current_user(&state, user_id).await?;
    let (incomes, expenses, assets, liabilities, insurances, goals, latest_score) = tokio::try_join!(
        Income::list_by_user(&state.db, user_id),
        Expense::list_by_user(&state.db, user_id),
        Asset::list_by_user(&state.db, user_id),
        Liability::list_by_user(&state.db, user_id),
        Insurance::list_by_user(&state.db, user_id),
        FinancialGoal::list_by_user(&state.db, user_id),
        FinancialHealthScore::latest_for_user(&state.db, user_id),
    )?;

    let payload = UserRetrievalPayload {
        query,
        history: user.history.clone(),
        user: UserProfileOut::from(&user),
        income: incomes.iter().map(IncomeOut::from).collect(),
        expense: expenses.iter().map(ExpenseOut::from).collect(),
        asset: assets.iter().map(AssetOut::from).collect(),
        liability: liabilities.iter().map(LiabilityOut::from).collect(),
        financial_goal: goals.iter().map(FinancialGoalOut::from).collect(),
        insurance: insurances.iter().map(InsuranceOut::from).collect(),
        financial_health_score: latest_score.as_ref().map(ScoreSnapshotOut::from),
    };

    let result = state
        .model
        .forward_post("/api/v1/user-based-retrieval/", &payload)
        .await?;

    if let Some(history) = result.get("history").and_then(Value::as_str) {
        User::set_history(&state.db, user_id, history).await?;
    }

    Ok(Json(result))
}

/// Pulls the score and its five-component breakdown out of the scoring
/// response. Returns None when the body does not match the expected shape.
fn extract_score(result: &Value) -> Option<(f64, [f64; 5])> {
    let snapshot = result.get("financial_health_score")?;
    let score = snapshot.get("score")?.as_f64()?;
    let breakdown = snapshot.get("breakdown")?;
    let component = |key: &str| breakdown.get(key).and_then(Value::as_f64);
    Some((
        score,
        [
            component("savings_rate")?,
            component("emergency_fund")?,
            component("debt_ratio")?,
            component("diversification")?,
            component("insurance_coverage")?,
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_score_reads_the_full_breakdown() {
        let body = json!({
            "financial_health_score": {
                "user": "Asha",
                "score": 72,
                "breakdown": {
                    "savings_rate": 20,
                    "emergency_fund": 15,
                    "debt_ratio": 12,
                    "diversification": 10,
                    "insurance_coverage": 15
                }
            }
        });
        let (score, breakdown) = extract_score(&body).unwrap();
        assert_eq!(score, 72.0);
        assert_eq!(breakdown, [20.0, 15.0, 12.0, 10.0, 15.0]);
    }

    #[test]
    fn extract_score_rejects_partial_breakdowns() {
        let body = json!({
            "financial_health_score": {
                "score": 50,
                "breakdown": { "savings_rate": 20 }
            }
        });
        assert!(extract_score(&body).is_none());
    }

    #[test]
    fn extract_score_rejects_unrelated_bodies() {
        assert!(extract_score(&json!({ "status": "ok" })).is_none());
    }

    #[test]
    fn empty_query_is_rejected() {
        let err = QueryRequest {
            query: Some("   ".into()),
        }
        .query()
        .unwrap_err();
        assert_eq!(err.to_string(), "query is required");

        let err = QueryRequest { query: None }.query().unwrap_err();
        assert_eq!(err.to_string(), "query is required");
    }
}
