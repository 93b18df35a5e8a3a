//! Outbound payload shapes for the model service.
//!
//! Two naming conventions are in play: the scoring, RAG and retrieval
//! endpoints expect camelCase keys, the analytics/simulation endpoints
//! snake_case. Each convention is that endpoint's external contract, so
//! both are kept exactly as the model service consumes them.

use serde::Serialize;
use time::Date;

use crate::finance::repo::{
    Asset, Expense, FinancialGoal, FinancialHealthScore, Income, Insurance, Liability,
};
use crate::users::repo::User;

// ─── camelCase shapes (score, RAG, user-based retrieval) ───

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileOut {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub marital_status: String,
    pub dependents: i32,
    pub employment_type: String,
    pub annual_income: f64,
    pub risk_profile: String,
}

impl From<&User> for UserProfileOut {
    fn from(u: &User) -> Self {
        Self {
            name: u.name.clone(),
            age: u.age,
            gender: u.gender.clone(),
            address: u.address.clone(),
            city: u.city.clone(),
            state: u.state.clone(),
            zip: u.zip.clone(),
            country: u.country.clone(),
            marital_status: u.marital_status.clone(),
            dependents: u.dependents,
            employment_type: u.employment_type.clone(),
            annual_income: u.annual_income,
            risk_profile: u.risk_profile.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeOut {
    pub source_type: String,
    pub monthly_amount: f64,
    pub growth_rate: f64,
    pub is_active: bool,
}

impl From<&Income> for IncomeOut {
    fn from(i: &Income) -> Self {
        Self {
            source_type: i.source_type.clone(),
            monthly_amount: i.monthly_amount,
            growth_rate: i.growth_rate,
            is_active: i.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseOut {
    pub category: String,
    pub monthly_amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Expense> for ExpenseOut {
    fn from(e: &Expense) -> Self {
        Self {
            category: e.category.clone(),
            monthly_amount: e.monthly_amount,
            kind: e.kind.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOut {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub current_value: f64,
    pub invested_amount: f64,
    pub expected_return_rate: f64,
    pub liquidity_level: String,
}

impl From<&Asset> for AssetOut {
    fn from(a: &Asset) -> Self {
        Self {
            kind: a.kind.clone(),
            name: a.name.clone(),
            current_value: a.current_value,
            invested_amount: a.invested_amount,
            expected_return_rate: a.expected_return_rate,
            liquidity_level: a.liquidity_level.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityOut {
    #[serde(rename = "type")]
    pub kind: String,
    pub principal_amount: f64,
    pub outstanding_amount: f64,
    pub interest_rate: f64,
    pub emi_amount: f64,
    pub tenure_remaining: i32,
}

impl From<&Liability> for LiabilityOut {
    fn from(l: &Liability) -> Self {
        Self {
            kind: l.kind.clone(),
            principal_amount: l.principal_amount,
            outstanding_amount: l.outstanding_amount,
            interest_rate: l.interest_rate,
            emi_amount: l.emi_amount,
            tenure_remaining: l.tenure_remaining,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceOut {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub coverage_amount: f64,
    pub premium_amount: f64,
    pub maturity_date: Date,
}

impl From<&Insurance> for InsuranceOut {
    fn from(i: &Insurance) -> Self {
        Self {
            kind: i.kind.clone(),
            provider: i.provider.clone(),
            coverage_amount: i.coverage_amount,
            premium_amount: i.premium_amount,
            maturity_date: i.maturity_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoalOut {
    pub goal_type: String,
    pub target_amount: f64,
    pub target_date: Date,
    pub priority_level: String,
    pub inflation_rate: f64,
    pub current_savings_for_goal: f64,
    pub status: String,
}

impl From<&FinancialGoal> for FinancialGoalOut {
    fn from(g: &FinancialGoal) -> Self {
        Self {
            goal_type: g.goal_type.clone(),
            target_amount: g.target_amount,
            target_date: g.target_date,
            priority_level: g.priority_level.clone(),
            inflation_rate: g.inflation_rate,
            current_savings_for_goal: g.current_savings_for_goal,
            status: g.status.clone(),
        }
    }
}

/// Payload for POST /api/v1/score/financial-health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHealthPayload {
    pub user: UserProfileOut,
    pub incomes: Vec<IncomeOut>,
    pub expenses: Vec<ExpenseOut>,
    pub assets: Vec<AssetOut>,
    pub liabilities: Vec<LiabilityOut>,
    pub insurances: Vec<InsuranceOut>,
    pub financial_goals: Vec<FinancialGoalOut>,
}

/// Payload for the RAG ask/retrieve endpoints.
#[derive(Debug, Serialize)]
pub struct RagPayload {
    pub query: String,
    pub history: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshotOut {
    pub score: f64,
    pub breakdown: serde_json::Value,
}

impl From<&FinancialHealthScore> for ScoreSnapshotOut {
    fn from(s: &FinancialHealthScore) -> Self {
        Self {
            score: s.score,
            breakdown: serde_json::json!({
                "savings_rate": s.savings_rate,
                "emergency_fund": s.emergency_fund,
                "debt_ratio": s.debt_ratio,
                "diversification": s.diversification,
                "insurance_coverage": s.insurance_coverage,
            }),
        }
    }
}

/// Payload for POST /api/v1/user-based-retrieval/: the query plus the full
/// financial profile and the stored conversational history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRetrievalPayload {
    pub query: String,
    pub history: Option<String>,
    pub user: UserProfileOut,
    pub income: Vec<IncomeOut>,
    pub expense: Vec<ExpenseOut>,
    pub asset: Vec<AssetOut>,
    pub liability: Vec<LiabilityOut>,
    pub financial_goal: Vec<FinancialGoalOut>,
    pub insurance: Vec<InsuranceOut>,
    pub financial_health_score: Option<ScoreSnapshotOut>,
}

// ─── snake_case shapes (analytics, simulation) ───

#[derive(Debug, Serialize)]
pub struct AnalyticsAsset {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub current_value: f64,
    pub invested_amount: f64,
    pub expected_return_rate: f64,
    pub liquidity_level: String,
}

impl From<&Asset> for AnalyticsAsset {
    fn from(a: &Asset) -> Self {
        Self {
            kind: a.kind.clone(),
            name: a.name.clone(),
            current_value: a.current_value,
            invested_amount: a.invested_amount,
            expected_return_rate: a.expected_return_rate,
            liquidity_level: a.liquidity_level.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsLiability {
    #[serde(rename = "type")]
    pub kind: String,
    pub principal_amount: f64,
    pub outstanding_amount: f64,
    pub interest_rate: f64,
    pub emi_amount: f64,
    pub tenure_remaining: i32,
}

impl From<&Liability> for AnalyticsLiability {
    fn from(l: &Liability) -> Self {
        Self {
            kind: l.kind.clone(),
            principal_amount: l.principal_amount,
            outstanding_amount: l.outstanding_amount,
            interest_rate: l.interest_rate,
            emi_amount: l.emi_amount,
            tenure_remaining: l.tenure_remaining,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsIncome {
    pub source_type: String,
    pub monthly_amount: f64,
    pub growth_rate: f64,
    pub is_active: bool,
}

impl From<&Income> for AnalyticsIncome {
    fn from(i: &Income) -> Self {
        Self {
            source_type: i.source_type.clone(),
            monthly_amount: i.monthly_amount,
            growth_rate: i.growth_rate,
            is_active: i.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsExpense {
    pub category: String,
    pub monthly_amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Expense> for AnalyticsExpense {
    fn from(e: &Expense) -> Self {
        Self {
            category: e.category.clone(),
            monthly_amount: e.monthly_amount,
            kind: e.kind.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsGoal {
    pub goal_type: String,
    pub target_amount: f64,
    pub target_date: Date,
    pub priority_level: String,
    pub inflation_rate: f64,
    pub current_savings_for_goal: f64,
    pub status: String,
}

impl From<&FinancialGoal> for AnalyticsGoal {
    fn from(g: &FinancialGoal) -> Self {
        Self {
            goal_type: g.goal_type.clone(),
            target_amount: g.target_amount,
            target_date: g.target_date,
            priority_level: g.priority_level.clone(),
            inflation_rate: g.inflation_rate,
            current_savings_for_goal: g.current_savings_for_goal,
            status: g.status.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NetWorthPayload {
    pub user_id: String,
    pub assets: Vec<AnalyticsAsset>,
    pub liabilities: Vec<AnalyticsLiability>,
}

#[derive(Debug, Serialize)]
pub struct GoalFeasibilityPayload {
    pub user_id: String,
    pub incomes: Vec<AnalyticsIncome>,
    pub expenses: Vec<AnalyticsExpense>,
    pub financial_goals: Vec<AnalyticsGoal>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioAlignmentPayload {
    pub user_id: String,
    pub risk_profile: String,
    pub assets: Vec<AnalyticsAsset>,
}

#[derive(Debug, Serialize)]
pub struct StressTestPayload {
    pub user_id: String,
    pub incomes: Vec<AnalyticsIncome>,
    pub expenses: Vec<AnalyticsExpense>,
    pub assets: Vec<AnalyticsAsset>,
    pub liabilities: Vec<AnalyticsLiability>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn sample_asset() -> Asset {
        Asset {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "mutual_fund".into(),
            name: "index fund".into(),
            current_value: 250_000.0,
            invested_amount: 200_000.0,
            expected_return_rate: 12.0,
            liquidity_level: "high".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn scoring_items_serialize_camel_case() {
        let out = AssetOut::from(&sample_asset());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], "mutual_fund");
        assert!(json.get("currentValue").is_some());
        assert!(json.get("liquidityLevel").is_some());
        assert!(json.get("current_value").is_none());
    }

    #[test]
    fn analytics_items_serialize_snake_case() {
        let out = AnalyticsAsset::from(&sample_asset());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["type"], "mutual_fund");
        assert!(json.get("current_value").is_some());
        assert!(json.get("liquidity_level").is_some());
        assert!(json.get("currentValue").is_none());
    }

    #[test]
    fn score_payload_uses_camel_case_top_level_keys() {
        let payload = FinancialHealthPayload {
            user: UserProfileOut {
                name: "Asha".into(),
                age: 31,
                gender: "female".into(),
                address: "12 MG Road".into(),
                city: "Pune".into(),
                state: "MH".into(),
                zip: "411001".into(),
                country: "India".into(),
                marital_status: "single".into(),
                dependents: 0,
                employment_type: "salaried".into(),
                annual_income: 1_200_000.0,
                risk_profile: "moderate".into(),
            },
            incomes: vec![],
            expenses: vec![],
            assets: vec![],
            liabilities: vec![],
            insurances: vec![],
            financial_goals: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("financialGoals").is_some());
        assert!(json.get("financial_goals").is_none());
        assert!(json["user"].get("maritalStatus").is_some());
    }

    #[test]
    fn net_worth_payload_keeps_snake_case_user_id() {
        let payload = NetWorthPayload {
            user_id: "abc".into(),
            assets: vec![],
            liabilities: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("user_id").is_some());
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn retrieval_payload_carries_history_and_score() {
        let score = FinancialHealthScore {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            score: 72.0,
            savings_rate: 20.0,
            emergency_fund: 15.0,
            debt_ratio: 12.0,
            diversification: 10.0,
            insurance_coverage: 15.0,
            created_at: OffsetDateTime::now_utc(),
        };
        let out = ScoreSnapshotOut::from(&score);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["score"], 72.0);
        assert_eq!(json["breakdown"]["savings_rate"], 20.0);
    }
}
