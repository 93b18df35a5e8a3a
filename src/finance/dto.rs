use serde::Deserialize;
use time::Date;

use crate::error::ApiError;

pub const ASSET_TYPES: &[&str] = &["stock", "mutual_fund", "crypto", "fd", "real_estate", "gold"];
pub const LIQUIDITY_LEVELS: &[&str] = &["high", "medium", "low"];
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "housing",
    "transportation",
    "food",
    "utilities",
    "insurance",
    "healthcare",
    "debt",
    "entertainment",
    "rent",
    "emi",
    "other",
];
pub const EXPENSE_TYPES: &[&str] = &["fixed", "variable"];
pub const INCOME_SOURCES: &[&str] = &[
    "salary",
    "freelance",
    "investment",
    "rental",
    "business",
    "other",
];
pub const LIABILITY_TYPES: &[&str] = &["loan", "credit_card", "mortgage", "other"];
pub const INSURANCE_TYPES: &[&str] = &["health", "term", "life", "vehicle", "property", "other"];
pub const GOAL_TYPES: &[&str] = &[
    "house",
    "retirement",
    "car",
    "travel",
    "emergency_fund",
    "education",
    "other",
];
pub const PRIORITY_LEVELS: &[&str] = &["high", "medium", "low"];
pub const GOAL_STATUSES: &[&str] = &["active", "achieved"];

fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

fn check_enum(value: &str, allowed: &[&str], field: &str) -> Result<(), ApiError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "'{value}' is not a valid {field}"
        )))
    }
}

fn check_enum_opt(value: &Option<String>, allowed: &[&str], field: &str) -> Result<(), ApiError> {
    match value {
        Some(v) => check_enum(v, allowed, field),
        None => Ok(()),
    }
}

// ─── Asset ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub current_value: Option<f64>,
    pub invested_amount: Option<f64>,
    pub expected_return_rate: Option<f64>,
    pub liquidity_level: Option<String>,
}

#[derive(Debug)]
pub struct NewAsset {
    pub kind: String,
    pub name: String,
    pub current_value: f64,
    pub invested_amount: f64,
    pub expected_return_rate: f64,
    pub liquidity_level: String,
}

impl CreateAssetRequest {
    pub fn validate(self) -> Result<NewAsset, ApiError> {
        let new = NewAsset {
            kind: require(self.kind, "type")?,
            name: require(self.name, "name")?,
            current_value: require(self.current_value, "currentValue")?,
            invested_amount: require(self.invested_amount, "investedAmount")?,
            expected_return_rate: require(self.expected_return_rate, "expectedReturnRate")?,
            liquidity_level: require(self.liquidity_level, "liquidityLevel")?,
        };
        check_enum(&new.kind, ASSET_TYPES, "asset type")?;
        check_enum(&new.liquidity_level, LIQUIDITY_LEVELS, "liquidity level")?;
        Ok(new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAsset {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub current_value: Option<f64>,
    pub invested_amount: Option<f64>,
    pub expected_return_rate: Option<f64>,
    pub liquidity_level: Option<String>,
}

impl UpdateAsset {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_enum_opt(&self.kind, ASSET_TYPES, "asset type")?;
        check_enum_opt(&self.liquidity_level, LIQUIDITY_LEVELS, "liquidity level")
    }
}

// ─── Expense ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub category: Option<String>,
    pub monthly_amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug)]
pub struct NewExpense {
    pub category: String,
    pub monthly_amount: f64,
    pub kind: String,
}

impl CreateExpenseRequest {
    pub fn validate(self) -> Result<NewExpense, ApiError> {
        let new = NewExpense {
            category: require(self.category, "category")?,
            monthly_amount: require(self.monthly_amount, "monthlyAmount")?,
            kind: require(self.kind, "type")?,
        };
        check_enum(&new.category, EXPENSE_CATEGORIES, "expense category")?;
        check_enum(&new.kind, EXPENSE_TYPES, "expense type")?;
        Ok(new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpense {
    pub category: Option<String>,
    pub monthly_amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl UpdateExpense {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_enum_opt(&self.category, EXPENSE_CATEGORIES, "expense category")?;
        check_enum_opt(&self.kind, EXPENSE_TYPES, "expense type")
    }
}

// ─── Income ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncomeRequest {
    pub source_type: Option<String>,
    pub monthly_amount: Option<f64>,
    pub growth_rate: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug)]
pub struct NewIncome {
    pub source_type: String,
    pub monthly_amount: f64,
    pub growth_rate: f64,
    pub is_active: bool,
}

impl CreateIncomeRequest {
    pub fn validate(self) -> Result<NewIncome, ApiError> {
        let new = NewIncome {
            source_type: require(self.source_type, "sourceType")?,
            monthly_amount: require(self.monthly_amount, "monthlyAmount")?,
            growth_rate: require(self.growth_rate, "growthRate")?,
            is_active: self.is_active.unwrap_or(true),
        };
        check_enum(&new.source_type, INCOME_SOURCES, "income source")?;
        Ok(new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncome {
    pub source_type: Option<String>,
    pub monthly_amount: Option<f64>,
    pub growth_rate: Option<f64>,
    pub is_active: Option<bool>,
}

impl UpdateIncome {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_enum_opt(&self.source_type, INCOME_SOURCES, "income source")
    }
}

// ─── Liability ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLiabilityRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub principal_amount: Option<f64>,
    pub outstanding_amount: Option<f64>,
    pub interest_rate: Option<f64>,
    pub emi_amount: Option<f64>,
    pub tenure_remaining: Option<i32>,
}

#[derive(Debug)]
pub struct NewLiability {
    pub kind: String,
    pub principal_amount: f64,
    pub outstanding_amount: f64,
    pub interest_rate: f64,
    pub emi_amount: f64,
    pub tenure_remaining: i32,
}

impl CreateLiabilityRequest {
    pub fn validate(self) -> Result<NewLiability, ApiError> {
        let new = NewLiability {
            kind: require(self.kind, "type")?,
            principal_amount: require(self.principal_amount, "principalAmount")?,
            outstanding_amount: require(self.outstanding_amount, "outstandingAmount")?,
            interest_rate: require(self.interest_rate, "interestRate")?,
            emi_amount: require(self.emi_amount, "emiAmount")?,
            tenure_remaining: require(self.tenure_remaining, "tenureRemaining")?,
        };
        check_enum(&new.kind, LIABILITY_TYPES, "liability type")?;
        Ok(new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLiability {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub principal_amount: Option<f64>,
    pub outstanding_amount: Option<f64>,
    pub interest_rate: Option<f64>,
    pub emi_amount: Option<f64>,
    pub tenure_remaining: Option<i32>,
}

impl UpdateLiability {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_enum_opt(&self.kind, LIABILITY_TYPES, "liability type")
    }
}

// ─── Insurance ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInsuranceRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub provider: Option<String>,
    pub coverage_amount: Option<f64>,
    pub premium_amount: Option<f64>,
    pub maturity_date: Option<Date>,
}

#[derive(Debug)]
pub struct NewInsurance {
    pub kind: String,
    pub provider: String,
    pub coverage_amount: f64,
    pub premium_amount: f64,
    pub maturity_date: Date,
}

impl CreateInsuranceRequest {
    pub fn validate(self) -> Result<NewInsurance, ApiError> {
        let new = NewInsurance {
            kind: require(self.kind, "type")?,
            provider: require(self.provider, "provider")?,
            coverage_amount: require(self.coverage_amount, "coverageAmount")?,
            premium_amount: require(self.premium_amount, "premiumAmount")?,
            maturity_date: require(self.maturity_date, "maturityDate")?,
        };
        check_enum(&new.kind, INSURANCE_TYPES, "insurance type")?;
        Ok(new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInsurance {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub provider: Option<String>,
    pub coverage_amount: Option<f64>,
    pub premium_amount: Option<f64>,
    pub maturity_date: Option<Date>,
}

impl UpdateInsurance {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_enum_opt(&self.kind, INSURANCE_TYPES, "insurance type")
    }
}

// ─── Financial goal ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinancialGoalRequest {
    pub goal_type: Option<String>,
    pub target_amount: Option<f64>,
    pub target_date: Option<Date>,
    pub priority_level: Option<String>,
    pub inflation_rate: Option<f64>,
    pub current_savings_for_goal: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct NewFinancialGoal {
    pub goal_type: String,
    pub target_amount: f64,
    pub target_date: Date,
    pub priority_level: String,
    pub inflation_rate: f64,
    pub current_savings_for_goal: f64,
    pub status: String,
}

impl CreateFinancialGoalRequest {
    pub fn validate(self) -> Result<NewFinancialGoal, ApiError> {
        let new = NewFinancialGoal {
            goal_type: require(self.goal_type, "goalType")?,
            target_amount: require(self.target_amount, "targetAmount")?,
            target_date: require(self.target_date, "targetDate")?,
            priority_level: require(self.priority_level, "priorityLevel")?,
            inflation_rate: require(self.inflation_rate, "inflationRate")?,
            current_savings_for_goal: require(
                self.current_savings_for_goal,
                "currentSavingsForGoal",
            )?,
            status: require(self.status, "status")?,
        };
        check_enum(&new.goal_type, GOAL_TYPES, "goal type")?;
        check_enum(&new.priority_level, PRIORITY_LEVELS, "priority level")?;
        check_enum(&new.status, GOAL_STATUSES, "goal status")?;
        Ok(new)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFinancialGoal {
    pub goal_type: Option<String>,
    pub target_amount: Option<f64>,
    pub target_date: Option<Date>,
    pub priority_level: Option<String>,
    pub inflation_rate: Option<f64>,
    pub current_savings_for_goal: Option<f64>,
    pub status: Option<String>,
}

impl UpdateFinancialGoal {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_enum_opt(&self.goal_type, GOAL_TYPES, "goal type")?;
        check_enum_opt(&self.priority_level, PRIORITY_LEVELS, "priority level")?;
        check_enum_opt(&self.status, GOAL_STATUSES, "goal status")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn asset_missing_field_is_a_400() {
        let req: CreateAssetRequest = serde_json::from_value(serde_json::json!({
            "type": "stock",
            "name": "NIFTY 50 index fund",
            "currentValue": 250000.0,
            "investedAmount": 200000.0,
            "expectedReturnRate": 12.0
            // liquidityLevel missing
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("liquidityLevel"));
    }

    #[test]
    fn asset_rejects_unknown_enum_value() {
        let req: CreateAssetRequest = serde_json::from_value(serde_json::json!({
            "type": "beanie_babies",
            "name": "collection",
            "currentValue": 10.0,
            "investedAmount": 1000.0,
            "expectedReturnRate": -5.0,
            "liquidityLevel": "low"
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("beanie_babies"));
    }

    #[test]
    fn income_is_active_defaults_to_true() {
        let req: CreateIncomeRequest = serde_json::from_value(serde_json::json!({
            "sourceType": "salary",
            "monthlyAmount": 90000.0,
            "growthRate": 8.0
        }))
        .unwrap();
        let new = req.validate().unwrap();
        assert!(new.is_active);
    }

    #[test]
    fn goal_dates_parse_from_iso_strings() {
        let req: CreateFinancialGoalRequest = serde_json::from_value(serde_json::json!({
            "goalType": "house",
            "targetAmount": 5000000.0,
            "targetDate": "2032-12-31",
            "priorityLevel": "high",
            "inflationRate": 6.0,
            "currentSavingsForGoal": 400000.0,
            "status": "active"
        }))
        .unwrap();
        let new = req.validate().unwrap();
        assert_eq!(new.target_date.to_string(), "2032-12-31");
    }

    #[test]
    fn update_validates_enums_but_allows_partial_bodies() {
        let upd: UpdateExpense =
            serde_json::from_value(serde_json::json!({ "monthlyAmount": 4200.0 })).unwrap();
        assert!(upd.validate().is_ok());

        let upd: UpdateExpense =
            serde_json::from_value(serde_json::json!({ "type": "sometimes" })).unwrap();
        assert!(upd.validate().is_err());
    }
}
