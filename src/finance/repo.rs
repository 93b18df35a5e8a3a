use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::finance::dto::{
    NewAsset, NewExpense, NewFinancialGoal, NewIncome, NewInsurance, NewLiability, UpdateAsset,
    UpdateExpense, UpdateFinancialGoal, UpdateIncome, UpdateInsurance, UpdateLiability,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub name: String,
    pub current_value: f64,
    pub invested_amount: f64,
    pub expected_return_rate: f64,
    pub liquidity_level: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub monthly_amount: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: Uuid,
    pub user_id: Uuid,
    pub source_type: String,
    pub monthly_amount: f64,
    pub growth_rate: f64,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub principal_amount: f64,
    pub outstanding_amount: f64,
    pub interest_rate: f64,
    pub emi_amount: f64,
    pub tenure_remaining: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub coverage_amount: f64,
    pub premium_amount: f64,
    pub maturity_date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub target_amount: f64,
    pub target_date: Date,
    pub priority_level: String,
    pub inflation_rate: f64,
    pub current_savings_for_goal: f64,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Append-only score snapshot written after each successful scoring call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHealthScore {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: f64,
    pub savings_rate: f64,
    pub emergency_fund: f64,
    pub debt_ratio: f64,
    pub diversification: f64,
    pub insurance_coverage: f64,
    pub created_at: OffsetDateTime,
}

impl Asset {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Asset>> {
        sqlx::query_as("SELECT * FROM assets WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Asset>> {
        sqlx::query_as("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewAsset) -> sqlx::Result<Asset> {
        sqlx::query_as(
            r#"
            INSERT INTO assets (user_id, type, name, current_value, invested_amount,
                                expected_return_rate, liquidity_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.kind)
        .bind(&new.name)
        .bind(new.current_value)
        .bind(new.invested_amount)
        .bind(new.expected_return_rate)
        .bind(&new.liquidity_level)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: Uuid, changes: &UpdateAsset) -> sqlx::Result<Asset> {
        sqlx::query_as(
            r#"
            UPDATE assets SET
                type                 = COALESCE($2, type),
                name                 = COALESCE($3, name),
                current_value        = COALESCE($4, current_value),
                invested_amount      = COALESCE($5, invested_amount),
                expected_return_rate = COALESCE($6, expected_return_rate),
                liquidity_level      = COALESCE($7, liquidity_level),
                updated_at           = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.kind)
        .bind(&changes.name)
        .bind(changes.current_value)
        .bind(changes.invested_amount)
        .bind(changes.expected_return_rate)
        .bind(&changes.liquidity_level)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl Expense {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Expense>> {
        sqlx::query_as("SELECT * FROM expenses WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Expense>> {
        sqlx::query_as("SELECT * FROM expenses WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewExpense) -> sqlx::Result<Expense> {
        sqlx::query_as(
            r#"
            INSERT INTO expenses (user_id, category, monthly_amount, type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.category)
        .bind(new.monthly_amount)
        .bind(&new.kind)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: Uuid, changes: &UpdateExpense) -> sqlx::Result<Expense> {
        sqlx::query_as(
            r#"
            UPDATE expenses SET
                category       = COALESCE($2, category),
                monthly_amount = COALESCE($3, monthly_amount),
                type           = COALESCE($4, type),
                updated_at     = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.category)
        .bind(changes.monthly_amount)
        .bind(&changes.kind)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl Income {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Income>> {
        sqlx::query_as("SELECT * FROM incomes WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Income>> {
        sqlx::query_as("SELECT * FROM incomes WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewIncome) -> sqlx::Result<Income> {
        sqlx::query_as(
            r#"
            INSERT INTO incomes (user_id, source_type, monthly_amount, growth_rate, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.source_type)
        .bind(new.monthly_amount)
        .bind(new.growth_rate)
        .bind(new.is_active)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: Uuid, changes: &UpdateIncome) -> sqlx::Result<Income> {
        sqlx::query_as(
            r#"
            UPDATE incomes SET
                source_type    = COALESCE($2, source_type),
                monthly_amount = COALESCE($3, monthly_amount),
                growth_rate    = COALESCE($4, growth_rate),
                is_active      = COALESCE($5, is_active),
                updated_at     = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.source_type)
        .bind(changes.monthly_amount)
        .bind(changes.growth_rate)
        .bind(changes.is_active)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM incomes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl Liability {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Liability>> {
        sqlx::query_as("SELECT * FROM liabilities WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Liability>> {
        sqlx::query_as("SELECT * FROM liabilities WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewLiability) -> sqlx::Result<Liability> {
        sqlx::query_as(
            r#"
            INSERT INTO liabilities (user_id, type, principal_amount, outstanding_amount,
                                     interest_rate, emi_amount, tenure_remaining)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.kind)
        .bind(new.principal_amount)
        .bind(new.outstanding_amount)
        .bind(new.interest_rate)
        .bind(new.emi_amount)
        .bind(new.tenure_remaining)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: Uuid, changes: &UpdateLiability) -> sqlx::Result<Liability> {
        sqlx::query_as(
            r#"
            UPDATE liabilities SET
                type               = COALESCE($2, type),
                principal_amount   = COALESCE($3, principal_amount),
                outstanding_amount = COALESCE($4, outstanding_amount),
                interest_rate      = COALESCE($5, interest_rate),
                emi_amount         = COALESCE($6, emi_amount),
                tenure_remaining   = COALESCE($7, tenure_remaining),
                updated_at         = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.kind)
        .bind(changes.principal_amount)
        .bind(changes.outstanding_amount)
        .bind(changes.interest_rate)
        .bind(changes.emi_amount)
        .bind(changes.tenure_remaining)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM liabilities WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl Insurance {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Insurance>> {
        sqlx::query_as("SELECT * FROM insurances WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Insurance>> {
        sqlx::query_as("SELECT * FROM insurances WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewInsurance) -> sqlx::Result<Insurance> {
        sqlx::query_as(
            r#"
            INSERT INTO insurances (user_id, type, provider, coverage_amount,
                                    premium_amount, maturity_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.kind)
        .bind(&new.provider)
        .bind(new.coverage_amount)
        .bind(new.premium_amount)
        .bind(new.maturity_date)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: Uuid, changes: &UpdateInsurance) -> sqlx::Result<Insurance> {
        sqlx::query_as(
            r#"
            UPDATE insurances SET
                type            = COALESCE($2, type),
                provider        = COALESCE($3, provider),
                coverage_amount = COALESCE($4, coverage_amount),
                premium_amount  = COALESCE($5, premium_amount),
                maturity_date   = COALESCE($6, maturity_date),
                updated_at      = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.kind)
        .bind(&changes.provider)
        .bind(changes.coverage_amount)
        .bind(changes.premium_amount)
        .bind(changes.maturity_date)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM insurances WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl FinancialGoal {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<FinancialGoal>> {
        sqlx::query_as("SELECT * FROM financial_goals WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<FinancialGoal>> {
        sqlx::query_as("SELECT * FROM financial_goals WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        new: &NewFinancialGoal,
    ) -> sqlx::Result<FinancialGoal> {
        sqlx::query_as(
            r#"
            INSERT INTO financial_goals (user_id, goal_type, target_amount, target_date,
                                         priority_level, inflation_rate,
                                         current_savings_for_goal, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.goal_type)
        .bind(new.target_amount)
        .bind(new.target_date)
        .bind(&new.priority_level)
        .bind(new.inflation_rate)
        .bind(new.current_savings_for_goal)
        .bind(&new.status)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateFinancialGoal,
    ) -> sqlx::Result<FinancialGoal> {
        sqlx::query_as(
            r#"
            UPDATE financial_goals SET
                goal_type                = COALESCE($2, goal_type),
                target_amount            = COALESCE($3, target_amount),
                target_date              = COALESCE($4, target_date),
                priority_level           = COALESCE($5, priority_level),
                inflation_rate           = COALESCE($6, inflation_rate),
                current_savings_for_goal = COALESCE($7, current_savings_for_goal),
                status                   = COALESCE($8, status),
                updated_at               = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.goal_type)
        .bind(changes.target_amount)
        .bind(changes.target_date)
        .bind(&changes.priority_level)
        .bind(changes.inflation_rate)
        .bind(changes.current_savings_for_goal)
        .bind(&changes.status)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM financial_goals WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl FinancialHealthScore {
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        score: f64,
        breakdown: [f64; 5],
    ) -> sqlx::Result<FinancialHealthScore> {
        let [savings_rate, emergency_fund, debt_ratio, diversification, insurance_coverage] =
            breakdown;
        sqlx::query_as(
            r#"
            INSERT INTO financial_health_scores
                (user_id, score, savings_rate, emergency_fund, debt_ratio,
                 diversification, insurance_coverage)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(score)
        .bind(savings_rate)
        .bind(emergency_fund)
        .bind(debt_ratio)
        .bind(diversification)
        .bind(insurance_coverage)
        .fetch_one(db)
        .await
    }

    /// Most recent snapshot for the user, if any.
    pub async fn latest_for_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> sqlx::Result<Option<FinancialHealthScore>> {
        sqlx::query_as(
            r#"
            SELECT * FROM financial_health_scores
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }
}
