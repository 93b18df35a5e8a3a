use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::dto::UpdateProfileRequest;

/// User record in the database. The password hash and conversational
/// history blob are never exposed in JSON. Serialized camelCase to match
/// the client-facing API contract.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub phone: String,
    pub is_verified: bool,
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
    pub onboarding: serde_json::Value,
    #[serde(skip_serializing)]
    pub history: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields required to create a user; the hash is produced by the caller.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
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

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, new: &NewUser) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                name, email, password_hash, phone, age, gender, address, city,
                state, zip, country, marital_status, dependents,
                employment_type, annual_income, risk_profile, is_verified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, TRUE)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.phone)
        .bind(new.age)
        .bind(&new.gender)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip)
        .bind(&new.country)
        .bind(&new.marital_status)
        .bind(new.dependents)
        .bind(&new.employment_type)
        .bind(new.annual_income)
        .bind(&new.risk_profile)
        .fetch_one(db)
        .await
    }

    /// Partial profile update; email and password stay untouched here.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name            = COALESCE($2, name),
                phone           = COALESCE($3, phone),
                age             = COALESCE($4, age),
                gender          = COALESCE($5, gender),
                address         = COALESCE($6, address),
                city            = COALESCE($7, city),
                state           = COALESCE($8, state),
                zip             = COALESCE($9, zip),
                country         = COALESCE($10, country),
                marital_status  = COALESCE($11, marital_status),
                dependents      = COALESCE($12, dependents),
                employment_type = COALESCE($13, employment_type),
                annual_income   = COALESCE($14, annual_income),
                risk_profile    = COALESCE($15, risk_profile),
                updated_at      = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(changes.age)
        .bind(&changes.gender)
        .bind(&changes.address)
        .bind(&changes.city)
        .bind(&changes.state)
        .bind(&changes.zip)
        .bind(&changes.country)
        .bind(&changes.marital_status)
        .bind(changes.dependents)
        .bind(&changes.employment_type)
        .bind(changes.annual_income)
        .bind(&changes.risk_profile)
        .fetch_one(db)
        .await
    }

    pub async fn set_password_hash(db: &PgPool, id: Uuid, hash: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Stores the conversational history blob returned by the model service.
    pub async fn set_history(db: &PgPool, id: Uuid, history: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET history = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(history)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Flips one category flag in the embedded onboarding-progress map.
    pub async fn mark_onboarding_category(
        db: &PgPool,
        id: Uuid,
        category: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET onboarding = onboarding || jsonb_build_object($2::text, TRUE),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(category)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_never_serialize() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: "user".into(),
            phone: "9999999999".into(),
            is_verified: true,
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
            onboarding: serde_json::json!({ "asset": true }),
            history: Some("opaque-blob".into()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("opaque-blob"));
        assert!(json.contains("asha@example.com"));
        assert!(json.contains("maritalStatus"));
    }
}
