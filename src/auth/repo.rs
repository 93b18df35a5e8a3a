use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Transient pre-registration record holding an OTP. Rows are retrievable
/// for at most 900 seconds after creation; lookups filter on age and a
/// sweep deletes anything older (stand-in for a database-level TTL index).
#[derive(Debug, Clone, FromRow)]
pub struct TempUser {
    pub id: Uuid,
    pub email: String,
    pub otp_code: String,
    pub otp_expire: OffsetDateTime,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
}

pub const TTL_SECONDS: i64 = 900;

fn is_expired(created_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    now - created_at >= Duration::seconds(TTL_SECONDS)
}

impl TempUser {
    /// Inserts or resets the pending verification for an email. A repeat
    /// request gets a fresh OTP, an unverified flag and a fresh TTL window.
    pub async fn upsert(
        db: &PgPool,
        email: &str,
        otp_code: &str,
        otp_expire: OffsetDateTime,
    ) -> sqlx::Result<TempUser> {
        sqlx::query_as::<_, TempUser>(
            r#"
            INSERT INTO temp_users (email, otp_code, otp_expire, is_verified)
            VALUES ($1, $2, $3, FALSE)
            ON CONFLICT (email) DO UPDATE
            SET otp_code = $2, otp_expire = $3, is_verified = FALSE, created_at = now()
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(otp_code)
        .bind(otp_expire)
        .fetch_one(db)
        .await
    }

    pub async fn find_active_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<TempUser>> {
        Self::sweep_expired(db).await?;
        let found = sqlx::query_as::<_, TempUser>(&format!(
            "SELECT * FROM temp_users WHERE email = $1 \
             AND created_at > now() - interval '{TTL_SECONDS} seconds'"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        // Age is filtered in SQL and re-checked against the app clock.
        Ok(found.filter(|t| !is_expired(t.created_at, OffsetDateTime::now_utc())))
    }

    pub async fn mark_verified(db: &PgPool, email: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE temp_users SET is_verified = TRUE WHERE email = $1")
            .bind(email)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn delete_by_email(db: &PgPool, email: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM temp_users WHERE email = $1")
            .bind(email)
            .execute(db)
            .await?;
        Ok(())
    }

    async fn sweep_expired(db: &PgPool) -> sqlx::Result<()> {
        sqlx::query(&format!(
            "DELETE FROM temp_users WHERE created_at <= now() - interval '{TTL_SECONDS} seconds'"
        ))
        .execute(db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_retrievable_just_inside_the_ttl_window() {
        let now = OffsetDateTime::now_utc();
        assert!(!is_expired(now - Duration::seconds(TTL_SECONDS - 1), now));
        assert!(!is_expired(now, now));
    }

    #[test]
    fn record_expires_at_exactly_900_seconds() {
        let now = OffsetDateTime::now_utc();
        assert!(is_expired(now - Duration::seconds(TTL_SECONDS), now));
        assert!(is_expired(now - Duration::seconds(TTL_SECONDS + 1), now));
    }

    #[test]
    fn unverified_records_expire_the_same_way() {
        let now = OffsetDateTime::now_utc();
        let temp = TempUser {
            id: Uuid::new_v4(),
            email: "pending@example.com".into(),
            otp_code: "123456".into(),
            otp_expire: now + Duration::minutes(10),
            is_verified: false,
            created_at: now - Duration::seconds(TTL_SECONDS + 30),
        };
        assert!(is_expired(temp.created_at, now));
    }
}
