use chrono::{DateTime, Utc};
use orgsearch_storage::{
    codes_match, AccessCode, AccessCodeId, CreateAccessCodeParams, CredentialStore, Redemption,
    StoreError, User, UserId, UserInfo,
};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::PostgresStore;

fn access_code_from_row(row: &PgRow) -> Result<AccessCode, StoreError> {
    let user_info: serde_json::Value = row
        .try_get("user_info")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let user_info: UserInfo = serde_json::from_value(user_info)
        .map_err(|e| StoreError::Corrupt(format!("access_codes.user_info: {e}")))?;

    Ok(AccessCode {
        id: AccessCodeId(row.try_get("id").map_err(|e| StoreError::Backend(e.to_string()))?),
        email: row
            .try_get("email")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        code: row
            .try_get("code")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        user_info,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        expires_at: row
            .try_get("expires_at")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
    })
}

#[async_trait::async_trait]
impl CredentialStore for PostgresStore {
    // ───────────────────────────── Access codes ─────────────────────────────

    async fn create_access_code(
        &self,
        params: &CreateAccessCodeParams,
    ) -> Result<AccessCode, StoreError> {
        let user_info = serde_json::to_value(&params.user_info)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let row = sqlx::query(
            "INSERT INTO access_codes(email, code, user_info, expires_at) VALUES($1, $2, $3, $4) \
             RETURNING id, email, code, user_info, created_at, expires_at",
        )
        .bind(&params.email)
        .bind(&params.code)
        .bind(user_info)
        .bind(params.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        access_code_from_row(&row)
    }

    async fn list_access_codes(&self, email: &str) -> Result<Vec<AccessCode>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, email, code, user_info, created_at, expires_at FROM access_codes \
             WHERE email = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.iter().map(access_code_from_row).collect()
    }

    async fn redeem_access_code(
        &self,
        email: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // Serialize redemptions per email, even when no code row exists yet.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let latest = sqlx::query(
            "SELECT id, email, code, user_info, created_at, expires_at FROM access_codes \
             WHERE email = $1 ORDER BY created_at DESC, id DESC LIMIT 1 FOR UPDATE",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        let Some(row) = latest else {
            tx.rollback()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            return Ok(Redemption::Missing);
        };
        let code = access_code_from_row(&row)?;

        if code.is_expired(now) {
            sqlx::query("DELETE FROM access_codes WHERE id = $1")
                .bind(code.id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            tx.commit()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            return Ok(Redemption::Expired);
        }

        if !codes_match(submitted, &code.code) {
            tx.rollback()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            return Ok(Redemption::Mismatch);
        }

        sqlx::query("DELETE FROM access_codes WHERE id = $1")
            .bind(code.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let info = code.user_info;
        let inserted = sqlx::query(
            "INSERT INTO users(id, email, first_name, last_name, company, created_at) \
             VALUES($1, $2, $3, $4, $5, $6) ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::now_v7())
        .bind(email)
        .bind(&info.first_name)
        .bind(&info.last_name)
        .bind(&info.company)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Redemption::Redeemed {
            user_info: info,
            user_created: inserted.rows_affected() == 1,
        })
    }

    // ───────────────────────────── Users ─────────────────────────────

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, first_name, last_name, company, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(|e| StoreError::Backend(e.to_string()))?),
            email: row
                .try_get("email")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
            first_name: row
                .try_get("first_name")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
            last_name: row
                .try_get("last_name")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
            company: row
                .try_get("company")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        })
    }
}
