//! In-memory credential store.
//!
//! Suitable for:
//! - Development without a database
//! - Tests of the authentication flow
//!
//! Nothing survives a restart. Use the PostgreSQL store in production.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgsearch_storage::{
    codes_match, AccessCode, AccessCodeId, CreateAccessCodeParams, CredentialStore, Redemption,
    StoreError, User, UserId,
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    next_code_id: i64,
    codes: Vec<AccessCode>, // insertion order == creation order
    users: HashMap<String, User>,
}

/// Credential store held in process memory.
///
/// A single lock guards all state, so redemptions are serialized globally
/// (which subsumes per-email serialization).
pub struct MemoryCredentialStore {
    inner: Mutex<Inner>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_access_code(
        &self,
        params: &CreateAccessCodeParams,
    ) -> Result<AccessCode, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_code_id += 1;
        let code = AccessCode {
            id: AccessCodeId(inner.next_code_id),
            email: params.email.clone(),
            code: params.code.clone(),
            user_info: params.user_info.clone(),
            created_at: Utc::now(),
            expires_at: params.expires_at,
        };
        inner.codes.push(code.clone());
        Ok(code)
    }

    async fn list_access_codes(&self, email: &str) -> Result<Vec<AccessCode>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .codes
            .iter()
            .rev()
            .filter(|c| c.email == email)
            .cloned()
            .collect())
    }

    async fn redeem_access_code(
        &self,
        email: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, StoreError> {
        let mut inner = self.inner.lock().await;

        let Some(pos) = inner.codes.iter().rposition(|c| c.email == email) else {
            return Ok(Redemption::Missing);
        };

        if inner.codes[pos].is_expired(now) {
            inner.codes.remove(pos);
            return Ok(Redemption::Expired);
        }

        if !codes_match(submitted, &inner.codes[pos].code) {
            return Ok(Redemption::Mismatch);
        }

        let code = inner.codes.remove(pos);
        let user_created = !inner.users.contains_key(email);
        if user_created {
            let info = &code.user_info;
            let user = User {
                id: UserId(Uuid::now_v7()),
                email: email.to_string(),
                first_name: info.first_name.clone(),
                last_name: info.last_name.clone(),
                company: info.company.clone(),
                created_at: now,
            };
            inner.users.insert(email.to_string(), user);
        }

        Ok(Redemption::Redeemed {
            user_info: code.user_info,
            user_created,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let inner = self.inner.lock().await;
        inner.users.get(email).cloned().ok_or(StoreError::NotFound)
    }
}
