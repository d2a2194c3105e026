//! The store traits that backends implement.

use chrono::{DateTime, Utc};

use crate::types::*;
use crate::StoreError;

/// Persistence for access codes and registered users.
///
/// Emails passed in are expected to be normalized already
/// (see [`crate::normalize_email`]).
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    // ───────────────────────────────────── Access codes ───────────────────────────────────

    /// Store a new access code. Earlier codes for the same email are kept.
    async fn create_access_code(
        &self,
        params: &CreateAccessCodeParams,
    ) -> Result<AccessCode, StoreError>;

    /// All stored codes for an email, newest first.
    async fn list_access_codes(&self, email: &str) -> Result<Vec<AccessCode>, StoreError>;

    /// Atomically check the most recent code for `email` against `submitted`.
    ///
    /// Expired codes are deleted. A matching code is deleted and the user is
    /// created from its payload when no user with that email exists yet.
    /// Concurrent redemptions for the same email are serialized.
    async fn redeem_access_code(
        &self,
        email: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, StoreError>;

    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;
}

/// Read-only access to the organization registry.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait OrganizationStore: Send + Sync {
    /// One page of matches plus the total match count, read from one snapshot.
    async fn search_organizations(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchPage, StoreError>;

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization, StoreError>;

    async fn count_organizations(&self) -> Result<i64, StoreError>;

    /// Non-null values of `dimension` with their counts, largest first.
    async fn count_by(
        &self,
        dimension: StatDimension,
        limit: i64,
    ) -> Result<Vec<GroupCount>, StoreError>;
}
