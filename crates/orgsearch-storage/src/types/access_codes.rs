//! Access code types.

use chrono::{DateTime, Utc};

use super::{AccessCodeId, UserInfo};

/// One-time access code proving control of an inbox.
#[derive(Clone, Debug)]
pub struct AccessCode {
    pub id: AccessCodeId,
    pub email: String,       // lowercased
    pub code: String,        // 6 uppercase hex characters
    pub user_info: UserInfo, // payload used to provision the user on first verification
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Parameters for storing a freshly issued access code
#[derive(Clone, Debug)]
pub struct CreateAccessCodeParams {
    pub email: String,
    pub code: String,
    pub user_info: UserInfo,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of redeeming the most recent access code for an email.
///
/// Only [`Redemption::Redeemed`] is a success. Callers must not reveal to
/// clients which of the failure variants occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Redemption {
    /// Code matched; it was deleted and the user record exists.
    Redeemed {
        user_info: UserInfo,
        user_created: bool,
    },
    /// No code stored for the email.
    Missing,
    /// Latest code had expired; it was deleted.
    Expired,
    /// Latest code did not match; it was left in place.
    Mismatch,
}
