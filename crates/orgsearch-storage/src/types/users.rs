//! User types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Registered user record.
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub email: String, // lowercased, unique
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Profile payload used when issuing a login code for this user.
    pub fn info(&self) -> UserInfo {
        UserInfo {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
        }
    }
}

/// Identity payload carried by an access code and embedded in bearer tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}
