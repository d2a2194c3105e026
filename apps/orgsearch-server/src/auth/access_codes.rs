//! Access code issuance and verification.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use orgsearch_storage::{
    normalize_email, CreateAccessCodeParams, CredentialStore, Redemption, StoreError, UserInfo,
};

use super::AuthError;
use crate::email::{generate_access_code, EmailContent, EmailError, EmailMessage, Mailer};

/// Issues one-time codes, mails them, and redeems them.
pub struct AccessCodeManager {
    store: Arc<dyn CredentialStore>,
    mailer: Option<Mailer>,
    ttl: Duration,
}

enum Purpose {
    Signup,
    Login,
}

impl AccessCodeManager {
    pub fn new(store: Arc<dyn CredentialStore>, mailer: Option<Mailer>, ttl: Duration) -> Self {
        Self { store, mailer, ttl }
    }

    /// Issue a signup code for `user`. Earlier codes for the email stay stored
    /// but only the newest one is accepted.
    pub async fn issue(&self, mut user: UserInfo) -> Result<String, AuthError> {
        user.email = normalize_email(&user.email);
        self.store_and_send(user, Purpose::Signup).await
    }

    /// Issue a login code for an already registered email.
    pub async fn issue_for_existing_user(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        let user = match self.store.get_user_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(AuthError::UnknownUser),
            Err(e) => return Err(e.into()),
        };
        self.store_and_send(user.info(), Purpose::Login).await
    }

    /// Redeem the newest code for `email`. On success the code is consumed and
    /// the user exists.
    pub async fn verify(&self, email: &str, submitted: &str) -> Result<UserInfo, AuthError> {
        let email = normalize_email(email);
        let submitted = submitted.trim().to_uppercase();

        match self
            .store
            .redeem_access_code(&email, &submitted, Utc::now())
            .await?
        {
            Redemption::Redeemed {
                user_info,
                user_created,
            } => {
                if user_created {
                    tracing::info!(email = %email, "Registered new user");
                }
                Ok(user_info)
            }
            failure => {
                tracing::debug!(email = %email, outcome = ?failure, "Access code rejected");
                Err(AuthError::InvalidCredential)
            }
        }
    }

    async fn store_and_send(&self, user: UserInfo, purpose: Purpose) -> Result<String, AuthError> {
        let code = generate_access_code();
        let ttl = chrono::Duration::seconds(self.ttl.as_secs() as i64);

        self.store
            .create_access_code(&CreateAccessCodeParams {
                email: user.email.clone(),
                code: code.clone(),
                user_info: user.clone(),
                expires_at: Utc::now() + ttl,
            })
            .await?;

        let content = match purpose {
            Purpose::Signup => EmailContent::signup(&user.first_name, &code, self.ttl),
            Purpose::Login => EmailContent::login(&user.first_name, &code, self.ttl),
        };

        let Some(mailer) = &self.mailer else {
            tracing::warn!(email = %user.email, "No email provider configured, access code not sent");
            return Err(AuthError::Delivery(EmailError::ProviderNotAvailable(
                "no email provider configured".to_string(),
            )));
        };

        mailer
            .send(&EmailMessage::new(&user.email, content))
            .await
            .map_err(|e| {
                tracing::error!(email = %user.email, error = %e, "Failed to send access code");
                AuthError::Delivery(e)
            })?;

        tracing::info!(email = %user.email, "Access code sent");
        Ok(code)
    }
}
