//! Common test helpers and utilities for server tests.
//!
//! Organizations come from a `MockOrganizationStore`; access codes and users
//! live in the in-memory credential store, and outgoing mail is captured in an
//! [`Outbox`] instead of being sent.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use orgsearch_storage::{
    CredentialStore, MockOrganizationStore, Organization, OrganizationId, UserInfo,
};
use orgsearch_store_memory::MemoryCredentialStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::auth::{AccessCodeManager, TokenIssuer};
use crate::email::{EmailError, EmailMessage, EmailProvider, Mailer};
use crate::handlers::AuthenticatedUser;
use crate::server::AppState;

pub const TEST_SECRET: &[u8] = b"orgsearch-test-secret-0123456789abcdef";

/// Captures every message instead of delivering it.
#[derive(Default)]
pub struct Outbox {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl EmailProvider for Outbox {
    async fn send(
        &self,
        message: &EmailMessage,
        _from_address: &str,
        _from_name: Option<&str>,
    ) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

impl Outbox {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

pub struct TestApp {
    pub state: AppState,
    pub credentials: Arc<MemoryCredentialStore>,
    pub outbox: Arc<Outbox>,
    pub ready_tx: watch::Sender<bool>,
}

impl TestApp {
    /// Most recent access code stored for `email`.
    pub async fn latest_code(&self, email: &str) -> String {
        let codes = self.credentials.list_access_codes(email).await.unwrap();
        codes.first().expect("no access code stored").code.clone()
    }

    /// A valid bearer token for `user`.
    pub fn token_for(&self, user: &UserInfo) -> String {
        self.state.tokens.issue(user).unwrap().token
    }

    /// Extractor output for a request carrying a valid token for `user`.
    pub fn authenticated(&self, user: &UserInfo) -> AuthenticatedUser {
        let claims = self.state.tokens.validate(&self.token_for(user)).unwrap();
        AuthenticatedUser(claims)
    }
}

/// Test helper: Build server state around a mocked organization store
pub fn create_test_app(organizations: MockOrganizationStore) -> TestApp {
    create_test_app_with_mailer(organizations, true)
}

/// Test helper: Same as [`create_test_app`], optionally without an email provider
pub fn create_test_app_with_mailer(
    organizations: MockOrganizationStore,
    with_mailer: bool,
) -> TestApp {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let outbox = Arc::new(Outbox::default());
    let mailer = with_mailer.then(|| {
        Mailer::new(
            outbox.clone() as Arc<dyn EmailProvider>,
            "noreply@example.com",
            Some("Organization Search".to_string()),
        )
    });
    let access_codes = Arc::new(AccessCodeManager::new(
        credentials.clone(),
        mailer,
        Duration::from_secs(3600),
    ));
    let tokens = Arc::new(TokenIssuer::new(TEST_SECRET, Duration::from_secs(3600)));
    let (ready_tx, ready_rx) = watch::channel(true);

    TestApp {
        state: AppState {
            organizations: Arc::new(organizations),
            access_codes,
            tokens,
            ready: ready_rx,
            probe: None,
            metrics: None,
        },
        credentials,
        outbox,
        ready_tx,
    }
}

pub fn test_user(email: &str) -> UserInfo {
    UserInfo {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        company: Some("Analytical Engines".to_string()),
    }
}

/// Test helper: Minimal organization with only the required fields set
pub fn sample_organization(id: &str, name: &str) -> Organization {
    Organization {
        openregisters_id: OrganizationId(id.to_string()),
        name: name.to_string(),
        short_name: None,
        alias: None,
        jurisdiction: Some("DE".to_string()),
        register_type: None,
        register_court: None,
        register_number: None,
        euid: None,
        legal_form: Some("GmbH".to_string()),
        description: None,
        status: Some("active".to_string()),
        seat: None,
        addresses: None,
        phone_infos: None,
        bank_info: None,
        date_founded: None,
        timestamp_of_si: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        capital: None,
        participations: None,
        inferences: None,
        data_path: None,
    }
}
