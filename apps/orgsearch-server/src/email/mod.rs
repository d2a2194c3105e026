//! Email delivery for access codes.

mod code;
#[cfg(feature = "email-resend")]
mod resend;
#[cfg(feature = "email-smtp")]
mod smtp;
mod templates;

pub use code::generate_access_code;
pub use templates::EmailContent;

use crate::config::{EmailConfig, EmailProviderConfig};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Email sending error
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// A fully rendered outgoing message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, content: EmailContent) -> Self {
        Self {
            to: to.into(),
            subject: content.subject,
            text: content.text,
            html: content.html,
        }
    }
}

/// Trait for email providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(
        &self,
        message: &EmailMessage,
        from_address: &str,
        from_name: Option<&str>,
    ) -> Result<(), EmailError>;
}

/// `Name <address>` or the bare address.
#[cfg_attr(
    not(any(feature = "email-smtp", feature = "email-resend")),
    allow(dead_code)
)]
fn format_from(from_address: &str, from_name: Option<&str>) -> String {
    match from_name {
        Some(name) => format!("{} <{}>", name, from_address),
        None => from_address.to_string(),
    }
}

/// Create an email provider from configuration
pub fn create_provider(config: &EmailConfig) -> Result<Arc<dyn EmailProvider>, EmailError> {
    match &config.provider {
        #[cfg(feature = "email-resend")]
        EmailProviderConfig::Resend { api_key } => {
            Ok(Arc::new(resend::ResendProvider::new(api_key.clone())))
        }
        #[cfg(not(feature = "email-resend"))]
        EmailProviderConfig::Resend { .. } => Err(EmailError::ProviderNotAvailable(
            "Resend support not compiled in. Enable the 'email-resend' feature.".to_string(),
        )),
        #[cfg(feature = "email-smtp")]
        EmailProviderConfig::Smtp {
            host,
            port,
            username,
            password,
            use_tls,
        } => {
            let provider = smtp::SmtpProvider::new(
                host.clone(),
                *port,
                username.clone(),
                password.clone(),
                *use_tls,
            )?;
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "email-smtp"))]
        EmailProviderConfig::Smtp { .. } => Err(EmailError::ProviderNotAvailable(
            "SMTP support not compiled in. Enable the 'email-smtp' feature.".to_string(),
        )),
    }
}

/// Provider plus sender identity.
#[derive(Clone)]
pub struct Mailer {
    provider: Arc<dyn EmailProvider>,
    from_address: String,
    from_name: Option<String>,
}

impl Mailer {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        from_address: impl Into<String>,
        from_name: Option<String>,
    ) -> Self {
        Self {
            provider,
            from_address: from_address.into(),
            from_name,
        }
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        Ok(Self::new(
            create_provider(config)?,
            config.from_address.clone(),
            config.from_name.clone(),
        ))
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.provider
            .send(message, &self.from_address, self.from_name.as_deref())
            .await
    }
}
