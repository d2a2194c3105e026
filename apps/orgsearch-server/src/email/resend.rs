//! Resend email provider implementation.

use super::{format_from, EmailError, EmailMessage, EmailProvider};
use async_trait::async_trait;
use resend_rs::{types::CreateEmailBaseOptions, Resend};

/// Resend email provider.
pub struct ResendProvider {
    client: Resend,
}

impl ResendProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Resend::new(&api_key),
        }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(
        &self,
        message: &EmailMessage,
        from_address: &str,
        from_name: Option<&str>,
    ) -> Result<(), EmailError> {
        let from = format_from(from_address, from_name);

        let email = CreateEmailBaseOptions::new(from, vec![message.to.clone()], &message.subject)
            .with_text(&message.text)
            .with_html(&message.html);

        self.client
            .emails
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
