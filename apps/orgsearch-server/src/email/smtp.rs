//! SMTP email provider implementation.

use super::{format_from, EmailError, EmailMessage, EmailProvider};
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Security {
    Plain,
    StartTls,
    /// SMTPS on port 465.
    Implicit,
}

impl Security {
    fn for_port(port: u16, use_tls: bool) -> Self {
        match (use_tls, port) {
            (false, _) => Security::Plain,
            (true, 465) => Security::Implicit,
            (true, _) => Security::StartTls,
        }
    }
}

/// SMTP email provider.
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpProvider {
    pub fn new(
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        use_tls: bool,
    ) -> Result<Self, EmailError> {
        let relay_error = |e: lettre::transport::smtp::Error| {
            EmailError::InvalidConfig(format!("SMTP relay {host}:{port}: {e}"))
        };

        let builder = match Security::for_port(port, use_tls) {
            Security::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host),
            Security::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                .map_err(relay_error)?
                .tls(Tls::Required(tls_parameters(&host)?)),
            Security::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
                .map_err(relay_error)?
                .tls(Tls::Wrapper(tls_parameters(&host)?)),
        }
        .port(port);

        let builder = match (username, password) {
            (Some(user), Some(pass)) => builder.credentials(Credentials::new(user, pass)),
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn tls_parameters(host: &str) -> Result<TlsParameters, EmailError> {
    TlsParameters::new(host.to_string())
        .map_err(|e| EmailError::InvalidConfig(format!("TLS configuration error: {e}")))
}

/// Plain-text and HTML alternatives of one message.
fn compose(message: &EmailMessage, from: &str) -> Result<Message, EmailError> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| EmailError::InvalidConfig(format!("Invalid from address: {e}")))?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| EmailError::SendFailed(format!("Invalid recipient address: {e}")))?;

    let body = MultiPart::alternative()
        .singlepart(SinglePart::plain(message.text.clone()))
        .singlepart(SinglePart::html(message.html.clone()));

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str())
        .multipart(body)
        .map_err(|e| EmailError::SendFailed(format!("Failed to build email: {e}")))
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(
        &self,
        message: &EmailMessage,
        from_address: &str,
        from_name: Option<&str>,
    ) -> Result<(), EmailError> {
        let email = compose(message, &format_from(from_address, from_name))?;
        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;
        Ok(())
    }
}
