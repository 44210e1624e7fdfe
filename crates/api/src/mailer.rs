//! SMTP delivery for password-reset codes.

use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use maxxzone_config::MailConfig;
use tracing::{info, warn};

use crate::services::error::ServiceError;

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl Mailer {
    /// Build the mailer when SMTP credentials are fully configured; otherwise
    /// return `None` and leave the reset-mail flow disabled.
    pub fn from_config(config: &MailConfig) -> anyhow::Result<Option<Self>> {
        let (Some(host), Some(sender), Some(username), Some(password)) = (
            config.smtp_host.as_ref(),
            config.sender.as_ref(),
            config.username.as_ref(),
            config.password.as_ref(),
        ) else {
            warn!("mail credentials not configured, password-reset mail disabled");
            return Ok(None);
        };

        let sender: Mailbox = sender
            .parse()
            .with_context(|| format!("invalid mail sender address {sender}"))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .with_context(|| format!("failed to build smtp transport for {host}"))?
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();

        info!(host, "smtp mailer configured");
        Ok(Some(Self { transport, sender }))
    }

    pub async fn send_reset_code(&self, recipient: &str, code: u32) -> Result<(), ServiceError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|_| ServiceError::validation("invalid email address"))?;

        let body = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>Password Reset Request</h2>\
             <p>You requested a password reset for your MaxxZone Gym account.</p>\
             <p>Your OTP is: <strong>{code}</strong></p>\
             <p>This OTP will expire in 1 hour.</p>\
             </div>"
        );

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject("Password Reset OTP - MaxxZone Gym")
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|err| ServiceError::mail(format!("failed to build reset mail: {err}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| ServiceError::mail(format!("failed to send reset mail: {err}")))?;

        Ok(())
    }
}
