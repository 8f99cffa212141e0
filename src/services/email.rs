//! Outgoing mail transport

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

/// Sends one HTML message to one recipient
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

/// Build the mailer described by the configuration
pub fn mailer_from_config(config: &EmailConfig) -> AppResult<std::sync::Arc<dyn Mailer>> {
    if config.enabled {
        Ok(std::sync::Arc::new(SmtpMailer::new(config)?))
    } else {
        tracing::warn!("Email delivery disabled, notifications will only be logged");
        Ok(std::sync::Arc::new(LogMailer))
    }
}

/// SMTP delivery through lettre
#[derive(Clone)]
pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let from_name = config.smtp_from_name.as_deref().unwrap_or("EMS");
        let from = Mailbox::from_str(&format!("{} <{}>", from_name, config.smtp_from))
            .map_err(|e| AppError::Email(format!("Invalid from address: {}", e)))?;

        let builder = if config.smtp_use_tls {
            SmtpTransport::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&config.smtp_host)
        }
        .port(config.smtp_port);

        let builder = match (&config.smtp_username, &config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Email(format!("Invalid to address {}: {}", to, e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(strip_tags(html)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )
            .map_err(|e| AppError::Email(format!("Failed to build email: {}", e)))?;

        // SmtpTransport is blocking
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Mail task failed: {}", e)))?
            .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Used when delivery is disabled
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> AppResult<()> {
        tracing::info!(to, subject, "Email delivery disabled, message not sent");
        Ok(())
    }
}

/// Plain-text fallback for an HTML body
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>R&amp;D</b></p>"), "Hello R&D");
    }

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        assert!(LogMailer.send("a@b.c", "subject", "<p>x</p>").await.is_ok());
    }

    #[test]
    fn test_disabled_config_builds_log_mailer() {
        let config = EmailConfig::default();
        assert!(mailer_from_config(&config).is_ok());
    }
}
