use crate::error::{EmailError, EmailResult};
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// A single supported transport: generic SMTP via Stalwart's `mail-send`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailProvider {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub from_email: String,
    pub from_name: String,
    pub email_enabled: bool,
}

impl EmailConfig {
    /// Load email configuration from environment variables.
    pub fn from_env() -> EmailResult<Self> {
        let email_enabled = std::env::var("EMAIL_ENABLED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        let from_email =
            std::env::var("EMAIL_FROM").unwrap_or_else(|_| "noreply@rustcare.local".to_string());

        let from_name =
            std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "RustCare Engine".to_string());

        let provider = EmailProvider {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            use_tls: std::env::var("SMTP_TLS_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        };

        Ok(Self { provider, from_email, from_name, email_enabled })
    }
}

/// Email service for sending transactional emails over SMTP.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> EmailResult<Self> {
        if !config.email_enabled {
            info!("Email service disabled by configuration");
        }
        Ok(Self { config })
    }

    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> EmailResult<String> {
        if !self.config.email_enabled {
            debug!("Email disabled, skipping send to: {}", to);
            return Ok(format!("disabled-{}", Uuid::new_v4()));
        }

        let message = MessageBuilder::new()
            .from((self.config.from_name.as_str(), self.config.from_email.as_str()))
            .to(to)
            .subject(subject)
            .text_body(body);

        self.send_message(message).await
    }

    pub async fn send_html_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> EmailResult<String> {
        if !self.config.email_enabled {
            debug!("Email disabled, skipping send to: {}", to);
            return Ok(format!("disabled-{}", Uuid::new_v4()));
        }

        let message = MessageBuilder::new()
            .from((self.config.from_name.as_str(), self.config.from_email.as_str()))
            .to(to)
            .subject(subject)
            .html_body(html_body);

        self.send_message(message).await
    }

    /// Connect without sending, to validate SMTP configuration.
    pub async fn verify_email_config(&self) -> EmailResult<()> {
        let EmailProvider { host, port, username, password, use_tls } = &self.config.provider;
        info!(host = %host, port = %port, "Testing SMTP connection");

        let mut smtp_client = SmtpClientBuilder::new(host.as_str(), *port).implicit_tls(*use_tls);
        if let (Some(user), Some(pass)) = (username, password) {
            smtp_client = smtp_client.credentials((user.as_str(), pass.as_str()));
        }

        smtp_client
            .connect()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SMTP connection failed: {}", e)))?;

        info!("Email configuration verified successfully");
        Ok(())
    }

    async fn send_message(&self, message: MessageBuilder<'_>) -> EmailResult<String> {
        let EmailProvider { host, port, username, password, use_tls } = &self.config.provider;

        let mut smtp_client = SmtpClientBuilder::new(host.as_str(), *port).implicit_tls(*use_tls);
        if let (Some(user), Some(pass)) = (username, password) {
            smtp_client = smtp_client.credentials((user.as_str(), pass.as_str()));
        }

        let mut client = smtp_client
            .connect()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SMTP connection failed: {}", e)))?;

        let message_id = Uuid::new_v4().to_string();
        client
            .send(message)
            .await
            .map_err(|e| EmailError::SendFailed(format!("Failed to send email: {}", e)))?;

        debug!(message_id = %message_id, "Email sent successfully");
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_config_from_env_reads_smtp_settings() {
        std::env::set_var("SMTP_HOST", "mail.example.com");
        std::env::set_var("SMTP_PORT", "587");
        std::env::set_var("EMAIL_ENABLED", "true");

        let config = EmailConfig::from_env().unwrap();
        assert!(config.email_enabled);
        assert_eq!(config.provider.host, "mail.example.com");
        assert_eq!(config.provider.port, 587);
    }
}
