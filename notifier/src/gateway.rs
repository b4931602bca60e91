use crate::error::{NotifierError, Result};
use async_trait::async_trait;
use email_service::EmailService;

/// Injected email transport, same shape as `auth-identity::SmsGateway`:
/// `EmailGateway.send(to, subject, html)` (§4.10, §5). SMTP details live
/// behind the concrete implementation, out of scope for the composer.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

pub struct EmailServiceGateway {
    service: EmailService,
}

impl EmailServiceGateway {
    pub fn new(service: EmailService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl EmailGateway for EmailServiceGateway {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        self.service
            .send_html_email(to, subject, html)
            .await
            .map_err(|e| NotifierError::GatewaySend(e.to_string()))?;
        Ok(())
    }
}
