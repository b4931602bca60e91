//! Submission/status-change email composition and enqueue (§4.10, C10).

pub mod compose;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod models;

pub use compose::compose;
pub use engine::Notifier;
pub use error::{NotifierError, Result};
pub use gateway::{EmailGateway, EmailServiceGateway};
pub use models::{ComposedEmail, NotificationContext, NotificationEvent};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use schema_engine::{Form, FormStatus};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct RecordingGateway {
        sent: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EmailGateway for RecordingGateway {
        async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn form_with_notify(emails: Vec<String>) -> Form {
        Form {
            id: Uuid::new_v4(),
            title: "Intake".to_string(),
            slug: "intake".to_string(),
            created_by: Uuid::new_v4(),
            status: FormStatus::Published,
            is_public: true,
            expires_at: None,
            editors: HashSet::new(),
            viewers: HashSet::new(),
            submitters: HashSet::new(),
            supported_languages: vec!["en".to_string()],
            default_language: "en".to_string(),
            webhooks: Vec::new(),
            notification_emails: emails,
            versions: Vec::new(),
            active_version: "1".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn submission_notifies_every_configured_address() {
        let sent = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::new(Arc::new(RecordingGateway { sent: sent.clone() }));
        let form = form_with_notify(vec!["a@example.test".to_string(), "b@example.test".to_string()]);

        notifier
            .notify_submission(&form, Uuid::new_v4(), Some("alice"), "https://x/y")
            .await;

        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_notification_emails_configured_sends_nothing() {
        let sent = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::new(Arc::new(RecordingGateway { sent: sent.clone() }));
        let form = form_with_notify(Vec::new());

        notifier
            .notify_submission(&form, Uuid::new_v4(), Some("alice"), "https://x/y")
            .await;

        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    struct AlwaysFailsGateway;

    #[async_trait]
    impl EmailGateway for AlwaysFailsGateway {
        async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<()> {
            Err(NotifierError::GatewaySend("smtp down".to_string()))
        }
    }

    #[tokio::test]
    async fn gateway_failure_is_swallowed_not_propagated() {
        let notifier = Notifier::new(Arc::new(AlwaysFailsGateway));
        let form = form_with_notify(vec!["a@example.test".to_string()]);
        notifier
            .notify_status_change(&form, Uuid::new_v4(), None, "approved", "https://x/y")
            .await;
    }
}
