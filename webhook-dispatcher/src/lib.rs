//! Signed webhook delivery (§4.9): HMAC-SHA256 signed POST per active
//! subscription, bounded worker pool, exponential backoff with jitter, and
//! a dead-letter log for exhausted deliveries.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod signer;

pub use client::{HttpDeliverer, ReqwestDeliverer};
pub use dispatcher::WebhookDispatcher;
pub use error::{Result, WebhookError};
pub use models::{DeadLetterEntry, WebhookEvent, WebhookPayload};
pub use signer::sign;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use platform_config::WebhookConfig;
    use schema_engine::{Form, FormStatus, WebhookSubscription};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    struct AlwaysFails {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HttpDeliverer for AlwaysFails {
        async fn post(&self, _url: &str, _body: Vec<u8>, _sig: &str, _timeout: Duration) -> Result<u16> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(500)
        }
    }

    struct AlwaysSucceeds {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HttpDeliverer for AlwaysSucceeds {
        async fn post(&self, _url: &str, _body: Vec<u8>, _sig: &str, _timeout: Duration) -> Result<u16> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(200)
        }
    }

    fn fast_config() -> WebhookConfig {
        WebhookConfig {
            retry_schedule: vec![Duration::from_millis(0), Duration::from_millis(1), Duration::from_millis(1)],
            request_timeout_secs: 5,
            worker_pool_size: 4,
        }
    }

    fn form_with_webhook(url: &str, events: Vec<String>) -> Form {
        Form {
            id: Uuid::new_v4(),
            title: "f".to_string(),
            slug: "f".to_string(),
            created_by: Uuid::new_v4(),
            status: FormStatus::Published,
            is_public: true,
            expires_at: None,
            editors: HashSet::new(),
            viewers: HashSet::new(),
            submitters: HashSet::new(),
            supported_languages: vec!["en".to_string()],
            default_language: "en".to_string(),
            webhooks: vec![WebhookSubscription { url: url.to_string(), secret: "s".to_string(), events, active: true }],
            notification_emails: Vec::new(),
            versions: Vec::new(),
            active_version: "1".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn exhausted_retries_land_in_the_dead_letter_log() {
        let calls = Arc::new(AtomicUsize::new(0));
        let deliverer = Arc::new(AlwaysFails { calls: calls.clone() });
        let dispatcher = WebhookDispatcher::new(deliverer, fast_config());
        let form = form_with_webhook("https://example.test/hook", vec!["submitted".to_string()]);

        dispatcher.dispatch_event(&form, WebhookEvent::Submitted, Uuid::new_v4(), serde_json::json!({}));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let letters = dispatcher.dead_letters().await;
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].last_status, Some(500));
    }

    #[tokio::test]
    async fn non_matching_event_is_not_delivered() {
        let calls = Arc::new(AtomicUsize::new(0));
        let deliverer = Arc::new(AlwaysSucceeds { calls: calls.clone() });
        let dispatcher = WebhookDispatcher::new(deliverer, fast_config());
        let form = form_with_webhook("https://example.test/hook", vec!["status_updated".to_string()]);

        dispatcher.dispatch_event(&form, WebhookEvent::Submitted, Uuid::new_v4(), serde_json::json!({}));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_on_first_attempt_never_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let deliverer = Arc::new(AlwaysSucceeds { calls: calls.clone() });
        let dispatcher = WebhookDispatcher::new(deliverer, fast_config());
        let form = form_with_webhook("https://example.test/hook", vec!["submitted".to_string()]);

        dispatcher.dispatch_event(&form, WebhookEvent::Submitted, Uuid::new_v4(), serde_json::json!({}));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(dispatcher.dead_letters().await.is_empty());
    }
}
