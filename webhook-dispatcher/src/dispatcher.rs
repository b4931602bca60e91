use crate::client::HttpDeliverer;
use crate::models::{DeadLetterEntry, WebhookEvent, WebhookPayload};
use crate::signer::sign;
use chrono::Utc;
use platform_config::WebhookConfig;
use rand::Rng;
use schema_engine::Form;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use uuid::Uuid;

/// Retryable per §4.9: network error, HTTP >= 500, or 408/429.
fn should_retry(status: Option<u16>) -> bool {
    match status {
        None => true,
        Some(s) => s >= 500 || s == 408 || s == 429,
    }
}

pub struct WebhookDispatcher<D: HttpDeliverer> {
    deliverer: Arc<D>,
    config: WebhookConfig,
    semaphore: Arc<Semaphore>,
    dead_letters: Arc<Mutex<Vec<DeadLetterEntry>>>,
}

impl<D: HttpDeliverer + 'static> WebhookDispatcher<D> {
    pub fn new(deliverer: Arc<D>, config: WebhookConfig) -> Arc<Self> {
        let worker_pool_size = config.worker_pool_size;
        Arc::new(Self {
            deliverer,
            config,
            semaphore: Arc::new(Semaphore::new(worker_pool_size)),
            dead_letters: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// §4.9: fans a qualifying event out to every active subscription whose
    /// `events[]` includes it, each delivered independently on the bounded
    /// worker pool so one subscription's failures never block another's.
    pub fn dispatch_event(self: &Arc<Self>, form: &Form, event: WebhookEvent, response_id: Uuid, data: Value) {
        let payload = WebhookPayload {
            event: event.as_str().to_string(),
            timestamp: Utc::now(),
            form_id: form.id,
            form_title: form.title.clone(),
            response_id,
            data,
        };
        for subscription in &form.webhooks {
            if !subscription.active || !subscription.events.iter().any(|e| e == event.as_str()) {
                continue;
            }
            let dispatcher = Arc::clone(self);
            let url = subscription.url.clone();
            let secret = subscription.secret.clone();
            let payload = payload.clone();
            tokio::spawn(async move {
                dispatcher.deliver_with_retry(url, secret, event, response_id, payload).await;
            });
        }
    }

    async fn deliver_with_retry(
        self: Arc<Self>,
        url: String,
        secret: String,
        event: WebhookEvent,
        response_id: Uuid,
        payload: WebhookPayload,
    ) {
        let _permit = self.semaphore.acquire().await.expect("semaphore never closed");
        let body = serde_json::to_vec(&payload).expect("WebhookPayload always serializes");
        let signature = sign(&secret, &body);
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        let mut last_status = None;
        let mut last_error = None;
        let attempts = self.config.retry_schedule.len();

        for (attempt, delay) in self.config.retry_schedule.iter().enumerate() {
            if !delay.is_zero() || attempt > 0 {
                tokio::time::sleep(jittered(*delay)).await;
            }
            match self.deliverer.post(&url, body.clone(), &signature, timeout).await {
                Ok(status) if (200..300).contains(&status) => return,
                Ok(status) => {
                    last_status = Some(status);
                    last_error = None;
                    if !should_retry(Some(status)) {
                        break;
                    }
                }
                Err(err) => {
                    last_status = None;
                    last_error = Some(err.to_string());
                }
            }
            if attempt + 1 == attempts {
                break;
            }
        }

        tracing::warn!(url = %url, event = event.as_str(), attempts, "webhook delivery exhausted retries, writing to dead-letter log");
        self.dead_letters.lock().await.push(DeadLetterEntry {
            url,
            event,
            response_id,
            attempts,
            last_status,
            last_error,
            failed_at: Utc::now(),
        });
    }

    pub async fn dead_letters(&self) -> Vec<DeadLetterEntry> {
        self.dead_letters.lock().await.clone()
    }
}

fn jittered(base: Duration) -> Duration {
    if base.is_zero() {
        return base;
    }
    let jitter_ms = rand::thread_rng().gen_range(0..base.as_millis().min(5_000) as u64 + 1);
    base + Duration::from_millis(jitter_ms)
}
