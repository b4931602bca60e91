use crate::compose::compose;
use crate::gateway::EmailGateway;
use crate::models::{NotificationContext, NotificationEvent};
use schema_engine::Form;
use std::sync::Arc;
use uuid::Uuid;

/// Composes and enqueues submission/status-change emails (C10). Failures
/// are logged and swallowed — a notification failure never surfaces to the
/// submitter (§4.10).
pub struct Notifier<G: EmailGateway> {
    gateway: Arc<G>,
}

impl<G: EmailGateway> Notifier<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// §2's pipeline step "C10 enqueue emails", fired only when
    /// `form.notification_emails` is non-empty.
    pub async fn notify_submission(
        &self,
        form: &Form,
        response_id: Uuid,
        submitted_by: Option<&str>,
        link: &str,
    ) {
        if form.notification_emails.is_empty() {
            return;
        }
        let ctx = NotificationContext {
            event: NotificationEvent::Submitted,
            form_title: &form.title,
            response_id,
            submitted_by,
            status: None,
            link,
        };
        self.send_to_all(&form.notification_emails, &ctx).await;
    }

    pub async fn notify_status_change(
        &self,
        form: &Form,
        response_id: Uuid,
        submitted_by: Option<&str>,
        new_status: &str,
        link: &str,
    ) {
        if form.notification_emails.is_empty() {
            return;
        }
        let ctx = NotificationContext {
            event: NotificationEvent::StatusChanged,
            form_title: &form.title,
            response_id,
            submitted_by,
            status: Some(new_status),
            link,
        };
        self.send_to_all(&form.notification_emails, &ctx).await;
    }

    async fn send_to_all(&self, recipients: &[String], ctx: &NotificationContext<'_>) {
        let email = compose(ctx);
        for to in recipients {
            if let Err(err) = self.gateway.send(to, &email.subject, &email.html).await {
                tracing::warn!(to, error = %err, "notification delivery failed, dropping");
            }
        }
    }
}
