use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What triggered a notification, per §4.10: submission and status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationEvent {
    Submitted,
    StatusChanged,
}

impl NotificationEvent {
    pub fn subject_verb(&self) -> &'static str {
        match self {
            NotificationEvent::Submitted => "New submission",
            NotificationEvent::StatusChanged => "Status updated",
        }
    }
}

/// The two representations a composed notification carries; only `html`
/// crosses the injected `EmailGateway` boundary (§4.10, §5's gateway shape).
#[derive(Debug, Clone)]
pub struct ComposedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub struct NotificationContext<'a> {
    pub event: NotificationEvent,
    pub form_title: &'a str,
    pub response_id: Uuid,
    pub submitted_by: Option<&'a str>,
    pub status: Option<&'a str>,
    pub link: &'a str,
}
