use crate::models::{ComposedEmail, NotificationContext};

/// Plaintext+HTML composition per §4.10: form title, response id, submitter,
/// and a link, plus the new status when the event is a status change.
pub fn compose(ctx: &NotificationContext<'_>) -> ComposedEmail {
    let subject = format!("{}: {}", ctx.event.subject_verb(), ctx.form_title);
    let submitter = ctx.submitted_by.unwrap_or("an anonymous submitter");

    let mut text = format!(
        "{}\n\nForm: {}\nResponse: {}\nSubmitted by: {}\n",
        ctx.event.subject_verb(),
        ctx.form_title,
        ctx.response_id,
        submitter
    );
    if let Some(status) = ctx.status {
        text.push_str(&format!("New status: {}\n", status));
    }
    text.push_str(&format!("Link: {}\n", ctx.link));

    let mut html = format!(
        "<p>{}</p><ul><li><strong>Form:</strong> {}</li><li><strong>Response:</strong> {}</li><li><strong>Submitted by:</strong> {}</li>",
        ctx.event.subject_verb(),
        ctx.form_title,
        ctx.response_id,
        submitter
    );
    if let Some(status) = ctx.status {
        html.push_str(&format!("<li><strong>New status:</strong> {}</li>", status));
    }
    html.push_str(&format!("</ul><p><a href=\"{}\">View response</a></p>", ctx.link));

    ComposedEmail { subject, text, html }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationEvent;
    use uuid::Uuid;

    #[test]
    fn submission_email_includes_form_and_submitter() {
        let response_id = Uuid::new_v4();
        let ctx = NotificationContext {
            event: NotificationEvent::Submitted,
            form_title: "Intake Form",
            response_id,
            submitted_by: Some("alice@example.com"),
            status: None,
            link: "https://forms.example.test/r/abc",
        };
        let email = compose(&ctx);
        assert!(email.subject.contains("Intake Form"));
        assert!(email.html.contains("alice@example.com"));
        assert!(email.text.contains(&response_id.to_string()));
        assert!(!email.html.contains("New status"));
    }

    #[test]
    fn status_change_email_includes_new_status() {
        let ctx = NotificationContext {
            event: NotificationEvent::StatusChanged,
            form_title: "Intake Form",
            response_id: Uuid::new_v4(),
            submitted_by: None,
            status: Some("approved"),
            link: "https://forms.example.test/r/abc",
        };
        let email = compose(&ctx);
        assert!(email.text.contains("anonymous submitter"));
        assert!(email.html.contains("approved"));
    }
}
