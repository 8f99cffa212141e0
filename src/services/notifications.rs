//! Workflow notifications
//!
//! Every state-changing action ends with a best-effort email. Delivery
//! failures are logged and never returned to the caller, except for the
//! contact form where the email is the whole point of the request.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{event::Event, user::Recipient},
    services::email::Mailer,
};

#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Send one message, logging instead of failing
    async fn deliver(&self, to: &str, subject: &str, html: &str) {
        if to.trim().is_empty() {
            tracing::warn!(subject, "Skipping notification to recipient without email");
            return;
        }
        if let Err(e) = self.mailer.send(to, subject, html).await {
            tracing::error!(to, subject, error = %e, "Failed to send notification");
        }
    }

    async fn fan_out<F>(&self, recipients: &[Recipient], subject: &str, body: F)
    where
        F: Fn(&Recipient) -> String,
    {
        for recipient in recipients {
            let html = layout(subject, &body(recipient));
            self.deliver(&recipient.email, subject, &html).await;
        }
    }

    pub async fn event_created(&self, event: &Event, recipients: &[Recipient]) {
        let subject = format!("New event submitted: {}", event.title);
        self.fan_out(recipients, &subject, |r| {
            format!(
                "<p>Hello {},</p><p>A new event has been submitted and is awaiting review.</p>{}",
                escape_html(&r.username),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn event_updated(&self, event: &Event, recipients: &[Recipient]) {
        let subject = format!("Event updated: {}", event.title);
        self.fan_out(recipients, &subject, |r| {
            format!(
                "<p>Hello {},</p><p>The following event has been updated.</p>{}",
                escape_html(&r.username),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn event_resubmitted(&self, event: &Event, recipients: &[Recipient]) {
        let subject = format!("Event resubmitted for review: {}", event.title);
        self.fan_out(recipients, &subject, |r| {
            format!(
                "<p>Hello {},</p><p>An event returned for revision has been corrected and resubmitted.</p>{}",
                escape_html(&r.username),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn event_approved(&self, event: &Event, recipients: &[Recipient]) {
        let subject = format!("Event approved: {}", event.title);
        self.fan_out(recipients, &subject, |r| {
            format!(
                "<p>Hello {},</p><p>The following event has been approved and is open for registration.</p>{}",
                escape_html(&r.username),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn event_rejected(&self, event: &Event, reason: &str, recipients: &[Recipient]) {
        let subject = format!("Event needs revision: {}", event.title);
        self.fan_out(recipients, &subject, |r| {
            format!(
                "<p>Hello {},</p><p>Your event was sent back for revision.</p>\
                 <p><strong>Reason:</strong> {}</p>{}",
                escape_html(&r.username),
                escape_html(reason),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn registration_confirmed(&self, event: &Event, recipient: &Recipient) {
        let subject = format!("Registration confirmed: {}", event.title);
        self.fan_out(std::slice::from_ref(recipient), &subject, |r| {
            format!(
                "<p>Hello {},</p><p>Your registration is confirmed.</p>{}",
                escape_html(&r.username),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn registration_cancelled(&self, event: &Event, recipient: &Recipient) {
        let subject = format!("Registration cancelled: {}", event.title);
        self.fan_out(std::slice::from_ref(recipient), &subject, |r| {
            format!(
                "<p>Hello {},</p><p>Your registration has been cancelled.</p>{}",
                escape_html(&r.username),
                event_summary(event)
            )
        })
        .await;
    }

    pub async fn temporary_password(&self, recipient: &Recipient, password: &str) {
        let subject = "Your temporary password";
        self.fan_out(std::slice::from_ref(recipient), subject, |r| {
            format!(
                "<p>Hello {},</p><p>Your temporary password is <strong>{}</strong>.</p>\
                 <p>Please sign in and change it as soon as possible.</p>",
                escape_html(&r.username),
                escape_html(password)
            )
        })
        .await;
    }

    /// Forward a contact form. Failures are returned to the caller.
    pub async fn contact(
        &self,
        to: &[String],
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> AppResult<()> {
        if to.is_empty() {
            return Err(AppError::Internal("No contact recipients configured".to_string()));
        }
        let full_subject = format!("Contact form: {}", subject);
        let html = layout(
            &full_subject,
            &format!(
                "<p><strong>From:</strong> {} &lt;{}&gt;</p><p>{}</p>",
                escape_html(name),
                escape_html(email),
                escape_html(message).replace('\n', "<br>")
            ),
        );
        for recipient in to {
            self.mailer.send(recipient, &full_subject, &html).await?;
        }
        Ok(())
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<html><body style=\"font-family: sans-serif;\"><h2>{}</h2>{}\
         <hr><p style=\"color:#888\">Event Management System</p></body></html>",
        escape_html(title),
        body
    )
}

fn event_summary(event: &Event) -> String {
    format!(
        "<ul><li><strong>Title:</strong> {}</li><li><strong>Location:</strong> {}</li>\
         <li><strong>Start:</strong> {}</li><li><strong>End:</strong> {}</li>\
         <li><strong>Status:</strong> {}</li></ul>",
        escape_html(&event.title),
        escape_html(event.location.as_deref().unwrap_or("-")),
        event.start_date.format("%Y-%m-%d %H:%M UTC"),
        event.end_date.format("%Y-%m-%d %H:%M UTC"),
        event.status
    )
}

/// Escape text interpolated into HTML bodies
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{enums::{EventStatus, Role}, event::tests::sample_event},
        services::email::MockMailer,
    };
    use mockall::predicate::eq;

    fn recipient(id: i64, email: &str) -> Recipient {
        Recipient {
            id,
            username: format!("user{}", id),
            email: email.to_string(),
            role: Role::Manager,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x')</script> & \"q\""),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;q&quot;"
        );
    }

    #[tokio::test]
    async fn test_fan_out_sends_to_each_recipient() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|to, subject, _| to == "a@example.com" && subject.starts_with("Event approved"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        mailer
            .expect_send()
            .withf(|to, _, _| to == "b@example.com")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = NotificationService::new(Arc::new(mailer));
        let event = sample_event(EventStatus::Approved);
        service
            .event_approved(&event, &[recipient(1, "a@example.com"), recipient(2, "b@example.com")])
            .await;
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(2)
            .returning(|_, _, _| Err(AppError::Email("relay down".to_string())));

        let service = NotificationService::new(Arc::new(mailer));
        let event = sample_event(EventStatus::Pending);
        // Completes without panicking or returning an error
        service
            .event_created(&event, &[recipient(1, "a@example.com"), recipient(2, "b@example.com")])
            .await;
    }

    #[tokio::test]
    async fn test_blank_email_is_skipped() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let service = NotificationService::new(Arc::new(mailer));
        let event = sample_event(EventStatus::Approved);
        service.registration_confirmed(&event, &recipient(1, " ")).await;
    }

    #[tokio::test]
    async fn test_rejection_reason_is_escaped() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|_, _, html| html.contains("Missing &lt;agenda&gt;") && !html.contains("<agenda>"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = NotificationService::new(Arc::new(mailer));
        let event = sample_event(EventStatus::NeedsRevision);
        service
            .event_rejected(&event, "Missing <agenda>", &[recipient(1, "a@example.com")])
            .await;
    }

    #[tokio::test]
    async fn test_contact_surfaces_errors() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .with(eq("admin@example.com"), eq("Contact form: Hi"), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Err(AppError::Email("relay down".to_string())));

        let service = NotificationService::new(Arc::new(mailer));
        let result = service
            .contact(&["admin@example.com".to_string()], "Ann", "ann@example.com", "Hi", "Hello")
            .await;
        assert!(result.is_err());

        let service = NotificationService::new(Arc::new(MockMailer::new()));
        assert!(service.contact(&[], "Ann", "ann@example.com", "Hi", "Hello").await.is_err());
    }
}
