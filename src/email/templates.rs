use askama::Template;

pub const NOTIFICATION_SUBJECT: &str = "Contact Form Submission";

/// HTML notification sent to the configured recipient. Askama escapes every
/// interpolated field, so user-supplied content cannot inject markup.
#[derive(Template)]
#[template(path = "notification.html")]
pub struct NotificationTemplate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
}
