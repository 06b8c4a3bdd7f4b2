use askama::Template;

use crate::domain::ContactSubmission;

#[derive(Template)]
#[template(path = "contact_email.html")]
pub struct ContactEmailHtml<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

#[derive(Template)]
#[template(path = "contact_email.txt")]
pub struct ContactEmailText<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

/// The email relayed to the site owner for one submission.
#[derive(Debug)]
pub struct ContactNotification {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl ContactNotification {
    pub fn compose(submission: &ContactSubmission) -> Result<Self, askama::Error> {
        let (name, email, subject, message) = (
            submission.name(),
            submission.email().as_ref(),
            submission.subject(),
            submission.message(),
        );
        let html = ContactEmailHtml {
            name,
            email,
            subject,
            message,
        }
        .render()?;
        let text = ContactEmailText {
            name,
            email,
            subject,
            message,
        }
        .render()?;

        Ok(Self {
            subject: format!("New Message from {}: {}", name, subject),
            html,
            text,
        })
    }
}
