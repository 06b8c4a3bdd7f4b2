use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;

use crate::domain::{validate, ContactEmail, FieldErrors, SubmissionResult};
use crate::email_client::{EmailClient, EmailError};
use crate::templating::ContactNotification;
use crate::utils::error_chain_fmt;

/// Mailbox that receives contact messages.
pub struct ContactRecipient(pub ContactEmail);

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Invalid form data.")]
    ValidationError(FieldErrors),
    #[error("Failed to send email.")]
    DeliveryError(#[source] EmailError),
    #[error("Something went wrong.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::DeliveryError(_) | ContactError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ContactError::ValidationError(errors) => SubmissionResult::invalid(errors.clone()),
            // the visitor-facing message only, never the source chain
            ContactError::DeliveryError(e) => SubmissionResult::delivery_failed(e.to_string()),
            ContactError::UnexpectedError(_) => SubmissionResult::unexpected(),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Reads the body as raw bytes; a body that is not JSON, or that cannot be
/// read at all (e.g. over the payload limit), gets the generic 500.
#[tracing::instrument(
    name = "Relaying a contact submission",
    skip(body, email_client, recipient),
    fields(
        contact_name = tracing::field::Empty,
        contact_email = tracing::field::Empty
    )
)]
pub async fn contact(
    body: Result<web::Bytes, actix_web::Error>,
    email_client: web::Data<EmailClient>,
    recipient: web::Data<ContactRecipient>,
) -> Result<HttpResponse, ContactError> {
    // actix_web::Error is not Send, so only its message is kept
    let body = body
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to read the request body.")?;
    let payload: serde_json::Value =
        serde_json::from_slice(&body).context("Failed to decode the request body as JSON.")?;

    let submission = validate(&payload).map_err(|errors| {
        tracing::warn!(field_errors = %errors, "Rejected an invalid contact submission.");
        ContactError::ValidationError(errors)
    })?;

    let span = tracing::Span::current();
    span.record("contact_name", submission.name());
    span.record("contact_email", tracing::field::display(submission.email()));

    let notification = ContactNotification::compose(&submission)
        .context("Failed to render the contact email.")?;

    email_client
        .send_email(
            &recipient.0,
            Some(submission.email()),
            &notification.subject,
            &notification.html,
            &notification.text,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to send the contact email."
            );
            ContactError::DeliveryError(e)
        })?;

    Ok(HttpResponse::Ok().json(SubmissionResult::sent()))
}
