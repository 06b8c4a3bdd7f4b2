//! Client side of the contact form.
//!
//! [`ContactForm`] holds what the visitor typed, validates it with the same
//! rules as the endpoint, posts it and reports the outcome through a
//! [`Notifier`]. A form instance has at most one submission in flight.
//! [`TracingNotifier`] is the default notifier when no UI is attached.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::domain::{ContactFormData, ContactSubmission, Field, FieldErrors, SubmissionResult};
use crate::utils::error_chain_fmt;

pub const SUCCESS_NOTICE: &str = "Message sent successfully! I'll get back to you soon.";
pub const FAILURE_NOTICE: &str = "Failed to send message. Please try again.";

/// Transient, toast-style feedback for the visitor.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = message, "Contact form succeeded.");
    }

    fn failure(&self, message: &str) {
        tracing::warn!(notice = message, "Contact form failed.");
    }
}

#[derive(thiserror::Error)]
pub enum ClientError {
    #[error("Could not reach the contact endpoint.")]
    Transport(#[from] reqwest::Error),
    #[error("The contact endpoint answered {status} with an unreadable body.")]
    UnreadableResponse { status: StatusCode },
    #[error("The contact endpoint refused the submission ({status}).")]
    Rejected {
        status: StatusCode,
        result: SubmissionResult,
    },
}

impl std::fmt::Debug for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ClientError {
    /// The server's own message when it sent one.
    pub fn visitor_message(&self) -> &str {
        match self {
            ClientError::Rejected { result, .. } if !result.message.is_empty() => &result.message,
            _ => FAILURE_NOTICE,
        }
    }
}

pub struct ContactApiClient {
    http_client: Client,
    endpoint: String,
}

impl ContactApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: format!("{}/api/contact", base_url.trim_end_matches('/')),
        })
    }

    #[tracing::instrument(name = "Posting a contact submission", skip_all)]
    pub async fn send(&self, form: &ContactFormData) -> Result<SubmissionResult, ClientError> {
        let response = self.http_client.post(&self.endpoint).json(form).send().await?;
        let status = response.status();
        let result: SubmissionResult = response
            .json()
            .await
            .map_err(|_| ClientError::UnreadableResponse { status })?;

        if !status.is_success() || !result.success {
            return Err(ClientError::Rejected { status, result });
        }
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission from this form was still in flight.
    Ignored,
    Invalid(FieldErrors),
    Sent,
    Failed(String),
}

struct FormInner {
    values: ContactFormData,
    errors: FieldErrors,
    state: FormState,
}

pub struct ContactForm<N> {
    api_client: ContactApiClient,
    notifier: N,
    inner: Mutex<FormInner>,
}

/// Puts the form back to `Idle` even if the submit future is dropped.
struct SubmittingGuard<'a> {
    inner: &'a Mutex<FormInner>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        lock(self.inner).state = FormState::Idle;
    }
}

fn lock(inner: &Mutex<FormInner>) -> MutexGuard<'_, FormInner> {
    // every critical section leaves the form consistent
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<N: Notifier> ContactForm<N> {
    pub fn new(api_client: ContactApiClient, notifier: N) -> Self {
        Self {
            api_client,
            notifier,
            inner: Mutex::new(FormInner {
                values: ContactFormData::default(),
                errors: FieldErrors::default(),
                state: FormState::Idle,
            }),
        }
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        *lock(&self.inner).values.get_mut(field) = value.into();
    }

    pub fn value(&self, field: Field) -> String {
        lock(&self.inner).values.get(field).to_string()
    }

    pub fn values(&self) -> ContactFormData {
        lock(&self.inner).values.clone()
    }

    pub fn field_errors(&self) -> FieldErrors {
        lock(&self.inner).errors.clone()
    }

    /// Inline errors shown next to `field`.
    pub fn errors_for(&self, field: Field) -> Vec<String> {
        lock(&self.inner)
            .errors
            .get(field.as_str())
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    pub fn state(&self) -> FormState {
        lock(&self.inner).state
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.state() == FormState::Idle
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let form = {
            let mut inner = lock(&self.inner);
            if inner.state != FormState::Idle {
                return SubmitOutcome::Ignored;
            }
            inner.state = FormState::Validating;

            match ContactSubmission::try_from(inner.values.clone()) {
                Err(errors) => {
                    inner.errors = errors.clone();
                    inner.state = FormState::Idle;
                    return SubmitOutcome::Invalid(errors);
                }
                Ok(submission) => {
                    inner.errors = FieldErrors::default();
                    inner.state = FormState::Submitting;
                    ContactFormData::from(&submission)
                }
            }
        };

        let guard = SubmittingGuard { inner: &self.inner };
        let outcome = match self.api_client.send(&form).await {
            Ok(_) => {
                lock(&self.inner).values = ContactFormData::default();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error.cause_chain = ?e, "Contact submission failed.");
                if let ClientError::Rejected {
                    result:
                        SubmissionResult {
                            errors: Some(errors),
                            ..
                        },
                    ..
                } = &e
                {
                    lock(&self.inner).errors = errors.clone();
                }
                Err(e.visitor_message().to_string())
            }
        };
        // fields are settled before the submit control comes back
        drop(guard);

        match outcome {
            Ok(()) => {
                self.notifier.success(SUCCESS_NOTICE);
                SubmitOutcome::Sent
            }
            Err(message) => {
                self.notifier.failure(&message);
                SubmitOutcome::Failed(message)
            }
        }
    }
}
