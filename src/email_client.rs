use crate::domain::ContactEmail;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

pub struct EmailClient {
    sender: ContactEmail,
    sender_name: String,
    http_client: Client,
    // the API url that we want to call and have it send the email for us
    base_url: String,
    authorization_token: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(serde::Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: String,
}

/// Ways a send can fail once the message has been handed to the provider.
///
/// `Display` is safe to show to a visitor: it never includes the token or
/// the provider URL.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("The email provider did not respond in time.")]
    Timeout(#[source] reqwest::Error),
    #[error("Could not reach the email provider.")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for EmailError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EmailError::Timeout(e)
        } else {
            EmailError::Transport(e)
        }
    }
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: ContactEmail,
        sender_name: String,
        authorization_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            sender,
            sender_name,
            http_client,
            base_url,
            authorization_token,
        })
    }

    #[tracing::instrument(
        name = "Sending an email through the provider",
        skip(self, recipient, html_content, text_content),
        fields(recipient = %recipient)
    )]
    pub async fn send_email(
        &self,
        recipient: &ContactEmail,
        reply_to: Option<&ContactEmail>,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), EmailError> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));
        let from = format!("{} <{}>", self.sender_name, self.sender);
        let request_body = SendEmailRequest {
            from: &from,
            to: [recipient.as_ref()],
            subject,
            html: html_content,
            text: text_content,
            reply_to: reply_to.map(AsRef::as_ref),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            match response.json::<SendEmailResponse>().await {
                Ok(sent) => tracing::info!(email_id = %sent.id, "Email accepted by the provider."),
                Err(e) => tracing::warn!(
                    error.message = %e,
                    "Email accepted, but the provider response could not be decoded."
                ),
            }
            return Ok(());
        }

        let message = match response.json::<ProviderErrorBody>().await {
            Ok(body) if !body.message.is_empty() => body.message,
            _ => format!(
                "The email provider responded with status {}.",
                status.as_u16()
            ),
        };
        Err(EmailError::Rejected { status, message })
    }
}
