use crate::configuration::Settings;
use crate::domain::ContactEmail;
use crate::email_client::EmailClient;
use crate::routes::{contact, health_check, ContactRecipient};
use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> anyhow::Result<Self> {
        let sender_email = configuration
            .email_client
            .sender()
            .map_err(anyhow::Error::msg)
            .context("Invalid sender email address.")?;
        let recipient = configuration
            .email_client
            .recipient()
            .map_err(anyhow::Error::msg)
            .context("Invalid recipient email address.")?;

        let timeout = configuration.email_client.timeout();
        let email_client = EmailClient::new(
            configuration.email_client.base_url,
            sender_email,
            configuration.email_client.sender_name,
            configuration.email_client.authorization_token,
            timeout,
        )
        .context("Failed to build the email client.")?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}.", address))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, email_client, recipient)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    email_client: EmailClient,
    recipient: ContactEmail,
) -> Result<Server, std::io::Error> {
    // one client, and so one connection pool, shared by every worker
    let email_client = web::Data::new(email_client);
    let recipient = web::Data::new(ContactRecipient(recipient));
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/contact", web::post().to(contact))
            .app_data(email_client.clone())
            .app_data(recipient.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
