use crate::helpers::{spawn_app, Notice, RecordingNotifier, TestApp};
use portfolio::domain::{ContactFormData, Field};
use portfolio::form_controller::{
    ContactApiClient, ContactForm, FormState, SubmitOutcome, FAILURE_NOTICE, SUCCESS_NOTICE,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{matchers::any, Mock, ResponseTemplate};

fn contact_form(app: &TestApp) -> ContactForm<RecordingNotifier> {
    let api_client = ContactApiClient::new(&app.address, Duration::from_secs(5))
        .expect("Failed to build the contact API client.");
    let form = ContactForm::new(api_client, RecordingNotifier::default());
    form.set_field(Field::Name, "Jane Doe");
    form.set_field(Field::Email, "jane@example.com");
    form.set_field(Field::Subject, "Hello there");
    form.set_field(Field::Message, "This is a test message.");
    form
}

#[tokio::test]
async fn a_delivered_message_resets_the_form() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    let form = contact_form(&app);

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Sent);
    assert_eq!(form.values(), ContactFormData::default());
    assert_eq!(
        form.notifier().notices(),
        vec![Notice::Success(SUCCESS_NOTICE.into())]
    );
    assert_eq!(app.sent_emails().await[0]["reply_to"], "jane@example.com");
}

#[tokio::test]
async fn a_delivery_failure_keeps_what_the_visitor_typed() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "Internal provider error" })),
        )
        .expect(1)
        .mount(&app.email_server)
        .await;
    let form = contact_form(&app);
    let typed = form.values();

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Failed to send email.".into()));
    assert_eq!(form.values(), typed);
    assert_eq!(
        form.notifier().notices(),
        vec![Notice::Failure("Failed to send email.".into())]
    );
    assert_eq!(form.state(), FormState::Idle);
}

#[tokio::test]
async fn client_side_validation_matches_the_endpoint() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;
    let form = contact_form(&app);
    form.set_field(Field::Email, "jane@localhost");
    form.set_field(Field::Subject, "Hey");

    let client_errors = match form.submit().await {
        SubmitOutcome::Invalid(errors) => errors,
        other => panic!("expected the form to reject the input, got {:?}", other),
    };

    let response = app
        .post_contact(&serde_json::to_value(form.values()).unwrap())
        .await;
    let server_body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(
        serde_json::to_value(&client_errors).unwrap(),
        server_body["errors"]
    );
    assert_eq!(form.field_errors(), client_errors);
}

#[tokio::test]
async fn a_second_submit_is_ignored_while_the_first_is_in_flight() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&app.email_server)
        .await;
    let form = Arc::new(contact_form(&app));

    let first = tokio::spawn({
        let form = Arc::clone(&form);
        async move { form.submit().await }
    });
    while form.state() != FormState::Submitting {
        tokio::task::yield_now().await;
    }

    assert_eq!(form.submit().await, SubmitOutcome::Ignored);
    assert_eq!(first.await.unwrap(), SubmitOutcome::Sent);
    assert_eq!(form.notifier().notices().len(), 1);
}

#[tokio::test]
async fn an_unreachable_endpoint_shows_the_fallback_notice() {
    let api_client = ContactApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let form = ContactForm::new(api_client, RecordingNotifier::default());
    form.set_field(Field::Name, "Jane Doe");
    form.set_field(Field::Email, "jane@example.com");
    form.set_field(Field::Subject, "Hello there");
    form.set_field(Field::Message, "This is a test message.");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(FAILURE_NOTICE.into()));
    assert_eq!(form.value(Field::Subject), "Hello there");
}
