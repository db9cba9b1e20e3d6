use alert_core::JobRecord;
use alert_engine::{Notifier, NotifySettings, ResendNotifier};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> NotifySettings {
    let mut settings = NotifySettings::new("resend-key", "dev@example.com", "https://it.pracuj.pl/praca/react;kw");
    settings.endpoint = format!("{}/emails", server.uri());
    settings
}

fn job(title: &str, link: &str) -> JobRecord {
    JobRecord {
        id: None,
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Warszawa".to_string(),
        link: link.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn sends_one_email_with_subject_count_and_both_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer resend-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = ResendNotifier::new(settings(&server)).unwrap();
    let jobs = vec![
        job("React Developer", "https://it.pracuj.pl/praca/1"),
        job("Frontend Engineer", "https://it.pracuj.pl/praca/2"),
    ];
    notifier.notify(&jobs).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["subject"], "New Job Postings Found (2 new)");
    assert_eq!(body["to"], json!(["dev@example.com"]));
    assert!(body["from"].as_str().unwrap().contains('@'));
    let html = body["html"].as_str().unwrap();
    assert!(html.contains("React Developer"));
    assert!(html.contains("https://it.pracuj.pl/praca/1"));
    assert!(html.contains("View Job"));
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("- React Developer at Acme"));
    assert!(text.contains("Link: https://it.pracuj.pl/praca/2"));
}

#[tokio::test]
async fn empty_batch_never_reaches_the_email_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = ResendNotifier::new(settings(&server)).unwrap();
    notifier.notify(&[]).await;

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn delivery_failure_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "domain not verified",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = ResendNotifier::new(settings(&server)).unwrap();
    // Must return normally; the error is only logged.
    notifier.notify(&[job("React Developer", "/praca/1")]).await;
}
