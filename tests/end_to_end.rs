//! End-to-end triage against mocked helpdesk and advisory APIs
//!
//! Both APIs are served by one wiremock server: the helpdesk base URL and the
//! help-center template point at it, and the advisory base URL is `<uri>/v1`.

use serde_json::json;
use std::sync::Arc;
use ticket_triage::advisory::AdvisoryClient;
use ticket_triage::config::{Config, Credentials};
use ticket_triage::error::{AppError, TriageStep};
use ticket_triage::forms::{FormArticle, FormArticleMap};
use ticket_triage::helpdesk::HelpdeskClient;
use ticket_triage::metrics::Metrics;
use ticket_triage::pipeline::{TriagePipeline, run_triage};
use ticket_triage::routing::ExtractionStrategy;
use wiremock::matchers::{any, basic_auth, bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM_ID: &str = "360000337594";
const ARTICLE_ID: &str = "360013086800";
const ROUTING_TABLE_HTML: &str = "<table><tr><td>L1</td><td>Frontline</td></tr><tr><td>L2</td><td>Senior Support</td></tr></table>";
const ADVICE: &str = "L1 should own this ticket. Escalate to L2 if unresolved.";

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.helpdesk.base_url = server.uri();
    config.helpdesk.help_center_url_template = server.uri();
    config.helpdesk.request_timeout_seconds = 5;
    config.advisory.base_url = format!("{}/v1", server.uri());
    config.advisory.request_timeout_seconds = 5;
    config.forms = vec![FormArticle::new(FORM_ID, "support.fogbugz.com", ARTICLE_ID)];
    config.validate().expect("test config is valid");
    config
}

fn credentials() -> Credentials {
    Credentials::new("agent@example.com", "secret", "sk-test")
}

fn build_pipeline(config: &Config) -> TriagePipeline {
    let creds = credentials();
    TriagePipeline::new(
        Arc::new(HelpdeskClient::new(&config.helpdesk, &creds).expect("helpdesk client")),
        Arc::new(AdvisoryClient::new(&config.advisory, &creds).expect("advisory client")),
        Arc::new(FormArticleMap::new(&config.forms)),
    )
}

async fn mount_ticket(server: &MockServer, ticket_id: &str, form_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/tickets/{}.json", ticket_id)))
        .and(basic_auth("agent@example.com", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ticket": {
                "id": ticket_id.parse::<u64>().unwrap_or(0),
                "subject": "Cannot export cases",
                "description": "Export button does nothing",
                "tags": ["export", "fogbugz"],
                "custom_fields": [{ "id": 1, "value": "billing" }, { "id": 2, "value": "urgent" }],
                "requester_id": 501,
                "group_id": 601,
                "ticket_form_id": form_id.parse::<u64>().unwrap_or(0),
            }
        })))
        .mount(server)
        .await;
}

async fn mount_requester_and_group(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/users/501.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 501, "name": "Jane Doe" } })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/groups/601.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "group": { "id": 601, "name": "FogBugz Support" } })),
        )
        .mount(server)
        .await;
}

async fn mount_article(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/help_center/articles/{}.json", ARTICLE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "article": { "id": ARTICLE_ID.parse::<u64>().unwrap_or(0), "title": "Routing", "body": body }
        })))
        .mount(server)
        .await;
}

async fn mount_advisory(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": format!("  {}  ", ADVICE) },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_triage_returns_advisory_text() {
    let server = MockServer::start().await;
    mount_ticket(&server, "4458072", FORM_ID).await;
    mount_requester_and_group(&server).await;
    mount_article(&server, ROUTING_TABLE_HTML).await;
    mount_advisory(&server).await;

    let pipeline = build_pipeline(&test_config(&server));
    let outcome = pipeline.process("4458072").await.expect("triage succeeds");

    assert_eq!(outcome.recommendation, ADVICE);
    assert_eq!(outcome.strategy, ExtractionStrategy::Table);
    let lines: Vec<&str> = outcome.prompt.lines().collect();
    assert!(lines.contains(&"Current Group: FogBugz Support"));
    assert!(lines.contains(&"L1: Frontline"));
    assert!(lines.contains(&"L2: Senior Support"));
    assert!(lines.contains(&"Requester: Jane Doe"));
    assert!(lines.contains(&"Issue Type: Unknown"));
    assert!(lines.contains(&"Tags: export, fogbugz"));
}

#[tokio::test]
async fn test_advisory_receives_system_and_prompt_messages() {
    let server = MockServer::start().await;
    mount_ticket(&server, "4458072", FORM_ID).await;
    mount_requester_and_group(&server).await;
    mount_article(&server, ROUTING_TABLE_HTML).await;
    mount_advisory(&server).await;

    let pipeline = build_pipeline(&test_config(&server));
    let outcome = pipeline.process("4458072").await.expect("triage succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    let advisory = requests
        .iter()
        .find(|r| r.url.path() == "/v1/chat/completions")
        .expect("advisory request sent");
    let body: serde_json::Value = serde_json::from_slice(&advisory.body).expect("json body");

    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(
        body["messages"][0]["content"],
        "You are an expert in customer support ticket management."
    );
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], outcome.prompt.as_str());
}

#[tokio::test]
async fn test_unmapped_form_never_fetches_article() {
    let server = MockServer::start().await;
    mount_ticket(&server, "4458072", "999").await;
    mount_requester_and_group(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v2/help_center/articles/{}.json", ARTICLE_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = build_pipeline(&test_config(&server));
    let err = pipeline.process("4458072").await.expect_err("should fail");

    assert!(matches!(err, AppError::ArticleNotResolved { ref form_id } if form_id == "999"));
}

#[tokio::test]
async fn test_ticket_not_found_reports_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/404404.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"RecordNotFound\"}"))
        .mount(&server)
        .await;

    let pipeline = build_pipeline(&test_config(&server));
    let err = pipeline.process("404404").await.expect_err("should fail");

    match err {
        AppError::RemoteResource { step, status, ref body } => {
            assert_eq!(step, TriageStep::FetchTicket);
            assert_eq!(status, 404);
            assert!(body.contains("RecordNotFound"));
        }
        other => panic!("expected RemoteResource, got {:?}", other),
    }
}

#[tokio::test]
async fn test_article_without_routing_info_fails() {
    let server = MockServer::start().await;
    mount_ticket(&server, "4458072", FORM_ID).await;
    mount_requester_and_group(&server).await;
    mount_article(&server, "<p>Welcome to our help center.</p>").await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = build_pipeline(&test_config(&server));
    let err = pipeline.process("4458072").await.expect_err("should fail");
    assert!(matches!(err, AppError::NoRoutingInfoFound));
}

#[tokio::test]
async fn test_keyword_article_reaches_advisory() {
    let server = MockServer::start().await;
    mount_ticket(&server, "4458072", FORM_ID).await;
    mount_requester_and_group(&server).await;
    mount_article(
        &server,
        "<p>Escalate: Engineering</p><p>Unrelated line</p><p>Team: Collections</p>",
    )
    .await;
    mount_advisory(&server).await;

    let pipeline = build_pipeline(&test_config(&server));
    let outcome = pipeline.process("4458072").await.expect("triage succeeds");

    assert_eq!(outcome.strategy, ExtractionStrategy::Keyword);
    assert!(outcome.prompt.contains("\nEscalate: Engineering\nTeam: Collections\n"));
    assert!(!outcome.prompt.contains("Unrelated line"));
}

#[tokio::test]
async fn test_batch_continues_after_failed_ticket() {
    let server = MockServer::start().await;
    mount_ticket(&server, "1001", FORM_ID).await;
    mount_requester_and_group(&server).await;
    mount_article(&server, ROUTING_TABLE_HTML).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/1002.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": ADVICE }, "finish_reason": "stop" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let metrics = Arc::new(Metrics::new().expect("metrics"));
    let pipeline = build_pipeline(&config).with_metrics(metrics.clone());

    let ids = vec!["1001".to_string(), "1002".to_string()];
    let results = pipeline.process_many(&ids, config.batch.concurrency).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "1001");
    assert_eq!(
        results[0].1.as_ref().expect("first ticket succeeds").recommendation,
        ADVICE
    );
    assert_eq!(results[1].0, "1002");
    assert!(matches!(
        results[1].1,
        Err(AppError::RemoteResource { status: 500, .. })
    ));

    let exposition = metrics.gather().expect("gather");
    let failed_fetch = exposition.lines().find(|line| {
        line.starts_with("triage_remote_calls_total{")
            && line.contains("step=\"fetch_ticket\"")
            && line.contains("outcome=\"failure\"")
    });
    assert_eq!(failed_fetch.and_then(|l| l.split_whitespace().last()), Some("1"));
    assert!(exposition.contains("triage_extractions_total{strategy=\"table\"} 1"));
}

fn env_without(missing: &'static str) -> impl Fn(&str) -> Option<String> {
    move |var: &str| {
        if var == missing {
            return None;
        }
        match var {
            "ZENDESK_EMAIL" => Some("agent@example.com".to_string()),
            "ZENDESK_PASSWORD" => Some("secret".to_string()),
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        }
    }
}

#[tokio::test]
async fn test_missing_credential_sends_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let ids = vec!["4458072".to_string()];
    let err = run_triage(&config, env_without("ZENDESK_EMAIL"), &ids, None)
        .await
        .expect_err("run should fail before triage");

    assert!(matches!(
        err,
        AppError::MissingCredential {
            var: "ZENDESK_EMAIL"
        }
    ));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_run_triage_uses_looked_up_credentials() {
    let server = MockServer::start().await;
    mount_ticket(&server, "4458072", FORM_ID).await;
    mount_requester_and_group(&server).await;
    mount_article(&server, ROUTING_TABLE_HTML).await;
    mount_advisory(&server).await;

    let config = test_config(&server);
    let ids = vec!["4458072".to_string()];
    let results = run_triage(&config, env_without("UNUSED"), &ids, None)
        .await
        .expect("credentials resolve");

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].1.as_ref().expect("ticket triaged").recommendation,
        ADVICE
    );
}
