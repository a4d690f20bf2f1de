//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Path Slack posts slash commands to
pub const SLASH_COMMAND_PATH: &str = "/slack/commands";

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(SLASH_COMMAND_PATH, post(handlers::slash_command))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AtlassianConfig, Settings};
    use crate::engines::EngineLoader;
    use crate::network::HttpClient;
    use crate::slack::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "test-signing-secret";

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.slack.bot_token = "xoxb-test".to_string();
        settings.slack.signing_secret = SECRET.to_string();
        settings
    }

    fn router(settings: Settings) -> Router {
        let registry = EngineLoader::load(&settings);
        create_router(AppState::new(settings, registry, HttpClient::new().unwrap()))
    }

    fn form(text: &str, response_url: Option<&str>) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("command", "/search")
            .append_pair("text", text)
            .append_pair("user_id", "U1")
            .append_pair("channel_id", "C1");
        if let Some(url) = response_url {
            serializer.append_pair("response_url", url);
        }
        serializer.finish()
    }

    fn signed_request(body: String) -> Request<Body> {
        let ts = chrono::Utc::now().timestamp().to_string();
        let sig = SignatureVerifier::new(SECRET, 300)
            .sign(&ts, body.as_bytes())
            .unwrap();
        Request::builder()
            .method("POST")
            .uri(SLASH_COMMAND_PATH)
            .header("content-type", "application/x-www-form-urlencoded")
            .header(TIMESTAMP_HEADER, ts)
            .header(SIGNATURE_HEADER, sig)
            .body(Body::from(body))
            .unwrap()
    }

    async fn reply_text(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn mount_jira(server: &MockServer, body: serde_json::Value, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_bad_signature_rejected_without_searching() {
        let server = MockServer::start().await;
        mount_jira(&server, serde_json::json!({"issues": []}), 0).await;

        let mut settings = settings();
        settings.backends.jira = Some(AtlassianConfig::new(server.uri(), "a@b.c", "t"));

        let request = Request::builder()
            .method("POST")
            .uri(SLASH_COMMAND_PATH)
            .header(TIMESTAMP_HEADER, chrono::Utc::now().timestamp().to_string())
            .header(SIGNATURE_HEADER, "v0=deadbeef")
            .body(Body::from(form("deploy", None)))
            .unwrap();

        let (status, _) = reply_text(router(settings), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_deploy_pipeline_example() {
        let server = MockServer::start().await;
        mount_jira(
            &server,
            serde_json::json!({"issues": [
                {"key": "OPS-1", "fields": {"summary": "Fix deploy pipeline", "description": "Step 3 fails"}}
            ]}),
            1,
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = settings();
        settings.backends.jira = Some(AtlassianConfig::new(server.uri(), "a@b.c", "t"));
        settings.backends.confluence = Some(AtlassianConfig::new(server.uri(), "a@b.c", "t"));

        let (status, json) =
            reply_text(router(settings), signed_request(form("deploy pipeline", None))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response_type"], "ephemeral");

        let text = json["text"].as_str().unwrap();
        assert!(text.starts_with("*Results for:* `deploy pipeline`"));
        assert_eq!(text.matches("    • <").count(), 1);
        assert!(text.contains(&format!("<{}/browse/OPS-1|OPS-1: Fix deploy pipeline>", server.uri())));
        assert!(text.contains("*Confluence*\n    • _No results found._"));
    }

    #[tokio::test]
    async fn test_unconfigured_backends_are_not_called() {
        let server = MockServer::start().await;
        mount_jira(&server, serde_json::json!({"issues": []}), 1).await;
        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/search"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut settings = settings();
        settings.backends.jira = Some(AtlassianConfig::new(server.uri(), "a@b.c", "t"));
        // Missing API token: treated as not configured
        settings.backends.confluence = Some(AtlassianConfig::new(server.uri(), "a@b.c", ""));

        let (status, json) =
            reply_text(router(settings), signed_request(form("anything", None))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "No results found for `anything`.");
    }

    #[tokio::test]
    async fn test_backend_error_is_not_a_failed_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut settings = settings();
        settings.backends.jira = Some(AtlassianConfig::new(server.uri(), "a@b.c", "t"));

        let (status, json) = reply_text(router(settings), signed_request(form("deploy", None))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "No results found for `deploy`.");
    }

    #[tokio::test]
    async fn test_no_backends_and_empty_query_messages() {
        let (_, json) = reply_text(router(settings()), signed_request(form("deploy", None))).await;
        assert_eq!(json["text"], "No services configured for search.");

        let (_, json) = reply_text(router(settings()), signed_request(form("  ", None))).await;
        assert_eq!(json["text"], "Please provide a search query.");
    }

    #[tokio::test]
    async fn test_other_command_is_unsupported() {
        let body = "command=%2Ffind&text=deploy".to_string();
        let (status, json) = reply_text(router(settings()), signed_request(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Unsupported command `/find`.");
    }

    #[tokio::test]
    async fn test_signed_but_malformed_body() {
        let (status, _) = reply_text(router(settings()), signed_request("text=hi".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deferred_reply_posted_to_response_url() {
        let server = MockServer::start().await;
        mount_jira(
            &server,
            serde_json::json!({"issues": [{"key": "OPS-3", "fields": {"summary": "Rollback"}}]}),
            1,
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = settings();
        settings.slack.deferred_response = true;
        settings.backends.jira = Some(AtlassianConfig::new(server.uri(), "a@b.c", "t"));

        let hook = format!("{}/hook", server.uri());
        let (status, json) =
            reply_text(router(settings), signed_request(form("rollback", Some(&hook)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Searching for `rollback`…");

        let mut delivered = None;
        for _ in 0..50 {
            let requests = server.received_requests().await.unwrap_or_default();
            if let Some(hit) = requests.into_iter().find(|r| r.url.path() == "/hook") {
                delivered = Some(hit);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let delivered = delivered.expect("reply posted to response_url");
        let body: serde_json::Value = serde_json::from_slice(&delivered.body).unwrap();
        assert_eq!(body["replace_original"], true);
        assert!(body["text"].as_str().unwrap().contains("OPS-3: Rollback"));
    }

    #[tokio::test]
    async fn test_health_lists_backends() {
        let mut settings = settings();
        settings.backends.jira = Some(AtlassianConfig::new("https://acme.atlassian.net", "a@b.c", "t"));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, json) = reply_text(router(settings), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["backends"], serde_json::json!(["jira"]));
    }
}
