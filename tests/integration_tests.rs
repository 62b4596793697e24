//! Integration tests for the Nylas client
//!
//! These tests run the dispatcher against a local stub server and check the
//! requests it sends and how responses are decoded. No real API calls are made.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};

use nylas_client::error::{ApiError, AuthError, NylasError, ValidationError};
use nylas_client::{Config, NylasClient};

/// A request as seen by the stub server
#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Default)]
struct Stub {
    routes: Arc<HashMap<(String, String), (u16, String)>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

#[derive(Default)]
struct StubBuilder {
    routes: HashMap<(String, String), (u16, String)>,
}

impl StubBuilder {
    fn on(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Start serving; returns the base URL and the request log
    async fn start(self) -> (String, Arc<Mutex<Vec<Recorded>>>) {
        let stub = Stub {
            routes: Arc::new(self.routes),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = stub.requests.clone();

        let app = Router::new().fallback(handle).with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), requests)
    }
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    stub.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        uri: uri.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
            .collect(),
        body: body.to_vec(),
    });

    match stub.routes.get(&(method.to_string(), uri.path().to_string())) {
        Some((status, body)) => (StatusCode::from_u16(*status).unwrap(), body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

fn client_for(base_url: &str) -> NylasClient {
    NylasClient::new(
        Config::new("app-id", "app-secret")
            .with_access_token("token")
            .with_api_server(base_url),
    )
}

fn last(requests: &Arc<Mutex<Vec<Recorded>>>) -> Recorded {
    requests.lock().unwrap().last().cloned().expect("no request recorded")
}

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_all_passes_filters_and_auth_headers() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/threads", 200, r#"[{"id":"t1","subject":"Hello","unread":true}]"#)
            .start()
            .await;
        let client = client_for(&base);

        let threads = client
            .threads()
            .filter("unread", "true")
            .all(Some(10))
            .await
            .unwrap();

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].subject.as_deref(), Some("Hello"));
        assert!(threads[0].unread);

        let req = last(&requests);
        assert_eq!(req.method, "GET");
        assert_eq!(req.uri, "/threads?limit=10&offset=0&unread=true");
        assert_eq!(req.header("authorization"), Some("Basic dG9rZW46"));
        assert_eq!(req.header("x-nylas-api-wrapper"), Some("rust"));
    }

    #[tokio::test]
    async fn test_items_without_filters_has_no_query() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/labels", 200, r#"[{"id":"l1","display_name":"Inbox"},{"id":"l2"}]"#)
            .start()
            .await;
        let client = client_for(&base);

        let labels = client.labels().items().await.unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(last(&requests).uri, "/labels");
    }

    #[tokio::test]
    async fn test_first_limits_to_one() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/contacts", 200, r#"[{"id":"c1","given_name":"Ada"}]"#)
            .start()
            .await;
        let client = client_for(&base);

        let contact = client.contacts().first().await.unwrap().unwrap();
        assert_eq!(contact.given_name.as_deref(), Some("Ada"));
        assert_eq!(last(&requests).uri, "/contacts?limit=1");
    }

    #[tokio::test]
    async fn test_first_on_empty_collection() {
        let (base, _requests) = StubBuilder::default()
            .on("GET", "/calendars", 200, "[]")
            .start()
            .await;
        let client = client_for(&base);

        assert!(client.calendars().first().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_calendar_events_are_filtered() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/events", 200, "[]")
            .start()
            .await;
        let client = client_for(&base);

        client.calendars().events("cal_1").items().await.unwrap();
        assert_eq!(last(&requests).uri, "/events?calendar_id=cal_1");
    }

    #[tokio::test]
    async fn test_thread_messages_are_filtered() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/messages", 200, r#"[{"id":"m1","thread_id":"t1"}]"#)
            .start()
            .await;
        let client = client_for(&base);

        let messages = client.threads().messages("t1").items().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "m1");
        assert_eq!(last(&requests).uri, "/messages?thread_id=t1");
    }

    #[tokio::test]
    async fn test_all_keeps_caller_offset() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/threads", 200, "[]")
            .start()
            .await;
        let client = client_for(&base);

        client.threads().filter("offset", "20").all(Some(5)).await.unwrap();
        assert_eq!(last(&requests).uri, "/threads?limit=5&offset=20");
    }

    #[tokio::test]
    async fn test_missing_collection_is_a_request_failure() {
        let (base, _requests) = StubBuilder::default().start().await;
        let client = client_for(&base);

        let err = client.labels().items().await.unwrap_err();
        assert!(matches!(
            err,
            NylasError::Api(ApiError::RequestFailed { status: 404, .. })
        ));
    }
}

mod object_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_namespaced_event() {
        let (base, requests) = StubBuilder::default()
            .on(
                "GET",
                "/n/ns1/events/e1",
                200,
                r#"{"id":"e1","calendar_id":"cal_1","title":"Standup","busy":true,
                    "when":{"object":"time","time":1700000000}}"#,
            )
            .start()
            .await;
        let client = client_for(&base);

        let event = client.events().namespace("ns1").find("e1").await.unwrap();
        assert_eq!(event.title.as_deref(), Some("Standup"));
        assert_eq!(event.when.unwrap().time, Some(1700000000));
        assert_eq!(last(&requests).uri, "/n/ns1/events/e1");
    }

    #[tokio::test]
    async fn test_find_missing_object() {
        let (base, _requests) = StubBuilder::default().start().await;
        let client = client_for(&base);

        let err = client.messages().find("nope").await.unwrap_err();
        match err {
            NylasError::Api(ApiError::NotFound { collection, id }) => {
                assert_eq!(collection, "messages");
                assert_eq!(id, "nope");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let (base, _requests) = StubBuilder::default()
            .on("GET", "/drafts", 500, "upstream exploded")
            .start()
            .await;
        let client = client_for(&base);

        let err = client.drafts().items().await.unwrap_err();
        match err {
            NylasError::Api(ApiError::RequestFailed { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("list drafts"));
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_account() {
        let (base, requests) = StubBuilder::default()
            .on(
                "GET",
                "/account",
                200,
                r#"{"id":"acc_1","email_address":"me@example.com","organization_unit":"label"}"#,
            )
            .start()
            .await;
        let client = client_for(&base);

        let account = client.account().await.unwrap();
        assert_eq!(account.email_address.as_deref(), Some("me@example.com"));
        assert_eq!(last(&requests).uri, "/account");
    }

    #[tokio::test]
    async fn test_raw_json_access() {
        let (base, _requests) = StubBuilder::default()
            .on("GET", "/threads/t1", 200, r#"{"id":"t1","unknown_field":42}"#)
            .start()
            .await;
        let client = client_for(&base);

        let raw = client
            .get_resource_raw::<nylas_client::nylas::types::Thread>(
                None,
                Some("t1"),
                None,
                &Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(raw["unknown_field"], 42);
    }
}

mod write_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_event_in_calendar_sanitizes_and_fills_calendar() {
        let (base, requests) = StubBuilder::default()
            .on("POST", "/events", 200, r#"{"id":"e9","calendar_id":"cal_1","title":"Review"}"#)
            .start()
            .await;
        let client = client_for(&base);

        let event = client
            .calendars()
            .events("cal_1")
            .create(json!({"title": "Review", "busy": false, "color": "blue"}))
            .await
            .unwrap();
        assert_eq!(event.id, "e9");

        let req = last(&requests);
        assert_eq!(req.method, "POST");
        assert_eq!(req.uri, "/events");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body = req.json();
        assert_eq!(body["calendar_id"], "cal_1");
        assert_eq!(body["title"], "Review");
        assert!(body.get("color").is_none());
    }

    #[tokio::test]
    async fn test_create_event_without_calendar_sends_nothing() {
        let (base, requests) = StubBuilder::default().start().await;
        let client = client_for(&base);

        let err = client
            .events()
            .create(json!({"title": "Floating"}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NylasError::Validation(ValidationError::MissingField { .. })
        ));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_label() {
        let (base, requests) = StubBuilder::default()
            .on("PUT", "/labels/l1", 200, r#"{"id":"l1","display_name":"Receipts"}"#)
            .start()
            .await;
        let client = client_for(&base);

        let label = client
            .labels()
            .update("l1", json!({"display_name": "Receipts", "id_hint": "x"}))
            .await
            .unwrap();
        assert_eq!(label.display_name.as_deref(), Some("Receipts"));

        let req = last(&requests);
        assert_eq!(req.method, "PUT");
        assert_eq!(req.json(), json!({"display_name": "Receipts"}));
    }

    #[tokio::test]
    async fn test_delete_with_empty_body() {
        let (base, requests) = StubBuilder::default()
            .on("DELETE", "/contacts/c1", 200, "")
            .start()
            .await;
        let client = client_for(&base);

        assert!(client.contacts().delete("c1").await.unwrap().is_none());
        assert_eq!(last(&requests).method, "DELETE");
    }

    #[tokio::test]
    async fn test_delete_with_json_body() {
        let (base, _requests) = StubBuilder::default()
            .on("DELETE", "/n/ns/events/e1", 200, r#"{"job_status_id":"js_1"}"#)
            .start()
            .await;
        let client = client_for(&base);

        let body = client
            .events()
            .namespace("ns")
            .delete("e1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["job_status_id"], "js_1");
    }

    #[tokio::test]
    async fn test_send_draft() {
        let (base, requests) = StubBuilder::default()
            .on("POST", "/send", 200, r#"{"id":"m7","subject":"Sent"}"#)
            .start()
            .await;
        let client = client_for(&base);

        let message = client.drafts().send("d1", 3).await.unwrap();
        assert_eq!(message.id, "m7");
        assert_eq!(last(&requests).json(), json!({"draft_id": "d1", "version": 3}));
    }

    #[tokio::test]
    async fn test_empty_id_sends_nothing() {
        let (base, requests) = StubBuilder::default()
            .on("DELETE", "/threads", 200, "")
            .start()
            .await;
        let client = client_for(&base);

        let err = client.threads().delete("").await.unwrap_err();
        assert!(matches!(
            err,
            NylasError::Validation(ValidationError::MissingField { ref field }) if field == "id"
        ));
        let err = client.messages().raw("").await.unwrap_err();
        assert!(matches!(err, NylasError::Validation(_)));
        assert!(requests.lock().unwrap().is_empty());
    }
}

mod file_tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_is_multipart() {
        let (base, requests) = StubBuilder::default()
            .on(
                "POST",
                "/files",
                200,
                r#"[{"id":"f1","filename":"notes.txt","content_type":"text/plain","size":5}]"#,
            )
            .start()
            .await;
        let client = client_for(&base);

        let files = client
            .files()
            .upload("notes.txt", "text/plain", b"hello".to_vec())
            .await
            .unwrap();
        assert_eq!(files[0].id, "f1");

        let req = last(&requests);
        assert!(req
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data"));
        let body = req.body_text();
        assert!(body.contains("filename=\"notes.txt\""));
        assert!(body.contains("hello"));
    }

    #[tokio::test]
    async fn test_download() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/files/f1/download", 200, "file-bytes")
            .start()
            .await;
        let client = client_for(&base);

        let data = client.files().download("f1").await.unwrap();
        assert_eq!(data, b"file-bytes");
        assert_eq!(last(&requests).uri, "/files/f1/download");
    }

    #[tokio::test]
    async fn test_raw_message_sends_accept_header() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/messages/m1", 200, "Subject: hi\r\n\r\nbody")
            .start()
            .await;
        let client = client_for(&base);

        let raw = client.messages().raw("m1").await.unwrap();
        assert!(raw.starts_with(b"Subject: hi"));

        let req = last(&requests);
        assert_eq!(req.header("accept"), Some("message/rfc822"));
        assert_eq!(req.header("authorization"), Some("Basic dG9rZW46"));
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_code_installs_token() {
        let (base, requests) = StubBuilder::default()
            .on(
                "POST",
                "/oauth/token",
                200,
                r#"{"access_token":"new-token","account_id":"acc_1","token_type":"bearer"}"#,
            )
            .start()
            .await;
        let client = NylasClient::new(Config::new("app-id", "app-secret").with_api_server(&base));

        let token = client.exchange_code("the-code").await.unwrap();
        assert_eq!(token, "new-token");
        assert_eq!(client.access_token().await.as_deref(), Some("new-token"));

        let req = last(&requests);
        assert_eq!(
            req.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        let body = req.body_text();
        assert!(body.contains("grant_type=authorization_code"));
        assert!(body.contains("code=the-code"));
        assert!(body.contains("client_secret=app-secret"));
    }

    #[tokio::test]
    async fn test_exchange_code_without_token_in_response() {
        let (base, _requests) = StubBuilder::default()
            .on("POST", "/oauth/token", 200, r#"{"error":"invalid_grant"}"#)
            .start()
            .await;
        let client = NylasClient::new(Config::new("app-id", "app-secret").with_api_server(&base));

        let err = client.exchange_code("bad").await.unwrap_err();
        assert!(matches!(
            err,
            NylasError::Auth(AuthError::TokenExchangeFailed { .. })
        ));
        assert!(client.access_token().await.is_none());
    }

    #[tokio::test]
    async fn test_exchange_code_rejected_by_server() {
        let (base, _requests) = StubBuilder::default()
            .on("POST", "/oauth/token", 400, "invalid_grant")
            .start()
            .await;
        let client = NylasClient::new(Config::new("app-id", "app-secret").with_api_server(&base));

        let err = client.exchange_code("bad").await.unwrap_err();
        match err {
            NylasError::Auth(AuthError::TokenExchangeFailed { message }) => {
                assert!(message.contains("400"));
                assert!(message.contains("invalid_grant"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(client.access_token().await.is_none());
    }

    #[tokio::test]
    async fn test_exchange_code_with_trailing_slash_server() {
        let (base, requests) = StubBuilder::default()
            .on("POST", "/oauth/token", 200, r#"{"access_token":"new-token"}"#)
            .start()
            .await;
        let config = Config {
            app_id: "app-id".to_string(),
            app_secret: "app-secret".to_string(),
            access_token: None,
            api_server: format!("{}/", base),
        };
        let client = NylasClient::new(config);

        assert_eq!(client.exchange_code("the-code").await.unwrap(), "new-token");
        assert_eq!(last(&requests).uri, "/oauth/token");
    }

    #[tokio::test]
    async fn test_requests_without_token_are_not_sent() {
        let (base, requests) = StubBuilder::default()
            .on("GET", "/threads", 200, "[]")
            .start()
            .await;
        let client = NylasClient::new(Config::new("app-id", "app-secret").with_api_server(&base));

        let err = client.threads().items().await.unwrap_err();
        assert!(matches!(err, NylasError::Auth(AuthError::MissingAccessToken)));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_auth_url_points_at_configured_server() {
        let client = NylasClient::new(
            Config::new("app-id", "app-secret").with_api_server("http://localhost:9999"),
        );
        let url = client.auth_url("http://localhost/cb", None);
        assert!(url.starts_with("http://localhost:9999/oauth/authorize?client_id=app-id"));
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_from_lookup_with_server_override() {
        let config = Config::from_lookup(|key| match key {
            "NYLAS_APP_ID" => Some("id".to_string()),
            "NYLAS_APP_SECRET" => Some("secret".to_string()),
            "NYLAS_API_SERVER" => Some("https://eu.api.nylas.com/".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_server, "https://eu.api.nylas.com");
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_client_builds_outside_runtime() {
        let client = NylasClient::new(Config::new("id", "secret").with_access_token("t"));
        let token = tokio_test::block_on(client.access_token());
        assert_eq!(token.as_deref(), Some("t"));
    }
}
