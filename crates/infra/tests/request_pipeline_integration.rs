//! Integration tests for the request pipeline
//!
//! Runs the pipeline against a wiremock server: header construction, 204
//! handling, 401 token handling, message resolution and debug logging.

use chrono::Utc;
use noteapp_domain::{DebugPhase, ListNotesOptions, Note, NoteCreate, NoteSort, NoteUpdate};
use noteapp_infra::{ApiError, ApiErrorCategory, RequestConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "support.rs"]
mod support;

#[tokio::test]
async fn test_no_content_decodes_to_unit() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/notes/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context.api().request::<()>("/notes/3", RequestConfig::delete()).await.unwrap();

    let entries = context.debug_log().entries();
    assert_eq!(entries.last().map(|e| e.phase), Some(DebugPhase::Response));
}

#[tokio::test]
async fn test_bearer_token_and_json_headers() {
    let server = MockServer::start().await;
    let token = support::user_token(1, "a@b.c");

    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "title": "Groceries", "content": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 10,
            "title": "Groceries",
            "content": null,
            "createdAt": "2025-01-05T08:04:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context.tokens().set_token(&token, None).unwrap();

    let note: Note = context.notes().create(&NoteCreate::new("Groceries", None)).await.unwrap();
    assert_eq!(note.id, 10);
    assert_eq!(note.updated_at, None);
}

#[tokio::test]
async fn test_token_with_scheme_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(header("authorization", "bearer raw-token-value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context.tokens().set_token("bearer raw-token-value", None).unwrap();

    let notes = context.notes().list(&ListNotesOptions::default()).await.unwrap();
    assert!(notes.is_empty());
}

#[tokio::test]
async fn test_list_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("q", "milk"))
        .and(query_param("sort", "updatedAt"))
        .and(query_param("desc", "true"))
        .and(query_param("skip", "20"))
        .and(query_param("take", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Milk", "content": "2L", "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-02T00:00:00Z" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let options = ListNotesOptions::default().search("milk").sort(NoteSort::UpdatedAt, true).page(20, 10);
    let notes = context.notes().list(&options).await.unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content.as_deref(), Some("2L"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unset_list_options_are_omitted() {
    let server = MockServer::start().await;
    Mock::given(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context.notes().list(&ListNotesOptions::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_update_ignores_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/notes/5"))
        .and(body_json(json!({ "title": "Renamed", "content": "body" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context
        .notes()
        .update(5, &NoteUpdate::new("Renamed", Some("body".to_string())))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_401_with_expired_token_clears_it() {
    let server = MockServer::start().await;
    Mock::given(path("/notes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context.tokens().set_token(&support::user_token(1, "a@b.c"), Some(-60.0)).unwrap();

    let err = context.notes().list(&ListNotesOptions::default()).await.unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert_eq!(err.category(), ApiErrorCategory::Authentication);
    assert_eq!(err.message(), "Your session has expired. Please sign in again.");
    assert_eq!(context.tokens().token(), None);
}

#[tokio::test]
async fn test_401_with_unexpired_token_keeps_it() {
    let server = MockServer::start().await;
    Mock::given(path("/notes"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token revoked" })))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let token = support::user_token(1, "a@b.c");
    context.tokens().set_token(&token, Some(3600.0)).unwrap();

    let err = context.notes().list(&ListNotesOptions::default()).await.unwrap_err();
    assert_eq!(err.message(), "Token revoked");
    assert_eq!(context.tokens().token(), Some(token));
}

#[tokio::test]
async fn test_401_on_unauthenticated_call_leaves_token() {
    let server = MockServer::start().await;
    Mock::given(path("/health/db"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let token = support::user_token(1, "a@b.c");
    context.tokens().set_token(&token, Some(-60.0)).unwrap();

    let err = context.health().check_database().await.unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert_eq!(context.tokens().token(), Some(token));
}

#[tokio::test]
async fn test_route_override_and_details() {
    let server = MockServer::start().await;
    let problem = json!({
        "title": "One or more validation errors occurred.",
        "status": 400,
        "errors": { "Title": ["The Title field is required."] }
    });
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(400).set_body_json(problem.clone()))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let config = RequestConfig::post().json(&NoteCreate::new("", None)).unwrap();
    let err = context.api().request::<Note>("/api/notes", config).await.unwrap_err();

    assert!(err.message().starts_with("Title is required"));
    assert_eq!(err.details(), Some(&problem));

    let last = context.debug_log().entries().pop().unwrap();
    assert_eq!(last.phase, DebugPhase::Error);
    let details = last.details.unwrap();
    assert_eq!(details["status"], json!(400));
    assert_eq!(details["message"], json!(err.message()));
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = MockServer::start().await;
    Mock::given(path("/notes/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway from proxy"))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let err = context.notes().get(1).await.unwrap_err();

    assert_eq!(err.message(), "Bad gateway from proxy");
    assert_eq!(err.details(), None);
    assert_eq!(err.category(), ApiErrorCategory::Server);
}

#[tokio::test]
async fn test_note_not_found_override() {
    let server = MockServer::start().await;
    Mock::given(path("/notes/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "No note 404" })))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let err = context.notes().get(404).await.unwrap_err();
    assert_eq!(err.message(), "This note could not be found. It may have been deleted.");
}

#[tokio::test]
async fn test_unexpected_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/health/db"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    let err = context.health().check_database().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { status: 200, .. }));
    assert_eq!(err.category(), ApiErrorCategory::Decode);
}

#[tokio::test]
async fn test_network_failure() {
    support::init_tracing();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let context = support::context_for(&base);
    let err = context.health().check_database().await.unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.status_code(), 0);
    assert!(std::error::Error::source(&err).is_some());

    let last = context.debug_log().entries().pop().unwrap();
    assert_eq!(last.phase, DebugPhase::Error);
    assert_eq!(last.details.unwrap()["status"], json!(0));
}

#[tokio::test]
async fn test_debug_log_keeps_last_200_entries() {
    let server = MockServer::start().await;
    Mock::given(path("/health/db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    for _ in 0..103 {
        assert!(context.health().check_database().await.unwrap().ok);
    }

    // 103 requests, each logging a request and a response entry
    let entries = context.debug_log().entries();
    assert_eq!(entries.len(), 200);
    assert_eq!(entries[0].phase, DebugPhase::Request);

    let first_kept = entries[0].timestamp;
    assert!(entries.iter().all(|e| e.timestamp >= first_kept));
    assert!(first_kept <= Utc::now().timestamp_millis());
}

#[tokio::test]
async fn test_request_entry_masks_token() {
    let server = MockServer::start().await;
    Mock::given(path("/notes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "title": "t", "createdAt": "2025-01-01"
        })))
        .mount(&server)
        .await;

    let context = support::context_for(&server.uri());
    context.tokens().set_token("abcdefghijklmnop", None).unwrap();
    context.notes().get(1).await.unwrap();

    let request_entry = context
        .debug_log()
        .entries()
        .into_iter()
        .find(|e| e.phase == DebugPhase::Request)
        .unwrap();
    let details = request_entry.details.unwrap();
    assert_eq!(details["tokenPreview"], json!("abcd...mnop"));
    assert_eq!(details["authRequired"], json!(true));
    assert_eq!(details["authAttached"], json!(true));
    assert_eq!(request_entry.label, "GET /notes/1");
}
