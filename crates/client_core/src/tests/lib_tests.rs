use super::*;
use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use shared::{
    domain::ThreadId,
    error::{ApiError, ErrorCode},
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedRequest {
    method: &'static str,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    body: Option<serde_json::Value>,
}

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    list_body: serde_json::Value,
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn handle_list(
    State(state): State<ServerState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    state.requests.lock().await.push(RecordedRequest {
        method: "GET",
        path: "/api/interns".to_string(),
        query,
        authorization: authorization(&headers),
        body: None,
    });
    (state.status, Json(state.list_body.clone()))
}

async fn handle_delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> StatusCode {
    state.requests.lock().await.push(RecordedRequest {
        method: "DELETE",
        path: format!("/api/interns/{id}"),
        query: None,
        authorization: authorization(&headers),
        body: None,
    });
    state.status
}

async fn handle_create_thread(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.requests.lock().await.push(RecordedRequest {
        method: "POST",
        path: "/api/threads".to_string(),
        query: None,
        authorization: authorization(&headers),
        body: Some(body),
    });
    (state.status, Json(serde_json::json!({ "id": 42 })))
}

async fn spawn_api_server(
    status: StatusCode,
    list_body: serde_json::Value,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        requests: requests.clone(),
        status,
        list_body,
    };
    let app = Router::new()
        .route("/api/interns", get(handle_list))
        .route("/api/interns/:id", delete(handle_delete))
        .route("/api/threads", post(handle_create_thread))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), requests)
}

fn client(server_url: &str, token: Option<&str>) -> HttpInternsApi {
    let mut options = ApiOptions::new(server_url);
    options.token = token.map(str::to_string);
    HttpInternsApi::new(options).expect("client")
}

#[tokio::test]
async fn list_without_filters_calls_bare_endpoint() {
    let (server_url, requests) = spawn_api_server(
        StatusCode::OK,
        serde_json::json!([
            { "id": 2, "email": "b@example.com" },
            { "id": 1, "email": "a@example.com", "profile": { "name": "Ann" } }
        ]),
    )
    .await;

    let interns = client(&server_url, None)
        .list_interns("")
        .await
        .expect("list");

    assert_eq!(interns.len(), 2);
    assert_eq!(interns[0].id, InternId(2));
    assert_eq!(interns[1].display_name(), "Ann");

    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, None);
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn list_appends_query_and_bearer_token() {
    let (server_url, requests) =
        spawn_api_server(StatusCode::OK, serde_json::json!([])).await;

    let interns = client(&format!("{server_url}/"), Some("secret"))
        .list_interns("search=ann&school=MIT")
        .await
        .expect("list");

    assert!(interns.is_empty());
    let requests = requests.lock().await;
    assert_eq!(
        requests[0].query.as_deref(),
        Some("search=ann&school=MIT")
    );
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer secret")
    );
}

#[tokio::test]
async fn delete_targets_intern_resource() {
    let (server_url, requests) =
        spawn_api_server(StatusCode::NO_CONTENT, serde_json::json!([])).await;

    client(&server_url, None)
        .delete_intern(InternId(5))
        .await
        .expect("delete");

    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/api/interns/5");
}

#[tokio::test]
async fn delete_surfaces_unauthenticated_status() {
    let (server_url, _requests) =
        spawn_api_server(StatusCode::UNAUTHORIZED, serde_json::json!([])).await;

    let err = client(&server_url, None)
        .delete_intern(InternId(5))
        .await
        .expect_err("must fail");

    assert_eq!(err.http_status(), Some(401));
    assert_eq!(err.code(), ErrorCode::Unauthenticated);
    let api_error = ApiError::from(&err);
    assert!(api_error.is_unauthenticated());
    assert_eq!(api_error.status, Some(401));
}

#[tokio::test]
async fn create_thread_posts_intern_id_and_decodes_thread() {
    let (server_url, requests) =
        spawn_api_server(StatusCode::CREATED, serde_json::json!([])).await;

    let thread = client(&server_url, None)
        .create_thread(InternId(9))
        .await
        .expect("thread");

    assert_eq!(thread.id, ThreadId(42));
    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        Some(serde_json::json!({ "intern_id": 9 }))
    );
}

#[tokio::test]
async fn create_thread_forbidden_maps_to_forbidden_code() {
    let (server_url, _requests) =
        spawn_api_server(StatusCode::FORBIDDEN, serde_json::json!([])).await;

    let err = client(&server_url, None)
        .create_thread(InternId(9))
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert!(ApiError::from(&err).is_forbidden());
}

#[tokio::test]
async fn malformed_list_body_is_a_decode_failure() {
    let (server_url, _requests) =
        spawn_api_server(StatusCode::OK, serde_json::json!({ "unexpected": true })).await;

    let err = client(&server_url, None)
        .list_interns("")
        .await
        .expect_err("must fail");

    assert!(matches!(err, ApiFailure::Decode(_)));
    assert_eq!(err.http_status(), None);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure_without_status() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = client(&format!("http://{addr}"), None)
        .list_interns("")
        .await
        .expect_err("must fail");

    assert!(matches!(err, ApiFailure::Transport(_)));
    assert_eq!(err.code(), ErrorCode::Failed);
}
