//! End-to-end tests of the HTTP client against a minimal local responder.

use pretty_assertions::assert_eq;
use restq_http::HttpClient;
use restq_query::{ErrorCode, GetOptions};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the responder saw.
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn target(&self) -> url::Url {
        let target = self.request_line().split(' ').nth(1).unwrap();
        url::Url::parse(&format!("http://localhost{}", target)).unwrap()
    }

    fn params(&self) -> Vec<(String, String)> {
        self.target()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

/// Serve exactly one request with the given status line and JSON body.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[header_end..header_end + length]).into_owned();

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        Captured {
            head,
            body: request_body,
        }
    });

    (format!("http://{}/api", addr), handle)
}

#[tokio::test]
async fn test_get_sends_encoded_query() {
    let (base, server) = serve_once("200 OK", json!([{ "id": 1 }]).to_string()).await;
    let client = HttpClient::from_url(&base).unwrap();

    let mut users = client.collection("users");
    let response = users
        .r#where(("age", ">", 18))
        .r#where(("name", "Al"))
        .order_by(("created_at", -1))
        .get(GetOptions::new().paginate(10))
        .await
        .unwrap();

    assert_eq!(response, json!([{ "id": 1 }]));

    let captured = server.await.unwrap();
    assert!(captured.request_line().starts_with("GET /api/collection/users?"));
    assert_eq!(
        captured.params(),
        vec![
            ("q".to_string(), r#"[["age",">",18],["name","=","Al"]]"#.to_string()),
            ("s".to_string(), r#"[["created_at","desc"]]"#.to_string()),
            ("p".to_string(), "10".to_string()),
        ]
    );
    assert!(users.filters().is_empty());
    assert!(users.ordering().is_empty());
}

#[tokio::test]
async fn test_empty_get_has_no_query_string() {
    let (base, server) = serve_once("200 OK", "[]".to_string()).await;
    let client = HttpClient::from_url(&base).unwrap();

    let response = (&mut client.collection("users")).await.unwrap();
    assert_eq!(response, json!([]));

    let captured = server.await.unwrap();
    assert_eq!(captured.target().path(), "/api/collection/users");
    assert!(captured.params().is_empty());
}

#[tokio::test]
async fn test_create_posts_wrapped_payload() {
    let (base, server) = serve_once("201 Created", json!({ "id": 7 }).to_string()).await;
    let client = HttpClient::from_url(&base).unwrap();

    let response = client
        .collection("users")
        .create(&json!({ "name": "Alice" }))
        .await
        .unwrap();
    assert_eq!(response, json!({ "id": 7 }));

    let captured = server.await.unwrap();
    assert!(captured.request_line().starts_with("POST /api/collection/users "));
    assert!(captured.head.to_lowercase().contains("content-type: application/json"));
    assert_eq!(captured.json_body(), json!({ "data": { "name": "Alice" } }));
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let (base, server) = serve_once("404 Not Found", json!({ "error": "no such collection" }).to_string()).await;
    let client = HttpClient::from_url(&base).unwrap();

    let err = client.collection("ghosts").get(GetOptions::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::HttpStatus);
    assert!(err.is_transport());
    assert!(err.message.contains("404"));
    assert_eq!(err.context.path.as_deref(), Some("collection/ghosts"));

    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_json_is_deserialization_error() {
    let (base, server) = serve_once("200 OK", "not json".to_string()).await;
    let client = HttpClient::from_url(&base).unwrap();

    let err = client.collection("users").get(GetOptions::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DeserializationError);

    server.await.unwrap();
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let (base, server) = serve_once("200 OK", "[]".to_string()).await;
    let client = HttpClient::builder()
        .base_url(base)
        .user_agent("restq-tests")
        .header("x-api-key", "secret")
        .build()
        .unwrap();

    client.collection("users").get(GetOptions::new()).await.unwrap();

    let head = server.await.unwrap().head.to_lowercase();
    assert!(head.contains("x-api-key: secret"));
    assert!(head.contains("user-agent: restq-tests"));
}

#[tokio::test]
async fn test_paginate_over_http() {
    let envelope = json!({
        "data": [{ "id": 1 }, { "id": 2 }],
        "current_page": 1,
        "last_page": 3,
        "per_page": 2,
        "total": 6,
    });
    let (base, server) = serve_once("200 OK", envelope.to_string()).await;
    let client = HttpClient::from_url(&base).unwrap();

    let mut cursor = client.collection("users").r#where(("active", true)).paginate(2);
    let page = cursor.ready().await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.last_page, 3);
    assert!(cursor.has_next());

    let captured = server.await.unwrap();
    assert_eq!(
        captured.params(),
        vec![
            ("q".to_string(), r#"[["active","=",true]]"#.to_string()),
            ("p".to_string(), "2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::from_url(&format!("http://{}/", addr)).unwrap();
    let err = client.collection("users").get(GetOptions::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Transport);
    assert!(err.is_transport());
}
