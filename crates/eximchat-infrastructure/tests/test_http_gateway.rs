//! HttpChatGateway against a one-shot local HTTP responder.

use eximchat_core::ChatError;
use eximchat_core::auth::AuthSession;
use eximchat_core::config::ClientConfig;
use eximchat_core::gateway::{ChatGateway, SendMessageRequest};
use eximchat_core::session::SessionId;
use eximchat_infrastructure::HttpChatGateway;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Raw request as seen by the responder.
struct Captured {
    head: String,
    body: String,
}

/// Serves exactly one request with the given status line and JSON body.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            assert!(n > 0, "connection closed before headers");
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body_in = String::from_utf8_lossy(&buf[header_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured {
            head,
            body: body_in,
        }
    });

    (format!("http://{addr}/api"), handle)
}

fn gateway(base_url: &str, auth: AuthSession) -> HttpChatGateway {
    let config = ClientConfig::default().with_base_url(base_url);
    HttpChatGateway::new(&config, auth).unwrap()
}

#[tokio::test]
async fn test_send_message_success() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"response":"HS code adalah...","session_id":42,"response_time":1.3}"#,
    )
    .await;
    let gateway = gateway(&base, AuthSession::new("tok-1", None));

    let reply = gateway
        .send_message(SendMessageRequest {
            message: "Apa itu HS code?".to_string(),
            session_id: None,
        })
        .await
        .expect("send should succeed");

    assert_eq!(reply.content, "HS code adalah...");
    assert_eq!(reply.session_id, SessionId::from(42u64));
    assert_eq!(reply.response_time, Some(1.3));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /api/chat/message "));
    assert!(captured.head.to_lowercase().contains("authorization: bearer tok-1"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({ "message": "Apa itu HS code?", "session_id": null })
    );
}

#[tokio::test]
async fn test_failure_payload_message_is_kept() {
    let (base, server) = serve_once("429 Too Many Requests", r#"{"message":"Rate limited"}"#).await;
    let gateway = gateway(&base, AuthSession::anonymous());

    let err = gateway
        .send_message(SendMessageRequest {
            message: "Halo".to_string(),
            session_id: Some(SessionId::from(7u64)),
        })
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::gateway(429, Some("Rate limited".to_string())));
    assert_eq!(err.user_message(), Some("Rate limited"));

    let captured = server.await.unwrap();
    assert!(!captured.head.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn test_wrapped_session_list() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"sessions":[{"id":3,"title":"Incoterms","message_count":4,"updated_at":"2024-05-01T10:00:00Z"},{"id":"abc"}]}"#,
    )
    .await;
    let gateway = gateway(&base, AuthSession::anonymous());

    let sessions = gateway.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].display_title(), "Incoterms");
    assert_eq!(sessions[1].id.as_str(), "abc");

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("GET /api/chat/sessions "));
}

#[tokio::test]
async fn test_bare_suggestion_list() {
    let (base, _server) = serve_once("200 OK", r#"["Apa itu HS code?","Cara ekspor kopi"]"#).await;
    let gateway = gateway(&base, AuthSession::anonymous());

    let suggestions = gateway.list_suggestions().await.unwrap();
    assert_eq!(suggestions, vec!["Apa itu HS code?", "Cara ekspor kopi"]);
}

#[tokio::test]
async fn test_delete_unauthorized() {
    let (base, server) = serve_once("401 Unauthorized", r#"{"detail":"Token expired"}"#).await;
    let gateway = gateway(&base, AuthSession::new("old", None));

    let err = gateway
        .delete_session(&SessionId::from(9u64))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), Some("Token expired"));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("DELETE /api/chat/sessions/9 "));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = gateway(&format!("http://{addr}/api"), AuthSession::anonymous());
    let err = gateway.list_suggestions().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.user_message(), None);
}

#[tokio::test]
async fn test_session_id_with_path_characters_stays_in_its_segment() {
    let (base, server) = serve_once("200 OK", "{}").await;
    let gateway = gateway(&base, AuthSession::anonymous());

    gateway
        .delete_session(&SessionId::from("../message"))
        .await
        .unwrap();

    let captured = server.await.unwrap();
    assert!(
        captured.head.starts_with("DELETE /api/chat/sessions/..%2Fmessage "),
        "unexpected request line: {}",
        captured.head.lines().next().unwrap_or_default()
    );
}

#[tokio::test]
async fn test_session_id_cannot_inject_query_or_fragment() {
    let (base, server) = serve_once("200 OK", r#"{"id":5,"messages":[]}"#).await;
    let gateway = gateway(&base, AuthSession::anonymous());

    let detail = gateway
        .get_session(&SessionId::from("5?x=1#frag"))
        .await
        .unwrap();
    assert_eq!(detail.session.id, SessionId::from(5u64));

    let captured = server.await.unwrap();
    assert!(
        captured.head.starts_with("GET /api/chat/sessions/5%3Fx=1%23frag "),
        "unexpected request line: {}",
        captured.head.lines().next().unwrap_or_default()
    );
}

#[tokio::test]
async fn test_dot_session_id_is_rejected_before_sending() {
    // Nothing listens here; a request would fail as transport error
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = gateway(&format!("http://{addr}/api"), AuthSession::anonymous());
    let err = gateway
        .delete_session(&SessionId::from(".."))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_transport());
}
