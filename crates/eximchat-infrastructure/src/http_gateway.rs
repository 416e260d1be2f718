//! HttpChatGateway - REST implementation of `ChatGateway`.
//!
//! Talks to the chat endpoints of the EximChat backend:
//!
//! | operation | request |
//! |---|---|
//! | list sessions | `GET {base}/chat/sessions` |
//! | get session | `GET {base}/chat/sessions/{id}` |
//! | send message | `POST {base}/chat/message` |
//! | delete session | `DELETE {base}/chat/sessions/{id}` |
//! | suggestions | `GET {base}/chat/suggestions` |

use async_trait::async_trait;
use eximchat_core::auth::AuthSession;
use eximchat_core::config::ClientConfig;
use eximchat_core::error::{ChatError, Result};
use eximchat_core::gateway::{ChatGateway, SendMessageRequest, SendMessageResponse};
use eximchat_core::session::{Session, SessionDetail, SessionId};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Gateway implementation that talks to the backend over HTTP.
#[derive(Clone)]
pub struct HttpChatGateway {
    client: Client,
    base: Url,
    auth: AuthSession,
}

impl HttpChatGateway {
    /// Creates a gateway from configuration and the current login.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig, auth: AuthSession) -> Result<Self> {
        let base_url = config.normalized_base_url();
        let base = Url::parse(base_url)
            .map_err(|e| ChatError::config(format!("Invalid base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ChatError::config(format!(
                "Base URL '{base_url}' cannot carry a path"
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        // A local backend must not be routed through a system proxy
        if is_loopback(&base) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base, auth })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Appends each segment to the base path, percent-encoding it as one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ChatError::config(format!("Base URL '{}' cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn session_url(&self, session_id: &SessionId) -> Result<Url> {
        let id = session_id.as_str();
        // Dot segments are dropped from paths, which would address the list endpoint
        if id.trim().is_empty() || id == "." || id == ".." {
            return Err(ChatError::not_found("Session", id));
        }
        self.endpoint(&["chat", "sessions", id])
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| ChatError::transport(format!("Chat request failed: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        tracing::warn!(
            "[HttpChatGateway] Backend answered {}: {}",
            status,
            message.as_deref().unwrap_or("<no message>")
        );

        if status == StatusCode::UNAUTHORIZED {
            return Err(ChatError::Unauthorized(message));
        }
        Err(ChatError::gateway(status.as_u16(), message))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|err| ChatError::Serialization {
            format: "JSON".to_string(),
            message: format!("Failed to parse chat response: {err}"),
        })
    }
}

/// Lists may come bare or wrapped in an object keyed by the collection name.
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionList {
    Bare(Vec<Session>),
    Wrapped { sessions: Vec<Session> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionList {
    Bare(Vec<String>),
    Wrapped { suggestions: Vec<String> },
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        tracing::debug!("[HttpChatGateway] list_sessions");
        let response = self.execute(self.client.get(self.endpoint(&["chat", "sessions"])?)).await?;
        Ok(match Self::read_json::<SessionList>(response).await? {
            SessionList::Bare(sessions) | SessionList::Wrapped { sessions } => sessions,
        })
    }

    async fn get_session(&self, session_id: &SessionId) -> Result<SessionDetail> {
        tracing::debug!("[HttpChatGateway] get_session: {}", session_id);
        let response = self.execute(self.client.get(self.session_url(session_id)?)).await?;
        Self::read_json(response).await
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse> {
        tracing::debug!(
            "[HttpChatGateway] send_message: session={:?}, {} chars",
            request.session_id.as_ref().map(SessionId::as_str),
            request.message.chars().count()
        );
        let response = self
            .execute(self.client.post(self.endpoint(&["chat", "message"])?).json(&request))
            .await?;
        Self::read_json(response).await
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        tracing::debug!("[HttpChatGateway] delete_session: {}", session_id);
        self.execute(self.client.delete(self.session_url(session_id)?))
            .await?;
        Ok(())
    }

    async fn list_suggestions(&self) -> Result<Vec<String>> {
        tracing::debug!("[HttpChatGateway] list_suggestions");
        let response = self
            .execute(self.client.get(self.endpoint(&["chat", "suggestions"])?))
            .await?;
        Ok(match Self::read_json::<SuggestionList>(response).await? {
            SuggestionList::Bare(items) | SuggestionList::Wrapped { suggestions: items } => items,
        })
    }
}

fn is_loopback(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    host.eq_ignore_ascii_case("localhost")
        || host
            .trim_matches(|c| c == '[' || c == ']')
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}

/// Pulls a human-readable message out of an error body.
///
/// Looks at `message`, then `detail` (string, or list of `{ "msg": .. }`),
/// then `error`. Non-JSON bodies yield `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let non_empty = |v: &serde_json::Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(message) = value.get("message").and_then(non_empty) {
        return Some(message);
    }
    match value.get("detail") {
        Some(detail) if detail.is_string() => {
            if let Some(message) = non_empty(detail) {
                return Some(message);
            }
        }
        Some(serde_json::Value::Array(items)) => {
            if let Some(message) = items
                .iter()
                .find_map(|item| item.get("msg").and_then(non_empty))
            {
                return Some(message);
            }
        }
        _ => {}
    }
    value.get("error").and_then(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_field() {
        assert_eq!(
            extract_error_message(r#"{"message":"Rate limited"}"#),
            Some("Rate limited".to_string())
        );
    }

    #[test]
    fn test_extract_detail_variants() {
        assert_eq!(
            extract_error_message(r#"{"detail":"Session not found"}"#),
            Some("Session not found".to_string())
        );
        assert_eq!(
            extract_error_message(r#"{"detail":[{"loc":["body","message"],"msg":"field required"}]}"#),
            Some("field required".to_string())
        );
    }

    #[test]
    fn test_extract_nothing_useful() {
        assert_eq!(extract_error_message(""), None);
        assert_eq!(extract_error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_error_message(r#"{"message":""}"#), None);
        assert_eq!(extract_error_message(r#"{"status":"fail"}"#), None);
    }

    #[test]
    fn test_is_loopback() {
        let loopback = |s: &str| is_loopback(&Url::parse(s).unwrap());
        assert!(loopback("http://localhost:8000/api"));
        assert!(loopback("http://127.0.0.1:9/api"));
        assert!(loopback("http://[::1]:9/api"));
        assert!(!loopback("https://exim.example/api"));
    }

    fn gateway(base_url: &str) -> HttpChatGateway {
        let config = ClientConfig::default().with_base_url(base_url);
        HttpChatGateway::new(&config, AuthSession::anonymous()).unwrap()
    }

    #[test]
    fn test_urls() {
        let gateway = gateway("https://exim.example/api/");
        assert_eq!(gateway.base_url(), "https://exim.example/api");
        assert_eq!(
            gateway.endpoint(&["chat", "sessions"]).unwrap().as_str(),
            "https://exim.example/api/chat/sessions"
        );
        assert_eq!(
            gateway.session_url(&SessionId::from(42u64)).unwrap().as_str(),
            "https://exim.example/api/chat/sessions/42"
        );
    }

    #[test]
    fn test_urls_without_base_path() {
        let gateway = gateway("http://localhost:8000");
        assert_eq!(
            gateway.endpoint(&["chat", "message"]).unwrap().as_str(),
            "http://localhost:8000/chat/message"
        );
    }

    #[test]
    fn test_session_id_stays_one_segment() {
        let gateway = gateway("https://exim.example/api");
        assert_eq!(
            gateway.session_url(&SessionId::from("../message")).unwrap().as_str(),
            "https://exim.example/api/chat/sessions/..%2Fmessage"
        );
        assert_eq!(
            gateway.session_url(&SessionId::from("5?x=1#frag")).unwrap().as_str(),
            "https://exim.example/api/chat/sessions/5%3Fx=1%23frag"
        );
    }

    #[test]
    fn test_dot_session_ids_rejected() {
        let gateway = gateway("https://exim.example/api");
        for id in ["", " ", ".", ".."] {
            let err = gateway.session_url(&SessionId::from(id)).unwrap_err();
            assert!(err.is_not_found(), "id {id:?} should be rejected");
        }
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ClientConfig::default().with_base_url("not a url");
        let err = HttpChatGateway::new(&config, AuthSession::anonymous()).err().unwrap();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
