//! HTTP client for the answering service

use crate::config::Config;
use serde::Deserialize;
use std::time::Instant;
use tokio::time::Duration;

/// Outcome of one exchange with the answering service.
///
/// `ask` never returns an error: every failure class is data, because the
/// conversation surfaces failures as transcript turns rather than through
/// a separate error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    /// Successful reply carrying the answer text
    Answer(String),
    /// Success status but the JSON body had no `response` field
    MissingField,
    /// Non-success status; the body is surfaced verbatim
    ServiceError {
        status: reqwest::StatusCode,
        body: String,
    },
    /// No response at all: connection refused, timeout, DNS failure
    Transport(String),
}

/// Success payload shape: `{"response": "..."}`
#[derive(Debug, Deserialize)]
struct AnswerPayload {
    response: Option<String>,
}

/// Client for the answering service endpoint
#[derive(Clone)]
pub struct AnsweringClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AnsweringClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Send one query and classify the outcome. The query text goes out
    /// verbatim as a single form-url-encoded `query` field.
    pub async fn ask(&self, query: &str) -> ServiceReply {
        let started = Instant::now();

        let response = match self
            .http
            .post(&self.endpoint)
            .form(&[("query", query)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("request to {} failed: {}", self.endpoint, e);
                return ServiceReply::Transport(e.to_string());
            }
        };

        let status = response.status();
        let elapsed = started.elapsed().as_millis();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "{} answered {} after {}ms: {}",
                self.endpoint,
                status,
                elapsed,
                body
            );
            return ServiceReply::ServiceError { status, body };
        }

        match response.json::<AnswerPayload>().await {
            Ok(AnswerPayload {
                response: Some(text),
            }) => {
                log::info!("{} answered {} after {}ms", self.endpoint, status, elapsed);
                ServiceReply::Answer(text)
            }
            Ok(AnswerPayload { response: None }) => {
                log::warn!("{} answered without a response field", self.endpoint);
                ServiceReply::MissingField
            }
            // A body that fails to read or parse is an exception during
            // the exchange, not a recognized-but-degraded payload.
            Err(e) => {
                log::warn!("{} reply could not be decoded: {}", self.endpoint, e);
                ServiceReply::Transport(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnsweringClient {
        AnsweringClient::new(format!("{}/chat", server.uri()), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn success_reply_yields_answer_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "the answer"
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server).ask("anything").await;
        assert_eq!(reply, ServiceReply::Answer("the answer".to_string()));
    }

    #[tokio::test]
    async fn query_goes_out_as_one_form_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("query=two+words"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).ask("two words").await;
        assert_eq!(reply, ServiceReply::Answer("ok".to_string()));
    }

    #[tokio::test]
    async fn empty_json_object_means_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let reply = client_for(&server).ask("q").await;
        assert_eq!(reply, ServiceReply::MissingField);
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        match client_for(&server).ask("q").await {
            ServiceReply::Transport(desc) => assert!(!desc.is_empty()),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_surfaces_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let reply = client_for(&server).ask("q").await;
        assert_eq!(
            reply,
            ServiceReply::ServiceError {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "internal error".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        // Port 1 is never serving; connection is refused immediately.
        let client = AnsweringClient::new("http://127.0.0.1:1/chat", Duration::from_secs(5));
        match client.ask("q").await {
            ServiceReply::Transport(desc) => assert!(!desc.is_empty()),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }
}
