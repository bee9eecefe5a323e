use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::protocol::{AssessmentResponse, ProgressRequest, RevealRequest, RevealResponse};

/// The remote assessment service, seen from the client.
#[async_trait]
pub trait AssessmentService: Send + Sync {
    /// Send the whole session state and get the next step back.
    async fn progress(&self, request: &ProgressRequest) -> Result<AssessmentResponse, ClientError>;

    /// Ask for the answer to `question`.
    async fn reveal_answer(&self, question: &str) -> Result<String, ClientError>;
}

/// `AssessmentService` over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpAssessmentClient {
    client: Client,
    base_url: String,
}

impl HttpAssessmentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "posting to assessment service");

        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AssessmentService for HttpAssessmentClient {
    async fn progress(&self, request: &ProgressRequest) -> Result<AssessmentResponse, ClientError> {
        self.post("career-assessment", request).await
    }

    async fn reveal_answer(&self, question: &str) -> Result<String, ClientError> {
        let request = RevealRequest {
            question: question.to_string(),
        };
        let response: RevealResponse = self.post("reveal-answer", &request).await?;
        Ok(response.answer)
    }
}

/// A request the controller wants sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Progress(ProgressRequest),
    Reveal(RevealRequest),
}

/// What came back for a `PendingRequest`.
#[derive(Debug)]
pub enum Reply {
    Progress(Result<AssessmentResponse, ClientError>),
    Reveal(Result<String, ClientError>),
}

impl PendingRequest {
    /// Perform the exchange. Never fails on its own; failures travel inside
    /// the reply so the controller can apply its fallbacks.
    pub async fn send<S>(self, service: &S) -> Reply
    where
        S: AssessmentService + ?Sized,
    {
        match self {
            PendingRequest::Progress(request) => Reply::Progress(service.progress(&request).await),
            PendingRequest::Reveal(request) => {
                Reply::Reveal(service.reveal_answer(&request.question).await)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = HttpAssessmentClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        // Grab a free port, then release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = HttpAssessmentClient::new(&format!("http://127.0.0.1:{port}"));
        let reply = PendingRequest::Reveal(RevealRequest {
            question: "Q".into(),
        })
        .send(&client)
        .await;

        match reply {
            Reply::Reveal(Err(ClientError::Http(_) | ClientError::Status(_))) => {}
            other => panic!("expected a transport error, got {other:?}"),
        }
    }
}
