use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;

use postbox_types::api::{SubmitMessageRequest, SubmitMessageResponse, ValidationErrorResponse};
use postbox_types::validation::FieldErrors;

/// What the submission endpoint said about a well-formed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 201: the message was stored under `id`.
    Created { id: i64, message: String },
    /// 400 with per-field errors.
    Rejected(FieldErrors),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response status {0}")]
    UnexpectedStatus(u16),

    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

/// The one backend call the form makes.
pub trait MessagesApi {
    fn submit(
        &self,
        req: &SubmitMessageRequest,
    ) -> impl Future<Output = Result<SubmitOutcome, ClientError>> + Send;
}

/// `MessagesApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("postbox-form/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn messages_url(&self) -> String {
        format!("{}/api/messages", self.base_url)
    }
}

impl MessagesApi for HttpApi {
    async fn submit(&self, req: &SubmitMessageRequest) -> Result<SubmitOutcome, ClientError> {
        let response = self.client.post(self.messages_url()).json(req).send().await?;

        match response.status() {
            StatusCode::CREATED => {
                let body: SubmitMessageResponse = response
                    .json()
                    .await
                    .map_err(|e| ClientError::UnexpectedBody(e.to_string()))?;
                if !body.success {
                    return Err(ClientError::UnexpectedBody("success flag not set".into()));
                }
                Ok(SubmitOutcome::Created {
                    id: body.id,
                    message: body.message,
                })
            }
            // A 400 without an error list (e.g. a malformed body) is not a
            // field rejection.
            StatusCode::BAD_REQUEST => {
                let body: ValidationErrorResponse = response
                    .json()
                    .await
                    .map_err(|e| ClientError::UnexpectedBody(e.to_string()))?;
                Ok(SubmitOutcome::Rejected(FieldErrors::from_entries(&body.errors)))
            }
            other => Err(ClientError::UnexpectedStatus(other.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpApi::new("http://localhost:5000/").unwrap();
        assert_eq!(api.messages_url(), "http://localhost:5000/api/messages");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let api = HttpApi::new("http://127.0.0.1:9").unwrap();
        let err = api
            .submit(&SubmitMessageRequest::new("Иван", "80291234567", "Привет!"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
