//! GraphQL query executor over an authenticated session.
//!
//! Responses are decoded in two passes: the envelope into an untyped map,
//! then the `data` map re-encoded and decoded into the caller's type.

use reqwest::header::{CONTENT_TYPE, ORIGIN};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, warn, Level};

use super::envelope::{GraphQlRequest, GraphQlResponse, Variables};
use crate::auth::Session;
use crate::cancel::CancellationToken;
use crate::error::QueryError;

/// Path of the GraphQL endpoint.
const GRAPHQL_PATH: &str = "/api/graphql";

/// Executes GraphQL queries against the LLDAP admin API.
pub struct GraphQlClient {
    session: Session,
}

impl GraphQlClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run `query` and return the untyped `data` map.
    ///
    /// The request is abandoned as soon as `cancel` fires, yielding
    /// [`QueryError::Cancelled`].
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        query: &str,
        variables: Option<Variables>,
    ) -> Result<Map<String, Value>, QueryError> {
        let request = GraphQlRequest::new(query, variables);
        let body = serde_json::to_vec(&request)?;

        if tracing::enabled!(Level::DEBUG) {
            debug!("GraphQL request:\n{}", serde_json::to_string_pretty(&request)?);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("GraphQL request cancelled");
                Err(QueryError::Cancelled)
            }
            result = self.send(body) => result,
        }
    }

    /// Run `query` and decode its `data` into `T`.
    pub async fn execute_typed<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        query: &str,
        variables: Option<Variables>,
    ) -> Result<T, QueryError> {
        let data = self.execute(cancel, query, variables).await?;
        decode_data(&data)
    }

    async fn send(&self, body: Vec<u8>) -> Result<Map<String, Value>, QueryError> {
        let url = format!("{}{}", self.session.endpoint(), GRAPHQL_PATH);
        debug!("HTTP URI: {}", url);

        let mut request = self
            .session
            .http_client()
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ORIGIN, self.session.endpoint())
            .body(body);

        if let Some(token) = self.session.token().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        } else {
            debug!("No bearer token on session, sending unauthenticated request");
        }

        let response = request
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("GraphQL request failed: HTTP {} - {}", status, body);
            return Err(QueryError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        decode_envelope(&bytes)
    }
}

/// First pass: parse the response envelope and surface GraphQL errors.
///
/// Only the first reported error is returned; the rest are dropped.
fn decode_envelope(body: &[u8]) -> Result<Map<String, Value>, QueryError> {
    let envelope: GraphQlResponse =
        serde_json::from_slice(body).map_err(|e| QueryError::EnvelopeDecode(e.to_string()))?;

    let errors = envelope.errors.unwrap_or_default();
    if errors.len() > 1 {
        warn!(
            "GraphQL response carried {} errors, reporting only the first",
            errors.len()
        );
    }
    if let Some(first) = errors.into_iter().next() {
        error!(path = ?first.path, "GraphQL error: {}", first.message);
        return Err(QueryError::GraphQl {
            message: first.message,
        });
    }

    let data = envelope.data.unwrap_or_default();
    debug!("GraphQL response data has {} top-level fields", data.len());
    Ok(data)
}

/// Second pass: re-encode the `data` map and decode it into `T`.
fn decode_data<T: DeserializeOwned>(data: &Map<String, Value>) -> Result<T, QueryError> {
    let bytes = serde_json::to_vec(data).map_err(|e| QueryError::ResultDecode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| QueryError::ResultDecode(e.to_string()))
}
