//! Axum handler for `POST /relay`.
//!
//! Authorizes the caller with a static bearer token, resolves the credential
//! alias to the real bot token, forwards the operation to the platform API,
//! and returns the platform envelope body and status unchanged — including
//! non-2xx upstream statuses, which the dispatcher treats as fatal transport
//! errors.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use promo_types::RelayRequest;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RelayState {
    pub http: reqwest::Client,
    pub auth_token: Arc<str>,
    pub api_base: Arc<str>,
    /// Credential alias → real bot token.
    pub credentials: Arc<HashMap<String, String>>,
}

impl RelayState {
    pub fn new(config: &crate::config::RelayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_token: config.auth_token.clone().into(),
            api_base: config.api_base.clone().into(),
            credentials: Arc::new(config.credentials.clone()),
        }
    }
}

/// Build the axum router for the relay.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/relay", post(handle_relay))
        .with_state(state)
}

async fn handle_relay(
    State(state): State<RelayState>,
    headers: HeaderMap,
    Json(request): Json<RelayRequest>,
) -> Result<Response, RelayError> {
    authorize(&headers, &state.auth_token)?;

    let token = state
        .credentials
        .get(&request.credential)
        .ok_or(RelayError::UnknownCredential)?;

    tracing::debug!(
        credential = %request.credential,
        operation = %request.operation,
        "Forwarding relayed operation"
    );

    let url = format!(
        "{}/bot{}/{}",
        state.api_base, token, request.operation
    );
    let upstream = state
        .http
        .post(&url)
        .json(&request.params)
        .send()
        .await
        .map_err(|e| RelayError::Upstream(e.to_string()))?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body = upstream
        .bytes()
        .await
        .map_err(|e| RelayError::Upstream(format!("Failed to read upstream body: {e}")))?;

    // The envelope passes through unchanged.
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap())
}

/// Check the static bearer token. The comparison is byte-exact: a lowercase
/// scheme or padded whitespace does not authorize.
fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), RelayError> {
    if expected.is_empty() {
        // A blank configured token never authorizes anyone.
        return Err(RelayError::Unauthorized);
    }

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(RelayError::Unauthorized)?;

    if presented != expected {
        return Err(RelayError::Unauthorized);
    }
    Ok(())
}

/// Errors the relay handler can produce.
#[derive(Debug)]
pub enum RelayError {
    Unauthorized,
    /// The alias does not name a configured credential. Reported with the
    /// same status as a bad bearer so callers cannot probe for valid aliases.
    UnknownCredential,
    Upstream(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Missing or invalid bearer token"),
            Self::UnknownCredential => write!(f, "Unknown credential"),
            Self::Upstream(e) => write!(f, "Upstream platform call failed: {e}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized | Self::UnknownCredential => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        tracing::warn!(error = %self, "Relay request rejected");

        Response::builder()
            .status(status)
            .body(Body::from(self.to_string()))
            .unwrap()
    }
}
