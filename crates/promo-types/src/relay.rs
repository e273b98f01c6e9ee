//! Wire message exchanged between the dispatcher gateway and the relay.

use serde::{Deserialize, Serialize};

/// Body of `POST /relay`.
///
/// `credential` is an alias the relay resolves against its configured
/// credential map — callers never hold the long-lived bot token. The relay
/// forwards `operation` with `params` to the platform API and returns the
/// response envelope unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub credential: String,
    pub operation: String,
    pub params: serde_json::Value,
}
