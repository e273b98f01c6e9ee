//! Chat identifier resolution.
//!
//! Numeric identifiers pass through untouched; anything else is treated as a
//! username handle and resolved through the platform `getChat` operation.
//! Resolution happens lazily, once per send attempt — results are not cached.

use promo_types::DispatchError;
use serde_json::json;

use crate::gateway::Gateway;
use crate::transport::OP_GET_CHAT;

/// True when `s` is a numeric platform chat id (an optional leading `-`
/// followed only by digits).
pub fn is_numeric_chat_id(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize a username handle to the single `@name` form the platform
/// expects, so `"@shop"` and `"shop"` produce the identical call.
fn normalize_username(raw: &str) -> String {
    format!("@{}", raw.trim().trim_start_matches('@'))
}

/// Resolve `raw` to a numeric chat id, calling `getChat` when needed.
pub async fn resolve_chat_id(gateway: &Gateway, raw: &str) -> Result<String, DispatchError> {
    let raw = raw.trim();
    if is_numeric_chat_id(raw) {
        return Ok(raw.to_string());
    }

    let username = normalize_username(raw);
    tracing::debug!(identifier = %raw, username = %username, "Resolving chat identifier via getChat");

    let envelope = gateway
        .call(OP_GET_CHAT, &json!({"chat_id": username}))
        .await
        .map_err(|e| DispatchError::Resolution {
            identifier: raw.to_string(),
            reason: e.to_string(),
        })?;

    if !envelope.ok {
        return Err(DispatchError::Resolution {
            identifier: raw.to_string(),
            reason: envelope.description_or_unknown(),
        });
    }

    envelope
        .result
        .as_ref()
        .and_then(|r| r.get("id"))
        .and_then(|id| id.as_i64())
        .map(|id| id.to_string())
        .ok_or_else(|| DispatchError::Resolution {
            identifier: raw.to_string(),
            reason: "getChat returned no chat id".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn numeric_ids_pass_through() {
        assert!(is_numeric_chat_id("123456"));
        assert!(is_numeric_chat_id("-1002003004005"));
        assert!(!is_numeric_chat_id("@shop"));
        assert!(!is_numeric_chat_id("shop"));
        assert!(!is_numeric_chat_id("-"));
        assert!(!is_numeric_chat_id(""));
        assert!(!is_numeric_chat_id("12a4"));
    }

    #[tokio::test]
    async fn numeric_identifier_makes_no_network_call() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would 404 and fail the test below.
        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();

        let id = resolve_chat_id(&gateway, "-100200300").await.unwrap();
        assert_eq!(id, "-100200300");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn with_and_without_at_produce_the_identical_get_chat_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot1234:abc/getChat"))
            .and(body_json(json!({"chat_id": "@shop"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"id": -1009999, "type": "channel", "title": "Shop"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();

        let a = resolve_chat_id(&gateway, "@shop").await.unwrap();
        let b = resolve_chat_id(&gateway, "shop").await.unwrap();
        assert_eq!(a, "-1009999");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn unresolvable_handle_fails_with_identifier_and_hint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot1234:abc/getChat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();
        let err = resolve_chat_id(&gateway, "warehouse").await.unwrap_err();

        match &err {
            DispatchError::Resolution { identifier, reason } => {
                assert_eq!(identifier, "warehouse");
                assert!(reason.contains("chat not found"));
            }
            other => panic!("expected Resolution error, got {other:?}"),
        }
        assert!(err.to_string().contains("Ensure the bot is a member"));
    }

    #[tokio::test]
    async fn missing_id_in_result_is_a_resolution_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"type": "channel"}
            })))
            .mount(&server)
            .await;

        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();
        let err = resolve_chat_id(&gateway, "@shop").await.unwrap_err();
        assert!(matches!(err, DispatchError::Resolution { .. }));
    }
}
