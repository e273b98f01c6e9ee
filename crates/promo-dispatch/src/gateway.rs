//! Outbound platform calls, direct or through the credential relay.
//!
//! The gateway performs exactly one HTTP round trip per call and hands the
//! decoded platform envelope back to the caller. A non-2xx HTTP status is a
//! fatal transport error; a 2xx body may still carry `ok: false`, which the
//! caller must inspect (the sender does).

use promo_types::{DispatchError, RelayRequest};
use serde::Deserialize;

/// Response envelope returned by every platform operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Optional machine-readable hints attached to error envelopes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
}

impl ApiEnvelope {
    /// The new chat id when the platform reports the chat was migrated
    /// (group upgraded to supergroup). Only set on `error_code` 400 bodies.
    pub fn migrate_hint(&self) -> Option<i64> {
        if self.error_code == Some(400) {
            self.parameters.as_ref().and_then(|p| p.migrate_to_chat_id)
        } else {
            None
        }
    }

    pub fn description_or_unknown(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "unknown platform error".to_string())
    }
}

/// Performs the outbound HTTP call for one platform operation.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: reqwest::Client,
    mode: GatewayMode,
}

#[derive(Debug, Clone)]
enum GatewayMode {
    /// Call the platform API directly, carrying the bot token in the URL.
    Direct { api_base: String, token: String },
    /// Call through the relay; the relay holds the real token and this
    /// client only knows a credential alias.
    Relay {
        url: String,
        auth_token: String,
        credential: String,
    },
}

impl Gateway {
    pub fn direct(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self, DispatchError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DispatchError::Configuration(
                "Bot credential is not configured".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            mode: GatewayMode::Direct {
                api_base: api_base.into(),
                token,
            },
        })
    }

    pub fn relay(
        url: impl Into<String>,
        auth_token: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        let auth_token = auth_token.into();
        let credential = credential.into();
        if auth_token.trim().is_empty() || credential.trim().is_empty() {
            return Err(DispatchError::Configuration(
                "Relay credential is not configured".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            mode: GatewayMode::Relay {
                url: url.into(),
                auth_token,
                credential,
            },
        })
    }

    /// Build a gateway from loaded configuration. Relay settings win when
    /// present; otherwise a direct gateway with the configured bot token.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, DispatchError> {
        match &config.platform.relay {
            Some(relay) => Self::relay(&relay.url, &relay.auth_token, &relay.credential),
            None => Self::direct(&config.platform.api_base, &config.platform.bot_token),
        }
    }

    /// Invoke one platform operation and decode its envelope.
    pub async fn call(
        &self,
        operation: &str,
        params: &serde_json::Value,
    ) -> Result<ApiEnvelope, DispatchError> {
        let response = match &self.mode {
            GatewayMode::Direct { api_base, token } => {
                let url = format!("{api_base}/bot{token}/{operation}");
                self.client.post(&url).json(params).send().await
            }
            GatewayMode::Relay {
                url,
                auth_token,
                credential,
            } => {
                let body = RelayRequest {
                    credential: credential.clone(),
                    operation: operation.to_string(),
                    params: params.clone(),
                };
                self.client
                    .post(format!("{url}/relay"))
                    .bearer_auth(auth_token)
                    .json(&body)
                    .send()
                    .await
            }
        };

        let response = response.map_err(|e| DispatchError::Transport {
            description: format!("HTTP request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(operation = %operation, status = %status, "Platform call rejected at transport level");
            return Err(DispatchError::Transport {
                description: format!("{operation} returned HTTP {status}: {body}"),
            });
        }

        response
            .json::<ApiEnvelope>()
            .await
            .map_err(|e| DispatchError::Transport {
                description: format!("Invalid envelope from {operation}: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ── Envelope decoding ─────────────────────────────────────────────────────

    #[test]
    fn ok_envelope_decodes_without_optional_fields() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"ok":true,"result":{"message_id":42}}"#).unwrap();
        assert!(envelope.ok);
        assert!(envelope.migrate_hint().is_none());
    }

    #[test]
    fn migration_envelope_exposes_the_new_chat_id() {
        let envelope: ApiEnvelope = serde_json::from_str(
            r#"{"ok":false,"error_code":400,
                "description":"Bad Request: group chat was upgraded to a supergroup chat",
                "parameters":{"migrate_to_chat_id":-1002003004005}}"#,
        )
        .unwrap();
        assert_eq!(envelope.migrate_hint(), Some(-1002003004005));
    }

    #[test]
    fn migrate_hint_requires_error_code_400() {
        // A hint on any other code is not a migration signal.
        let envelope: ApiEnvelope = serde_json::from_str(
            r#"{"ok":false,"error_code":403,
                "parameters":{"migrate_to_chat_id":-100}}"#,
        )
        .unwrap();
        assert!(envelope.migrate_hint().is_none());
        assert_eq!(envelope.description_or_unknown(), "unknown platform error");
    }

    // ── Direct mode ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn direct_call_posts_params_to_the_operation_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot1234:abc/sendMessage"))
            .and(body_partial_json(json!({"chat_id": "-100", "text": "hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();
        let envelope = gateway
            .call("sendMessage", &json!({"chat_id": "-100", "text": "hi"}))
            .await
            .unwrap();

        assert!(envelope.ok);
    }

    #[tokio::test]
    async fn application_level_failure_is_returned_as_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot1234:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was kicked from the group chat"
            })))
            .mount(&server)
            .await;

        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();
        let envelope = gateway.call("sendMessage", &json!({})).await.unwrap();

        // A 2xx with ok:false is not a gateway error — the sender inspects it.
        assert!(!envelope.ok);
        assert_eq!(envelope.error_code, Some(403));
        assert!(envelope.description_or_unknown().contains("kicked"));
    }

    #[tokio::test]
    async fn empty_token_is_a_configuration_error_before_any_call() {
        let err = Gateway::direct("https://api.example.com", "  ").unwrap_err();
        assert!(matches!(err, DispatchError::Configuration(_)));
    }

    // ── Relay mode ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn relay_call_wraps_operation_and_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/relay"))
            .and(header("authorization", "Bearer relay-s3cret"))
            .and(body_partial_json(json!({
                "credential": "shop-promotions",
                "operation": "sendPhoto",
                "params": {"chat_id": "-100"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::relay(server.uri(), "relay-s3cret", "shop-promotions").unwrap();
        let envelope = gateway
            .call("sendPhoto", &json!({"chat_id": "-100"}))
            .await
            .unwrap();

        assert!(envelope.ok);
    }

    #[tokio::test]
    async fn non_2xx_from_relay_is_a_fatal_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/relay"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let gateway = Gateway::relay(server.uri(), "wrong-token", "shop-promotions").unwrap();
        let err = gateway.call("sendMessage", &json!({})).await.unwrap_err();

        match err {
            DispatchError::Transport { description } => {
                assert!(description.contains("401"), "got: {description}");
            }
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway timeout</html>"))
            .mount(&server)
            .await;

        let gateway = Gateway::direct(server.uri(), "1234:abc").unwrap();
        let err = gateway.call("getChat", &json!({})).await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
    }
}
