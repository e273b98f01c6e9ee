//! Migration-aware send: one platform call, one retry when the chat moved.
//!
//! When the platform answers a send with `error_code` 400 and a
//! `migrate_to_chat_id` hint (group upgraded to supergroup), the identical
//! operation is retried exactly once against the new id. The new id is only
//! logged — the persisted department configuration is NOT updated here; an
//! operator has to do that, or every future send pays the retry.

use promo_types::{DispatchError, PromotionMessage};

use crate::gateway::Gateway;
use crate::transport;

/// Send `message` to the resolved `chat_id`, retrying once on migration.
pub async fn send_with_migration_retry(
    gateway: &Gateway,
    chat_id: &str,
    message: &PromotionMessage,
) -> Result<(), DispatchError> {
    let call = transport::select(chat_id, message);
    let envelope = gateway.call(call.operation, &call.params).await?;

    if envelope.ok {
        return Ok(());
    }

    let Some(new_chat_id) = envelope.migrate_hint() else {
        return Err(DispatchError::Transport {
            description: envelope.description_or_unknown(),
        });
    };

    tracing::warn!(
        old_chat_id = %chat_id,
        new_chat_id = %new_chat_id,
        "Chat migrated; retrying once. Update the department's stored chat id to avoid this retry on every send"
    );

    let retry_id = new_chat_id.to_string();
    let retry_call = transport::select(&retry_id, message);
    let retry_envelope = gateway.call(retry_call.operation, &retry_call.params).await?;

    if retry_envelope.ok {
        return Ok(());
    }

    // Terminal for this recipient; never retries a second migration.
    Err(DispatchError::MigrationRetry {
        new_chat_id,
        description: retry_envelope.description_or_unknown(),
    })
}
