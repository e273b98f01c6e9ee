//! Wire-operation selection from message shape.
//!
//! Exactly one operation per message: plain text, a single photo with a
//! caption, or a media group where only the first item carries the caption.

use promo_types::PromotionMessage;
use serde_json::{json, Value};

pub const OP_SEND_MESSAGE: &str = "sendMessage";
pub const OP_SEND_PHOTO: &str = "sendPhoto";
pub const OP_SEND_MEDIA_GROUP: &str = "sendMediaGroup";
pub const OP_GET_CHAT: &str = "getChat";

/// One fully-built platform call: operation name plus JSON params.
#[derive(Debug, Clone)]
pub struct WireCall {
    pub operation: &'static str,
    pub params: Value,
}

/// Select the wire operation for `message` addressed to `chat_id`.
pub fn select(chat_id: &str, message: &PromotionMessage) -> WireCall {
    let parse_mode = message.effective_parse_mode().as_str();

    match message.images.len() {
        0 => WireCall {
            operation: OP_SEND_MESSAGE,
            params: json!({
                "chat_id": chat_id,
                "text": message.text,
                "parse_mode": parse_mode,
            }),
        },
        1 => WireCall {
            operation: OP_SEND_PHOTO,
            params: json!({
                "chat_id": chat_id,
                "photo": message.images[0],
                "caption": message.text,
                "parse_mode": parse_mode,
            }),
        },
        _ => {
            // Only the first item carries the caption; the platform renders
            // it under the whole album.
            let media: Vec<Value> = message
                .images
                .iter()
                .enumerate()
                .map(|(i, url)| {
                    if i == 0 {
                        json!({
                            "type": "photo",
                            "media": url,
                            "caption": message.text,
                            "parse_mode": parse_mode,
                        })
                    } else {
                        json!({"type": "photo", "media": url})
                    }
                })
                .collect();

            WireCall {
                operation: OP_SEND_MEDIA_GROUP,
                params: json!({
                    "chat_id": chat_id,
                    "media": media,
                }),
            }
        }
    }
}
