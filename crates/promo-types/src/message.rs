//! Promotion message payload handed to the dispatcher by the admin backend.

use serde::{Deserialize, Serialize};

/// Text formatting mode understood by the chat platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
    Markdown,
}

impl ParseMode {
    /// Wire name of the mode as the platform API expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
        }
    }
}

/// A rendered promotion ready to broadcast.
///
/// Built by the admin UI from a product promotion; the dispatcher never
/// mutates it. `images` holds zero or more image URLs in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionMessage {
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Defaults to HTML at send time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
}

impl PromotionMessage {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
            parse_mode: None,
        }
    }

    /// The effective parse mode: explicit value or the HTML default.
    pub fn effective_parse_mode(&self) -> ParseMode {
        self.parse_mode.unwrap_or(ParseMode::Html)
    }
}
