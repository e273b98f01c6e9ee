//! Credential-holding relay for the promotion dispatcher.
//!
//! # Architecture
//!
//! ```text
//! dispatcher → POST http://relay:8080/relay
//!              Authorization: Bearer <static client token>
//!              { "credential": "shop-promotions", "operation": "sendMessage", "params": {…} }
//!                  ↓
//!             [axum handler]
//!                  ↓ resolves credential alias → real bot token (config map)
//!                  ↓ POST {api_base}/bot{token}/{operation} with params
//!             [platform bot API]
//!                  ↓
//!             relay returns the platform envelope body and status unchanged
//! ```
//!
//! The dispatcher never holds the long-lived bot token; it only knows a
//! credential alias and the relay's bearer token.

pub mod config;
pub mod relay;

pub use config::RelayConfig;
pub use relay::{router, RelayState};
