//! Roster Client - HTTP client for the roster server
//!
//! Calls `/clients` with bounded retry and an overall deadline, and
//! provides the presentation helpers the roster page needs (urgency
//! ordering, badges, search, WhatsApp reminders).

pub mod config;
pub mod error;
pub mod http;
pub mod view;

pub use config::{ClientConfig, RetryPolicy};
pub use error::{ClientError, ClientResult};
pub use http::RosterClient;
pub use view::{Badge, RosterEntry, search, sort_by_urgency, whatsapp_link};

// Re-export shared types for convenience
pub use shared::models::{ClientInput, ClientRecord, ClientView, DeleteClientResponse};
