//! Shared types for the gym roster
//!
//! The client record model, membership date arithmetic and the unified
//! error taxonomy used by both `roster-server` and `roster-client`.

pub mod error;
pub mod membership;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use membership::MembershipStatus;
pub use models::{ClientDraft, ClientInput, ClientRecord, ClientView};
