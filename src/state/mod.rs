//! Persisted stores: per-repository session records and the per-user
//! auth-mode flag

pub mod auth;
pub mod sessions;

pub use auth::AuthStore;
pub use sessions::{capture_record, SessionError, SessionStore, RETENTION_DAYS, SESSION_DIR};
