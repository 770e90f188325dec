// src/session/mod.rs
//! Persisted browser session: the on-disk state file and interactive login

pub mod capture;
pub mod state;

pub use capture::capture_login_session;
pub use state::{OriginStorage, SessionState, StorageEntry, StoredCookie};
