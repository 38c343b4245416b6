//! Shepherd Client - HTTP client for the Shepherd backend
//!
//! Provides typed REST calls, a [`Store`] that keeps a local snapshot of every
//! collection in sync with the server, and outreach message drafting.

pub mod config;
pub mod error;
pub mod http;
pub mod outreach;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use outreach::{
    OutreachConfig, OutreachDrafter, OutreachError, OutreachLanguage, DEFAULT_DAYS_ABSENT,
};
pub use store::{Snapshot, Store};

// Re-export shared types for convenience
pub use shepherd_shared::insights;
pub use shepherd_shared::models;
