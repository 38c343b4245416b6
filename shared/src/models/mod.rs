//! Data models for the Shepherd application.
//!
//! Field names serialize in camelCase to match the JSON contract of the REST API.

use serde::{Deserialize, Deserializer};

mod attendance;
mod auth;
mod community;
mod contribution;
mod event;
mod member;
mod user;

pub use attendance::*;
pub use auth::*;
pub use community::*;
pub use contribution::*;
pub use event::*;
pub use member::*;
pub use user::*;

/// Read a present field as `Some`, so an explicit `null` becomes `Some(None)`
/// while an absent field stays `None` through `#[serde(default)]`.
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
