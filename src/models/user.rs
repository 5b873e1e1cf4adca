//! The ID type for users.
//!
//! Users themselves (registration, credentials, sessions) are managed by the
//! auth layer outside this crate. This crate only ever sees a user as the
//! owner recorded on account and transaction rows, so all it needs is the ID.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from account and transaction IDs, leading
/// to better compile time errors when an ID is passed in the wrong position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw database ID as a user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
