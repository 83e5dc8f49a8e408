//! Per-call options.
//!
//! [`Options`] is passed by reference through every layer of a stack and is
//! never modified on the way. Layers that do not understand a field ignore it.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Time-to-live requested for a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry never expires, overriding any configured default.
    Never,
    /// The entry expires once this much time has passed since the write.
    After(Duration),
}

impl Expiry {
    /// Absolute expiration timestamp for an entry written at `now`.
    ///
    /// Returns `None` for [`Expiry::Never`]. A duration too large to be
    /// represented also yields `None`.
    pub fn deadline(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Expiry::Never => None,
            Expiry::After(ttl) => {
                let ttl = chrono::Duration::from_std(*ttl).ok()?;
                now.checked_add_signed(ttl)
            }
        }
    }

    /// Builds an expiry from a number of seconds, `0` meaning never.
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Expiry::Never
        } else {
            Expiry::After(Duration::from_secs(secs))
        }
    }
}

/// Immutable options accompanying one store operation.
///
/// ```
/// use std::time::Duration;
/// use stowage_core::{Expiry, Options};
///
/// let options = Options::default().expires_in(Duration::from_secs(30));
/// assert_eq!(options.expires, Some(Expiry::After(Duration::from_secs(30))));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Overrides the default time-to-live of an expiring layer or adapter.
    ///
    /// `None` keeps the configured default.
    pub expires: Option<Expiry>,
}

impl Options {
    /// Options with every field left at its default.
    pub const fn new() -> Self {
        Self { expires: None }
    }

    /// Requests that the written entry expires after `ttl`.
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.expires = Some(Expiry::After(ttl));
        self
    }

    /// Requests that the written entry never expires.
    pub fn never_expire(mut self) -> Self {
        self.expires = Some(Expiry::Never);
        self
    }
}
