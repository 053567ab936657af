//! Namespaced, time-bucketed cache key derivation.
//!
//! Keys scope external cache volumes per pipeline and production mode;
//! buster stamps force periodic invalidation by rotating the key when the
//! current UTC time crosses a bucket boundary. Derivation is pure: identical
//! inputs inside the same bucket window always yield the same key.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Granularity of the time bucket appended to a busted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusterLevel {
    /// No buster stamp; the key never rotates.
    #[default]
    None,
    Daily,
    Hourly,
    Minute,
    Second,
}

/// A cache volume key: semantic suffix, optional pipeline namespace,
/// optional production marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    key: String,
    namespace: Option<String>,
    production: bool,
}

impl CacheKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            namespace: None,
            production: false,
        }
    }

    /// Scope the key to a pipeline namespace. An empty namespace is
    /// equivalent to no namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = if namespace.is_empty() {
            None
        } else {
            Some(namespace)
        };
        self
    }

    #[must_use]
    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    /// Derive the key string: `[namespace-]key[-prod]`.
    #[must_use]
    pub fn derive(&self) -> String {
        let mut derived = match &self.namespace {
            Some(namespace) => format!("{namespace}-{}", self.key),
            None => self.key.clone(),
        };

        if self.production {
            derived.push_str("-prod");
        }

        derived
    }

    /// Derive the key with a buster stamp for the current UTC time.
    ///
    /// Must be called at each use point rather than memoized: the result
    /// changes as real time crosses a bucket boundary.
    #[must_use]
    pub fn bust(&self, level: BusterLevel) -> String {
        bust_at(&self.derive(), level, Utc::now())
    }
}

/// Append the bucket stamp for `now` to `key`, or return `key` unchanged
/// for [`BusterLevel::None`].
#[must_use]
pub fn bust_at(key: &str, level: BusterLevel, now: DateTime<Utc>) -> String {
    match buster_stamp_at(level, now) {
        Some(stamp) => format!("{key}-{stamp}"),
        None => key.to_string(),
    }
}

/// Zero-padded `YYYYMMDD[HH[MM[SS]]]` stamp for the bucket containing `now`.
#[must_use]
pub fn buster_stamp_at(level: BusterLevel, now: DateTime<Utc>) -> Option<String> {
    let mut stamp = format!("{:04}{:02}{:02}", now.year(), now.month(), now.day());

    match level {
        BusterLevel::None => return None,
        BusterLevel::Daily => {}
        BusterLevel::Hourly => {
            stamp.push_str(&format!("{:02}", now.hour()));
        }
        BusterLevel::Minute => {
            stamp.push_str(&format!("{:02}{:02}", now.hour(), now.minute()));
        }
        BusterLevel::Second => {
            stamp.push_str(&format!(
                "{:02}{:02}{:02}",
                now.hour(),
                now.minute(),
                now.second()
            ));
        }
    }

    Some(stamp)
}
