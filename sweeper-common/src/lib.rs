//! Common types and utilities shared across the sweeper crates.
//!
//! This crate is deliberately small so that every other crate in the
//! workspace can depend on it without dragging in the HTTP or job stacks.
//!
//! # Overview
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`Secret`]: a string wrapper that never prints its contents
//!
//! # Examples
//!
//! ```rust
//! use sweeper_common::Secret;
//!
//! let key = Secret::new("hunter2");
//! assert_eq!(format!("{key:?}"), "Secret(<redacted>)");
//! assert_eq!(key.expose(), "hunter2");
//! ```
use serde::{Deserialize, Deserializer};
use std::fmt;

pub mod observability;

/// A credential value that must never reach a log line.
///
/// `Debug` and `Display` both render `<redacted>`; call [`Secret::expose`]
/// at the single point where the raw value is needed (request signing).
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Secret)
    }
}
