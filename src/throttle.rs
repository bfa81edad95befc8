//! Post-fetch throttling delay
//!
//! A fixed pause applied by the page iterator after every cache-miss fetch,
//! used to stay under an external rate limit. The `(secs, nanos)` pair is
//! validated once, at construction; an iterator with a malformed delay is
//! never created.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Raw delay configuration as it appears in config input.
///
/// Components are signed so that out-of-range input can be represented and
/// rejected with a proper error instead of being silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Whole seconds of the pause
    pub secs: i64,
    /// Additional nanoseconds of the pause
    pub nanos: i64,
}

impl DelayConfig {
    /// Create a new delay config
    pub fn new(secs: i64, nanos: i64) -> Self {
        Self { secs, nanos }
    }
}

/// A validated throttling delay.
///
/// Both components are guaranteed non-negative; nanosecond overflow is
/// normalized into whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay(Duration);

impl Delay {
    /// Validate a `(secs, nanos)` pair into a delay.
    ///
    /// Fails with [`Error::InvalidDelay`] when either component is negative.
    pub fn new(secs: i64, nanos: i64) -> Result<Self> {
        if secs < 0 {
            return Err(Error::invalid_delay(format!(
                "secs must be non-negative, got {secs}"
            )));
        }
        if nanos < 0 {
            return Err(Error::invalid_delay(format!(
                "nanos must be non-negative, got {nanos}"
            )));
        }

        let carry = (nanos / NANOS_PER_SEC) as u64;
        let nanos = (nanos % NANOS_PER_SEC) as u32;
        Ok(Self(Duration::new(secs as u64 + carry, nanos)))
    }

    /// Validate a delay from an untyped JSON value.
    ///
    /// The value must be an object with integer `secs` and `nanos` fields;
    /// missing or non-integer components fail with [`Error::InvalidDelay`].
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            Error::invalid_delay("delay must be an object with secs and nanos fields")
        })?;

        let secs = integer_field(map, "secs")?;
        let nanos = integer_field(map, "nanos")?;
        Self::new(secs, nanos)
    }

    /// The validated pause duration
    pub fn duration(self) -> Duration {
        self.0
    }

    /// Sleep for the configured duration
    pub async fn pause(self) {
        tokio::time::sleep(self.0).await;
    }
}

impl TryFrom<DelayConfig> for Delay {
    type Error = crate::error::Error;

    fn try_from(config: DelayConfig) -> Result<Self> {
        Self::new(config.secs, config.nanos)
    }
}

fn integer_field(map: &JsonObject, field: &str) -> Result<i64> {
    let value = map
        .get(field)
        .ok_or_else(|| Error::invalid_delay(format!("missing {field} field")))?;
    value
        .as_i64()
        .ok_or_else(|| Error::invalid_delay(format!("{field} must be an integer")))
}
