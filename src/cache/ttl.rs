//! TTL Module
//!
//! Validated time-to-live durations accepted by `expire` and `set`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;

use crate::error::CacheError;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

// == Ttl ==
/// A non-negative time-to-live.
///
/// Numbers are interpreted as milliseconds. Strings accept a number with an
/// optional unit, e.g. `"100ms"`, `"2s"`, `"1.5 hours"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ttl(Duration);

impl Ttl {
    /// Zero delay: the key expires on the next scheduler tick.
    pub const ZERO: Ttl = Ttl(Duration::ZERO);

    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    fn from_millis_f64(ms: f64) -> Result<Self, CacheError> {
        if !ms.is_finite() || ms < 0.0 {
            return Err(invalid(ms));
        }
        Duration::try_from_secs_f64(ms / SECOND)
            .map(Self)
            .map_err(|_| invalid(ms))
    }
}

fn invalid(input: impl fmt::Display) -> CacheError {
    CacheError::InvalidArgument(format!(
        "TTL must be a non-negative duration, got {}",
        input
    ))
}

fn unit_scale(unit: &str) -> Option<f64> {
    let scale = match unit {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "week" | "weeks" => WEEK,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR,
        _ => return None,
    };
    Some(scale)
}

impl FromStr for Ttl {
    type Err = CacheError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let amount: f64 = number.parse().map_err(|_| invalid(format!("{:?}", input)))?;
        let scale = unit_scale(&unit.trim().to_ascii_lowercase())
            .ok_or_else(|| invalid(format!("{:?}", input)))?;

        Self::from_millis_f64(amount * scale)
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl TryFrom<u64> for Ttl {
    type Error = CacheError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Ok(Self::from_millis(ms))
    }
}

impl TryFrom<i64> for Ttl {
    type Error = CacheError;

    fn try_from(ms: i64) -> Result<Self, Self::Error> {
        u64::try_from(ms).map(Self::from_millis).map_err(|_| invalid(ms))
    }
}

impl TryFrom<i32> for Ttl {
    type Error = CacheError;

    fn try_from(ms: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(ms))
    }
}

impl TryFrom<f64> for Ttl {
    type Error = CacheError;

    fn try_from(ms: f64) -> Result<Self, Self::Error> {
        Self::from_millis_f64(ms)
    }
}

impl TryFrom<&str> for Ttl {
    type Error = CacheError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl TryFrom<String> for Ttl {
    type Error = CacheError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl TryFrom<&Value> for Ttl {
    type Error = CacheError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| invalid(n))
                .and_then(Self::from_millis_f64),
            Value::String(s) => s.parse(),
            other => Err(invalid(other)),
        }
    }
}

impl TryFrom<Value> for Ttl {
    type Error = CacheError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}
