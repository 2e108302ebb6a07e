use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// Wire format for every timestamp: seconds precision, numeric UTC offset.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A timestamp that keeps the offset it was written with.
pub type Timestamp = DateTime<FixedOffset>;

/// A single scheduled booking.
///
/// `id` is assigned by the caller, never generated here. Both `id` and
/// `user_id` are optional on input and omitted from output when zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "Id", alias = "id", default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub user_id: i64,
    pub trainer_id: i64,
    pub starts_at: String,
    pub ends_at: String,
}

/// The full persisted set of appointments, in booking order.
pub type Collection = Vec<Appointment>;

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl Appointment {
    pub fn new(trainer_id: i64, starts_at: impl Into<String>, ends_at: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id: 0,
            trainer_id,
            starts_at: starts_at.into(),
            ends_at: ends_at.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }
}

/// Byte layout of `YYYY-MM-DDTHH:MM:SS±HH:MM`: `d` is a digit, `s` the offset sign.
const TIME_LAYOUT: &[u8; 25] = b"dddd-dd-ddTdd:dd:ddsdd:dd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Not exactly `YYYY-MM-DDTHH:MM:SS±HH:MM`.
    Layout,
    /// Right shape, impossible value (month 13, hour 25, ...).
    Value(chrono::ParseError),
    /// Second `60`.
    LeapSecond,
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampError::Layout => write!(f, "expected YYYY-MM-DDTHH:MM:SS+HH:MM"),
            TimestampError::Value(e) => write!(f, "{e}"),
            TimestampError::LeapSecond => write!(f, "leap seconds are not accepted"),
        }
    }
}

impl std::error::Error for TimestampError {}

fn matches_layout(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == TIME_LAYOUT.len()
        && bytes.iter().zip(TIME_LAYOUT).all(|(&b, &l)| match l {
            b'd' => b.is_ascii_digit(),
            b's' => b == b'+' || b == b'-',
            _ => b == l,
        })
}

pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimestampError> {
    if !matches_layout(s) {
        return Err(TimestampError::Layout);
    }
    let t = DateTime::parse_from_str(s, TIME_FORMAT).map_err(TimestampError::Value)?;
    // chrono encodes second 60 as nanosecond >= 1e9
    if t.nanosecond() >= 1_000_000_000 {
        return Err(TimestampError::LeapSecond);
    }
    Ok(t)
}

pub fn format_timestamp(t: &Timestamp) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// True when the minute component is `:00` or `:30`.
pub fn is_on_grid(t: &Timestamp) -> bool {
    matches!(t.minute(), 0 | 30)
}
