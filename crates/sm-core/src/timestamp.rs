//! `serde(with = ...)` adapter for the `YYYY-MM-DD HH:MM:SS` timestamps used
//! by the historical files, the trajectory log, and JSON configuration.

use chrono::NaiveDateTime;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

/// Text layout of every timestamp read or written by the workspace.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse one timestamp in [`FORMAT`].
pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
}

/// Render one timestamp in [`FORMAT`].
pub fn render(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&render(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
}
