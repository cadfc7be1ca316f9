// file: src/models/de.rs
// description: serde helpers for loosely typed backend fields
// reference: https://serde.rs/custom-date-format.html

use serde::Deserialize;
use serde::de::{self, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

/// Accepts `"d1"` as well as `17` and stores both as a string.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => value,
        StringOrNumber::Unsigned(value) => value.to_string(),
        StringOrNumber::Signed(value) => value.to_string(),
    })
}

/// Treats an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional score that must lie in `[0, 1]`.
pub fn unit_interval<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    match value {
        Some(score) if !(0.0..=1.0).contains(&score) => Err(de::Error::custom(format!(
            "relevance score {} outside [0, 1]",
            score
        ))),
        other => Ok(other),
    }
}
