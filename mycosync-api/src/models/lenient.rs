//! Field decoders for controller payloads. Firmware builds differ in casing
//! and number types, so an off-spec field falls back to its default instead
//! of failing the whole snapshot.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes `T` from a value whose strings are upper-cased first, so `"on"`
/// reads as `"ON"`. `null` or anything `T` rejects yields `T::default()`.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = match Value::deserialize(deserializer)? {
        Value::String(s) => Value::String(s.trim().to_ascii_uppercase()),
        other => other,
    };

    Ok(T::deserialize(value).unwrap_or_default())
}

/// Signal strength sent as an integer, a float or a numeric string.
pub(crate) fn rssi<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let dbm = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(dbm
        .filter(|dbm| dbm.is_finite())
        .map(|dbm| dbm.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32))
}

/// Any string-like value; everything else is treated as missing.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
