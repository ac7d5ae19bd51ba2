//! Field deserializers that accept both numbers and numeric strings.
//!
//! Request documents are frequently produced from form input where every value
//! is text. Values that cannot be read as a number become `0` and are
//! normalized further downstream instead of rejecting the whole request.

use serde::Deserialize;
use serde::Deserializer;

use crate::ModelParams;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Int(i64),
    Float(f64),
    String(String),
}

pub(crate) fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Int(n) => Some(n),
        StringOrNumber::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        StringOrNumber::Float(_) => None,
        StringOrNumber::String(s) => parse_leading_integer(&s),
    };
    Ok(value
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default())
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Int(n) => n as f64,
        StringOrNumber::Float(f) => f,
        StringOrNumber::String(s) => s.trim().parse::<f64>().unwrap_or_default(),
    };
    Ok(value)
}

pub(crate) fn gpu_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count: u32 = integer(deserializer)?;
    Ok(count.max(1))
}

pub(crate) fn model_params<'de, D>(deserializer: D) -> Result<Option<ModelParams>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.parse().unwrap_or(ModelParams::Unknown))
        }
    }))
}

/// Reads an optional sign followed by leading digits, ignoring any trailing
/// text ("512 tokens" reads as 512).
fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
