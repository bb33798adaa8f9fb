use std::future::Future;

use serde::{Deserialize, Deserializer};
use tokio_util::sync::CancellationToken;

/// Run `fut` unless `cancel` fires first. Returns `None` when cancelled.
pub(crate) async fn cancellable<F>(cancel: &CancellationToken, fut: F) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}

/// Trim a caller-supplied value and drop it when nothing is left.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientFlag {
    Bool(bool),
    Text(String),
}

/// Query-string flag: only `true` (or the literal string `"true"`) is set.
pub(crate) fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<LenientFlag> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(LenientFlag::Bool(b)) => b,
        Some(LenientFlag::Text(s)) => s == "true",
        None => false,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(i64),
    Text(String),
}

/// Protobuf JSON encodes 64-bit integers as strings; accept either form.
pub(crate) fn de_lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<LenientNumber> = Option::deserialize(deserializer)?;
    match value {
        Some(LenientNumber::Number(n)) => Ok(n),
        Some(LenientNumber::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(LenientNumber::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}
