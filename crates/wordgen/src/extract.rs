//! Turns raw model completions into [`WordEntry`] records.
//!
//! Models tend to wrap the requested JSON array in prose, so when the whole
//! completion is not an array the text between the first `[` and the last `]`
//! is tried instead.

use serde_json::Value;

use crate::entry::{WordEntry, MISSING_DESCRIPTION, MISSING_WORD};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON array found in the completion")]
    NoJsonSpan,
    #[error("the JSON array in the completion is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Extracts entries, logging and returning an empty list when nothing usable
/// is found.
pub fn extract_entries(completion: &str) -> Vec<WordEntry> {
    match try_extract_entries(completion) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(%error, raw = completion, "could not parse words from the completion");
            Vec::new()
        }
    }
}

pub fn try_extract_entries(completion: &str) -> Result<Vec<WordEntry>, ExtractError> {
    let completion = completion.trim();
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(completion) {
        return Ok(items.iter().map(to_entry).collect());
    }
    let span = json_span(completion).ok_or(ExtractError::NoJsonSpan)?;
    tracing::debug!("parsing the bracketed span of the completion");
    let items = serde_json::from_str::<Vec<Value>>(span).map_err(ExtractError::Malformed)?;
    Ok(items.iter().map(to_entry).collect())
}

/// The text from the first `[` through the last `]`, if the closing bracket
/// comes after the opening one.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

fn to_entry(item: &Value) -> WordEntry {
    WordEntry {
        word: string_field(item, "word", MISSING_WORD),
        description: string_field(item, "description", MISSING_DESCRIPTION),
    }
}

fn string_field(item: &Value, key: &str, missing: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or(missing)
        .to_owned()
}
