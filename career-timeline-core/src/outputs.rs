//! Lookup of named values in a stack's output list.

use crate::contract::StackOutput;
use tracing::debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OutputError {
    #[error("output '{key}' not found in stack outputs")]
    Missing { key: String },
    #[error("output '{key}' has no value")]
    Empty { key: String },
}

/// Returns the value of the first output named `key`.
///
/// An entry that exists but carries no value (or an empty string) is an
/// error, same as a missing entry.
pub fn find_output_value<'a>(
    outputs: &'a [StackOutput],
    key: &str,
) -> Result<&'a str, OutputError> {
    let entry = outputs
        .iter()
        .find(|output| output.output_key == key)
        .ok_or_else(|| OutputError::Missing {
            key: key.to_string(),
        })?;

    match entry.output_value.as_deref() {
        Some(value) if !value.is_empty() => {
            debug!(output_key = key, output_value = value, "Resolved stack output");
            Ok(value)
        }
        _ => Err(OutputError::Empty {
            key: key.to_string(),
        }),
    }
}
