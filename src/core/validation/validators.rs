//! Field validation helpers
//!
//! The typed rules live on the form structs (`#[validate(...)]`); these helpers
//! parse raw input and turn rule failures into display messages.

use validator::ValidationError;

/// Parse raw numeric input the way a number field reads it
///
/// Empty or non-integer text is rejected with a message naming the field.
pub fn parse_integer(field: &str, raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("\"{}\" expected an integer, received \"{}\"", field, raw))
}

/// Build the message for one failed rule
///
/// An explicit `message` on the rule wins; otherwise the message is derived
/// from the rule code and its `min`/`max` parameters.
pub fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());
    match (error.code.as_ref(), param("min"), param("max")) {
        ("length", Some(min), Some(max)) => format!(
            "\"{}\" must contain between {} and {} character(s)",
            field, min, max
        ),
        ("length", Some(min), None) => {
            format!("\"{}\" must contain at least {} character(s)", field, min)
        }
        ("length", None, Some(max)) => {
            format!("\"{}\" must contain at most {} character(s)", field, max)
        }
        ("range", Some(min), Some(max)) => format!(
            "\"{}\" must be between {} and {}",
            field, min, max
        ),
        ("range", Some(min), None) => {
            format!("\"{}\" must be greater than or equal to {}", field, min)
        }
        ("range", None, Some(max)) => {
            format!("\"{}\" must be less than or equal to {}", field, max)
        }
        (code, _, _) => format!("\"{}\" is invalid ({})", field, code),
    }
}

/// Remove quotation characters from a message before it is displayed
pub fn strip_quotes(message: &str) -> String {
    message.replace('"', "")
}
