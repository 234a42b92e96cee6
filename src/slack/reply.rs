//! Reply text for number messages.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

/// Messages that consist of a single (optionally negative) decimal number.
static NUMBER_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+\.?[0-9]*$").expect("valid number regex"));

/// Whether the bot should answer this message text.
pub fn is_number_message(text: &str) -> bool {
    NUMBER_MESSAGE.is_match(text.trim())
}

/// Render the reply for a computation outcome.
///
/// Floats use `{:?}` so whole numbers keep their decimal point (`16.0`).
pub fn format_reply(number: f64, outcome: &Result<f64, ApiError>) -> String {
    match outcome {
        Ok(sqrt) => format!("√{:?} = {:?}", number, sqrt),
        Err(ApiError::NegativeNumber) => {
            format!("❌ Cannot compute square root of negative number: {:?}", number)
        }
        Err(e) => format!("❌ Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_messages() {
        for text in ["16", "-4", "2.5", "10.", " 144 ", "007"] {
            assert!(is_number_message(text), "{text:?} should match");
        }
        for text in ["hello", "16 please", "1e5", ".5", "+3", "", "1.2.3", "--1"] {
            assert!(!is_number_message(text), "{text:?} should not match");
        }
    }

    #[test]
    fn test_format_success() {
        assert_eq!(format_reply(16.0, &Ok(4.0)), "√16.0 = 4.0");
        assert_eq!(
            format_reply(2.0, &Ok(2f64.sqrt())),
            "√2.0 = 1.4142135623730951"
        );
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(
            format_reply(-4.0, &Err(ApiError::NegativeNumber)),
            "❌ Cannot compute square root of negative number: -4.0"
        );
    }

    #[test]
    fn test_format_backend_error() {
        let outcome = Err(ApiError::Upstream("service unavailable".to_string()));
        assert_eq!(format_reply(9.0, &outcome), "❌ Error: service unavailable");
    }
}
