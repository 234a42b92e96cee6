//! Square-root computation.
//!
//! Parsing and validation live here so every entry point (HTTP path
//! parameter, chat message) rejects the same inputs the same way.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};

/// Result of a square-root computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SqrtResponse {
    /// The input number.
    pub number: f64,
    /// Its non-negative square root.
    pub sqrt: f64,
}

/// Parse a raw string into a finite `f64`.
///
/// NaN and infinities are rejected: JSON cannot carry them.
pub fn parse_number(raw: &str) -> ApiResult<f64> {
    let trimmed = raw.trim();
    let number: f64 = trimmed
        .parse()
        .map_err(|_| ApiError::InvalidNumber(format!("'{}' is not a valid number", trimmed)))?;

    if !number.is_finite() {
        return Err(ApiError::InvalidNumber(format!(
            "'{}' is not a finite number",
            trimmed
        )));
    }

    Ok(number)
}

/// Compute the square root of `number`.
///
/// Negative inputs are a domain violation. `-0.0` is not negative.
pub fn compute_sqrt(number: f64) -> ApiResult<SqrtResponse> {
    if number < 0.0 {
        return Err(ApiError::NegativeNumber);
    }

    Ok(SqrtResponse {
        number,
        sqrt: number.sqrt(),
    })
}

/// Parse and compute in one step.
pub fn sqrt_of(raw: &str) -> ApiResult<SqrtResponse> {
    compute_sqrt(parse_number(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_squares() {
        assert_eq!(
            sqrt_of("16").unwrap(),
            SqrtResponse {
                number: 16.0,
                sqrt: 4.0
            }
        );
        assert_eq!(sqrt_of("144").unwrap().sqrt, 12.0);
        assert_eq!(sqrt_of("0").unwrap().sqrt, 0.0);
    }

    #[test]
    fn test_result_squares_back() {
        for x in [2.0, 0.5, 1e-10, 3.14159, 1_000_000.0, 1e300] {
            let result = compute_sqrt(x).unwrap();
            assert_eq!(result.number, x);
            let relative = ((result.sqrt * result.sqrt) - x).abs() / x;
            assert!(relative < 1e-12, "sqrt({x}) = {} is off", result.sqrt);
        }
    }

    #[test]
    fn test_negative_is_rejected() {
        assert!(matches!(compute_sqrt(-1.0), Err(ApiError::NegativeNumber)));
        assert!(matches!(sqrt_of("-4"), Err(ApiError::NegativeNumber)));
        assert!(matches!(
            compute_sqrt(-f64::MIN_POSITIVE),
            Err(ApiError::NegativeNumber)
        ));
    }

    #[test]
    fn test_negative_zero_is_allowed() {
        let result = compute_sqrt(-0.0).unwrap();
        assert_eq!(result.sqrt, 0.0);
        assert!(result.number.is_sign_negative());
        assert!(result.sqrt.is_sign_negative());
    }

    #[test]
    fn test_malformed_input() {
        for raw in ["abc", "", "1.2.3", "12abc", "--1"] {
            assert!(
                matches!(parse_number(raw), Err(ApiError::InvalidNumber(_))),
                "expected '{raw}' to be rejected"
            );
        }
    }

    #[test]
    fn test_non_finite_input() {
        for raw in ["NaN", "inf", "-inf", "infinity", "1e400"] {
            assert!(
                matches!(parse_number(raw), Err(ApiError::InvalidNumber(_))),
                "expected '{raw}' to be rejected"
            );
        }
    }

    #[test]
    fn test_accepted_number_formats() {
        assert_eq!(parse_number(" 25 ").unwrap(), 25.0);
        assert_eq!(parse_number("2.5e1").unwrap(), 25.0);
        assert_eq!(parse_number("+9").unwrap(), 9.0);
        assert_eq!(parse_number(".5").unwrap(), 0.5);
    }
}
