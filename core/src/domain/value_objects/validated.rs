//! Accumulating validation.
//!
//! Unlike `Result`, combining two `Validated` values runs both sides and keeps
//! every failure, so a caller sees all broken rules at once.

use crate::errors::{ClaimViolations, TokenError};

/// Outcome of one or more independent checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(Result<T, ClaimViolations>);

impl<T> Validated<T> {
    pub fn valid(value: T) -> Self {
        Self(Ok(value))
    }

    pub fn invalid(error: TokenError) -> Self {
        Self(Err(ClaimViolations::single(error)))
    }

    /// Lift a single check's result
    pub fn from_result(result: Result<T, TokenError>) -> Self {
        match result {
            Ok(value) => Self::valid(value),
            Err(error) => Self::invalid(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_ok()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated(self.0.map(f))
    }

    /// Combine with another check, merging failures in left-to-right order
    pub fn zip<U>(self, other: Validated<U>) -> Validated<(T, U)> {
        match (self.0, other.0) {
            (Ok(left), Ok(right)) => Validated::valid((left, right)),
            (Err(left), Ok(_)) => Validated(Err(left)),
            (Ok(_), Err(right)) => Validated(Err(right)),
            (Err(left), Err(right)) => Validated(Err(left.merge(right))),
        }
    }

    pub fn into_result(self) -> Result<T, ClaimViolations> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_of_valid_values() {
        let combined = Validated::valid(1).zip(Validated::valid("two"));
        assert_eq!(combined.into_result().unwrap(), (1, "two"));
    }

    #[test]
    fn test_zip_keeps_all_failures_in_order() {
        let first: Validated<i32> = Validated::invalid(TokenError::MalformedSubject {
            subject: "x".to_string(),
        });
        let second: Validated<()> = Validated::valid(());
        let third: Validated<()> = Validated::invalid(TokenError::TokenExpired);

        let violations = first.zip(second).zip(third).into_result().unwrap_err();
        assert_eq!(
            violations.errors(),
            &[
                TokenError::MalformedSubject {
                    subject: "x".to_string()
                },
                TokenError::TokenExpired,
            ]
        );
    }

    #[test]
    fn test_map_only_touches_valid_values() {
        assert_eq!(Validated::valid(2).map(|v| v * 10).into_result().unwrap(), 20);

        let failed: Validated<i32> = Validated::from_result(Err(TokenError::TokenExpired));
        assert!(!failed.map(|v| v * 10).is_valid());
    }
}
