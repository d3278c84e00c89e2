//! Result type alias for Anonymock
//!
//! This module provides a convenient Result type alias that uses AnonymockError
//! as the error type.

use super::errors::AnonymockError;

/// Result type alias for Anonymock operations
///
/// # Examples
///
/// ```
/// use anonymock::domain::result::Result;
/// use anonymock::domain::errors::AnonymockError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AnonymockError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AnonymockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(AnonymockError::Io("test error".to_string()));
        assert!(result.is_err());
    }
}
