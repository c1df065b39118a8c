//! Typed path parameter helpers.

use std::str::FromStr;

use taskhub_core::error::AppError;

/// Parses an identifier from a path segment.
pub fn parse_id<T: FromStr>(s: &str) -> Result<T, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid ID: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::types::TaskId;

    #[test]
    fn test_parse_id() {
        let id = TaskId::new();
        assert_eq!(parse_id::<TaskId>(&id.to_string()).unwrap(), id);
        assert!(parse_id::<TaskId>("nope").is_err());
    }
}
