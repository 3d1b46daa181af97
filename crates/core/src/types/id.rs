//! Newtype ID for type-safe customer references.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored customer.
///
/// Wraps the `BIGSERIAL` value the database assigns on insert, so ids from
/// other tables cannot be passed where a customer id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Create a customer ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CustomerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<CustomerId> for i64 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let id = CustomerId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(CustomerId::from(42), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CustomerId::new(7)), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id = CustomerId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: CustomerId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }
}
