//! Type-safe price representation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price in whole rupees.
///
/// All marketplace prices (packages, add-ons, order totals) are whole-rupee
/// amounts, so this wraps an `i64` rather than a decimal type. The value is
/// serialized as a bare JSON number.
///
/// ## Examples
///
/// ```
/// use artconnect_core::Price;
///
/// let price = Price::new(1499);
/// assert_eq!(price.as_i64(), 1499);
/// assert!(price.is_positive());
/// assert_eq!(price.to_string(), "₹1499");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a new price from a whole-rupee amount.
    #[must_use]
    pub const fn new(rupees: i64) -> Self {
        Self(rupees)
    }

    /// Get the underlying rupee amount.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(rupees: i64) -> Self {
        Self(rupees)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let rupees = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(rupees))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_as_i64() {
        let price = Price::new(4999);
        assert_eq!(price.as_i64(), 4999);
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::new(1).is_positive());
        assert!(!Price::new(0).is_positive());
        assert!(!Price::new(-5).is_positive());
    }

    #[test]
    fn test_ordering() {
        assert!(Price::new(499) < Price::new(1499));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(299).to_string(), "₹299");
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::new(1499);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "1499");

        let parsed: Price = serde_json::from_str("1499").unwrap();
        assert_eq!(parsed, price);
    }
}
