//! Product identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog identifier of a product.
///
/// Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Stand-in for a digit string too large for `i32`.
    ///
    /// Catalog IDs are positive, so this never names a product.
    pub const OUT_OF_RANGE: Self = Self(0);

    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A URL segment that is not a product ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a product id: {0:?}")]
pub struct ProductIdError(pub String);

/// Parses the way a URL integer segment does: ASCII digits only, no sign,
/// no whitespace. Digit strings of any length are accepted; those past
/// `i32::MAX` become [`ProductId::OUT_OF_RANGE`].
impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProductIdError(s.to_string()));
        }
        Ok(s.parse::<i32>().map_or(Self::OUT_OF_RANGE, Self))
    }
}
