//! Product identity types.
//!
//! The prediction service keys products by catalog code. Codes arrive either
//! as JSON strings or as bare integers (and always as strings when used as
//! object keys), so decoding accepts both and normalizes to a string.

use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Product code wrapper. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id, rejecting empty or whitespace-only codes.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyId);
        }
        if trimmed.len() == code.len() {
            Ok(ProductId(code))
        } else {
            Ok(ProductId(trimmed.to_string()))
        }
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(code: u64) -> Self {
        ProductId(code.to_string())
    }
}

impl std::str::FromStr for ProductId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProductId::new(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

struct ProductIdVisitor;

impl<'de> Visitor<'de> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty product code string or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ProductId, E> {
        ProductId::new(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<ProductId, E> {
        if v.trim().is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(&v), &self));
        }
        ProductId::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ProductId, E> {
        Ok(ProductId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ProductId, E> {
        u64::try_from(v)
            .map(ProductId::from)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn rejects_empty_codes() {
        assert!(matches!(ProductId::new(""), Err(Error::EmptyId)));
        assert!(matches!(ProductId::new("   "), Err(Error::EmptyId)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = ProductId::new(" 1042 ").unwrap();
        assert_eq!(id.as_str(), "1042");
    }

    #[test]
    fn decodes_strings_and_integers_alike() {
        let from_str: ProductId = serde_json::from_str("\"1042\"").unwrap();
        let from_int: ProductId = serde_json::from_str("1042").unwrap();
        assert_eq!(from_str, from_int);
    }

    #[test]
    fn decodes_object_keys() {
        let map: BTreeMap<ProductId, f64> =
            serde_json::from_str(r#"{"1042": 55.5, "SKU-9": 12.0}"#).unwrap();
        assert_eq!(map.get(&ProductId::from(1042)), Some(&55.5));
        assert_eq!(map.get(&ProductId::new("SKU-9").unwrap()), Some(&12.0));
    }

    #[test]
    fn rejects_negative_and_empty_on_decode() {
        assert!(serde_json::from_str::<ProductId>("-3").is_err());
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ProductId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}
