//! Product catalog for the local predictor.
//!
//! Records are grouped by (market, segment, category); the family is kept on
//! each record. Substitute candidates never leave their category, so that is
//! the only level that needs an index.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use subst_common::{Error, ProductId, Result};

/// One product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductRecord {
    pub code: ProductId,
    pub market: String,
    pub segment: String,
    pub category: String,
    pub family: String,
    /// Records without a brand never count as same-brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: f64,
    pub origin: String,
    #[serde(default)]
    pub premium: bool,
}

impl ProductRecord {
    pub fn same_family(&self, other: &ProductRecord) -> bool {
        self.family == other.family
    }

    /// Both records carry the same brand. Unbranded records never match,
    /// unlike the source service, which compared two "N/A" placeholders as
    /// equal and so paired every unbranded product across families.
    pub fn same_brand(&self, other: &ProductRecord) -> bool {
        matches!((&self.brand, &other.brand), (Some(a), Some(b)) if a == b)
    }

    fn category_key(&self) -> CategoryKey {
        (
            self.market.clone(),
            self.segment.clone(),
            self.category.clone(),
        )
    }
}

type CategoryKey = (String, String, String);

/// Indexed, immutable product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
    by_code: HashMap<ProductId, usize>,
    by_category: HashMap<CategoryKey, Vec<usize>>,
}

impl Catalog {
    /// Index `records`, keeping their order. Duplicate codes are rejected.
    pub fn from_records(records: Vec<ProductRecord>) -> Result<Self> {
        let mut by_code = HashMap::with_capacity(records.len());
        let mut by_category: HashMap<CategoryKey, Vec<usize>> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            if by_code.insert(record.code.clone(), idx).is_some() {
                return Err(Error::DuplicateProduct {
                    code: record.code.to_string(),
                });
            }
            by_category
                .entry(record.category_key())
                .or_default()
                .push(idx);
        }

        Ok(Catalog {
            records,
            by_code,
            by_category,
        })
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn get(&self, code: &ProductId) -> Option<&ProductRecord> {
        self.by_code.get(code).map(|&idx| &self.records[idx])
    }

    /// Like `get`, but an unknown code is an error.
    pub fn require(&self, code: &ProductId) -> Result<&ProductRecord> {
        self.get(code).ok_or_else(|| Error::ProductNotFound {
            code: code.to_string(),
        })
    }

    /// Substitute candidates for `code`, in catalog order.
    ///
    /// Candidates are the other members of the product's family plus
    /// same-brand products from sibling families of its category.
    pub fn candidates(&self, code: &ProductId) -> Result<Vec<&ProductRecord>> {
        let base = self.require(code)?;
        let siblings = self
            .by_category
            .get(&base.category_key())
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(siblings
            .iter()
            .map(|&idx| &self.records[idx])
            .filter(|r| r.code != base.code)
            .filter(|r| base.same_family(r) || base.same_brand(r))
            .collect())
    }
}
