use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rating::types::StoreId;

/// Kind of shop, as tagged by the user when the store was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreCategory {
    DepartmentStore,
    HighStreetChain,
    Boutique,
    Discount,
    Luxury,
    Thrift,
}

impl StoreCategory {
    pub const ALL: [StoreCategory; 6] = [
        StoreCategory::DepartmentStore,
        StoreCategory::HighStreetChain,
        StoreCategory::Boutique,
        StoreCategory::Discount,
        StoreCategory::Luxury,
        StoreCategory::Thrift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreCategory::DepartmentStore => "department_store",
            StoreCategory::HighStreetChain => "high_street_chain",
            StoreCategory::Boutique => "boutique",
            StoreCategory::Discount => "discount",
            StoreCategory::Luxury => "luxury",
            StoreCategory::Thrift => "thrift",
        }
    }
}

impl fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown store category: {}", s))
    }
}

/// A store the user has logged at least one item against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub id: StoreId,
    pub name: String,
    pub category: StoreCategory,
}

impl StoreInfo {
    pub fn new(id: StoreId, name: impl Into<String>, category: StoreCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
        }
    }
}
