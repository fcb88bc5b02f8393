use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::search::Keyword;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
}

impl Product {
    pub fn matches_name(&self, keyword: &Keyword) -> bool {
        keyword.is_contained_in(&self.name)
    }

    /// True when the keyword occurs in the name, description or category.
    pub fn matches_any_field(&self, keyword: &Keyword) -> bool {
        keyword.is_contained_in(&self.name)
            || keyword.is_contained_in(&self.description)
            || keyword.is_contained_in(&self.category)
    }
}

/// A product that has not been stored yet; the store assigns its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("product name must not be blank".into()));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "product price must be non-negative, got {price}"
            )));
        }

        Ok(Self { name, description: description.into(), price, category: category.into() })
    }

    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
        }
    }
}
