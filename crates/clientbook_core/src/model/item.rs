//! Item domain model used by the item book screens.
//!
//! # Invariants
//! - `name` is non-blank and at most 100 characters.
//! - `price` is finite and never negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-provided item identity.
pub type ItemId = i64;

const ITEM_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum ItemValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidPrice(f64),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "item name has {len} characters; at most {ITEM_NAME_MAX_CHARS} allowed")
            }
            Self::InvalidPrice(price) => {
                write!(f, "invalid item price {price}: expected a finite value >= 0")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Priced catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
}

impl Item {
    /// Creates a validated item.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        price: f64,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            id,
            name: name.into(),
            price,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        let len = self.name.chars().count();
        if len > ITEM_NAME_MAX_CHARS {
            return Err(ItemValidationError::NameTooLong(len));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ItemValidationError::InvalidPrice(self.price));
        }
        Ok(())
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} {:.2}", self.id, self.name, self.price)
    }
}
