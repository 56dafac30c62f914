//! Product Model
//!
//! A product is a line item in one branch's stock sheet. The five quantity
//! inputs are supplied independently; `current` is always derived:
//!
//! ```text
//! current = begInventory + delivered - waste - use - withdrawal
//! ```

use super::serde_helpers::{lenient_f64, lenient_opt_f64};
use serde::{Deserialize, Serialize};

/// The five independently supplied quantity inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantities {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub beg_inventory: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub delivered: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub waste: f64,
    /// `use` on the wire
    #[serde(rename = "use", default, deserialize_with = "lenient_f64")]
    pub use_qty: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub withdrawal: f64,
}

impl ProductQuantities {
    /// Derived on-hand stock. Not clamped: negative results are stored as is.
    pub fn current(&self) -> f64 {
        self.beg_inventory + self.delivered - self.waste - self.use_qty - self.withdrawal
    }

    /// Stock that could be consumed by `use` without going negative
    pub fn available_for_use(&self) -> f64 {
        self.beg_inventory + self.delivered - self.waste - self.withdrawal
    }

    /// Whether `use` exceeds what is on hand. Advisory only.
    pub fn overdraws(&self) -> bool {
        self.use_qty > self.available_for_use()
    }

    /// Wire name and value of each input, in wire order
    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("begInventory", self.beg_inventory),
            ("delivered", self.delivered),
            ("waste", self.waste),
            ("use", self.use_qty),
            ("withdrawal", self.withdrawal),
        ]
    }

    /// Name of the first negative field, if any
    pub fn first_negative(&self) -> Option<&'static str> {
        self.named()
            .into_iter()
            .find(|(_, v)| *v < 0.0)
            .map(|(field, _)| field)
    }

    /// Name of the first field that is negative and differs from `stored`.
    ///
    /// A submit carries a negative `current` into `begInventory`; keeping that
    /// value unchanged on a later edit is allowed.
    pub fn first_negative_change(&self, stored: &Self) -> Option<&'static str> {
        self.named()
            .into_iter()
            .zip(stored.named())
            .find(|((_, v), (_, old))| *v < 0.0 && v != old)
            .map(|((field, _), _)| field)
    }

    /// Quantities for the next cycle: yesterday's ending stock becomes the
    /// starting stock and every movement is zeroed.
    pub fn rebaselined(current: f64) -> Self {
        Self {
            beg_inventory: current,
            ..Self::default()
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    /// Canonical branch key
    pub branch: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub quantities: ProductQuantities,
    pub current: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
///
/// Any `current` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(flatten)]
    pub quantities: ProductQuantities,
}

/// Update product payload
///
/// Quantities follow the same rules as on create: a missing field is 0.
/// `name`, `category` and `price` keep their stored value when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub quantities: ProductQuantities,
}

/// Point-in-time copy of a product stored inside a history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub quantities: ProductQuantities,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current: f64,
}

impl From<&Product> for ProductSnapshot {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            category: p.category.clone(),
            price: p.price,
            quantities: p.quantities,
            current: p.current,
        }
    }
}
