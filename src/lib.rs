#![doc = include_str!("../README.md")]
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use std::collections::HashMap;

pub mod load;
pub mod report;

pub use load::{load, LoadError};
pub use report::{label_for, Report, ReportRow};

/// Defines the JSON format for a price catalogue entry.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PriceEntry {
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub price: f64,
}

impl PriceEntry {
    #[must_use]
    pub fn new(title: &str, price: f64) -> Self {
        Self {
            title: title.to_string(),
            price,
        }
    }
}

/// Defines the JSON format for a sale line.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SaleRecord {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "Quantity", default)]
    pub quantity: f64,
}

impl SaleRecord {
    #[must_use]
    pub fn new(product: &str, quantity: f64) -> Self {
        Self {
            product: product.to_string(),
            quantity,
        }
    }
}

/// Maps product titles to unit prices.
///
/// When the catalogue lists the same title more than once, the last entry
/// wins.
#[derive(Debug, Default)]
pub struct PriceLookup(HashMap<String, f64>);

impl PriceLookup {
    #[must_use]
    pub fn new(prices: &[PriceEntry]) -> Self {
        Self(
            prices
                .iter()
                .map(|entry| (entry.title.clone(), entry.price))
                .collect(),
        )
    }

    /// Returns the unit price for `title`, if the catalogue lists it.
    #[must_use]
    pub fn price(&self, title: &str) -> Option<f64> {
        self.0.get(title).copied()
    }
}

/// The outcome of totalling a sales record.
#[derive(Debug, Default, PartialEq)]
pub struct Tally {
    /// Sum of price times quantity over every matched sale.
    pub total: f64,
    /// Products with no catalogue entry, in the order they were sold.
    pub unmatched: Vec<String>,
}

/// Totals `sales` against the catalogue `prices`.
///
/// Sales are processed in order. A sale whose product has no catalogue entry
/// adds nothing to the total; its name is recorded in [`Tally::unmatched`]
/// instead, so the caller can decide how to report it.
///
/// # Examples
///
/// ```
/// # use sales_total::{aggregate, PriceEntry, SaleRecord};
/// let prices = vec![PriceEntry::new("pen", 2.5), PriceEntry::new("ink", 3.0)];
/// let sales = vec![SaleRecord::new("pen", 2.0), SaleRecord::new("ink", 1.0)];
/// assert_eq!(aggregate(&sales, &prices).total, 8.0);
/// ```
#[must_use]
pub fn aggregate(sales: &[SaleRecord], prices: &[PriceEntry]) -> Tally {
    let lookup = PriceLookup::new(prices);
    let mut tally = Tally::default();
    for sale in sales {
        match lookup.price(&sale.product) {
            Some(price) => tally.total += price * sale.quantity,
            None => tally.unmatched.push(sale.product.clone()),
        }
    }
    tally
}
