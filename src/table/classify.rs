//! Row classifier
//!
//! Rows that expose both a numeric `quantity` and a numeric `threshold` get a
//! severity. Everything else is not applicable and gets `None`.

use serde::Serialize;

use crate::core::field::Row;

/// Inventory health of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// quantity > threshold
    Normal,
    /// quantity == threshold
    Warning,
    /// quantity < threshold
    Violation,
}

/// Anything that can report a stock quantity and its threshold
pub trait StockLevel {
    fn quantity(&self) -> Option<f64>;
    fn threshold(&self) -> Option<f64>;
}

impl StockLevel for Row {
    fn quantity(&self) -> Option<f64> {
        self.get("quantity").and_then(|v| v.as_f64())
    }

    fn threshold(&self) -> Option<f64> {
        self.get("threshold").and_then(|v| v.as_f64())
    }
}

/// Classify a row by its quantity against its threshold
pub fn classify<T: StockLevel + ?Sized>(row: &T) -> Option<Severity> {
    let (quantity, threshold) = (row.quantity()?, row.threshold()?);
    Some(severity(quantity, threshold))
}

/// Severity of a quantity/threshold pair
pub fn severity(quantity: f64, threshold: f64) -> Severity {
    if quantity < threshold {
        Severity::Violation
    } else if quantity == threshold {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

/// Counts shown on the dashboard inventory card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    pub total: usize,
    pub below_threshold: usize,
    pub at_threshold: usize,
}

impl StockSummary {
    pub fn from_items<'a, T, I>(items: I) -> Self
    where
        T: StockLevel + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items
            .into_iter()
            .fold(StockSummary::default(), |mut acc, item| {
                acc.total += 1;
                match classify(item) {
                    Some(Severity::Violation) => acc.below_threshold += 1,
                    Some(Severity::Warning) => acc.at_threshold += 1,
                    _ => {}
                }
                acc
            })
    }

    /// Items that need restocking (below or at threshold)
    pub fn needs_attention(&self) -> usize {
        self.below_threshold + self.at_threshold
    }
}
