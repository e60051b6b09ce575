//! Discount windows and price computation.
//!
//! A discount applies only while `now` lies inside `[start_date, end_date]`.
//! The listing price is rounded to whole currency units, the price stored on
//! a cart line is rounded to cents.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::value_objects::Percentage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscountWindow {
    pub percentage: Percentage,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl DiscountWindow {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

fn discounted(price: Decimal, discount: Option<&DiscountWindow>, now: DateTime<Utc>) -> Option<Decimal> {
    discount
        .filter(|d| d.is_active(now))
        .map(|d| price * d.percentage.remaining_fraction())
}

/// Price shown in catalog listings and product pages.
pub fn display_price(price: Decimal, discount: Option<&DiscountWindow>, now: DateTime<Utc>) -> Decimal {
    match discounted(price, discount, now) {
        Some(p) => p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        None => price,
    }
}

/// Unit price captured on a cart line when the product is first added.
pub fn snapshot_price(price: Decimal, discount: Option<&DiscountWindow>, now: DateTime<Utc>) -> Decimal {
    discounted(price, discount, now)
        .unwrap_or(price)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
