use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::domain::{display_price, DiscountWindow, Percentage};

/// Row of the `products` table.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub is_featured: bool,
    pub image: Option<String>,
    pub image_public_id: Option<String>,
    pub category_id: Option<i64>,
    pub discount_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns selected for a product joined with its category (`c`) and discount (`d`).
pub(crate) const PRODUCT_COLUMNS: &str = "p.id, p.name, p.slug, p.description, p.price, p.type, p.is_featured, \
     p.image, p.image_public_id, p.category_id, p.discount_id, p.created_at, p.updated_at, \
     c.name AS category_name, d.name AS discount_name, d.percentage AS discount_percentage, \
     d.start_date AS discount_start_date, d.end_date AS discount_end_date";

/// A product row together with its category and discount columns.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    pub discount_name: Option<String>,
    pub discount_percentage: Option<Decimal>,
    pub discount_start_date: Option<DateTime<Utc>>,
    pub discount_end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSummary {
    pub name: String,
    pub percentage: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub active: bool,
}

/// Product as returned by the API, with computed prices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategorySummary>,
    pub discount: Option<DiscountSummary>,
    pub original_price: Decimal,
    pub final_price: Decimal,
}

impl ProductRecord {
    pub fn discount_window(&self) -> Option<DiscountWindow> {
        let percentage = Percentage::new(self.discount_percentage?).ok()?;
        Some(DiscountWindow {
            percentage,
            start_date: self.discount_start_date?,
            end_date: self.discount_end_date?,
        })
    }

    pub fn into_view(self, now: DateTime<Utc>) -> ProductView {
        let window = self.discount_window();
        let final_price = display_price(self.product.price, window.as_ref(), now);
        let discount = match (self.discount_name, window) {
            (Some(name), Some(w)) => Some(DiscountSummary {
                name,
                percentage: w.percentage.value(),
                start_date: w.start_date,
                end_date: w.end_date,
                active: w.is_active(now),
            }),
            _ => None,
        };
        ProductView {
            original_price: self.product.price,
            final_price,
            category: self.category_name.map(|name| CategorySummary { name }),
            discount,
            product: self.product,
        }
    }
}
