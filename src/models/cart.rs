use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use super::product::{ProductRecord, ProductView};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `cart_items` table. `price` is the unit price captured when
/// the product was first added.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart item joined with its product, category and discount.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRecord {
    pub item_id: i64,
    pub cart_id: i64,
    pub quantity: i32,
    pub item_price: Decimal,
    pub item_created_at: DateTime<Utc>,
    pub item_updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub product: ProductRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product: ProductView,
}

impl CartLineRecord {
    pub fn into_line(self, now: DateTime<Utc>) -> CartLine {
        CartLine {
            id: self.item_id,
            cart_id: self.cart_id,
            product_id: self.product.product.id,
            quantity: self.quantity,
            price: self.item_price,
            created_at: self.item_created_at,
            updated_at: self.item_updated_at,
            product: self.product.into_view(now),
        }
    }
}

/// Result of an add-to-cart call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedToCart {
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}
