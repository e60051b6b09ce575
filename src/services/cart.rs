//! Per-user carts.
//!
//! A user owns at most one cart, created by the first add. Each product
//! appears at most once per cart: adding it again grows the quantity and
//! keeps the price captured on the first add.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::domain::{snapshot_price, Quantity};
use crate::models::product::PRODUCT_COLUMNS;
use crate::models::{AddedToCart, Cart, CartItem, CartLine, CartLineRecord, ProductRecord};
use crate::services::product::select_product_sql;
use crate::{Result, StoreError};

const FIND_OR_CREATE_CART: &str = "INSERT INTO carts (user_id) VALUES ($1) \
     ON CONFLICT (user_id) DO UPDATE SET updated_at = carts.updated_at \
     RETURNING *";

const MERGE_ITEM: &str = "INSERT INTO cart_items (cart_id, product_id, quantity, price) VALUES ($1, $2, $3, $4) \
     ON CONFLICT (cart_id, product_id) DO UPDATE \
     SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW() \
     RETURNING *";

/// Adds `quantity` of a product to the user's cart in one transaction.
#[instrument(skip(db, quantity), fields(quantity = quantity.value()))]
pub async fn add_to_cart(db: &PgPool, user_id: i64, product_id: i64, quantity: Quantity) -> Result<AddedToCart> {
    let mut tx = db.begin().await?;

    let cart = sqlx::query_as::<_, Cart>(FIND_OR_CREATE_CART)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    let product = sqlx::query_as::<_, ProductRecord>(&select_product_sql("p.id = $1"))
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::ProductNotFound)?;

    let price = snapshot_price(product.product.price, product.discount_window().as_ref(), Utc::now());

    let item = sqlx::query_as::<_, CartItem>(MERGE_ITEM)
        .bind(cart.id)
        .bind(product_id)
        .bind(quantity.value())
        .bind(price)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(cart_id = cart.id, cart_item_id = item.id, total_quantity = item.quantity, "added to cart");

    Ok(AddedToCart { cart_id: cart.id, product_id, quantity: quantity.value() })
}

/// Items of the user's cart in the order they were first added.
#[instrument(skip(db))]
pub async fn get_cart_by_user_id(db: &PgPool, user_id: i64) -> Result<Vec<CartLine>> {
    let sql = format!(
        "SELECT ci.id AS item_id, ci.cart_id, ci.quantity, ci.price AS item_price, \
         ci.created_at AS item_created_at, ci.updated_at AS item_updated_at, {PRODUCT_COLUMNS} \
         FROM cart_items ci \
         JOIN carts ct ON ct.id = ci.cart_id \
         JOIN products p ON p.id = ci.product_id \
         LEFT JOIN categories c ON c.id = p.category_id \
         LEFT JOIN discounts d ON d.id = p.discount_id \
         WHERE ct.user_id = $1 \
         ORDER BY ci.created_at ASC, ci.id ASC"
    );
    let records = sqlx::query_as::<_, CartLineRecord>(&sql).bind(user_id).fetch_all(db).await?;
    let now = Utc::now();
    Ok(records.into_iter().map(|r| r.into_line(now)).collect())
}

/// Overwrites the quantity of one cart line.
#[instrument(skip(db))]
pub async fn update_quantity(db: &PgPool, cart_item_id: i64, quantity: i32) -> Result<CartItem> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM cart_items WHERE id = $1")
        .bind(cart_item_id)
        .fetch_optional(db)
        .await?;
    if exists.is_none() {
        return Err(StoreError::CartItemNotFound);
    }
    let quantity = Quantity::new(quantity).map_err(|_| StoreError::InvalidQuantity)?;

    let item = sqlx::query_as::<_, CartItem>(
        "UPDATE cart_items SET quantity = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(cart_item_id)
    .bind(quantity.value())
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::CartItemNotFound)?;

    info!(quantity = item.quantity, "cart item updated");
    Ok(item)
}

#[instrument(skip(db))]
pub async fn remove_item(db: &PgPool, cart_item_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(cart_item_id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::CartItemGone);
    }
    info!("cart item removed");
    Ok(())
}

/// Deletes every item of the user's cart and returns how many went away.
/// A user without a cart yields 0.
#[instrument(skip(db))]
pub async fn clear_cart(db: &PgPool, user_id: i64) -> Result<u64> {
    let cart_id = sqlx::query_scalar::<_, i64>("SELECT id FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    let Some(cart_id) = cart_id else { return Ok(0) };

    let removed = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(db)
        .await?
        .rows_affected();
    info!(cart_id, removed, "cart cleared");
    Ok(removed)
}
