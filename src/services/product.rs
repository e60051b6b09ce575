//! Product catalog: listing, lookup and image-backed CRUD.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument, warn};

use crate::domain::{Pagination, ProductFilter, Slug};
use crate::images::{ImageStore, StoredImage, UploadedImage};
use crate::models::product::PRODUCT_COLUMNS;
use crate::models::{Product, ProductRecord, ProductView};
use crate::services::product_query::{count_query, listing_query};
use crate::{Result, StoreError};

#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub count: i64,
    pub rows: Vec<ProductView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub price: Decimal,
    pub product_type: Option<String>,
    pub is_featured: bool,
    pub category_id: Option<i64>,
    pub discount_id: Option<i64>,
}

/// Partial update. For the nullable references the outer `Option` says
/// whether the field was sent, the inner one is the new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub product_type: Option<String>,
    pub is_featured: Option<bool>,
    pub category_id: Option<Option<i64>>,
    pub discount_id: Option<Option<i64>>,
}

/// Empty, `"null"` and non-integer references all mean "no discount".
pub fn normalize_reference(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return None;
    }
    raw.parse::<i64>().ok()
}

#[instrument(skip(db))]
pub async fn list(db: &PgPool, filter: &ProductFilter, pagination: Pagination) -> Result<ListingPage> {
    let count = count_query(filter).build_query_scalar::<i64>().fetch_one(db).await?;
    let records = listing_query(filter, pagination)
        .build_query_as::<ProductRecord>()
        .fetch_all(db)
        .await?;
    let now = Utc::now();
    let rows = records.into_iter().map(|r| r.into_view(now)).collect();
    Ok(ListingPage { count, rows })
}

pub(crate) fn select_product_sql(condition: &str) -> String {
    format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id \
         LEFT JOIN discounts d ON d.id = p.discount_id \
         WHERE {condition}"
    )
}

#[instrument(skip(db))]
pub async fn find_by_slug(db: &PgPool, slug: &str) -> Result<Option<ProductView>> {
    let record = sqlx::query_as::<_, ProductRecord>(&select_product_sql("p.slug = $1"))
        .bind(slug)
        .fetch_optional(db)
        .await?;
    Ok(record.map(|r| r.into_view(Utc::now())))
}

async fn upload(images: &dyn ImageStore, image: Option<UploadedImage>) -> Result<Option<StoredImage>> {
    match image {
        Some(image) => Ok(Some(images.upload(image).await?)),
        None => Ok(None),
    }
}

async fn destroy_quietly(images: &dyn ImageStore, public_id: &str) {
    if let Err(e) = images.destroy(public_id).await {
        warn!(%public_id, error = %e, "failed to delete remote image");
    }
}

#[instrument(skip(db, images, image), fields(slug = %input.slug))]
pub async fn create(
    db: &PgPool,
    images: &dyn ImageStore,
    input: NewProduct,
    image: Option<UploadedImage>,
) -> Result<Product> {
    let stored = upload(images, image).await?;
    let inserted = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, slug, description, price, type, is_featured, image, image_public_id, category_id, discount_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(&input.name)
    .bind(input.slug.as_str())
    .bind(&input.description)
    .bind(input.price)
    .bind(&input.product_type)
    .bind(input.is_featured)
    .bind(stored.as_ref().map(|s| s.url.clone()))
    .bind(stored.as_ref().map(|s| s.public_id.clone()))
    .bind(input.category_id)
    .bind(input.discount_id)
    .fetch_one(db)
    .await;

    match inserted {
        Ok(product) => {
            info!(product_id = product.id, "product created");
            Ok(product)
        }
        Err(e) => {
            if let Some(s) = &stored {
                destroy_quietly(images, &s.public_id).await;
            }
            Err(e.into())
        }
    }
}

fn update_query(id: i64, changes: &ProductChanges, stored: Option<&StoredImage>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE products SET updated_at = NOW()");
    if let Some(name) = &changes.name {
        qb.push(", name = ").push_bind(name.clone());
    }
    if let Some(slug) = &changes.slug {
        qb.push(", slug = ").push_bind(slug.as_str().to_string());
    }
    if let Some(description) = &changes.description {
        qb.push(", description = ").push_bind(description.clone());
    }
    if let Some(price) = changes.price {
        qb.push(", price = ").push_bind(price);
    }
    if let Some(product_type) = &changes.product_type {
        qb.push(", type = ").push_bind(product_type.clone());
    }
    if let Some(featured) = changes.is_featured {
        qb.push(", is_featured = ").push_bind(featured);
    }
    if let Some(category_id) = changes.category_id {
        qb.push(", category_id = ").push_bind(category_id);
    }
    if let Some(discount_id) = changes.discount_id {
        qb.push(", discount_id = ").push_bind(discount_id);
    }
    if let Some(image) = stored {
        qb.push(", image = ").push_bind(image.url.clone());
        qb.push(", image_public_id = ").push_bind(image.public_id.clone());
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    qb
}

/// Applies `changes`. A new image replaces the stored one; the previous
/// remote file is deleted only after the row is saved, and a failed
/// deletion leaves the update in place.
#[instrument(skip(db, images, changes, image))]
pub async fn update(
    db: &PgPool,
    images: &dyn ImageStore,
    id: i64,
    changes: ProductChanges,
    image: Option<UploadedImage>,
) -> Result<Product> {
    let current = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(StoreError::ProductNotFound)?;

    let stored = upload(images, image).await?;
    let mut query = update_query(id, &changes, stored.as_ref());
    let updated = match query.build_query_as::<Product>().fetch_optional(db).await {
        Ok(Some(product)) => product,
        outcome => {
            if let Some(s) = &stored {
                destroy_quietly(images, &s.public_id).await;
            }
            return Err(match outcome {
                Err(e) => e.into(),
                Ok(_) => StoreError::ProductNotFound,
            });
        }
    };

    if stored.is_some() {
        if let Some(old) = current.image_public_id.as_deref() {
            destroy_quietly(images, old).await;
        }
    }
    info!(product_id = id, "product updated");
    Ok(updated)
}

/// Deletes the row, then its remote image. Returns `None` when no product
/// has this id.
#[instrument(skip(db, images))]
pub async fn delete(db: &PgPool, images: &dyn ImageStore, id: i64) -> Result<Option<Product>> {
    let deleted = sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(db)
        .await?;
    if let Some(public_id) = deleted.as_ref().and_then(|p| p.image_public_id.as_deref()) {
        destroy_quietly(images, public_id).await;
    }
    if deleted.is_some() {
        info!(product_id = id, "product deleted");
    }
    Ok(deleted)
}
