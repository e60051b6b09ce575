use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::domain::Percentage;
use crate::models::Discount;
use crate::{Result, StoreError};

/// A validated discount: percentage within 0-100 and a non-inverted window.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountInput {
    pub name: String,
    pub percentage: Percentage,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl DiscountInput {
    pub fn new(name: &str, percentage: Decimal, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("Tên khuyến mãi không được để trống".to_string()));
        }
        let percentage = Percentage::new(percentage)
            .map_err(|_| StoreError::Invalid("Phần trăm giảm giá phải từ 0 đến 100".to_string()))?;
        if end_date < start_date {
            return Err(StoreError::Invalid("Ngày kết thúc phải sau ngày bắt đầu".to_string()));
        }
        Ok(Self { name: name.to_string(), percentage, start_date, end_date })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountChanges {
    pub name: Option<String>,
    pub percentage: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl DiscountChanges {
    fn apply_to(self, current: &Discount) -> Result<DiscountInput> {
        DiscountInput::new(
            self.name.as_deref().unwrap_or(&current.name),
            self.percentage.unwrap_or(current.percentage),
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

#[instrument(skip(db))]
pub async fn list(db: &PgPool) -> Result<Vec<Discount>> {
    Ok(sqlx::query_as::<_, Discount>("SELECT * FROM discounts ORDER BY created_at DESC, id DESC")
        .fetch_all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn get(db: &PgPool, id: i64) -> Result<Discount> {
    sqlx::query_as::<_, Discount>("SELECT * FROM discounts WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(StoreError::DiscountNotFound)
}

#[instrument(skip(db))]
pub async fn create(db: &PgPool, input: DiscountInput) -> Result<Discount> {
    let discount = sqlx::query_as::<_, Discount>(
        "INSERT INTO discounts (name, percentage, start_date, end_date) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&input.name)
    .bind(input.percentage.value())
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_one(db)
    .await?;
    info!(discount_id = discount.id, "discount created");
    Ok(discount)
}

#[instrument(skip(db))]
pub async fn update(db: &PgPool, id: i64, changes: DiscountChanges) -> Result<Discount> {
    let current = get(db, id).await?;
    let input = changes.apply_to(&current)?;
    sqlx::query_as::<_, Discount>(
        "UPDATE discounts SET name = $2, percentage = $3, start_date = $4, end_date = $5, updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.percentage.value())
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::DiscountNotFound)
}

/// Products that used the discount stay, without one.
#[instrument(skip(db))]
pub async fn delete(db: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM discounts WHERE id = $1").bind(id).execute(db).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::DiscountNotFound);
    }
    info!(discount_id = id, "discount deleted");
    Ok(())
}
