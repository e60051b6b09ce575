use sqlx::PgPool;
use tracing::{info, instrument};

use crate::models::Category;
use crate::{Result, StoreError};

fn checked_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Invalid("Tên danh mục không được để trống".to_string()));
    }
    Ok(name.to_string())
}

#[instrument(skip(db))]
pub async fn list(db: &PgPool) -> Result<Vec<Category>> {
    Ok(sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name, id").fetch_all(db).await?)
}

#[instrument(skip(db))]
pub async fn get(db: &PgPool, id: i64) -> Result<Category> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(StoreError::CategoryNotFound)
}

#[instrument(skip(db))]
pub async fn create(db: &PgPool, name: &str) -> Result<Category> {
    let name = checked_name(name)?;
    let category = sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING *")
        .bind(name)
        .fetch_one(db)
        .await?;
    info!(category_id = category.id, "category created");
    Ok(category)
}

#[instrument(skip(db))]
pub async fn update(db: &PgPool, id: i64, name: &str) -> Result<Category> {
    let name = checked_name(name)?;
    sqlx::query_as::<_, Category>("UPDATE categories SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(name)
        .fetch_optional(db)
        .await?
        .ok_or(StoreError::CategoryNotFound)
}

/// Products of a deleted category stay, with no category.
#[instrument(skip(db))]
pub async fn delete(db: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(db).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::CategoryNotFound);
    }
    info!(category_id = id, "category deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(checked_name("   "), Err(StoreError::Invalid(_))));
        assert_eq!(checked_name(" Lốp xe ").unwrap(), "Lốp xe");
    }
}
