//! Product catalog against a real Postgres with an in-memory image host.
//! Run with `DATABASE_URL=... cargo test -- --ignored`.

use std::sync::Mutex;

use async_trait::async_trait;
use autoparts_store::domain::{ListingParams, Pagination, ProductFilter, Slug};
use autoparts_store::images::{ImageError, ImageStore, StoredImage, UploadedImage};
use autoparts_store::services::product::{self, NewProduct, ProductChanges};
use autoparts_store::StoreError;
use bytes::Bytes;
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Hands out `p1`, `p2`, ... and records every destroyed id.
#[derive(Default)]
struct RecordingImages {
    uploaded: Mutex<u32>,
    destroyed: Mutex<Vec<String>>,
    fail_destroy: bool,
}

impl RecordingImages {
    fn failing_destroy() -> Self {
        Self { fail_destroy: true, ..Default::default() }
    }

    fn uploads(&self) -> u32 {
        *self.uploaded.lock().unwrap()
    }

    fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImages {
    async fn upload(&self, _image: UploadedImage) -> Result<StoredImage, ImageError> {
        let mut n = self.uploaded.lock().unwrap();
        *n += 1;
        Ok(StoredImage { url: format!("https://img.test/p{n}.png"), public_id: format!("p{n}") })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        if self.fail_destroy {
            return Err(ImageError::Rejected { status: 500, body: "unavailable".into() });
        }
        Ok(())
    }
}

fn image() -> Option<UploadedImage> {
    Some(UploadedImage { file_name: Some("lop.png".into()), content_type: Some("image/png".into()), data: Bytes::from_static(b"png") })
}

fn new_product(slug: &str, category_id: Option<i64>) -> NewProduct {
    NewProduct {
        name: format!("Lốp {slug}"),
        slug: Slug::new(slug).unwrap(),
        description: None,
        price: Decimal::new(1_500_000, 0),
        product_type: Some("tire".into()),
        is_featured: false,
        category_id,
        discount_id: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn failed_insert_destroys_uploaded_image(pool: PgPool) {
    let images = RecordingImages::default();
    let err = product::create(&pool, &images, new_product("lop-a", Some(999_999)), image()).await.unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(images.destroyed(), vec!["p1".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn new_image_replaces_old_one_after_row_is_saved(pool: PgPool) {
    let images = RecordingImages::default();
    let created = product::create(&pool, &images, new_product("lop-a", None), image()).await.unwrap();
    assert_eq!(created.image_public_id.as_deref(), Some("p1"));

    let updated = product::update(&pool, &images, created.id, ProductChanges::default(), image()).await.unwrap();
    assert_eq!(updated.image_public_id.as_deref(), Some("p2"));
    assert_eq!(updated.image.as_deref(), Some("https://img.test/p2.png"));
    assert_eq!(images.destroyed(), vec!["p1".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn failed_old_image_cleanup_keeps_the_update(pool: PgPool) {
    let images = RecordingImages::failing_destroy();
    let created = product::create(&pool, &images, new_product("lop-a", None), image()).await.unwrap();

    let changes = ProductChanges { price: Some(Decimal::new(990_000, 0)), ..Default::default() };
    let updated = product::update(&pool, &images, created.id, changes, image()).await.unwrap();
    assert_eq!(updated.price, Decimal::new(990_000, 0));

    let stored: Option<String> = sqlx::query_scalar("SELECT image_public_id FROM products WHERE id = $1")
        .bind(created.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("p2"));
    assert_eq!(images.destroyed(), vec!["p1".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn update_of_missing_product_uploads_nothing(pool: PgPool) {
    let images = RecordingImages::default();
    let err = product::update(&pool, &images, 42, ProductChanges::default(), image()).await.unwrap_err();
    assert!(matches!(err, StoreError::ProductNotFound));
    assert_eq!(images.uploads(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn delete_removes_row_and_remote_image(pool: PgPool) {
    let images = RecordingImages::default();
    let created = product::create(&pool, &images, new_product("lop-a", None), image()).await.unwrap();

    let deleted = product::delete(&pool, &images, created.id).await.unwrap();
    assert_eq!(deleted.map(|p| p.id), Some(created.id));
    assert_eq!(images.destroyed(), vec!["p1".to_string()]);

    assert!(product::delete(&pool, &images, created.id).await.unwrap().is_none());
    assert_eq!(images.destroyed().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn unknown_slug_is_none(pool: PgPool) {
    assert!(product::find_by_slug(&pool, "khong-co").await.unwrap().is_none());

    let images = RecordingImages::default();
    product::create(&pool, &images, new_product("lop-a", None), None).await.unwrap();
    let view = product::find_by_slug(&pool, "lop-a").await.unwrap().unwrap();
    assert_eq!(view.final_price, Decimal::new(1_500_000, 0));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn paged_listing_is_newest_first_with_full_count(pool: PgPool) {
    for (slug, days_ago) in [("a", 4), ("b", 3), ("c", 2), ("d", 1)] {
        sqlx::query(
            "INSERT INTO products (name, slug, price, created_at) \
             VALUES ($1, $1, 10, NOW() - make_interval(days => $2))",
        )
        .bind(slug)
        .bind(days_ago)
        .execute(&pool)
        .await
        .unwrap();
    }

    let page = product::list(&pool, &ProductFilter::default(), Pagination::Paged { offset: 1, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page.count, 4);
    let slugs: Vec<&str> = page.rows.iter().map(|r| r.product.slug.as_str()).collect();
    assert_eq!(slugs, vec!["c", "b"]);

    let all = product::list(&pool, &ProductFilter::default(), Pagination::All).await.unwrap();
    assert_eq!(all.rows.len(), 4);
    assert_eq!(all.rows[0].product.slug, "d");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn category_filter_folds_non_ascii_names(pool: PgPool) {
    let category_id: i64 = sqlx::query_scalar("INSERT INTO categories (name) VALUES ('LỐP XE') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    let images = RecordingImages::default();
    product::create(&pool, &images, new_product("lop-a", Some(category_id)), None).await.unwrap();
    product::create(&pool, &images, new_product("lop-b", None), None).await.unwrap();

    for sent in ["LỐP XE", "lỐp xe"] {
        let params = ListingParams { categories: Some(sent.into()), ..Default::default() };
        let (filter, pagination) = params.into_query();
        let page = product::list(&pool, &filter, pagination).await.unwrap();
        assert_eq!(page.count, 1, "{sent}");
        assert_eq!(page.rows[0].product.slug, "lop-a");
    }
}
