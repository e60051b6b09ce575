use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::instrument;

use crate::domain::filter::parse_flag;
use crate::domain::{ListingParams, ProductEvent, Slug};
use crate::models::{Product, ProductView};
use crate::services::product::{self as product_service, normalize_reference, ListingPage, NewProduct, ProductChanges};
use crate::state::AppState;
use crate::web::extract::{ApiPath, ApiQuery};
use crate::web::multipart::ProductForm;
use crate::web::response::{ApiError, ApiResponse};

const NOT_FOUND: &str = "Sản phẩm không tồn tại";
const LOOKUP_FAILED: &str = "Lỗi khi lấy chi tiết sản phẩm";
const LIST_FAILED: &str = "Lỗi khi tải danh sách sản phẩm";
const CREATED: &str = "Thêm sản phẩm thành công";
const UPDATED: &str = "Cập nhật sản phẩm thành công";
const DELETED: &str = "Xóa thành công sản phẩm";
const DELETE_NOT_FOUND: &str = "Không tìm thấy sản phẩm để xóa";
const DELETE_FAILED: &str = "Đã xảy ra lỗi khi xóa sản phẩm";
const MISSING_NAME_OR_PRICE: &str = "Thiếu tên hoặc giá sản phẩm";
const INVALID_PRICE: &str = "Giá sản phẩm không hợp lệ";
const INVALID_SLUG: &str = "Slug sản phẩm không hợp lệ";

const FEATURED_KEYS: &[&str] = &["isFeatured", "is_featured"];
const CATEGORY_KEYS: &[&str] = &["categoryId", "category_id"];
const DISCOUNT_KEYS: &[&str] = &["discountId", "discount_id"];

fn parse_price(raw: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(raw)
        .ok()
        .filter(|p| !p.is_sign_negative())
        .ok_or_else(|| ApiError::bad_request(INVALID_PRICE))
}

fn parse_slug(raw: Option<&str>, name: &str) -> Result<Slug, ApiError> {
    match raw {
        Some(slug) => Slug::new(slug),
        None => Slug::from_name(name),
    }
    .map_err(|_| ApiError::bad_request(INVALID_SLUG))
}

pub(crate) fn new_product(form: &ProductForm) -> Result<NewProduct, ApiError> {
    let (Some(name), Some(price)) = (form.text(&["name"]), form.text(&["price"])) else {
        return Err(ApiError::bad_request(MISSING_NAME_OR_PRICE));
    };
    Ok(NewProduct {
        name: name.to_string(),
        slug: parse_slug(form.text(&["slug"]), name)?,
        description: form.text(&["description"]).map(str::to_string),
        price: parse_price(price)?,
        product_type: form.text(&["type"]).map(str::to_string),
        is_featured: form.text(FEATURED_KEYS).map(parse_flag).unwrap_or(false),
        category_id: form.raw(CATEGORY_KEYS).and_then(normalize_reference),
        discount_id: form.raw(DISCOUNT_KEYS).and_then(normalize_reference),
    })
}

pub(crate) fn product_changes(form: &ProductForm) -> Result<ProductChanges, ApiError> {
    Ok(ProductChanges {
        name: form.text(&["name"]).map(str::to_string),
        slug: form.text(&["slug"]).map(|s| parse_slug(Some(s), s)).transpose()?,
        description: form.text(&["description"]).map(str::to_string),
        price: form.text(&["price"]).map(parse_price).transpose()?,
        product_type: form.text(&["type"]).map(str::to_string),
        is_featured: form.text(FEATURED_KEYS).map(parse_flag),
        category_id: form.raw(CATEGORY_KEYS).map(normalize_reference),
        discount_id: form.raw(DISCOUNT_KEYS).map(normalize_reference),
    })
}

#[instrument(name = "handler::list_products", skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListingParams>,
) -> Result<ApiResponse<ListingPage>, ApiError> {
    let (filter, pagination) = params.into_query();
    let page = product_service::list(&state.db, &filter, pagination)
        .await
        .map_err(|e| ApiError::masked(e, LIST_FAILED))?;
    Ok(ApiResponse::data(page))
}

#[instrument(name = "handler::get_product", skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<ApiResponse<ProductView>, ApiError> {
    product_service::find_by_slug(&state.db, &slug)
        .await
        .map_err(|e| ApiError::masked(e, LOOKUP_FAILED))?
        .map(ApiResponse::data)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

#[instrument(name = "handler::create_product", skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let mut form = ProductForm::collect(multipart?).await?;
    let input = new_product(&form)?;
    let image = form.take_image();

    let product = product_service::create(&state.db, state.images.as_ref(), input, image).await?;
    state.events.publish(ProductEvent::Created { product_id: product.id, slug: product.slug.clone() }).await;
    Ok(ApiResponse::with_message(CREATED, product))
}

#[instrument(name = "handler::update_product", skip(state, multipart))]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let mut form = ProductForm::collect(multipart?).await?;
    let changes = product_changes(&form)?;
    let image = form.take_image();

    let product = product_service::update(&state.db, state.images.as_ref(), id, changes, image).await?;
    state.events.publish(ProductEvent::Updated { product_id: product.id, slug: product.slug.clone() }).await;
    Ok(ApiResponse::with_message(UPDATED, product))
}

#[instrument(name = "handler::delete_product", skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    let deleted = product_service::delete(&state.db, state.images.as_ref(), id)
        .await
        .map_err(|e| ApiError::masked(e, DELETE_FAILED))?;
    if deleted.is_none() {
        return Err(ApiError::not_found(DELETE_NOT_FOUND));
    }
    state.events.publish(ProductEvent::Deleted { product_id: id }).await;
    Ok(ApiResponse::message(DELETED))
}
