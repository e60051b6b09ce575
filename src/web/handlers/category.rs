use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::models::Category;
use crate::services::category as category_service;
use crate::state::AppState;
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::response::{ApiError, ApiResponse};

const MISSING_NAME: &str = "Thiếu tên danh mục";
const CREATED: &str = "Thêm danh mục thành công";
const UPDATED: &str = "Cập nhật danh mục thành công";
const DELETED: &str = "Xóa danh mục thành công";

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(required)]
    pub name: Option<String>,
}

impl CategoryRequest {
    fn into_name(self) -> Result<String, ApiError> {
        self.validate().map_err(|_| ApiError::bad_request(MISSING_NAME))?;
        self.name.ok_or_else(|| ApiError::bad_request(MISSING_NAME))
    }
}

#[instrument(name = "handler::list_categories", skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<ApiResponse<Vec<Category>>, ApiError> {
    Ok(ApiResponse::data(category_service::list(&state.db).await?))
}

#[instrument(name = "handler::get_category", skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Category>, ApiError> {
    Ok(ApiResponse::data(category_service::get(&state.db, id).await?))
}

#[instrument(name = "handler::create_category", skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<ApiResponse<Category>, ApiError> {
    let name = req.into_name()?;
    Ok(ApiResponse::with_message(CREATED, category_service::create(&state.db, &name).await?))
}

#[instrument(name = "handler::update_category", skip(state))]
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<ApiResponse<Category>, ApiError> {
    let name = req.into_name()?;
    Ok(ApiResponse::with_message(UPDATED, category_service::update(&state.db, id, &name).await?))
}

#[instrument(name = "handler::delete_category", skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    category_service::delete(&state.db, id).await?;
    Ok(ApiResponse::message(DELETED))
}
