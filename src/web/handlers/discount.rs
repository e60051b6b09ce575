use axum::extract::State;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::models::Discount;
use crate::services::discount::{self as discount_service, DiscountChanges, DiscountInput};
use crate::state::AppState;
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::response::{ApiError, ApiResponse};

const MISSING_FIELDS: &str = "Thiếu thông tin khuyến mãi";
const CREATED: &str = "Thêm khuyến mãi thành công";
const UPDATED: &str = "Cập nhật khuyến mãi thành công";
const DELETED: &str = "Xóa khuyến mãi thành công";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    #[validate(required)]
    pub name: Option<String>,
    #[validate(required)]
    pub percentage: Option<Decimal>,
    #[validate(required)]
    pub start_date: Option<DateTime<Utc>>,
    #[validate(required)]
    pub end_date: Option<DateTime<Utc>>,
}

impl DiscountRequest {
    fn into_input(self) -> Result<DiscountInput, ApiError> {
        self.validate().map_err(|_| ApiError::bad_request(MISSING_FIELDS))?;
        let (Some(name), Some(percentage), Some(start_date), Some(end_date)) =
            (self.name, self.percentage, self.start_date, self.end_date)
        else {
            return Err(ApiError::bad_request(MISSING_FIELDS));
        };
        Ok(DiscountInput::new(&name, percentage, start_date, end_date)?)
    }

    fn into_changes(self) -> DiscountChanges {
        DiscountChanges {
            name: self.name,
            percentage: self.percentage,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[instrument(name = "handler::list_discounts", skip(state))]
pub async fn list_discounts(State(state): State<AppState>) -> Result<ApiResponse<Vec<Discount>>, ApiError> {
    Ok(ApiResponse::data(discount_service::list(&state.db).await?))
}

#[instrument(name = "handler::get_discount", skip(state))]
pub async fn get_discount(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Discount>, ApiError> {
    Ok(ApiResponse::data(discount_service::get(&state.db, id).await?))
}

#[instrument(name = "handler::create_discount", skip(state))]
pub async fn create_discount(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DiscountRequest>,
) -> Result<ApiResponse<Discount>, ApiError> {
    let input = req.into_input()?;
    Ok(ApiResponse::with_message(CREATED, discount_service::create(&state.db, input).await?))
}

#[instrument(name = "handler::update_discount", skip(state))]
pub async fn update_discount(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<DiscountRequest>,
) -> Result<ApiResponse<Discount>, ApiError> {
    let discount = discount_service::update(&state.db, id, req.into_changes()).await?;
    Ok(ApiResponse::with_message(UPDATED, discount))
}

#[instrument(name = "handler::delete_discount", skip(state))]
pub async fn delete_discount(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    discount_service::delete(&state.db, id).await?;
    Ok(ApiResponse::message(DELETED))
}
