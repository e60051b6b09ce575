use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::domain::{CartEvent, Quantity};
use crate::models::{AddedToCart, CartItem, CartLine};
use crate::services::cart as cart_service;
use crate::state::AppState;
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::response::{ApiError, ApiResponse};

const MISSING_INPUT: &str = "Thiếu thông tin đầu vào";
const MISSING_ITEM_OR_QUANTITY: &str = "Thiếu ID hoặc số lượng";
const MISSING_ITEM: &str = "Thiếu ID sản phẩm trong giỏ";
const ADDED: &str = "Đã thêm vào giỏ hàng";
const UPDATED: &str = "Cập nhật thành công";
const REMOVED: &str = "Đã xóa sản phẩm";
const CLEARED: &str = "Giỏ hàng đã trống";
const LOAD_FAILED: &str = "Lỗi tải giỏ hàng";
const REMOVE_FAILED: &str = "Lỗi khi xóa sản phẩm";
const CLEAR_FAILED: &str = "Lỗi khi làm sạch giỏ hàng";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[validate(required)]
    pub user_id: Option<i64>,
    #[validate(required)]
    pub product_id: Option<i64>,
    #[validate(required, range(min = 1))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    #[validate(required)]
    pub cart_item_id: Option<i64>,
    #[validate(required)]
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    #[validate(required)]
    pub cart_item_id: Option<i64>,
}

#[instrument(name = "handler::add_to_cart", skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddToCartRequest>,
) -> Result<ApiResponse<AddedToCart>, ApiError> {
    req.validate().map_err(|_| ApiError::bad_request(MISSING_INPUT))?;
    let (Some(user_id), Some(product_id), Some(quantity)) = (req.user_id, req.product_id, req.quantity) else {
        return Err(ApiError::bad_request(MISSING_INPUT));
    };
    let quantity = Quantity::new(quantity).map_err(|_| ApiError::bad_request(MISSING_INPUT))?;

    let added = cart_service::add_to_cart(&state.db, user_id, product_id, quantity).await?;
    state
        .events
        .publish(CartEvent::ItemAdded { user_id, cart_id: added.cart_id, product_id, quantity: added.quantity })
        .await;
    Ok(ApiResponse::with_message(ADDED, added))
}

#[instrument(name = "handler::get_cart", skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<ApiResponse<Vec<CartLine>>, ApiError> {
    let lines = cart_service::get_cart_by_user_id(&state.db, user_id)
        .await
        .map_err(|e| ApiError::masked(e, LOAD_FAILED))?;
    Ok(ApiResponse::data(lines))
}

#[instrument(name = "handler::update_quantity", skip(state))]
pub async fn update_quantity(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateQuantityRequest>,
) -> Result<ApiResponse<CartItem>, ApiError> {
    req.validate().map_err(|_| ApiError::bad_request(MISSING_ITEM_OR_QUANTITY))?;
    let (Some(cart_item_id), Some(quantity)) = (req.cart_item_id, req.quantity) else {
        return Err(ApiError::bad_request(MISSING_ITEM_OR_QUANTITY));
    };

    let item = cart_service::update_quantity(&state.db, cart_item_id, quantity).await?;
    state.events.publish(CartEvent::ItemUpdated { cart_item_id, quantity: item.quantity }).await;
    Ok(ApiResponse::with_message(UPDATED, item))
}

#[instrument(name = "handler::remove_item", skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RemoveItemRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    req.validate().map_err(|_| ApiError::bad_request(MISSING_ITEM))?;
    let Some(cart_item_id) = req.cart_item_id else {
        return Err(ApiError::bad_request(MISSING_ITEM));
    };

    cart_service::remove_item(&state.db, cart_item_id)
        .await
        .map_err(|e| ApiError::masked(e, REMOVE_FAILED))?;
    state.events.publish(CartEvent::ItemRemoved { cart_item_id }).await;
    Ok(ApiResponse::message(REMOVED))
}

#[instrument(name = "handler::clear_cart", skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    let removed = cart_service::clear_cart(&state.db, user_id)
        .await
        .map_err(|e| ApiError::masked(e, CLEAR_FAILED))?;
    if removed > 0 {
        state.events.publish(CartEvent::Cleared { user_id, removed }).await;
    }
    Ok(ApiResponse::message(CLEARED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_request_requires_positive_quantity() {
        let ok: AddToCartRequest = serde_json::from_str(r#"{"userId":1,"productId":5,"quantity":2}"#).unwrap();
        assert!(ok.validate().is_ok());
        let zero: AddToCartRequest = serde_json::from_str(r#"{"userId":1,"productId":5,"quantity":0}"#).unwrap();
        assert!(zero.validate().is_err());
        let missing: AddToCartRequest = serde_json::from_str(r#"{"userId":1,"quantity":2}"#).unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn update_request_accepts_any_present_quantity() {
        let req: UpdateQuantityRequest = serde_json::from_str(r#"{"cartItemId":3,"quantity":0}"#).unwrap();
        assert!(req.validate().is_ok());
        let req: UpdateQuantityRequest = serde_json::from_str(r#"{"cartItemId":3}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
