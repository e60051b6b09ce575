use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{cart, category, discount, health, product};
use crate::state::AppState;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/cart/add", post(cart::add_to_cart))
        .route("/api/v1/cart/update", put(cart::update_quantity).patch(cart::update_quantity))
        .route("/api/v1/cart/remove", delete(cart::remove_item))
        .route("/api/v1/cart/clear/:user_id", delete(cart::clear_cart))
        .route("/api/v1/cart/:user_id", get(cart::get_cart))
        .route("/api/v1/products", get(product::list_products).post(product::create_product))
        .route("/api/v1/products/slug/:slug", get(product::get_product))
        .route("/api/v1/products/:id", put(product::update_product).delete(product::delete_product))
        .route("/api/v1/categories", get(category::list_categories).post(category::create_category))
        .route(
            "/api/v1/categories/:id",
            get(category::get_category).put(category::update_category).delete(category::delete_category),
        )
        .route("/api/v1/discounts", get(discount::list_discounts).post(discount::create_discount))
        .route(
            "/api/v1/discounts/:id",
            get(discount::get_discount).put(discount::update_discount).delete(discount::delete_discount),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
