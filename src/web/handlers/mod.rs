pub mod cart;
pub mod category;
pub mod discount;
pub mod product;

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "autoparts-store" }))
}
