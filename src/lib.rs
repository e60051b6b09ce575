//! Auto parts storefront
//!
//! Catalog browsing and per-user shopping carts over Postgres.
//!
//! ## Features
//! - Product listing with search, category, type, price and featured filters
//! - Time-bounded percentage discounts
//! - One cart per user, merge-on-add with price snapshots
//! - Category and discount management
//! - Product images kept on an external image host

pub mod config;
pub mod domain;
pub mod events;
pub mod images;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use state::AppState;

use thiserror::Error;

use crate::images::ImageError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Sản phẩm không tồn tại")]
    ProductNotFound,

    #[error("Không tìm thấy dòng này trong giỏ hàng")]
    CartItemNotFound,

    #[error("Sản phẩm không còn trong giỏ")]
    CartItemGone,

    #[error("Số lượng không được nhỏ hơn 1")]
    InvalidQuantity,

    #[error("Không tìm thấy danh mục")]
    CategoryNotFound,

    #[error("Không tìm thấy mã giảm giá")]
    DiscountNotFound,

    #[error("{0}")]
    Invalid(String),

    #[error("Image host error: {0}")]
    ImageHost(#[from] ImageError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
