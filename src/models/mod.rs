//! Database rows and API views.
pub mod cart;
pub mod catalog;
pub mod product;

pub use cart::{AddedToCart, Cart, CartItem, CartLine, CartLineRecord};
pub use catalog::{Category, Discount};
pub use product::{CategorySummary, DiscountSummary, Product, ProductRecord, ProductView};
