//! Request-scoped operations. Every function takes the pool (and the
//! image store when it needs one) as an explicit argument.
pub mod cart;
pub mod category;
pub mod discount;
pub mod product;
pub mod product_query;
