//! Domain layer: value objects, pricing rules, listing filters and events.
pub mod events;
pub mod filter;
pub mod pricing;
pub mod value_objects;

pub use events::{CartEvent, DomainEvent, ProductEvent};
pub use filter::{ListingParams, Pagination, PriceRange, ProductFilter};
pub use pricing::{display_price, snapshot_price, DiscountWindow};
pub use value_objects::{Percentage, Quantity, Slug};
