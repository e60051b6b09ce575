//! Domain events
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    Cart(CartEvent),
    Product(ProductEvent),
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    #[serde(rename_all = "camelCase")]
    ItemAdded { user_id: i64, cart_id: i64, product_id: i64, quantity: i32 },
    #[serde(rename_all = "camelCase")]
    ItemUpdated { cart_item_id: i64, quantity: i32 },
    #[serde(rename_all = "camelCase")]
    ItemRemoved { cart_item_id: i64 },
    #[serde(rename_all = "camelCase")]
    Cleared { user_id: i64, removed: u64 },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProductEvent {
    #[serde(rename_all = "camelCase")]
    Created { product_id: i64, slug: String },
    #[serde(rename_all = "camelCase")]
    Updated { product_id: i64, slug: String },
    #[serde(rename_all = "camelCase")]
    Deleted { product_id: i64 },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Cart(CartEvent::ItemAdded { .. }) => "store.cart.item_added",
            Self::Cart(CartEvent::ItemUpdated { .. }) => "store.cart.item_updated",
            Self::Cart(CartEvent::ItemRemoved { .. }) => "store.cart.item_removed",
            Self::Cart(CartEvent::Cleared { .. }) => "store.cart.cleared",
            Self::Product(ProductEvent::Created { .. }) => "store.product.created",
            Self::Product(ProductEvent::Updated { .. }) => "store.product.updated",
            Self::Product(ProductEvent::Deleted { .. }) => "store.product.deleted",
        }
    }
}

impl From<CartEvent> for DomainEvent { fn from(e: CartEvent) -> Self { Self::Cart(e) } }
impl From<ProductEvent> for DomainEvent { fn from(e: ProductEvent) -> Self { Self::Product(e) } }
