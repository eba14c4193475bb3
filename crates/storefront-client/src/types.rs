//! Wire types of the storefront REST API

use serde::{Deserialize, Serialize};
use voice_assistant::{Cart, CartEntry, Item, ItemId, Wishlist};

/// Catalog entry as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item::new(record.id, record.name, record.category)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// A reference that the backend may or may not have populated
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Populated(ItemRecord),
    Id(String),
}

impl ItemRef {
    pub fn id(&self) -> &str {
        match self {
            ItemRef::Populated(record) => &record.id,
            ItemRef::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: ItemRef,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartBody {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    /// `null` for a shopper who never added anything
    #[serde(default)]
    pub cart: Option<CartBody>,
}

impl From<CartResponse> for Cart {
    fn from(response: CartResponse) -> Self {
        let items = response
            .cart
            .unwrap_or_default()
            .items
            .into_iter()
            .map(|line| CartEntry {
                item_id: ItemId::new(line.item_id.id()),
            })
            .collect();
        Cart { items }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WishlistResponse {
    #[serde(default)]
    pub wishlist: Vec<ItemRef>,
}

impl From<WishlistResponse> for Wishlist {
    fn from(response: WishlistResponse) -> Self {
        let items = response
            .wishlist
            .into_iter()
            .map(|entry| match entry {
                ItemRef::Populated(record) => record.into(),
                ItemRef::Id(id) => Item::new(id, "", ""),
            })
            .collect();
        Wishlist { items }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWishlistRequest {
    pub item_id: String,
}

/// Error payload; the backend uses either key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn text(self) -> Option<String> {
        self.error.or(self.message)
    }
}
