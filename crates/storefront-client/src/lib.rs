//! Storefront Client - HTTP client for the storefront REST API
//!
//! Backs the voice assistant's catalog, cart and wishlist ports:
//! - List the full catalog for product matching
//! - Add to and remove from the shopper's cart
//! - Read and toggle the shopper's wishlist

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use voice_assistant::{
    Cart, CartService, CatalogService, Item, ItemId, ServiceError, Wishlist, WishlistService,
};

pub mod types;
pub use types::*;

const DEFAULT_URL: &str = "http://localhost:5000";

/// Error types for storefront client operations
#[derive(Debug, thiserror::Error)]
pub enum StorefrontClientError {
    #[error("Storefront not reachable at {0}")]
    NotReachable(String),
    #[error("Storefront API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse storefront response: {0}")]
    ParseError(String),
}

impl From<StorefrontClientError> for ServiceError {
    fn from(err: StorefrontClientError) -> Self {
        match err {
            StorefrontClientError::NotReachable(url) => ServiceError::Transport(url),
            StorefrontClientError::ApiError { status, message } => {
                ServiceError::Rejected { status, message }
            }
            StorefrontClientError::ParseError(reason) => ServiceError::Decode(reason),
        }
    }
}

/// Client for the storefront API
#[derive(Clone)]
pub struct StorefrontClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl StorefrontClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            token: None,
        }
    }

    /// Authenticate requests with the shopper's bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Check if the storefront answers catalog requests
    pub async fn is_running(&self) -> bool {
        self.list_items().await.is_ok()
    }

    // ─── Catalog ──────────────────────────────────────────────────────────

    pub async fn list_items(&self) -> Result<Vec<Item>, StorefrontClientError> {
        let url = format!("{}/api/item/allitems", self.base_url);
        let resp = self.send(self.client.get(&url)).await?;
        let body: ItemsResponse = Self::parse(resp).await?;

        debug!("Fetched {} catalog items", body.items.len());
        Ok(body.items.into_iter().map(Item::from).collect())
    }

    // ─── Cart ─────────────────────────────────────────────────────────────

    pub async fn get_cart(&self) -> Result<Cart, StorefrontClientError> {
        let url = format!("{}/api/cart", self.base_url);
        let resp = self.send(self.authorized(self.client.get(&url))).await?;
        let body: CartResponse = Self::parse(resp).await?;
        Ok(body.into())
    }

    pub async fn add_to_cart(
        &self,
        item_id: &str,
        quantity: u32,
    ) -> Result<(), StorefrontClientError> {
        let url = format!("{}/api/cart/add", self.base_url);
        let req = AddToCartRequest {
            item_id: item_id.to_string(),
            quantity,
        };
        self.send(self.authorized(self.client.post(&url).json(&req)))
            .await?;
        Ok(())
    }

    pub async fn remove_from_cart(&self, item_id: &str) -> Result<(), StorefrontClientError> {
        let url = format!("{}/api/cart/remove/{}", self.base_url, item_id);
        self.send(self.authorized(self.client.delete(&url))).await?;
        Ok(())
    }

    // ─── Wishlist ─────────────────────────────────────────────────────────

    pub async fn get_wishlist(&self) -> Result<Wishlist, StorefrontClientError> {
        let url = format!("{}/api/user/wishlist", self.base_url);
        let resp = self.send(self.authorized(self.client.get(&url))).await?;
        let body: WishlistResponse = Self::parse(resp).await?;
        Ok(body.into())
    }

    pub async fn toggle_wishlist(&self, item_id: &str) -> Result<(), StorefrontClientError> {
        let url = format!("{}/api/user/wishlist/toggle", self.base_url);
        let req = ToggleWishlistRequest {
            item_id: item_id.to_string(),
        };
        self.send(self.authorized(self.client.post(&url).json(&req)))
            .await?;
        Ok(())
    }

    // ─── Plumbing ─────────────────────────────────────────────────────────

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send the request and turn non-success statuses into `ApiError`.
    async fn send(&self, req: RequestBuilder) -> Result<Response, StorefrontClientError> {
        let resp = req.send().await.map_err(|e| {
            warn!("Storefront request failed: {}", e);
            StorefrontClientError::NotReachable(self.base_url.clone())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        Err(StorefrontClientError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, StorefrontClientError> {
        resp.json()
            .await
            .map_err(|e| StorefrontClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl CatalogService for StorefrontClient {
    async fn list_all(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.list_items().await?)
    }
}

#[async_trait]
impl CartService for StorefrontClient {
    async fn add(&self, item_id: &ItemId, quantity: u32) -> Result<(), ServiceError> {
        Ok(self.add_to_cart(item_id.as_str(), quantity).await?)
    }

    async fn remove(&self, item_id: &ItemId) -> Result<(), ServiceError> {
        Ok(self.remove_from_cart(item_id.as_str()).await?)
    }

    async fn current(&self) -> Result<Cart, ServiceError> {
        Ok(self.get_cart().await?)
    }
}

#[async_trait]
impl WishlistService for StorefrontClient {
    async fn current(&self) -> Result<Wishlist, ServiceError> {
        Ok(self.get_wishlist().await?)
    }

    async fn toggle(&self, item_id: &ItemId) -> Result<(), ServiceError> {
        Ok(self.toggle_wishlist(item_id.as_str()).await?)
    }
}

/// Build a client from `STOREFRONT_URL` / `STOREFRONT_TOKEN`, returning it
/// only if the catalog answers.
pub async fn try_connect_to_storefront() -> Option<StorefrontClient> {
    let url = std::env::var("STOREFRONT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let mut client = StorefrontClient::new(&url);
    if let Ok(token) = std::env::var("STOREFRONT_TOKEN") {
        client = client.with_token(token);
    }

    match client.list_items().await {
        Ok(items) => {
            info!("Connected to storefront at {} ({} items)", url, items.len());
            Some(client)
        }
        Err(e) => {
            warn!("Storefront not available at {}: {}", url, e);
            None
        }
    }
}
