//! Capability ports supplied by the host environment
//!
//! The engine owns no network, audio or routing code. Hosts implement these
//! traits (an HTTP client, a browser bridge, a terminal) and hand them to the
//! dispatcher and session at construction time.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Item, ItemId},
    session::SessionInner,
    CaptureError, ServiceError,
};

/// Read access to the full product catalog
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Item>, ServiceError>;
}

/// One line of the shopper's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub item_id: ItemId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartEntry>,
}

impl Cart {
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|entry| &entry.item_id == id)
    }
}

#[async_trait]
pub trait CartService: Send + Sync {
    async fn add(&self, item_id: &ItemId, quantity: u32) -> Result<(), ServiceError>;
    async fn remove(&self, item_id: &ItemId) -> Result<(), ServiceError>;
    async fn current(&self) -> Result<Cart, ServiceError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    pub items: Vec<Item>,
}

impl Wishlist {
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }
}

#[async_trait]
pub trait WishlistService: Send + Sync {
    async fn current(&self) -> Result<Wishlist, ServiceError>;
    /// Adds the item when absent, removes it when present.
    async fn toggle(&self, item_id: &ItemId) -> Result<(), ServiceError>;
}

/// Page routing owned by the host
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
    fn reload(&self);
}

/// Category filter of the product grid. Absent when the grid is not mounted.
pub trait CategoryFilter: Send + Sync {
    /// An empty category clears the filter.
    fn set_category(&self, category: &str);
}

/// Fire-and-forget speech synthesis
pub trait SpeechOutput: Send + Sync {
    fn say(&self, text: &str);
}

/// Cart or wishlist contents changed through a voice command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreChange {
    Cart,
    Wishlist,
}

pub trait StoreListener: Send + Sync {
    fn store_changed(&self, change: StoreChange);
}

/// Display hooks for the listening indicator and the live transcript
pub trait SessionObserver: Send + Sync {
    fn listening_changed(&self, _listening: bool) {}
    fn transcript_changed(&self, _text: &str) {}
}

/// Events emitted by a speech-capture engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Started,
    Interim(String),
    Final(String),
    Error(String),
    Ended,
}

/// Where a capture engine delivers its events.
///
/// Each sink is bound to the session generation that opened it; once the
/// session restarts or stops, events sent through an older sink are dropped.
#[derive(Clone)]
pub struct CaptureSink {
    generation: u64,
    session: Weak<SessionInner>,
}

impl CaptureSink {
    pub(crate) fn new(generation: u64, session: &Arc<SessionInner>) -> Self {
        Self {
            generation,
            session: Arc::downgrade(session),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn emit(&self, event: CaptureEvent) {
        if let Some(session) = self.session.upgrade() {
            SessionInner::on_event(&session, self.generation, event);
        }
    }

    pub fn interim(&self, text: impl Into<String>) {
        self.emit(CaptureEvent::Interim(text.into()));
    }

    pub fn final_result(&self, text: impl Into<String>) {
        self.emit(CaptureEvent::Final(text.into()));
    }
}

impl std::fmt::Debug for CaptureSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSink")
            .field("generation", &self.generation)
            .finish()
    }
}

/// Recognition settings handed to the engine when a stream opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    pub language: String,
    pub interim_results: bool,
}

/// A running recognition stream
pub trait CaptureHandle: Send {
    fn stop(&mut self);
}

/// Speech-to-text engine
pub trait SpeechCapture: Send + Sync {
    /// Begin continuous recognition, delivering events to `sink`.
    fn start(
        &self,
        options: &CaptureOptions,
        sink: CaptureSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError>;
}
