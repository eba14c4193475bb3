//! In-memory doubles for the capability ports

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    catalog::{Item, ItemId},
    ports::{
        CaptureEvent, CaptureHandle, CaptureOptions, CaptureSink, Cart, CartEntry, CartService,
        CatalogService, CategoryFilter, Navigator, SessionObserver, SpeechCapture, SpeechOutput,
        StoreChange, StoreListener, Wishlist, WishlistService,
    },
    CaptureError, ServiceError,
};

#[derive(Default)]
struct StoreState {
    catalog: Vec<Item>,
    cart: Vec<ItemId>,
    wishlist: Vec<Item>,
    cart_adds: Vec<(String, u32)>,
    cart_removes: Vec<String>,
    toggles: Vec<String>,
    catalog_error: Option<ServiceError>,
    read_error: Option<ServiceError>,
    mutation_error: Option<ServiceError>,
}

/// Catalog, cart and wishlist backed by vectors
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
}

impl FakeStore {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_catalog() -> Arc<Self> {
        let store = Self::default();
        store.state.lock().unwrap().catalog = vec![
            Item::new("1", "Mouse", "Electronics"),
            Item::new("2", "Wireless Mouse", "Electronics"),
            Item::new("3", "Mouse Pad", "Electronics"),
        ];
        Arc::new(store)
    }

    pub fn put_in_cart(&self, id: &str) {
        self.state.lock().unwrap().cart.push(ItemId::new(id));
    }

    pub fn put_in_wishlist(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(item) = state.catalog.iter().find(|item| item.id.as_str() == id).cloned() {
            state.wishlist.push(item);
        }
    }

    pub fn fail_catalog(&self, err: ServiceError) {
        self.state.lock().unwrap().catalog_error = Some(err);
    }

    pub fn fail_reads(&self, err: ServiceError) {
        self.state.lock().unwrap().read_error = Some(err);
    }

    pub fn fail_mutations(&self, err: ServiceError) {
        self.state.lock().unwrap().mutation_error = Some(err);
    }

    pub fn cart_adds(&self) -> Vec<(String, u32)> {
        self.state.lock().unwrap().cart_adds.clone()
    }

    pub fn cart_removes(&self) -> Vec<String> {
        self.state.lock().unwrap().cart_removes.clone()
    }

    pub fn toggles(&self) -> Vec<String> {
        self.state.lock().unwrap().toggles.clone()
    }
}

#[async_trait]
impl CatalogService for FakeStore {
    async fn list_all(&self) -> Result<Vec<Item>, ServiceError> {
        let state = self.state.lock().unwrap();
        match &state.catalog_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.catalog.clone()),
        }
    }
}

#[async_trait]
impl CartService for FakeStore {
    async fn add(&self, item_id: &ItemId, quantity: u32) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.mutation_error {
            return Err(err.clone());
        }
        state.cart_adds.push((item_id.to_string(), quantity));
        state.cart.push(item_id.clone());
        Ok(())
    }

    async fn remove(&self, item_id: &ItemId) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.mutation_error {
            return Err(err.clone());
        }
        state.cart_removes.push(item_id.to_string());
        state.cart.retain(|id| id != item_id);
        Ok(())
    }

    async fn current(&self) -> Result<Cart, ServiceError> {
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.read_error {
            return Err(err.clone());
        }
        Ok(Cart {
            items: state
                .cart
                .iter()
                .map(|id| CartEntry { item_id: id.clone() })
                .collect(),
        })
    }
}

#[async_trait]
impl WishlistService for FakeStore {
    async fn current(&self) -> Result<Wishlist, ServiceError> {
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.read_error {
            return Err(err.clone());
        }
        Ok(Wishlist {
            items: state.wishlist.clone(),
        })
    }

    async fn toggle(&self, item_id: &ItemId) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.mutation_error {
            return Err(err.clone());
        }
        state.toggles.push(item_id.to_string());
        if state.wishlist.iter().any(|item| &item.id == item_id) {
            state.wishlist.retain(|item| &item.id != item_id);
        } else if let Some(item) = state.catalog.iter().find(|item| &item.id == item_id).cloned() {
            state.wishlist.push(item);
        }
        Ok(())
    }
}

#[derive(Default)]
struct Recording {
    spoken: Vec<String>,
    routes: Vec<String>,
    reloads: usize,
    filters: Vec<String>,
    changes: Vec<StoreChange>,
    listening: Vec<bool>,
    transcripts: Vec<String>,
}

/// Records everything the engine tells the host
#[derive(Default)]
pub struct Recorder {
    inner: Mutex<Recording>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<String> {
        self.inner.lock().unwrap().spoken.clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.inner.lock().unwrap().routes.clone()
    }

    pub fn reloads(&self) -> usize {
        self.inner.lock().unwrap().reloads
    }

    pub fn filters(&self) -> Vec<String> {
        self.inner.lock().unwrap().filters.clone()
    }

    pub fn changes(&self) -> Vec<StoreChange> {
        self.inner.lock().unwrap().changes.clone()
    }

    pub fn listening(&self) -> Vec<bool> {
        self.inner.lock().unwrap().listening.clone()
    }

    pub fn last_transcript(&self) -> Option<String> {
        self.inner.lock().unwrap().transcripts.last().cloned()
    }
}

impl SpeechOutput for Recorder {
    fn say(&self, text: &str) {
        self.inner.lock().unwrap().spoken.push(text.to_string());
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: &str) {
        self.inner.lock().unwrap().routes.push(route.to_string());
    }

    fn reload(&self) {
        self.inner.lock().unwrap().reloads += 1;
    }
}

impl CategoryFilter for Recorder {
    fn set_category(&self, category: &str) {
        self.inner.lock().unwrap().filters.push(category.to_string());
    }
}

impl StoreListener for Recorder {
    fn store_changed(&self, change: StoreChange) {
        self.inner.lock().unwrap().changes.push(change);
    }
}

impl SessionObserver for Recorder {
    fn listening_changed(&self, listening: bool) {
        self.inner.lock().unwrap().listening.push(listening);
    }

    fn transcript_changed(&self, text: &str) {
        self.inner.lock().unwrap().transcripts.push(text.to_string());
    }
}

#[derive(Default)]
struct CaptureState {
    sinks: Vec<CaptureSink>,
    options: Vec<CaptureOptions>,
    active: usize,
    started: usize,
    unsupported: bool,
    fail_on_start: Option<String>,
}

/// Capture engine driven by the test through the sinks it was handed
#[derive(Default)]
pub struct FakeCapture {
    state: Arc<Mutex<CaptureState>>,
}

impl FakeCapture {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unsupported() -> Arc<Self> {
        let capture = Self::default();
        capture.state.lock().unwrap().unsupported = true;
        Arc::new(capture)
    }

    /// Engine that reports `reason` from inside `start`
    pub fn failing_on_start(reason: &str) -> Arc<Self> {
        let capture = Self::default();
        capture.state.lock().unwrap().fail_on_start = Some(reason.to_string());
        Arc::new(capture)
    }

    pub fn options(&self) -> Vec<CaptureOptions> {
        self.state.lock().unwrap().options.clone()
    }

    /// Sink handed out by the n-th start call
    pub fn sink(&self, index: usize) -> CaptureSink {
        self.state.lock().unwrap().sinks[index].clone()
    }

    pub fn latest(&self) -> CaptureSink {
        let state = self.state.lock().unwrap();
        state.sinks[state.sinks.len() - 1].clone()
    }

    pub fn active_handles(&self) -> usize {
        self.state.lock().unwrap().active
    }

    pub fn starts(&self) -> usize {
        self.state.lock().unwrap().started
    }
}

struct FakeHandle {
    state: Arc<Mutex<CaptureState>>,
    stopped: bool,
}

impl CaptureHandle for FakeHandle {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.state.lock().unwrap().active -= 1;
        }
    }
}

impl SpeechCapture for FakeCapture {
    fn start(
        &self,
        options: &CaptureOptions,
        sink: CaptureSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        let mut state = self.state.lock().unwrap();
        if state.unsupported {
            return Err(CaptureError::Unsupported);
        }
        state.options.push(options.clone());
        state.sinks.push(sink.clone());
        state.active += 1;
        state.started += 1;
        let failure = state.fail_on_start.clone();
        drop(state);

        if let Some(reason) = failure {
            sink.emit(CaptureEvent::Error(reason));
        }
        Ok(Box::new(FakeHandle {
            state: self.state.clone(),
            stopped: false,
        }))
    }
}
