//! # Voice Assistant - storefront voice commands
//!
//! Turns finalized speech transcripts into storefront actions. A transcript
//! flows through four stages:
//!
//! ```text
//!  SpeechCapture ──► CaptureSession ──► classify() ──► ActionDispatcher ──► SpeechOutput
//!   (host port)      (debounce, idle/     (ordered        (catalog lookup,
//!                     listening)           rule table)      cart/wishlist APIs)
//! ```
//!
//! Every collaborator (HTTP APIs, speech engines, routing) is injected through
//! the traits in [`ports`], so the engine runs the same against a browser
//! bridge, a terminal, or test doubles.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod matcher;
pub mod ports;
pub mod session;
pub mod timer;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogLookup, Item, ItemId, Resolution};
pub use classifier::{classify, CategoryRegistry, Destination, Intent};
pub use config::AssistantConfig;
pub use dispatcher::{ActionDispatcher, DispatcherBuilder};
pub use matcher::best_match;
pub use ports::{
    CaptureEvent, CaptureHandle, CaptureOptions, CaptureSink, Cart, CartEntry, CartService,
    CatalogService, CategoryFilter, Navigator, SessionObserver, SpeechCapture, SpeechOutput,
    StoreChange, StoreListener, Wishlist, WishlistService,
};
pub use session::{CaptureSession, SessionStatus};
pub use timer::DebounceTimer;

/// Failure reported by a storefront collaborator (catalog, cart, wishlist).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("service unreachable: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ServiceError::Rejected { .. })
    }
}

/// Failure reported by the speech-capture collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    #[error("speech recognition is not supported")]
    Unsupported,

    #[error("{0}")]
    Engine(String),
}

/// Errors surfaced by the assistant's own setup paths.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
