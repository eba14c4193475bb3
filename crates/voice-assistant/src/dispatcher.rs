//! Action dispatch for classified intents
//!
//! Performs the side effect of an [`Intent`] and produces the sentence spoken
//! back to the shopper. Collaborator failures end here: they are logged and
//! turned into a spoken failure message, never returned to the caller.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    catalog::{CatalogLookup, Item, Resolution},
    classifier::{CategoryMatch, CategoryRegistry, Destination, Intent},
    ports::{
        CartService, CatalogService, CategoryFilter, Navigator, SpeechOutput, StoreChange,
        StoreListener, WishlistService,
    },
    ServiceError,
};

const UNRECOGNIZED: &str = "Sorry, I did not understand.";
const REFRESHING: &str = "Refreshing the page";
const SHOWING_ALL_CATEGORIES: &str = "Showing all categories";
const FILTER_UNMOUNTED_ALL: &str = "Please navigate to the home page to view all categories";
const FILTER_UNMOUNTED: &str = "Please navigate to the home page to filter by category";

/// Spoken failures for one product action: an empty catalog, rejected by
/// the API, or broken before an answer arrived.
struct Failures {
    empty: &'static str,
    rejected: &'static str,
    broken: &'static str,
}

const CART_ADD: Failures = Failures {
    empty: "No products are available at this time.",
    rejected: "Failed to add the product to cart.",
    broken: "Something went wrong while adding the product.",
};
const CART_REMOVE: Failures = Failures {
    empty: "No products available.",
    rejected: "Failed to remove the product from cart.",
    broken: "Something went wrong while removing from cart.",
};
const WISHLIST_ADD: Failures = Failures {
    empty: "No products available.",
    rejected: "Failed to add the product to wishlist.",
    broken: "Something went wrong while adding to wishlist.",
};
const WISHLIST_REMOVE: Failures = Failures {
    empty: "No products available.",
    rejected: "Failed to remove the product from wishlist.",
    broken: "Something went wrong while removing from wishlist.",
};

impl Failures {
    fn message(&self, err: &ServiceError) -> String {
        if err.is_rejected() {
            self.rejected.to_string()
        } else {
            self.broken.to_string()
        }
    }
}

/// Executes intents against the injected storefront ports
pub struct ActionDispatcher {
    catalog: CatalogLookup,
    cart: Arc<dyn CartService>,
    wishlist: Arc<dyn WishlistService>,
    navigator: Arc<dyn Navigator>,
    speech: Arc<dyn SpeechOutput>,
    category_filter: Option<Arc<dyn CategoryFilter>>,
    store_listener: Option<Arc<dyn StoreListener>>,
    registry: CategoryRegistry,
}

/// Collects the required ports and the optional ones
pub struct DispatcherBuilder {
    catalog: Arc<dyn CatalogService>,
    cart: Arc<dyn CartService>,
    wishlist: Arc<dyn WishlistService>,
    navigator: Arc<dyn Navigator>,
    speech: Arc<dyn SpeechOutput>,
    category_filter: Option<Arc<dyn CategoryFilter>>,
    store_listener: Option<Arc<dyn StoreListener>>,
    registry: CategoryRegistry,
}

impl DispatcherBuilder {
    pub fn category_filter(mut self, filter: Arc<dyn CategoryFilter>) -> Self {
        self.category_filter = Some(filter);
        self
    }

    pub fn store_listener(mut self, listener: Arc<dyn StoreListener>) -> Self {
        self.store_listener = Some(listener);
        self
    }

    pub fn registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> ActionDispatcher {
        ActionDispatcher {
            catalog: CatalogLookup::new(self.catalog),
            cart: self.cart,
            wishlist: self.wishlist,
            navigator: self.navigator,
            speech: self.speech,
            category_filter: self.category_filter,
            store_listener: self.store_listener,
            registry: self.registry,
        }
    }
}

impl ActionDispatcher {
    pub fn builder(
        catalog: Arc<dyn CatalogService>,
        cart: Arc<dyn CartService>,
        wishlist: Arc<dyn WishlistService>,
        navigator: Arc<dyn Navigator>,
        speech: Arc<dyn SpeechOutput>,
    ) -> DispatcherBuilder {
        DispatcherBuilder {
            catalog,
            cart,
            wishlist,
            navigator,
            speech,
            category_filter: None,
            store_listener: None,
            registry: CategoryRegistry::storefront(),
        }
    }

    /// Perform the intent's side effect, speak the outcome and return it.
    pub async fn dispatch(&self, intent: &Intent) -> String {
        let message = match intent {
            Intent::Navigate { destination } => self.navigate(*destination),
            Intent::RefreshPage => {
                self.navigator.reload();
                REFRESHING.to_string()
            }
            Intent::FilterCategory { category } => self.filter_category(category),
            Intent::CartAdd { product_query } => self.cart_add(product_query).await,
            Intent::CartRemove { product_query } => self.cart_remove(product_query).await,
            Intent::WishlistAdd { product_query } => self.wishlist_add(product_query).await,
            Intent::WishlistRemove { product_query } => self.wishlist_remove(product_query).await,
            Intent::Unrecognized => UNRECOGNIZED.to_string(),
        };

        info!("Dispatched {}: {}", intent.kind(), message);
        self.speak(&message);
        message
    }

    pub fn speak(&self, text: &str) {
        self.speech.say(text);
    }

    fn navigate(&self, destination: Destination) -> String {
        self.navigator.navigate(destination.route());
        format!("Opening {}", destination.label())
    }

    fn filter_category(&self, category: &str) -> String {
        match (self.registry.resolve(category), &self.category_filter) {
            (CategoryMatch::All, Some(filter)) => {
                filter.set_category("");
                SHOWING_ALL_CATEGORIES.to_string()
            }
            (CategoryMatch::All, None) => FILTER_UNMOUNTED_ALL.to_string(),
            (CategoryMatch::Canonical(name), Some(filter)) => {
                filter.set_category(name);
                format!("Showing all {} items", name)
            }
            (CategoryMatch::Canonical(_), None) => FILTER_UNMOUNTED.to_string(),
            (CategoryMatch::Unavailable, _) => format!(
                "{} category is not available. Available categories are: {}",
                category,
                self.registry.spoken_list()
            ),
        }
    }

    async fn cart_add(&self, query: &str) -> String {
        let item = match self.resolve(query, &CART_ADD).await {
            Ok(item) => item,
            Err(message) => return message,
        };

        match self.cart.add(&item.id, 1).await {
            Ok(()) => {
                self.notify(StoreChange::Cart);
                format!("{} has been added to your cart.", item.name)
            }
            Err(err) => {
                warn!("Cart add failed for {}: {}", item.id, err);
                CART_ADD.message(&err)
            }
        }
    }

    async fn cart_remove(&self, query: &str) -> String {
        let item = match self.resolve(query, &CART_REMOVE).await {
            Ok(item) => item,
            Err(message) => return message,
        };

        match self.cart.current().await {
            Ok(cart) if !cart.contains(&item.id) => {
                return format!("{} is not in your cart.", item.name);
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Could not load cart before removing {}: {}", item.id, err);
                return CART_REMOVE.message(&err);
            }
        }

        match self.cart.remove(&item.id).await {
            Ok(()) => {
                self.notify(StoreChange::Cart);
                format!("{} has been removed from your cart.", item.name)
            }
            Err(err) => {
                warn!("Cart remove failed for {}: {}", item.id, err);
                CART_REMOVE.message(&err)
            }
        }
    }

    async fn wishlist_add(&self, query: &str) -> String {
        let item = match self.resolve(query, &WISHLIST_ADD).await {
            Ok(item) => item,
            Err(message) => return message,
        };

        match self.wishlist.current().await {
            Ok(wishlist) if wishlist.contains(&item.id) => {
                return format!("{} is already in your wishlist.", item.name);
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Could not load wishlist before adding {}: {}", item.id, err);
                return WISHLIST_ADD.message(&err);
            }
        }

        match self.wishlist.toggle(&item.id).await {
            Ok(()) => {
                self.notify(StoreChange::Wishlist);
                format!("{} has been added to your wishlist.", item.name)
            }
            Err(err) => {
                warn!("Wishlist add failed for {}: {}", item.id, err);
                WISHLIST_ADD.message(&err)
            }
        }
    }

    async fn wishlist_remove(&self, query: &str) -> String {
        let item = match self.resolve(query, &WISHLIST_REMOVE).await {
            Ok(item) => item,
            Err(message) => return message,
        };

        match self.wishlist.current().await {
            Ok(wishlist) if !wishlist.contains(&item.id) => {
                return format!("{} is not in your wishlist.", item.name);
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Could not load wishlist before removing {}: {}", item.id, err);
                return WISHLIST_REMOVE.message(&err);
            }
        }

        match self.wishlist.toggle(&item.id).await {
            Ok(()) => {
                self.notify(StoreChange::Wishlist);
                format!("{} has been removed from your wishlist.", item.name)
            }
            Err(err) => {
                warn!("Wishlist remove failed for {}: {}", item.id, err);
                WISHLIST_REMOVE.message(&err)
            }
        }
    }

    /// Resolve a spoken product name, or the sentence explaining why not.
    async fn resolve(&self, query: &str, failures: &Failures) -> Result<Item, String> {
        match self.catalog.resolve(query).await {
            Ok(Resolution::Found(item)) => Ok(item),
            Ok(Resolution::NotFound) => Err(format!("{} is not available.", query)),
            Ok(Resolution::Empty) => Err(failures.empty.to_string()),
            Err(err) => {
                warn!("Catalog lookup failed for '{}': {}", query, err);
                Err(failures.broken.to_string())
            }
        }
    }

    fn notify(&self, change: StoreChange) {
        if let Some(listener) = &self.store_listener {
            listener.store_changed(change);
        }
    }
}
