//! Command classification
//!
//! Maps a transcript to exactly one [`Intent`]. Matching is case-insensitive
//! and driven by the ordered rule table in [`rules`]: the first satisfied
//! rule wins and anything left over is [`Intent::Unrecognized`].
//!
//! Navigation keywords are tested before product commands, so a transcript
//! containing "home" always navigates home, even when "home" is part of a
//! product or category name ("show all home", "add home speaker to cart").

mod category;
mod rules;

pub use category::{CategoryMatch, CategoryRegistry};
pub use rules::{Pattern, Rule, RuleMatch, RULES};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pages reachable by voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Destination {
    Home,
    Cart,
    Wishlist,
    Profile,
}

impl Destination {
    pub fn route(&self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::Cart => "/cart",
            Destination::Wishlist => "/wishlist",
            Destination::Profile => "/profile",
        }
    }

    /// Spoken page name, as in "Opening home page"
    pub fn label(&self) -> &'static str {
        match self {
            Destination::Home => "home page",
            Destination::Cart => "cart",
            Destination::Wishlist => "wishlist",
            Destination::Profile => "profile",
        }
    }
}

/// The storefront action a transcript expresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    Navigate { destination: Destination },
    RefreshPage,
    /// An empty category clears the filter.
    FilterCategory { category: String },
    #[serde(rename_all = "camelCase")]
    CartAdd { product_query: String },
    #[serde(rename_all = "camelCase")]
    CartRemove { product_query: String },
    #[serde(rename_all = "camelCase")]
    WishlistAdd { product_query: String },
    #[serde(rename_all = "camelCase")]
    WishlistRemove { product_query: String },
    Unrecognized,
}

impl Intent {
    /// Short tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Navigate { .. } => "navigate",
            Intent::RefreshPage => "refresh_page",
            Intent::FilterCategory { .. } => "filter_category",
            Intent::CartAdd { .. } => "cart_add",
            Intent::CartRemove { .. } => "cart_remove",
            Intent::WishlistAdd { .. } => "wishlist_add",
            Intent::WishlistRemove { .. } => "wishlist_remove",
            Intent::Unrecognized => "unrecognized",
        }
    }

    pub fn product_query(&self) -> Option<&str> {
        match self {
            Intent::CartAdd { product_query }
            | Intent::CartRemove { product_query }
            | Intent::WishlistAdd { product_query }
            | Intent::WishlistRemove { product_query } => Some(product_query),
            _ => None,
        }
    }
}

/// Classify a transcript against the default rule table.
pub fn classify(transcript: &str) -> Intent {
    classify_with(RULES, transcript)
}

/// Evaluate `rules` top to bottom and build the intent of the first match.
pub fn classify_with(rules: &[Rule], transcript: &str) -> Intent {
    let text = transcript.trim().to_lowercase();

    for rule in rules {
        if let Some(matched) = rule.pattern.matches(&text) {
            let intent = (rule.build)(&matched);
            debug!("Transcript '{}' matched rule '{}'", text, rule.name);
            return intent;
        }
    }

    debug!("Transcript '{}' matched no rule", text);
    Intent::Unrecognized
}
