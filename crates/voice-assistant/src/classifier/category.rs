//! Fixed storefront category registry

/// Result of resolving a spoken category name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Clear the filter and show every category.
    All,
    /// Canonical display name of the matched category
    Canonical(&'static str),
    Unavailable,
}

/// Normalized keyword → display name, in lookup order
#[derive(Debug, Clone, Copy)]
pub struct CategoryRegistry {
    entries: &'static [(&'static str, &'static str)],
}

const STOREFRONT_CATEGORIES: &[(&str, &str)] = &[
    ("electronics", "Electronics"),
    ("fashion", "Fashion"),
    ("home", "Home"),
    ("sports", "Sports"),
    ("books", "Books"),
    ("beauty", "Beauty"),
    ("toys", "Toys"),
    ("health", "Health"),
];

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::storefront()
    }
}

impl CategoryRegistry {
    pub const fn storefront() -> Self {
        Self {
            entries: STOREFRONT_CATEGORIES,
        }
    }

    pub const fn with_entries(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(keyword, _)| *keyword)
    }

    /// Exact keyword match first, then substring in either direction.
    /// An empty query means "all categories".
    pub fn resolve(&self, query: &str) -> CategoryMatch {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return CategoryMatch::All;
        }

        let exact = self.entries.iter().find(|(keyword, _)| *keyword == query);
        let found = exact.or_else(|| {
            self.entries
                .iter()
                .find(|(keyword, _)| keyword.contains(query.as_str()) || query.contains(keyword))
        });

        match found {
            Some((_, canonical)) => CategoryMatch::Canonical(*canonical),
            None => CategoryMatch::Unavailable,
        }
    }

    /// Comma-separated keyword list for spoken feedback
    pub fn spoken_list(&self) -> String {
        self.keywords().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let registry = CategoryRegistry::storefront();
        assert_eq!(
            registry.resolve("electronics"),
            CategoryMatch::Canonical("Electronics")
        );
        assert_eq!(registry.resolve("  Books "), CategoryMatch::Canonical("Books"));
    }

    #[test]
    fn test_substring_match_both_directions() {
        let registry = CategoryRegistry::storefront();
        assert_eq!(registry.resolve("sport"), CategoryMatch::Canonical("Sports"));
        assert_eq!(
            registry.resolve("beauty products"),
            CategoryMatch::Canonical("Beauty")
        );
    }

    #[test]
    fn test_empty_means_all() {
        assert_eq!(CategoryRegistry::storefront().resolve(""), CategoryMatch::All);
    }

    #[test]
    fn test_unavailable() {
        assert_eq!(
            CategoryRegistry::storefront().resolve("garden"),
            CategoryMatch::Unavailable
        );
    }

    #[test]
    fn test_spoken_list() {
        assert_eq!(
            CategoryRegistry::storefront().spoken_list(),
            "electronics, fashion, home, sports, books, beauty, toys, health"
        );
    }

    #[test]
    fn test_custom_registry() {
        const ENTRIES: &[(&str, &str)] = &[("garden", "Garden & Outdoor")];
        let registry = CategoryRegistry::with_entries(ENTRIES);
        assert_eq!(
            registry.resolve("garden"),
            CategoryMatch::Canonical("Garden & Outdoor")
        );
        assert_eq!(registry.resolve("books"), CategoryMatch::Unavailable);
    }
}
