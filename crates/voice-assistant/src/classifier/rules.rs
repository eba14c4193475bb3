//! Ordered rule table for transcript classification

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Destination, Intent};

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Remainder of "show all ..." that asks for every category
const ALL_CATEGORIES: &str = "categories";

/// Transcript test applied to lower-cased text
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Any of the phrases occurs anywhere.
    Contains(&'static [&'static str]),
    StartsWith(&'static str),
    /// Starts with `prefix` and contains any of `phrases`.
    StartsWithAndContains {
        prefix: &'static str,
        phrases: &'static [&'static str],
    },
}

/// What a pattern matched, handed to the rule's intent constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub text: &'a str,
    pub prefix: Option<&'static str>,
    /// First phrase of the rule (in table order) found in the text
    pub phrase: Option<&'static str>,
}

impl Pattern {
    pub fn matches<'a>(&self, text: &'a str) -> Option<RuleMatch<'a>> {
        match *self {
            Pattern::Contains(phrases) => first_contained(text, phrases).map(|phrase| RuleMatch {
                text,
                prefix: None,
                phrase: Some(phrase),
            }),
            Pattern::StartsWith(prefix) => text.starts_with(prefix).then_some(RuleMatch {
                text,
                prefix: Some(prefix),
                phrase: None,
            }),
            Pattern::StartsWithAndContains { prefix, phrases } => {
                if !text.starts_with(prefix) {
                    return None;
                }
                first_contained(text, phrases).map(|phrase| RuleMatch {
                    text,
                    prefix: Some(prefix),
                    phrase: Some(phrase),
                })
            }
        }
    }
}

fn first_contained(text: &str, phrases: &'static [&'static str]) -> Option<&'static str> {
    phrases.iter().copied().find(|phrase| text.contains(phrase))
}

/// One row of the classification table
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: Pattern,
    pub build: fn(&RuleMatch<'_>) -> Intent,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// The storefront command set, evaluated top to bottom.
pub static RULES: &[Rule] = &[
    Rule {
        name: "navigate_home",
        pattern: Pattern::Contains(&["home"]),
        build: navigate_home,
    },
    Rule {
        name: "navigate_cart",
        pattern: Pattern::Contains(&["open cart", "open card"]),
        build: navigate_cart,
    },
    Rule {
        name: "navigate_wishlist",
        pattern: Pattern::Contains(&["open wishlist", "open wish list"]),
        build: navigate_wishlist,
    },
    Rule {
        name: "navigate_profile",
        pattern: Pattern::Contains(&["profile"]),
        build: navigate_profile,
    },
    Rule {
        name: "refresh_page",
        pattern: Pattern::Contains(&["refresh", "reload"]),
        build: refresh_page,
    },
    Rule {
        name: "filter_category",
        pattern: Pattern::StartsWith("show all"),
        build: filter_category,
    },
    Rule {
        name: "cart_add",
        pattern: Pattern::StartsWithAndContains {
            prefix: "add",
            phrases: &["in my cart", "to cart", "in my card", "to card"],
        },
        build: cart_add,
    },
    Rule {
        name: "cart_remove",
        pattern: Pattern::StartsWithAndContains {
            prefix: "remove",
            phrases: &["from my cart", "from my card"],
        },
        build: cart_remove,
    },
    Rule {
        name: "wishlist_add",
        pattern: Pattern::StartsWithAndContains {
            prefix: "add",
            phrases: &["in my wishlist", "in my wish list"],
        },
        build: wishlist_add,
    },
    Rule {
        name: "wishlist_remove",
        pattern: Pattern::StartsWithAndContains {
            prefix: "remove",
            phrases: &["from my wishlist", "from my wish list"],
        },
        build: wishlist_remove,
    },
];

fn navigate_home(_: &RuleMatch<'_>) -> Intent {
    Intent::Navigate {
        destination: Destination::Home,
    }
}

fn navigate_cart(_: &RuleMatch<'_>) -> Intent {
    Intent::Navigate {
        destination: Destination::Cart,
    }
}

fn navigate_wishlist(_: &RuleMatch<'_>) -> Intent {
    Intent::Navigate {
        destination: Destination::Wishlist,
    }
}

fn navigate_profile(_: &RuleMatch<'_>) -> Intent {
    Intent::Navigate {
        destination: Destination::Profile,
    }
}

fn refresh_page(_: &RuleMatch<'_>) -> Intent {
    Intent::RefreshPage
}

fn filter_category(m: &RuleMatch<'_>) -> Intent {
    let prefix = m.prefix.unwrap_or_default();
    let remainder = normalize(m.text.strip_prefix(prefix).unwrap_or(m.text));
    // A bare `show all` leaves an empty remainder and clears the filter,
    // the same as `show all categories`.
    let category = if remainder == ALL_CATEGORIES {
        String::new()
    } else {
        remainder
    };
    Intent::FilterCategory { category }
}

fn cart_add(m: &RuleMatch<'_>) -> Intent {
    Intent::CartAdd {
        product_query: product_query(m),
    }
}

fn cart_remove(m: &RuleMatch<'_>) -> Intent {
    Intent::CartRemove {
        product_query: product_query(m),
    }
}

fn wishlist_add(m: &RuleMatch<'_>) -> Intent {
    Intent::WishlistAdd {
        product_query: product_query(m),
    }
}

fn wishlist_remove(m: &RuleMatch<'_>) -> Intent {
    Intent::WishlistRemove {
        product_query: product_query(m),
    }
}

/// Strip the leading verb and the matched cart/wishlist phrase.
fn product_query(m: &RuleMatch<'_>) -> String {
    let rest = match m.prefix {
        Some(verb) => strip_leading_word(m.text, verb),
        None => m.text,
    };
    match m.phrase {
        Some(phrase) => normalize(&remove_phrase(rest, phrase)),
        None => normalize(rest),
    }
}

fn strip_leading_word<'a>(text: &'a str, word: &str) -> &'a str {
    match text.strip_prefix(word) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => text,
    }
}

/// Drop the phrase from the end of the text, or its first occurrence when
/// something follows it.
fn remove_phrase(text: &str, phrase: &str) -> String {
    let trimmed = text.trim_end();
    if let Some(rest) = trimmed.strip_suffix(phrase) {
        return rest.to_string();
    }
    text.replacen(phrase, " ", 1)
}

fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec![
                "navigate_home",
                "navigate_cart",
                "navigate_wishlist",
                "navigate_profile",
                "refresh_page",
                "filter_category",
                "cart_add",
                "cart_remove",
                "wishlist_add",
                "wishlist_remove",
            ]
        );
    }

    #[test]
    fn test_pattern_reports_first_phrase_in_table_order() {
        let pattern = Pattern::StartsWithAndContains {
            prefix: "add",
            phrases: &["in my cart", "to cart"],
        };
        let matched = pattern.matches("add mug to cart").unwrap();
        assert_eq!(matched.prefix, Some("add"));
        assert_eq!(matched.phrase, Some("to cart"));
        assert!(pattern.matches("mug to cart").is_none());
        assert!(pattern.matches("add mug").is_none());
    }

    #[test]
    fn test_phrase_in_middle_is_removed() {
        let matched = RuleMatch {
            text: "add mouse to cart please",
            prefix: Some("add"),
            phrase: Some("to cart"),
        };
        assert_eq!(product_query(&matched), "mouse please");
    }

    #[test]
    fn test_verb_is_only_stripped_as_a_word() {
        assert_eq!(strip_leading_word("address book", "add"), "address book");
        assert_eq!(strip_leading_word("add book", "add"), " book");
    }

    #[test]
    fn test_show_all_without_category_clears_filter() {
        let matched = Pattern::StartsWith("show all").matches("show all").unwrap();
        assert_eq!(
            filter_category(&matched),
            Intent::FilterCategory {
                category: String::new()
            }
        );
    }

    #[test]
    fn test_show_all_collapses_whitespace() {
        let matched = Pattern::StartsWith("show all")
            .matches("show all   sports  ")
            .unwrap();
        assert_eq!(
            filter_category(&matched),
            Intent::FilterCategory {
                category: "sports".to_string()
            }
        );
    }
}
