//! URL slugs for categories and stores.

/// Build a slug from a display name.
///
/// Lowercases the input and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`. Leading and trailing dashes are dropped.
///
/// ```
/// use storedash_core::slugify;
///
/// assert_eq!(slugify("Home & Kitchen"), "home-kitchen");
/// assert_eq!(slugify("Main Store NY"), "main-store-ny");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Normalize a client-supplied slug: trim and lowercase.
#[must_use]
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("  Sports -- Gear!! "), "sports-gear");
        assert_eq!(slugify("LA Store"), "la-store");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("  Boston-Store "), "boston-store");
    }
}
