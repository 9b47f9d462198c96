//! Human-readable product keys.
//!
//! A slug is derived from a product title (or supplied explicitly) and always
//! normalized the same way: lowercased, spaces replaced by underscores and
//! apostrophes dropped. The same normalization is applied to free-text lookup
//! terms so that a title typed by a user finds the product by its slug.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A normalized product slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Normalize arbitrary text into a slug.
    ///
    /// ```
    /// use catalog_core::Slug;
    ///
    /// assert_eq!(Slug::normalize("Men's Chill Crew Neck").as_str(), "mens_chill_crew_neck");
    /// ```
    #[must_use]
    pub fn normalize(text: &str) -> Self {
        Self(
            text.to_lowercase()
                .replace(' ', "_")
                .replace('\'', ""),
        )
    }

    /// Slug for a new product: the explicit slug when present, else the title.
    #[must_use]
    pub fn derive(title: &str, explicit: Option<&str>) -> Self {
        match explicit {
            Some(slug) if !slug.is_empty() => Self::normalize(slug),
            _ => Self::normalize(title),
        }
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the slug and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A classified product lookup term.
///
/// Terms that parse as a UUID are primary-key lookups; anything else is
/// matched against the title (case-insensitively) and the slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTerm {
    /// Lookup by primary key.
    Id(ProductId),
    /// Lookup by title or slug.
    Text {
        /// The term as supplied, trimmed.
        raw: String,
        /// The term normalized like a slug.
        slug: Slug,
    },
}

impl LookupTerm {
    /// Classify a raw path term.
    #[must_use]
    pub fn parse(term: &str) -> Self {
        let term = term.trim();
        term.parse::<ProductId>().map_or_else(
            |_| Self::Text {
                raw: term.to_owned(),
                slug: Slug::normalize(term),
            },
            Self::Id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(Slug::normalize("Kids Cybertruck Tee").as_str(), "kids_cybertruck_tee");
        assert_eq!(Slug::normalize("Women's Hoodie").as_str(), "womens_hoodie");
        assert_eq!(Slug::normalize("already_a_slug").as_str(), "already_a_slug");
    }

    #[test]
    fn test_derive_prefers_explicit_slug() {
        assert_eq!(Slug::derive("Some Title", Some("My Slug")).as_str(), "my_slug");
        assert_eq!(Slug::derive("Some Title", None).as_str(), "some_title");
        assert_eq!(Slug::derive("Some Title", Some("")).as_str(), "some_title");
    }

    #[test]
    fn test_lookup_term_uuid() {
        let id = ProductId::generate();
        assert_eq!(LookupTerm::parse(&id.to_string()), LookupTerm::Id(id));
    }

    #[test]
    fn test_lookup_term_text() {
        let term = LookupTerm::parse("Men's Raven Lightweight Hoodie");
        assert_eq!(
            term,
            LookupTerm::Text {
                raw: "Men's Raven Lightweight Hoodie".to_owned(),
                slug: Slug::normalize("mens_raven_lightweight_hoodie"),
            }
        );
    }

    #[test]
    fn test_lookup_term_near_uuid_is_text() {
        assert!(matches!(
            LookupTerm::parse("1234-not-a-uuid"),
            LookupTerm::Text { .. }
        ));
    }
}
