//! Sellable sizes of a menu item and the keys of an item's price mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed, ordered sizes an item can be sold in.
///
/// The declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Standard,
    Small,
    Medium,
    Large,
    Xl,
}

impl Variant {
    /// All variants in display order.
    pub const ORDERED: [Self; 5] = [
        Self::Standard,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Xl,
    ];

    /// Storage key used in the price mapping (`"medium"`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xl => "xl",
        }
    }

    /// Human-readable label (`"Medium"`, `"XL"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Xl => "XL",
        }
    }

    /// Parses a storage key or label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ORDERED
            .into_iter()
            .find(|variant| variant.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A key of an item's price mapping.
///
/// Keys outside the fixed [`Variant`] set are kept verbatim so they can still be
/// displayed. The derived ordering places every known variant (in display order)
/// before any unrecognized key, so a `BTreeMap<PriceKey, _>` iterates in render order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceKey {
    Known(Variant),
    Other(String),
}

impl PriceKey {
    /// Maps a raw mapping key to a known variant when possible.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Variant::from_key(raw).map_or_else(|| Self::Other(raw.trim().to_string()), Self::Known)
    }

    /// Storage key as it appears in the price mapping.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Known(variant) => variant.key(),
            Self::Other(raw) => raw,
        }
    }

    /// Display label: the variant label, or the raw key for unrecognized variants.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Known(variant) => variant.label(),
            Self::Other(raw) => raw,
        }
    }
}

impl From<Variant> for PriceKey {
    fn from(variant: Variant) -> Self {
        Self::Known(variant)
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_variant_parsing_ignores_case() {
        assert_eq!(Variant::from_key("MEDIUM"), Some(Variant::Medium));
        assert_eq!(Variant::from_key(" xl "), Some(Variant::Xl));
        assert_eq!(Variant::from_key("XL"), Some(Variant::Xl));
        assert_eq!(Variant::from_key("jumbo"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Variant::Xl.label(), "XL");
        assert_eq!(Variant::Standard.to_string(), "Standard");
        assert_eq!(PriceKey::parse("half").label(), "half");
    }

    #[test]
    fn test_known_variants_sort_before_unrecognized_keys() {
        let mut prices = BTreeMap::new();
        prices.insert(PriceKey::parse("aaa"), 1.0);
        prices.insert(PriceKey::parse("xl"), 2.0);
        prices.insert(PriceKey::parse("standard"), 3.0);
        prices.insert(PriceKey::parse("family"), 4.0);
        prices.insert(PriceKey::parse("small"), 5.0);

        let labels: Vec<&str> = prices.keys().map(PriceKey::label).collect();
        assert_eq!(labels, vec!["Standard", "Small", "XL", "aaa", "family"]);
    }
}
