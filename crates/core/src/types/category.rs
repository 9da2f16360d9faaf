//! Gallery category tabs.

use core::fmt;

/// A category tab on the public gallery page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GalleryCategory {
    /// Every item, regardless of category.
    #[default]
    All,
    Fish,
    Chicken,
    DriedProducts,
}

impl GalleryCategory {
    /// All tabs, in display order.
    pub const TABS: [Self; 4] = [Self::All, Self::Fish, Self::Chicken, Self::DriedProducts];

    /// The tab label, which is also the category value admins enter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Fish => "Fish",
            Self::Chicken => "Chicken",
            Self::DriedProducts => "Dried Products",
        }
    }

    /// Resolve a tab from a query value. Unknown values fall back to `All`.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .and_then(|value| {
                Self::TABS
                    .into_iter()
                    .find(|tab| tab.label().eq_ignore_ascii_case(value))
            })
            .unwrap_or_default()
    }

    /// Whether an item with the given category belongs on this tab.
    ///
    /// Comparison is case-insensitive. Items without a category only show
    /// under `All`.
    #[must_use]
    pub fn matches(self, category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            tab => category.is_some_and(|c| c.trim().eq_ignore_ascii_case(tab.label())),
        }
    }
}

impl fmt::Display for GalleryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        assert_eq!(GalleryCategory::from_query(None), GalleryCategory::All);
        assert_eq!(GalleryCategory::from_query(Some("fish")), GalleryCategory::Fish);
        assert_eq!(
            GalleryCategory::from_query(Some("Dried Products")),
            GalleryCategory::DriedProducts
        );
        assert_eq!(GalleryCategory::from_query(Some("Beef")), GalleryCategory::All);
    }

    #[test]
    fn test_matches_case_insensitively() {
        assert!(GalleryCategory::Chicken.matches(Some("CHICKEN")));
        assert!(GalleryCategory::DriedProducts.matches(Some(" dried products ")));
        assert!(!GalleryCategory::Fish.matches(Some("Chicken")));
        assert!(!GalleryCategory::Fish.matches(None));
        assert!(GalleryCategory::All.matches(None));
    }
}
