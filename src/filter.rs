//! # Search & Facet Filtering
//!
//! The visible rows of a table are the intersection of:
//! - a case-insensitive substring match of the free-text query against the row's
//!   search fields (any field may match), and
//! - an exact match on every active facet filter. A facet whose value is empty or
//!   `"all"` is inactive.
//!
//! Filtering borrows from the store's snapshot and never mutates it.

use std::collections::BTreeSet;
use std::fmt::Debug;

/// A row that the view can search and facet.
pub trait Filterable {
    /// The categorical columns offered as exact-match filters.
    type Facet: Copy + Eq + Debug;

    /// Text fields matched against the free-text query.
    fn search_fields(&self) -> Vec<&str>;

    /// Value of `facet` for this row, if any.
    fn facet(&self, facet: Self::Facet) -> Option<&str>;
}

/// Facet type for tables without categorical filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoFacet {}

/// The current search box and facet dropdown selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<F> {
    pub query: String,
    pub facets: Vec<(F, String)>,
}

impl<F> Default for FilterCriteria<F> {
    fn default() -> Self {
        Self {
            query: String::new(),
            facets: Vec::new(),
        }
    }
}

impl<F: Copy + Eq + Debug> FilterCriteria<F> {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            facets: Vec::new(),
        }
    }

    /// Sets (or replaces) the selected value of `facet`.
    pub fn facet(mut self, facet: F, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.facets.iter_mut().find(|(f, _)| *f == facet) {
            Some(slot) => slot.1 = value,
            None => self.facets.push((facet, value)),
        }
        self
    }

    pub fn matches<T: Filterable<Facet = F>>(&self, item: &T) -> bool {
        let needle = self.query.to_lowercase();
        let text_ok = needle.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        text_ok
            && self
                .facets
                .iter()
                .filter(|(_, value)| is_active(value))
                .all(|(facet, value)| item.facet(*facet) == Some(value.as_str()))
    }

    /// The visible subset of `items`, in their original order.
    pub fn apply<'a, T: Filterable<Facet = F>>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

fn is_active(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.eq_ignore_ascii_case("all")
}

/// Distinct, non-empty values of `facet` across `items`, sorted. Feeds the facet dropdown.
pub fn facet_options<T: Filterable>(items: &[T], facet: T::Facet) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.facet(facet))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Item {
        name: &'static str,
        category: &'static str,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ItemFacet {
        Category,
    }

    impl Filterable for Item {
        type Facet = ItemFacet;

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn facet(&self, _facet: ItemFacet) -> Option<&str> {
            Some(self.category)
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { name: "Widget A", category: "Tools" },
            Item { name: "Gadget B", category: "Electronics" },
        ]
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let items = items();
        let visible = FilterCriteria::<ItemFacet>::search("widget").apply(&items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Widget A");
    }

    #[test]
    fn test_facet_with_empty_query() {
        let items = items();
        let visible = FilterCriteria::default()
            .facet(ItemFacet::Category, "Electronics")
            .apply(&items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Gadget B");
    }

    #[test]
    fn test_empty_and_all_facets_are_ignored() {
        let items = items();
        assert_eq!(
            FilterCriteria::default()
                .facet(ItemFacet::Category, "")
                .apply(&items)
                .len(),
            2
        );
        assert_eq!(
            FilterCriteria::default()
                .facet(ItemFacet::Category, "All")
                .apply(&items)
                .len(),
            2
        );
    }

    #[test]
    fn test_query_and_facet_intersect() {
        let items = items();
        let visible = FilterCriteria::search("gadget")
            .facet(ItemFacet::Category, "Tools")
            .apply(&items);
        assert!(visible.is_empty());
    }

    #[test]
    fn test_facet_options_are_distinct_and_sorted() {
        let mut items = items();
        items.push(Item { name: "Widget C", category: "Tools" });
        items.push(Item { name: "Loose", category: "" });
        assert_eq!(
            facet_options(&items, ItemFacet::Category),
            vec!["Electronics".to_string(), "Tools".to_string()]
        );
    }
}
