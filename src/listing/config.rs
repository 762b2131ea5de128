//! Per-instance listing configuration.

use crate::catalog::LabelTable;
use crate::store::{OrderBy, SortDirection, StoreQuery};

use super::filters::{FilterField, FilterSelection};

/// Everything that distinguishes one listing from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    /// Short name used in routes and on the command line.
    pub name: &'static str,
    /// Page heading.
    pub title: &'static str,
    /// Line under the heading.
    pub subtitle: &'static str,
    /// Backing table.
    pub table: &'static str,
    /// Sort column.
    pub sort_field: &'static str,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Filter controls, in display order.
    pub filter_fields: Vec<FilterField>,
    /// Labels for the status or type badge on each card.
    pub status_labels: LabelTable,
    /// Whether the listing refetches on table change notifications.
    pub live_updates: bool,
    /// Text shown while a fetch is in flight.
    pub loading_message: &'static str,
    /// Heading of the no-results state.
    pub empty_title: &'static str,
    /// Hint under the no-results heading.
    pub empty_hint: &'static str,
}

impl ListingConfig {
    /// Selection holding every field's default.
    #[must_use]
    pub fn default_filters(&self) -> FilterSelection {
        self.resolve(&FilterSelection::new())
    }

    /// Normalises a raw request into a full selection.
    ///
    /// Every configured field is present in the result. Unknown field names
    /// in `requested` are dropped.
    #[must_use]
    pub fn resolve(&self, requested: &FilterSelection) -> FilterSelection {
        self.filter_fields
            .iter()
            .map(|field| (field.name, field.resolve(requested.get(field.name))))
            .collect()
    }

    /// Builds the store query for a selection.
    ///
    /// The selection is resolved first, so callers may pass raw requests.
    #[must_use]
    pub fn query_for(&self, selection: &FilterSelection) -> StoreQuery {
        let resolved = self.resolve(selection);
        let order = OrderBy {
            field: self.sort_field.to_owned(),
            direction: self.sort_direction,
        };
        self.filter_fields
            .iter()
            .filter_map(|field| {
                resolved
                    .predicates()
                    .find(|(name, _)| *name == field.name)
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
            })
            .fold(StoreQuery::table(self.table), |query, (name, value)| {
                query.filter(name, value)
            })
            .order_by(order)
    }
}
