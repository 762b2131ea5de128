//! Display model of a listing page.
//!
//! A [`ListingPage`] is what templates and JSON clients consume: filter
//! controls with their options, the cards, and which of the loading, empty,
//! or error affordances applies.

use serde::Serialize;

use super::config::ListingConfig;
use super::filters::FilterField;
use super::view::{ListingSnapshot, LoadState};
use crate::catalog::{Card, Record};

/// A renderable listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    /// Listing name.
    pub listing: &'static str,
    /// Page heading.
    pub title: &'static str,
    /// Line under the heading.
    pub subtitle: &'static str,
    /// Load state.
    pub state: LoadState,
    /// `true` when a successful fetch matched nothing.
    pub empty: bool,
    /// Loading text, shown while a fetch is in flight.
    pub loading_message: &'static str,
    /// Heading of the no-results state.
    pub empty_title: &'static str,
    /// Hint under the no-results heading.
    pub empty_hint: &'static str,
    /// User-facing failure text, present only in the error state.
    pub error: Option<String>,
    /// Filter controls in display order.
    pub filters: Vec<FilterView>,
    /// Cards to show.
    pub cards: Vec<Card>,
    /// Fetch generation the page reflects.
    pub generation: u64,
}

/// One filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    /// Field name.
    pub name: &'static str,
    /// Control caption.
    pub label: &'static str,
    /// Selected value.
    pub selected: String,
    /// Caption of the selected value.
    pub selected_label: String,
    /// Every option, in display order.
    pub options: Vec<FilterOption>,
}

/// One option of a filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Stored value.
    pub value: &'static str,
    /// Caption.
    pub label: String,
    /// Whether this option is selected.
    pub selected: bool,
}

impl ListingPage {
    /// Builds the page for a snapshot of a listing configured by `config`.
    ///
    /// Store errors are reduced to a generic message; the detail stays in
    /// the logs.
    #[must_use]
    pub fn from_snapshot<R: Record>(config: &ListingConfig, snapshot: &ListingSnapshot<R>) -> Self {
        let filters = config
            .filter_fields
            .iter()
            .map(|field| filter_view(field, snapshot.filters.get(field.name)))
            .collect();
        let cards = snapshot
            .records
            .iter()
            .map(|record| record.card(config.status_labels))
            .collect();
        let error = (snapshot.state == LoadState::Error).then(|| {
            format!(
                "We couldn't load {}. Please try again in a moment.",
                config.title.to_lowercase()
            )
        });

        Self {
            listing: config.name,
            title: config.title,
            subtitle: config.subtitle,
            state: snapshot.state,
            empty: snapshot.is_empty_result(),
            loading_message: config.loading_message,
            empty_title: config.empty_title,
            empty_hint: config.empty_hint,
            error,
            filters,
            cards,
            generation: snapshot.generation,
        }
    }
}

fn filter_view(field: &FilterField, selected: Option<&str>) -> FilterView {
    let current = selected.unwrap_or(field.default);
    FilterView {
        name: field.name,
        label: field.label,
        selected: current.to_owned(),
        selected_label: field.option_label(current).to_owned(),
        options: field
            .options()
            .map(|value| FilterOption {
                value,
                label: field.option_label(value).to_owned(),
                selected: value == current,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ListingPage;
    use crate::catalog::ScienceHub;
    use crate::listing::filters::FilterSelection;
    use crate::listing::instances::{classes, hubs};
    use crate::listing::view::{ListingView, LoadState};
    use crate::store::StoreError;

    fn hub(id: &str, kind: &str) -> ScienceHub {
        ScienceHub {
            id: id.to_owned(),
            name: format!("Hub {id}"),
            city: "Boston".to_owned(),
            kind: kind.to_owned(),
            description: String::new(),
            contact_email: None,
            website: None,
            latitude: None,
            longitude: None,
        }
    }

    #[rstest]
    fn ready_page_carries_cards_and_selected_filters() {
        let config = hubs();
        let mut view =
            ListingView::new(config.clone(), &FilterSelection::new().with("type", "lab"));
        let ticket = view.refresh();
        view.complete(ticket.generation, Ok(vec![hub("h-1", "lab")]));

        let page = ListingPage::from_snapshot(&config, &view.snapshot());

        assert_eq!(page.state, LoadState::Ready);
        assert!(!page.empty);
        assert_eq!(page.cards.len(), 1);
        let type_filter = page
            .filters
            .iter()
            .find(|filter| filter.name == "type")
            .expect("type filter");
        assert_eq!(type_filter.selected_label, "Laboratory");
        assert!(
            type_filter
                .options
                .iter()
                .any(|option| option.value == "lab" && option.selected)
        );
    }

    #[rstest]
    fn error_page_hides_store_detail() {
        let config = classes();
        let mut view: ListingView<crate::catalog::ClassWorkshop> =
            ListingView::new(config.clone(), &FilterSelection::new());
        let ticket = view.refresh();
        view.complete(
            ticket.generation,
            Err(StoreError::Authentication {
                message: "JWT expired for key sb-secret".to_owned(),
            }),
        );

        let page = ListingPage::from_snapshot(&config, &view.snapshot());

        let message = page.error.expect("error state carries a message");
        assert!(!message.contains("JWT"));
        assert!(message.contains("classes & workshops"));
        assert!(page.cards.is_empty());
        assert!(!page.empty);
    }
}
