//! Tests for listing page rendering.

use rstest::{fixture, rstest};

use super::{bar, render_page, write_page};
use crate::catalog::ClassWorkshop;
use crate::error::SiteError;
use crate::listing::instances::classes;
use crate::listing::{FilterSelection, ListingPage, ListingView};
use crate::store::StoreError;

fn class(id: &str, status: &str) -> ClassWorkshop {
    ClassWorkshop {
        id: id.to_owned(),
        title: format!("Workshop {id}"),
        description: "Hands-on session".to_owned(),
        instructor: "Dr. Chen".to_owned(),
        city: "Chicago".to_owned(),
        start_date: "2025-03-05".to_owned(),
        end_date: "2025-03-07".to_owned(),
        max_participants: 20,
        current_participants: 5,
        price: 0.0,
        category: "Robotics".to_owned(),
        status: status.to_owned(),
    }
}

fn page_for(result: Option<Result<Vec<ClassWorkshop>, StoreError>>) -> ListingPage {
    let config = classes();
    let mut view = ListingView::new(config.clone(), &FilterSelection::new());
    let ticket = view.refresh();
    if let Some(outcome) = result {
        view.complete(ticket.generation, outcome);
    }
    ListingPage::from_snapshot(&config, &view.snapshot())
}

#[fixture]
fn ready_page() -> ListingPage {
    page_for(Some(Ok(vec![class("c-1", "upcoming"), class("c-2", "active")])))
}

#[rstest]
fn ready_page_lists_cards(ready_page: ListingPage) {
    let output = render_page(&ready_page, None).expect("render should succeed");

    assert!(output.starts_with("Classes & Workshops"));
    assert!(output.contains("Status: Upcoming"));
    assert!(output.contains("* Workshop c-1 [Upcoming]"));
    assert!(output.contains("* Workshop c-2 [In Progress]"));
    assert!(output.contains("Dates: Mar 5, 2025 - Mar 7, 2025"));
    assert!(output.contains("Enrollment: [#####---------------] 25%"));
    assert!(output.contains("-> Register"));
    assert!(output.contains("2 results"));
}

#[rstest]
fn empty_page_shows_no_results_affordance() {
    let page = page_for(Some(Ok(Vec::new())));

    let output = render_page(&page, None).expect("render should succeed");

    assert!(output.contains("No classes found"));
    assert!(output.contains("Try adjusting your filters"));
    assert!(!output.contains("results"));
}

#[rstest]
fn loading_and_error_pages_use_their_own_text() {
    let loading = render_page(&page_for(None), None).expect("render should succeed");
    let failed = render_page(
        &page_for(Some(Err(StoreError::Timeout { seconds: 10 }))),
        None,
    )
    .expect("render should succeed");

    assert!(loading.contains("Loading classes and workshops..."));
    assert!(failed.contains("! We couldn't load classes & workshops."));
    assert!(!failed.contains("No classes found"));
}

#[rstest]
fn custom_template_receives_page_context(ready_page: ListingPage) {
    let template = "{% for card in page.cards %}{{ card.id }};{% endfor %}";

    let output = render_page(&ready_page, Some(template)).expect("render should succeed");

    assert_eq!(output, "c-1;c-2;");
}

#[rstest]
fn invalid_template_is_a_render_error(ready_page: ListingPage) {
    let error = render_page(&ready_page, Some("{% for card in %}")).expect_err("syntax error");

    assert!(matches!(error, SiteError::Render { .. }));
}

#[rstest]
fn write_page_writes_rendered_output(ready_page: ListingPage) {
    let mut buffer = Vec::new();

    write_page(&mut buffer, &ready_page, Some("{{ page.listing }}")).expect("write should succeed");

    assert_eq!(String::from_utf8(buffer).expect("utf-8 output"), "classes");
}

#[rstest]
#[case(0.0, "[--------------------]")]
#[case(50.0, "[##########----------]")]
#[case(100.0, "[####################]")]
#[case(250.0, "[####################]")]
fn bar_fills_proportionally(#[case] percent: f64, #[case] expected: &str) {
    assert_eq!(bar(percent), expected);
}
