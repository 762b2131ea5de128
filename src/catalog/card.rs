//! Uniform display cards.
//!
//! Every entity renders into the same [`Card`] shape so that templates and
//! JSON consumers need only one layout.

use serde::Serialize;

use super::derived::format_calendar_date;
use super::labels::{LabelTable, Tone, class_status_tone, hub_type_tone, project_status_tone};
use super::models::{ClassWorkshop, ResearchProject, ScienceHub};
use crate::money::format_dollars;

/// Display-ready summary of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// Record identifier.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Status or type badge.
    pub badge: Option<Badge>,
    /// Labelled detail lines, in display order.
    pub details: Vec<Detail>,
    /// Progress bar, for records that track one.
    pub progress: Option<Progress>,
    /// Call to action.
    pub action: Option<Action>,
}

/// Coloured status or type marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Stored value.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Colour family.
    pub tone: Tone,
}

/// One `label: value` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    /// Line label.
    pub label: String,
    /// Line value.
    pub value: String,
}

/// Progress bar content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Bar caption.
    pub label: String,
    /// Filled share in `[0, 100]`.
    pub percent: f64,
    /// Text shown beside the bar.
    pub summary: String,
}

/// Button or link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Button text.
    pub label: String,
    /// Link target, when the action navigates.
    pub href: Option<String>,
}

impl Detail {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_owned(),
            value: value.into(),
        }
    }
}

fn badge(value: &str, labels: LabelTable, tone: Tone) -> Badge {
    Badge {
        value: value.to_owned(),
        label: labels.label(value).to_owned(),
        tone,
    }
}

pub(super) fn project_card(project: &ResearchProject, labels: LabelTable) -> Card {
    Card {
        id: project.id.clone(),
        title: project.title.clone(),
        description: project.description.clone(),
        badge: Some(badge(
            &project.status,
            labels,
            project_status_tone(&project.status),
        )),
        details: vec![
            Detail::new("City", project.city.as_str()),
            Detail::new("Researcher", project.researcher_name.as_str()),
            Detail::new("Category", project.category.as_str()),
            Detail::new("Created", format_calendar_date(&project.created_at)),
        ],
        progress: Some(Progress {
            label: "Funding Progress".to_owned(),
            percent: project.funding_percentage(),
            summary: format!(
                "{} / {}",
                format_dollars(project.current_funding),
                format_dollars(project.funding_goal)
            ),
        }),
        action: Some(Action {
            label: "Learn More".to_owned(),
            href: Some(format!("/projects/{}", project.id)),
        }),
    }
}

pub(super) fn hub_card(hub: &ScienceHub, labels: LabelTable) -> Card {
    let mut details = vec![Detail::new("City", hub.city.as_str())];
    if let Some(email) = non_empty(hub.contact_email.as_deref()) {
        details.push(Detail::new("Email", email));
    }
    if let Some(website) = non_empty(hub.website.as_deref()) {
        details.push(Detail::new("Website", website));
    }
    if let (Some(latitude), Some(longitude)) = (hub.latitude, hub.longitude) {
        details.push(Detail::new(
            "Coordinates",
            format!("{latitude:.4}, {longitude:.4}"),
        ));
    }

    Card {
        id: hub.id.clone(),
        title: hub.name.clone(),
        description: hub.description.clone(),
        badge: Some(badge(&hub.kind, labels, hub_type_tone(&hub.kind))),
        details,
        progress: None,
        action: non_empty(hub.website.as_deref()).map(|website| Action {
            label: "Visit Website".to_owned(),
            href: Some(website.to_owned()),
        }),
    }
}

pub(super) fn class_card(class: &ClassWorkshop, labels: LabelTable) -> Card {
    let percent = class.enrollment_percentage();
    Card {
        id: class.id.clone(),
        title: class.title.clone(),
        description: class.description.clone(),
        badge: Some(badge(&class.status, labels, class_status_tone(&class.status))),
        details: vec![
            Detail::new("Instructor", class.instructor.as_str()),
            Detail::new("City", class.city.as_str()),
            Detail::new(
                "Dates",
                format!(
                    "{} - {}",
                    format_calendar_date(&class.start_date),
                    format_calendar_date(&class.end_date)
                ),
            ),
            Detail::new(
                "Participants",
                format!(
                    "{} / {} participants",
                    class.current_participants, class.max_participants
                ),
            ),
            Detail::new("Price", format_dollars(class.price)),
            Detail::new("Category", class.category.as_str()),
        ],
        progress: Some(Progress {
            label: "Enrollment".to_owned(),
            percent,
            summary: format!("{}%", percent.round()),
        }),
        action: Some(Action {
            label: class_action_label(&class.status).to_owned(),
            href: None,
        }),
    }
}

fn class_action_label(status: &str) -> &'static str {
    match status {
        "upcoming" => "Register",
        "active" => "Join",
        _ => "View Details",
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
