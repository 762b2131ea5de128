//! Entities shown on the site and the display values derived from them.
//!
//! Records are read-only snapshots of rows in the hosted store. Everything
//! here is pure: percentages, calendar dates, labels, and cards are
//! computed from a record without touching the network.

mod card;
mod derived;
mod labels;
mod models;

pub use card::{Action, Badge, Card, Detail, Progress};
pub use derived::{format_calendar_date, parse_calendar_date, percentage};
pub use labels::{CLASS_STATUS_LABELS, HUB_TYPE_LABELS, LabelTable, PROJECT_STATUS_LABELS, Tone};
pub use models::{ClassWorkshop, ResearchProject, ScienceHub};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// An entity that a listing can fetch and display.
pub trait Record: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Builds the display card, labelling the status with `labels`.
    fn card(&self, labels: LabelTable) -> Card;
}

impl Record for ResearchProject {
    fn card(&self, labels: LabelTable) -> Card {
        card::project_card(self, labels)
    }
}

impl Record for ScienceHub {
    fn card(&self, labels: LabelTable) -> Card {
        card::hub_card(self, labels)
    }
}

impl Record for ClassWorkshop {
    fn card(&self, labels: LabelTable) -> Card {
        card::class_card(self, labels)
    }
}
