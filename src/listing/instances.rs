//! The three listings the site shows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::ListingConfig;
use super::filters::{ALL, FilterField};
use crate::catalog::{CLASS_STATUS_LABELS, HUB_TYPE_LABELS, PROJECT_STATUS_LABELS};
use crate::store::SortDirection;

const PROJECT_CITIES: &[&str] = &[
    "San Francisco",
    "New York",
    "Boston",
    "Austin",
    "Seattle",
    "Los Angeles",
];

const NETWORK_CITIES: &[&str] = &[
    "San Francisco",
    "New York",
    "Boston",
    "Austin",
    "Seattle",
    "Los Angeles",
    "Chicago",
    "Denver",
];

const PROJECT_CATEGORIES: &[&str] = &[
    "Biology",
    "Chemistry",
    "Physics",
    "Computer Science",
    "Engineering",
    "Environmental Science",
];

const CLASS_CATEGORIES: &[&str] = &[
    "Biology",
    "Chemistry",
    "Physics",
    "Computer Science",
    "Engineering",
    "Environmental Science",
    "Data Science",
    "Robotics",
];

const HUB_TYPES: &[&str] = &["university", "lab", "research_center"];

const CLASS_STATUSES: &[&str] = &["upcoming", "active", "completed"];

const fn city_field(cities: &'static [&'static str]) -> FilterField {
    FilterField {
        name: "city",
        label: "City",
        all_label: "All Cities",
        allowed: cities,
        default: ALL,
        labels: None,
    }
}

const fn category_field(categories: &'static [&'static str]) -> FilterField {
    FilterField {
        name: "category",
        label: "Category",
        all_label: "All Categories",
        allowed: categories,
        default: ALL,
        labels: None,
    }
}

/// Research projects, newest first, refreshed live.
#[must_use]
pub fn projects() -> ListingConfig {
    ListingConfig {
        name: "projects",
        title: "Research Projects",
        subtitle: "Discover and support cutting-edge scientific research",
        table: "research_projects",
        sort_field: "created_at",
        sort_direction: SortDirection::Descending,
        filter_fields: vec![
            city_field(PROJECT_CITIES),
            category_field(PROJECT_CATEGORIES),
        ],
        status_labels: PROJECT_STATUS_LABELS,
        live_updates: true,
        loading_message: "Loading research projects...",
        empty_title: "No projects found",
        empty_hint: "Try adjusting your filters or check back later for new projects.",
    }
}

/// Science hubs, alphabetical.
#[must_use]
pub fn hubs() -> ListingConfig {
    ListingConfig {
        name: "hubs",
        title: "Science Hubs",
        subtitle: "Find universities, labs and research centers near you",
        table: "science_hubs",
        sort_field: "name",
        sort_direction: SortDirection::Ascending,
        filter_fields: vec![
            city_field(NETWORK_CITIES),
            FilterField {
                name: "type",
                label: "Type",
                all_label: "All Types",
                allowed: HUB_TYPES,
                default: ALL,
                labels: Some(HUB_TYPE_LABELS),
            },
        ],
        status_labels: HUB_TYPE_LABELS,
        live_updates: false,
        loading_message: "Loading science hubs...",
        empty_title: "No hubs found",
        empty_hint: "Try adjusting your filters or check back later for new hubs.",
    }
}

/// Classes and workshops, soonest first, upcoming by default.
#[must_use]
pub fn classes() -> ListingConfig {
    ListingConfig {
        name: "classes",
        title: "Classes & Workshops",
        subtitle: "Learn from experts and connect with the scientific community",
        table: "class_workshops",
        sort_field: "start_date",
        sort_direction: SortDirection::Ascending,
        filter_fields: vec![
            city_field(NETWORK_CITIES),
            category_field(CLASS_CATEGORIES),
            FilterField {
                name: "status",
                label: "Status",
                all_label: "All Statuses",
                allowed: CLASS_STATUSES,
                default: "upcoming",
                labels: Some(CLASS_STATUS_LABELS),
            },
        ],
        status_labels: CLASS_STATUS_LABELS,
        live_updates: false,
        loading_message: "Loading classes and workshops...",
        empty_title: "No classes found",
        empty_hint: "Try adjusting your filters or check back later for new offerings.",
    }
}

/// Which listing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Research projects.
    Projects,
    /// Science hubs.
    Hubs,
    /// Classes and workshops.
    Classes,
}

impl ListingKind {
    /// Every listing, in navigation order.
    pub const ALL: [Self; 3] = [Self::Projects, Self::Hubs, Self::Classes];

    /// Configuration for this listing.
    #[must_use]
    pub fn config(self) -> ListingConfig {
        match self {
            Self::Projects => projects(),
            Self::Hubs => hubs(),
            Self::Classes => classes(),
        }
    }

    /// Short name used in routes and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Hubs => "hubs",
            Self::Classes => "classes",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a listing name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing '{name}' (expected projects, hubs, or classes)")]
pub struct UnknownListing {
    /// Name that failed to parse.
    pub name: String,
}

impl FromStr for ListingKind {
    type Err = UnknownListing;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownListing {
                name: value.to_owned(),
            })
    }
}
