//! Record types as stored in the hosted tables.
//!
//! Status and type columns stay as plain strings so that values the site
//! does not know yet still decode and render.

use serde::{Deserialize, Serialize};

use super::derived::percentage;

/// Row of `research_projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    /// Row identifier.
    pub id: String,
    /// Project title.
    pub title: String,
    /// Free-text summary.
    #[serde(default)]
    pub description: String,
    /// Research field, e.g. `Physics`.
    #[serde(default)]
    pub category: String,
    /// City the project runs in.
    #[serde(default)]
    pub city: String,
    /// Funding target in dollars.
    #[serde(default)]
    pub funding_goal: f64,
    /// Funding raised so far in dollars.
    #[serde(default)]
    pub current_funding: f64,
    /// Lead researcher.
    #[serde(default)]
    pub researcher_name: String,
    /// One of `active`, `completed`, `funded`.
    #[serde(default)]
    pub status: String,
    /// Creation timestamp as stored.
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp, when the row carries one.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ResearchProject {
    /// Share of the funding goal raised, clamped to `[0, 100]`.
    #[must_use]
    pub fn funding_percentage(&self) -> f64 {
        percentage(self.current_funding, self.funding_goal)
    }
}

/// Row of `science_hubs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceHub {
    /// Row identifier.
    pub id: String,
    /// Hub name.
    pub name: String,
    /// City the hub is in.
    #[serde(default)]
    pub city: String,
    /// One of `university`, `lab`, `research_center`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Free-text summary.
    #[serde(default)]
    pub description: String,
    /// Contact address, if published.
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Public web site, if any.
    #[serde(default)]
    pub website: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Row of `class_workshops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassWorkshop {
    /// Row identifier.
    pub id: String,
    /// Class title.
    pub title: String,
    /// Free-text summary.
    #[serde(default)]
    pub description: String,
    /// Instructor name.
    #[serde(default)]
    pub instructor: String,
    /// City the class runs in.
    #[serde(default)]
    pub city: String,
    /// First session date as stored.
    #[serde(default)]
    pub start_date: String,
    /// Last session date as stored.
    #[serde(default)]
    pub end_date: String,
    /// Capacity.
    #[serde(default)]
    pub max_participants: u32,
    /// Enrolled so far.
    #[serde(default)]
    pub current_participants: u32,
    /// Price in dollars.
    #[serde(default)]
    pub price: f64,
    /// Subject area.
    #[serde(default)]
    pub category: String,
    /// One of `upcoming`, `active`, `completed`.
    #[serde(default)]
    pub status: String,
}

impl ClassWorkshop {
    /// Share of places taken, clamped to `[0, 100]`.
    #[must_use]
    pub fn enrollment_percentage(&self) -> f64 {
        percentage(
            f64::from(self.current_participants),
            f64::from(self.max_participants),
        )
    }
}
