//! Per-entity display label tables.
//!
//! Each entity kind owns its own table. Values missing from a table pass
//! through verbatim so that a new backend status never breaks rendering.

use serde::Serialize;

/// Fixed mapping from stored values to display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTable {
    entries: &'static [(&'static str, &'static str)],
}

impl LabelTable {
    /// Wraps a static list of `(value, label)` pairs.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Returns the label for `value`, or `value` itself when unmapped.
    ///
    /// ```
    /// use beam_site::catalog::CLASS_STATUS_LABELS;
    ///
    /// assert_eq!(CLASS_STATUS_LABELS.label("active"), "In Progress");
    /// assert_eq!(CLASS_STATUS_LABELS.label("postponed"), "postponed");
    /// ```
    #[must_use]
    pub fn label<'a>(&self, value: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(key, _)| *key == value)
            .map_or(value, |(_, label)| label)
    }
}

/// Research project statuses.
pub const PROJECT_STATUS_LABELS: LabelTable = LabelTable::new(&[
    ("active", "Active"),
    ("completed", "Completed"),
    ("funded", "Funded"),
]);

/// Science hub types.
pub const HUB_TYPE_LABELS: LabelTable = LabelTable::new(&[
    ("university", "University"),
    ("lab", "Laboratory"),
    ("research_center", "Research Center"),
]);

/// Class and workshop statuses.
pub const CLASS_STATUS_LABELS: LabelTable = LabelTable::new(&[
    ("upcoming", "Upcoming"),
    ("active", "In Progress"),
    ("completed", "Completed"),
]);

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Grey.
    Neutral,
    /// Green.
    Positive,
    /// Blue.
    Informative,
    /// Purple.
    Highlight,
}

/// Badge tone for a research project status.
#[must_use]
pub fn project_status_tone(status: &str) -> Tone {
    match status {
        "active" => Tone::Positive,
        "funded" => Tone::Informative,
        _ => Tone::Neutral,
    }
}

/// Badge tone for a class status.
#[must_use]
pub fn class_status_tone(status: &str) -> Tone {
    match status {
        "upcoming" => Tone::Informative,
        "active" => Tone::Positive,
        _ => Tone::Neutral,
    }
}

/// Badge tone for a hub type.
#[must_use]
pub fn hub_type_tone(kind: &str) -> Tone {
    match kind {
        "university" => Tone::Informative,
        "lab" => Tone::Positive,
        "research_center" => Tone::Highlight,
        _ => Tone::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{CLASS_STATUS_LABELS, HUB_TYPE_LABELS, LabelTable, PROJECT_STATUS_LABELS};

    #[rstest]
    #[case(CLASS_STATUS_LABELS, "upcoming", "Upcoming")]
    #[case(CLASS_STATUS_LABELS, "active", "In Progress")]
    #[case(CLASS_STATUS_LABELS, "completed", "Completed")]
    #[case(PROJECT_STATUS_LABELS, "active", "Active")]
    #[case(PROJECT_STATUS_LABELS, "funded", "Funded")]
    #[case(HUB_TYPE_LABELS, "lab", "Laboratory")]
    #[case(HUB_TYPE_LABELS, "research_center", "Research Center")]
    fn known_values_map_to_labels(
        #[case] table: LabelTable,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(table.label(value), expected);
    }

    #[rstest]
    #[case(CLASS_STATUS_LABELS, "waitlisted")]
    #[case(PROJECT_STATUS_LABELS, "paused")]
    #[case(HUB_TYPE_LABELS, "makerspace")]
    #[case(CLASS_STATUS_LABELS, "")]
    fn unknown_values_pass_through(#[case] table: LabelTable, #[case] value: &str) {
        assert_eq!(table.label(value), value);
    }

    #[rstest]
    fn tables_are_independent() {
        assert_ne!(
            CLASS_STATUS_LABELS.label("active"),
            PROJECT_STATUS_LABELS.label("active")
        );
        assert_eq!(CLASS_STATUS_LABELS.label("funded"), "funded");
    }
}
