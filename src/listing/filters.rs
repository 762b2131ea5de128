//! Filter fields and selections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::LabelTable;

/// Sentinel meaning "no predicate on this field".
pub const ALL: &str = "all";

/// One filterable column with its enumerated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    /// Column name, also the selection key.
    pub name: &'static str,
    /// Control caption, e.g. `City`.
    pub label: &'static str,
    /// Caption for the [`ALL`] option, e.g. `All Cities`.
    pub all_label: &'static str,
    /// Values the field accepts besides [`ALL`].
    pub allowed: &'static [&'static str],
    /// Value used when a selection does not mention the field.
    pub default: &'static str,
    /// Display labels for the allowed values, when they differ from the
    /// stored spelling.
    pub labels: Option<LabelTable>,
}

impl FilterField {
    /// Normalises a requested value for this field.
    ///
    /// A missing request falls back to the field default. A value outside
    /// the allowed set becomes [`ALL`], so it never reaches the store as a
    /// predicate.
    #[must_use]
    pub fn resolve(&self, requested: Option<&str>) -> &'static str {
        let Some(value) = requested else {
            return self.default;
        };
        self.allowed
            .iter()
            .copied()
            .find(|allowed| *allowed == value)
            .unwrap_or(ALL)
    }

    /// Caption for one option of this field.
    #[must_use]
    pub fn option_label<'a>(&self, value: &'a str) -> &'a str {
        if value == ALL {
            return self.all_label;
        }
        self.labels.map_or(value, |labels| labels.label(value))
    }

    /// Every selectable value, [`ALL`] first.
    pub fn options(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(ALL).chain(self.allowed.iter().copied())
    }
}

/// Field name to selected value.
///
/// Used both for raw user requests and for the normalised selection a
/// listing holds; [`ListingConfig::resolve`](super::ListingConfig::resolve)
/// turns the former into the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection(BTreeMap<String, String>);

impl FilterSelection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the selection with `field` set to `value`.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Selected value for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterates `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// Pairs that constrain the query, skipping [`ALL`].
    pub fn predicates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, value)| *value != ALL)
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSelection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}
