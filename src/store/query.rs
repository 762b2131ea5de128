//! Query description sent to a [`RecordStore`](super::RecordStore).

use serde::Serialize;

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Returns the PostgREST spelling of the direction.
    #[must_use]
    pub const fn as_postgrest(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Ordering applied to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    /// Column to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl OrderBy {
    /// Ascending order on `field`.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A single `field = value` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EqualityFilter {
    /// Column name.
    pub field: String,
    /// Value the column must equal.
    pub value: String,
}

/// A read query against one table: an AND of equality predicates plus an
/// optional ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreQuery {
    /// Backing table name.
    pub table: String,
    /// Predicates combined with AND.
    pub filters: Vec<EqualityFilter>,
    /// Ordering, if any.
    pub order: Option<OrderBy>,
}

impl StoreQuery {
    /// Starts an unfiltered, unordered query on `table`.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Adds an equality predicate.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(EqualityFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Renders the query as PostgREST query-string pairs.
    ///
    /// ```
    /// use beam_site::store::{OrderBy, StoreQuery};
    ///
    /// let query = StoreQuery::table("science_hubs")
    ///     .filter("city", "Boston")
    ///     .order_by(OrderBy::ascending("name"));
    ///
    /// assert_eq!(
    ///     query.to_postgrest_params(),
    ///     vec![
    ///         ("select".to_owned(), "*".to_owned()),
    ///         ("city".to_owned(), "eq.Boston".to_owned()),
    ///         ("order".to_owned(), "name.asc".to_owned()),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn to_postgrest_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len().saturating_add(2));
        params.push(("select".to_owned(), "*".to_owned()));
        params.extend(
            self.filters
                .iter()
                .map(|filter| (filter.field.clone(), format!("eq.{}", filter.value))),
        );
        if let Some(order) = &self.order {
            params.push((
                "order".to_owned(),
                format!("{}.{}", order.field, order.direction.as_postgrest()),
            ));
        }
        params
    }
}
