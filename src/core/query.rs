//! List query pipeline: sort, filter, re-sort
//!
//! Every list view (properties, terrenos, empreendimentos, corretores,
//! cobranças, comissões) runs its in-memory collection through the same
//! sequence before rendering:
//!
//! 1. stable sort with the column comparator (ties keep input order)
//! 2. free-text search
//! 3. status
//! 4. multi-select facets
//! 5. numeric ranges
//! 6. date range, only when valid
//! 7. optional "sort by" selector
//!
//! All functions here are total and never touch the input slice.
//!
//! # Example
//! ```rust,ignore
//! let filters = FilterState::new().with_status("available");
//! let query = ListQuery::new(SortSpec::desc("price")).with_filters(filters);
//! let visible: Vec<Property> = query.run(&properties);
//! ```

use crate::core::entity::Data;
use crate::core::field::FieldValue;
use crate::core::filter::FilterState;
use crate::core::pagination::{Page, paginate_owned};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Flip direction, used when the active column header is clicked again
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// `(order, order_by)` pair driving the column comparator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub order: SortOrder,
    pub order_by: String,
}

impl SortSpec {
    pub fn asc(field: &str) -> Self {
        Self {
            order: SortOrder::Asc,
            order_by: field.to_string(),
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            order: SortOrder::Desc,
            order_by: field.to_string(),
        }
    }

    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(expr: &str) -> Option<Self> {
        let (field, order) = match expr.split_once(':') {
            Some((field, "desc")) => (field, SortOrder::Desc),
            Some((field, "asc")) => (field, SortOrder::Asc),
            Some(_) => return None,
            None => (expr, SortOrder::Asc),
        };
        let field = field.trim();
        (!field.is_empty()).then(|| Self {
            order,
            order_by: field.to_string(),
        })
    }

    /// Next spec after clicking the header of `field`.
    ///
    /// Clicking the active column flips the direction, any other column
    /// starts ascending.
    pub fn toggle(&self, field: &str) -> Self {
        if self.order_by == field {
            Self {
                order: self.order.toggled(),
                order_by: field.to_string(),
            }
        } else {
            Self::asc(field)
        }
    }

    /// Compare two entities on the configured field
    pub fn compare<T: Data>(&self, a: &T, b: &T) -> Ordering {
        let left = a.field_value(&self.order_by).unwrap_or(FieldValue::Null);
        let right = b.field_value(&self.order_by).unwrap_or(FieldValue::Null);
        let ordering = left.compare(&right);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Comparator closure for [`run`]
    pub fn comparator<T: Data>(&self) -> impl Fn(&T, &T) -> Ordering + '_ {
        move |a, b| self.compare(a, b)
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::desc("created_at")
    }
}

/// Options of the separate "sort by" selector shown on card views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Latest,
    Oldest,
    Name,
    PriceAsc,
    PriceDesc,
}

impl SortBy {
    fn key(self) -> (&'static str, SortOrder) {
        match self {
            SortBy::Latest => ("created_at", SortOrder::Desc),
            SortBy::Oldest => ("created_at", SortOrder::Asc),
            SortBy::Name => ("name", SortOrder::Asc),
            SortBy::PriceAsc => ("price", SortOrder::Asc),
            SortBy::PriceDesc => ("price", SortOrder::Desc),
        }
    }

    /// Re-sort an already filtered list. No extra tiebreak is applied.
    pub fn apply<T: Data>(self, items: &mut [T]) {
        let (field, order) = self.key();
        let spec = SortSpec {
            order,
            order_by: field.to_string(),
        };
        items.sort_by(|a, b| spec.compare(a, b));
    }
}

/// Stable sort regardless of the comparator's own tie handling.
///
/// Each item is paired with its input index and ties are broken on the
/// index, so equal items keep their original relative order.
pub fn stable_sort<T, F>(items: &[T], comparator: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut indexed: Vec<(usize, &T)> = items.iter().enumerate().collect();
    indexed.sort_unstable_by(|(ia, a), (ib, b)| comparator(a, b).then_with(|| ia.cmp(ib)));
    indexed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// The text query actually applied.
///
/// An explicit search box value wins over the `name` filter; the two are
/// never applied together.
fn effective_query<'a>(filters: &'a FilterState, search_query: Option<&'a str>) -> Option<String> {
    search_query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .or_else(|| Some(filters.name.trim()).filter(|q| !q.is_empty()))
        .map(str::to_lowercase)
}

fn matches_search<T: Data>(item: &T, needle: &str) -> bool {
    T::search_fields().iter().any(|field| {
        item.field_value(field)
            .is_some_and(|value| value.contains_text(needle))
    })
}

fn matches_facet<T: Data>(item: &T, field: &str, selection: &[String]) -> bool {
    item.field_value(field)
        .is_some_and(|value| value.intersects(selection))
}

fn matches_date<T: Data>(item: &T, field: &str, start: &chrono::DateTime<chrono::Utc>, end: &chrono::DateTime<chrono::Utc>) -> bool {
    item.field_value(field)
        .and_then(|value| value.as_datetime())
        .is_some_and(|at| at >= *start && at <= *end)
}

/// Filter steps 2 to 6 on an already sorted list
pub fn apply_filters<T: Data>(items: Vec<T>, filters: &FilterState, search_query: Option<&str>) -> Vec<T> {
    let mut result = items;

    if let Some(needle) = effective_query(filters, search_query) {
        result.retain(|item| matches_search(item, &needle));
    }

    result.retain(|item| filters.status.matches(item.status()));

    for (field, selection) in filters.active_facets() {
        result.retain(|item| matches_facet(item, field, selection));
    }

    for (field, range) in filters.active_ranges() {
        result.retain(|item| {
            item.field_value(field)
                .and_then(|value| value.as_f64())
                .is_some_and(|value| range.contains(value))
        });
    }

    if let Some((start, end)) = filters.active_date_range() {
        let field = filters.date_field.as_str();
        result.retain(|item| matches_date(item, field, &start, &end));
    }

    result
}

/// Run steps 1 to 6: stable sort, then every active filter.
pub fn run<T, F>(items: &[T], filters: &FilterState, comparator: F, search_query: Option<&str>) -> Vec<T>
where
    T: Data,
    F: Fn(&T, &T) -> Ordering,
{
    let sorted = stable_sort(items, comparator);
    let result = apply_filters(sorted, filters, search_query);
    tracing::debug!(
        entity_type = T::resource_name(),
        input = items.len(),
        output = result.len(),
        "list pipeline applied"
    );
    result
}

/// Full query state of one list view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub sort: SortSpec,
    pub filters: FilterState,
    /// Search box content, empty when the view has no search box
    pub search: String,
    pub sort_by: Option<SortBy>,
}

impl ListQuery {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Produce the filtered, ordered list to display
    pub fn run<T: Data>(&self, items: &[T]) -> Vec<T> {
        let search = Some(self.search.as_str());
        let mut result = run(items, &self.filters, self.sort.comparator(), search);
        if let Some(sort_by) = self.sort_by {
            sort_by.apply(&mut result);
        }
        result
    }

    /// Run the pipeline and slice one page of the result
    pub fn page<T: Data>(&self, items: &[T], page: usize, rows_per_page: usize) -> Page<T> {
        paginate_owned(self.run(items), page, rows_per_page)
    }
}
