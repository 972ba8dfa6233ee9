//! Filter state shared by every list view
//!
//! [`FilterState`] is a plain value. Views never mutate it in place: every
//! change goes through [`FilterState::apply`] (or one of the `with_*`
//! helpers), which returns the next state. Rendering code keeps the latest
//! value and re-runs the list pipeline whenever it changes.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Wire value of the "no status filter" sentinel
pub const STATUS_ALL: &str = "all";

/// Default timestamp field used by the date range filter
pub const DEFAULT_DATE_FIELD: &str = "created_at";

/// Status criterion: either the "all" sentinel or one exact status value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// Parse a select value; empty or `"all"` mean no constraint
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == STATUS_ALL {
            StatusFilter::All
        } else {
            StatusFilter::Only(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => STATUS_ALL,
            StatusFilter::Only(status) => status,
        }
    }

    /// Case-sensitive exact match
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(StatusFilter::parse(&value))
    }
}

/// Inclusive numeric bounds, each side optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// A bound only counts when it is a finite, non-negative number
    fn usable(bound: Option<f64>) -> Option<f64> {
        bound.filter(|b| b.is_finite() && *b >= 0.0)
    }

    /// Whether at least one bound constrains the field
    pub fn is_active(&self) -> bool {
        Self::usable(self.min).is_some() || Self::usable(self.max).is_some()
    }

    pub fn contains(&self, value: f64) -> bool {
        Self::usable(self.min).is_none_or(|min| value >= min)
            && Self::usable(self.max).is_none_or(|max| value <= max)
    }
}

/// Complete filter/search criteria of one list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Free-text query matched case-insensitively against the search fields
    pub name: String,
    pub status: StatusFilter,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Timestamp field the date range applies to
    pub date_field: String,
    /// Multi-select facets: field name -> selected values
    pub facets: IndexMap<String, Vec<String>>,
    /// Numeric range facets: field name -> bounds
    pub ranges: IndexMap<String, NumericRange>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            name: String::new(),
            status: StatusFilter::All,
            start_date: None,
            end_date: None,
            date_field: DEFAULT_DATE_FIELD.to_string(),
            facets: IndexMap::new(),
            ranges: IndexMap::new(),
        }
    }
}

/// A single change requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetName(String),
    SetStatus(StatusFilter),
    SetDateRange {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    /// Replace the whole selection of one facet
    SetFacet { field: String, values: Vec<String> },
    /// Add the value if absent, remove it otherwise
    ToggleFacetValue { field: String, value: String },
    SetRange { field: String, range: NumericRange },
    ClearField(String),
    Reset,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter state for entities whose date range targets another timestamp
    pub fn with_date_field(field: &str) -> Self {
        Self {
            date_field: field.to_string(),
            ..Self::default()
        }
    }

    /// Compute the next state. `self` is left untouched.
    pub fn apply(&self, action: FilterAction) -> Self {
        let mut next = self.clone();
        match action {
            FilterAction::SetName(name) => next.name = name,
            FilterAction::SetStatus(status) => next.status = status,
            FilterAction::SetDateRange { start, end } => {
                next.start_date = start;
                next.end_date = end;
            }
            FilterAction::SetFacet { field, values } => {
                next.facets.insert(field, values);
            }
            FilterAction::ToggleFacetValue { field, value } => {
                let selected = next.facets.entry(field).or_default();
                if let Some(pos) = selected.iter().position(|v| *v == value) {
                    selected.remove(pos);
                } else {
                    selected.push(value);
                }
            }
            FilterAction::SetRange { field, range } => {
                next.ranges.insert(field, range);
            }
            FilterAction::ClearField(field) => {
                next.facets.shift_remove(&field);
                next.ranges.shift_remove(&field);
            }
            FilterAction::Reset => {
                next = Self::with_date_field(&self.date_field);
            }
        }
        next
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        self.apply(FilterAction::SetName(name.into()))
    }

    pub fn with_status(&self, status: &str) -> Self {
        self.apply(FilterAction::SetStatus(StatusFilter::parse(status)))
    }

    pub fn with_date_range(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.apply(FilterAction::SetDateRange { start, end })
    }

    pub fn with_facet<I, S>(&self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(FilterAction::SetFacet {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn with_range(&self, field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.apply(FilterAction::SetRange {
            field: field.to_string(),
            range: NumericRange::new(min, max),
        })
    }

    /// `true` when both dates are set and the start is after the end.
    ///
    /// Views render this as a hint; the pipeline skips the date filter.
    pub fn date_error(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if start > end)
    }

    /// The date range to apply, if it is complete and valid
    pub fn active_date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Facets with a non-empty selection
    pub fn active_facets(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.facets
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (field.as_str(), values.as_slice()))
    }

    /// Ranges with at least one usable bound
    pub fn active_ranges(&self) -> impl Iterator<Item = (&str, &NumericRange)> {
        self.ranges
            .iter()
            .filter(|(_, range)| range.is_active())
            .map(|(field, range)| (field.as_str(), range))
    }

    /// Whether no criterion constrains the list
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.status == StatusFilter::All
            && self.active_date_range().is_none()
            && self.active_facets().next().is_none()
            && self.active_ranges().next().is_none()
    }

    /// Number of active criteria, shown as a badge on the filter button
    pub fn active_count(&self) -> usize {
        usize::from(!self.name.trim().is_empty())
            + usize::from(self.status != StatusFilter::All)
            + usize::from(self.active_date_range().is_some())
            + self.active_facets().count()
            + self.active_ranges().count()
    }
}
