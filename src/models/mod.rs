use serde::{Deserialize, Serialize};
use std::fmt;

// Which kind of entity a ranking aggregates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingDimension {
    County,
    PollingStation,
}

impl fmt::Display for GroupingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingDimension::County => f.write_str("county"),
            GroupingDimension::PollingStation => f.write_str("polling_station"),
        }
    }
}

// What is being counted per entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Observers,
    Incidents,
}

/// Optional form code restricting which incident reports are counted.
///
/// An absent or empty code means "all forms", so `FormFilter::new(Some(""))`
/// and `FormFilter::all()` compare equal and share cache entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormFilter(Option<String>);

impl FormFilter {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn new(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(code) if !code.is_empty() => Self(Some(code.to_string())),
            _ => Self(None),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_all(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for FormFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(code) => write!(f, "form {}", code),
            None => f.write_str("all forms"),
        }
    }
}

// A rankable county or polling station
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// One entity with its aggregated count, as produced by a count source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRecord {
    pub entity: Entity,
    pub count: u64,
}

impl CountRecord {
    pub fn new(entity: Entity, count: u64) -> Self {
        Self { entity, count }
    }
}

/// A validated-or-not page window. Fields stay signed so that negative
/// values coming from a caller reach the ranker and are rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub entity_id: String,
    pub entity_name: String,
    pub count: u64,
    pub rank: usize,
}

// One page of a ranking plus everything needed to render pagination controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPage {
    pub items: Vec<RankedEntry>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl RankedPage {
    // Page 1 of an empty ranking is in range
    pub fn is_past_end(&self) -> bool {
        self.current_page > self.total_pages.max(1)
    }
}
