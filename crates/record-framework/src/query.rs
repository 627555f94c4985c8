//! # List Queries & Pagination
//!
//! A list request carries at most one active [`ListFilter`] plus a [`PageRequest`]
//! (`page`, `size`, `sort`). Callers that receive several filter parameters at once build a
//! [`ListQuery`] and let [`ListQuery::resolve`] pick the single filter that is honored.

use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// The single predicate applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    /// Case-insensitive substring match on the record name.
    NameContains(String),
    /// Case-insensitive equality on the record category.
    Category(String),
}

impl ListFilter {
    pub fn matches<T: RecordEntity>(&self, record: &T) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::NameContains(needle) => record
                .name()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            ListFilter::Category(wanted) => record
                .category()
                .is_some_and(|value| value.to_lowercase() == wanted.to_lowercase()),
        }
    }
}

/// Raw filter parameters as a caller supplies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category: None,
        }
    }

    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            name: None,
            category: Some(category.into()),
        }
    }

    /// Pick the one filter to honor: name first, then category, else everything.
    ///
    /// Blank values count as absent. When both are present the category is ignored.
    pub fn resolve(&self) -> ListFilter {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        if let Some(name) = present(&self.name) {
            return ListFilter::NameContains(name.to_owned());
        }
        if let Some(category) = present(&self.category) {
            return ListFilter::Category(category.to_owned());
        }
        ListFilter::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse `field` or `field,asc|desc`.
    pub fn parse(raw: &str) -> Result<Self, FrameworkError> {
        let mut parts = raw.split(',').map(str::trim);
        let field = parts
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| FrameworkError::InvalidQuery(format!("empty sort field in '{raw}'")))?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => {
                return Err(FrameworkError::InvalidQuery(format!(
                    "unknown sort direction '{other}'"
                )))
            }
        };
        if parts.next().is_some() {
            return Err(FrameworkError::InvalidQuery(format!(
                "malformed sort '{raw}'"
            )));
        }
        Ok(Self {
            field: field.to_owned(),
            direction,
        })
    }
}

/// Zero-based page selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Size actually used: zero falls back to the default, large values are clamped.
    pub fn effective_size(&self) -> u32 {
        match self.size {
            0 => DEFAULT_PAGE_SIZE,
            size => size.min(MAX_PAGE_SIZE),
        }
    }
}

/// One page of results plus totals for the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice `items` (already filtered and ordered) according to `request`.
    pub fn from_ordered(items: Vec<T>, request: &PageRequest) -> Self {
        let size = request.effective_size();
        let total_elements = items.len() as u64;
        let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
        let start = (request.page as usize).saturating_mul(size as usize);
        let items = items
            .into_iter()
            .skip(start)
            .take(size as usize)
            .collect();
        Self {
            items,
            page: request.page,
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
