//! Bounded page projection over filtered records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{Result, ZonescopeError};
use crate::models::{Feature, PropertyValue};

/// A validated page request (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Page 0 is treated as page 1; a zero page size is rejected
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ZonescopeError::ConfigInvalid {
                key: "page_size".to_string(),
                reason: "page size must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            page: page.max(1),
            page_size,
        })
    }

    pub fn first(page_size: usize) -> Result<Self> {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Clamp the page number into `1..=total_pages` for `count` items
    pub fn clamped(self, count: usize) -> Self {
        let last = total_pages(count, self.page_size).max(1);
        Self {
            page: self.page.min(last),
            ..self
        }
    }
}

/// Number of pages needed for `count` items; zero items means zero pages
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// One window of a larger sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Project the requested page out of `items`.
///
/// Never returns more than `page_size` items; a page past the end yields an
/// empty window rather than an error.
pub fn project<T>(items: &[T], request: PageRequest) -> Page<&T> {
    let total_items = items.len();
    let start = (request.page - 1).saturating_mul(request.page_size);

    let window = if start >= total_items {
        Vec::new()
    } else {
        let end = start.saturating_add(request.page_size).min(total_items);
        items[start..end].iter().collect()
    };

    Page {
        items: window,
        page: request.page,
        page_size: request.page_size,
        total_pages: total_pages(total_items, request.page_size),
        total_items,
    }
}

/// Sort direction for record views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Stable-sort features by one property.
///
/// Numbers order before text, text before missing values; missing values stay
/// last in both directions.
pub fn sort_by_property(features: &mut [&Feature], key: &str, order: SortOrder) {
    features.sort_by(|a, b| {
        let (a, b) = (a.get(key), b.get(key));
        match (rank(a), rank(b)) {
            (2, 2) => Ordering::Equal,
            (2, _) => Ordering::Greater,
            (_, 2) => Ordering::Less,
            (ra, rb) if ra != rb => apply(ra.cmp(&rb), order),
            _ => apply(compare_values(a, b), order),
        }
    });
}

fn rank(value: Option<&PropertyValue>) -> u8 {
    match value {
        Some(v) if v.as_number().is_some() => 0,
        Some(PropertyValue::Text(_)) => 1,
        _ => 2,
    }
}

fn compare_values(a: Option<&PropertyValue>, b: Option<&PropertyValue>) -> Ordering {
    match (a.and_then(|v| v.as_number()), b.and_then(|v| v.as_number())) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => {
            let a = a.map(|v| v.to_string().to_lowercase()).unwrap_or_default();
            let b = b.map(|v| v.to_string().to_lowercase()).unwrap_or_default();
            a.cmp(&b)
        }
    }
}

fn apply(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}
