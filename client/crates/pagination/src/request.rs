//! Page request parameters sent as query strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Sort direction understood by the backend list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Query-string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page size was zero.
    #[error("page size must be greater than zero")]
    ZeroSize,
    /// The page size exceeded [`MAX_PAGE_SIZE`].
    #[error("page size must be at most {max}")]
    SizeTooLarge {
        /// Largest permitted size.
        max: u32,
    },
    /// The sort field was blank.
    #[error("sort field must not be empty")]
    EmptySortField,
}

/// Zero-based page request with optional sorting.
///
/// ## Invariants
/// - `size` is in `1..=MAX_PAGE_SIZE`.
/// - `sort_by`, when present, is a trimmed non-empty field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort_by: Option<String>,
    direction: SortDirection,
}

impl PageRequest {
    /// Build an unsorted request for `page` with `size` items.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `size` is zero or above
    /// [`MAX_PAGE_SIZE`].
    pub const fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 {
            return Err(PageRequestError::ZeroSize);
        }
        if size > MAX_PAGE_SIZE {
            return Err(PageRequestError::SizeTooLarge { max: MAX_PAGE_SIZE });
        }
        Ok(Self {
            page,
            size,
            sort_by: None,
            direction: SortDirection::Desc,
        })
    }

    /// Sort the request by `field` in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::EmptySortField`] when `field` is blank.
    pub fn sorted_by(
        mut self,
        field: &str,
        direction: SortDirection,
    ) -> Result<Self, PageRequestError> {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Err(PageRequestError::EmptySortField);
        }
        self.sort_by = Some(trimmed.to_owned());
        self.direction = direction;
        Ok(self)
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Sort field, if any.
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Sort direction; only meaningful when a sort field is set.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Query pairs in the order the backend documents them.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(field) = &self.sort_by {
            pairs.push(("sortBy", field.clone()));
            pairs.push(("direction", self.direction.as_str().to_owned()));
        }
        pairs
    }
}
