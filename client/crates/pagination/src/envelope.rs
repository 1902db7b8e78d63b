//! Page envelope decoding.
//!
//! The envelope mirrors the fields the backend serialises for paged
//! responses. Any additional envelope fields (sorting metadata, pageable
//! descriptors) are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single page of results as returned by paged list endpoints.
///
/// ## Invariants
/// - `content` holds at most one page of items; it may be empty.
/// - Missing counters decode as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    content: Vec<T>,
    #[serde(default)]
    total_elements: u64,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    number: u32,
    #[serde(default)]
    size: u32,
}

impl<T> Page<T> {
    /// Build a page from its items and counters.
    #[must_use]
    pub fn new(content: Vec<T>, total_elements: u64, number: u32, size: u32) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
        };
        Self {
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Total number of items across every page.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Zero-based index of this page.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

/// Failure raised when a list payload is not JSON or has an unexpected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid list payload: {message}")]
pub struct PayloadError {
    message: String,
}

impl PayloadError {
    /// Human-readable decoding failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// A list response in any of the shapes the backend produces.
///
/// A bare array is tried first because an object never decodes as a
/// sequence. `null` is treated as an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// A bare JSON array of items.
    List(Vec<T>),
    /// A page envelope.
    Page(Page<T>),
    /// A `null` body.
    Empty,
}

impl<T: DeserializeOwned> ListPayload<T> {
    /// Decode a response body into a list payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the body is not JSON, or when it is JSON
    /// of a shape that is neither an array, a page envelope, nor `null`.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(body).map_err(|error| PayloadError {
            message: error.to_string(),
        })
    }
}

impl<T> ListPayload<T> {
    /// Normalise the payload into its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Page(page) => page.into_content(),
            Self::Empty => Vec::new(),
        }
    }

    /// Total number of items the backend reports, when known.
    ///
    /// Bare arrays report their own length.
    #[must_use]
    pub fn total_elements(&self) -> u64 {
        match self {
            Self::List(items) => u64::try_from(items.len()).unwrap_or(u64::MAX),
            Self::Page(page) => page.total_elements(),
            Self::Empty => 0,
        }
    }
}
