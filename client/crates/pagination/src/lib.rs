//! Page envelope and page request primitives for LoanFlow list endpoints.
//!
//! The LoanFlow backend answers list requests either with a page envelope
//! (`{"content": [...], "totalElements": 3, ...}`) or, on older routes, with a
//! bare JSON array. This crate keeps both shapes behind one decoder so callers
//! always end up with a plain `Vec<T>`.
//!
//! # Example
//!
//! ```
//! use pagination::{ListPayload, PageRequest, SortDirection};
//!
//! let payload: ListPayload<u32> =
//!     ListPayload::from_json_slice(br#"{"content": [1, 2], "totalElements": 2}"#)
//!         .expect("valid payload");
//! assert_eq!(payload.into_items(), vec![1, 2]);
//!
//! let request = PageRequest::new(0, 25)
//!     .expect("valid page")
//!     .sorted_by("createdAt", SortDirection::Desc)
//!     .expect("valid sort field");
//! assert_eq!(request.size(), 25);
//! ```

mod envelope;
mod request;

pub use envelope::{ListPayload, Page, PayloadError};
pub use request::{MAX_PAGE_SIZE, PageRequest, PageRequestError, SortDirection};
