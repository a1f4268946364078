//! Bulk book import pipeline.
//!
//! Uploaded files (or raw JSON arrays) flow through four stages:
//! parse → normalize → validate → duplicate-filter + batched insert.
//! The first three stages live here as pure functions; the storage-touching
//! stages live in [`crate::services::import`].

pub mod normalizer;
pub mod parser;
pub mod validator;

pub use normalizer::normalize_row;
pub use parser::{parse_rows, TempUpload};
pub use validator::{validate_rows, ValidationSplit, HEADER_ROW_OFFSET};
