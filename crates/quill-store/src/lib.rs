//! # quill-store
//!
//! Append-only JSONL persistence for trail records.
//!
//! Each audited entity type gets one file, `{dir}/{entity_name}.jsonl`, with
//! one serialized [`Trail`](quill_core::Trail) per line. Every field is stored
//! verbatim: blobs stay opaque text, `changed_columns` is a JSON list, and
//! absent blobs are `null`.
//!
//! Reads are tolerant: a line that fails to deserialize is logged and skipped.

mod error;
mod store;

pub use error::StoreError;
pub use store::TrailStore;
