//! # quill-core
//!
//! Audit trail records and the machinery underneath them.
//!
//! This crate provides the types every other Quill crate builds on:
//! - [`Trail`], one immutable change-event entry per detected mutation
//! - [`FieldValue`], the tagged value stored in change-set blobs
//! - The blob codec: a small-set fast path and a map-based general path for
//!   encoding, plus best-effort partial and full decoding
//! - [`IdentityResolver`], a concurrent cache of canonical type resolutions
//!   that backs wrapper-aware entity equality
//! - Trail enums, ID helpers, and cross-cutting error types

pub mod blob;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod trail;
pub mod value;

pub use enums::TrailType;
pub use errors::CoreError;
pub use identity::{
    Canonical, CanonicalType, Entity, EntityRef, IdentityResolver, ResolverStats, entity_hash,
};
pub use trail::{ColumnChange, Trail};
pub use value::{FieldMap, FieldValue};
