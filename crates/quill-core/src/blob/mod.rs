//! Change-set blob codec.
//!
//! A blob is a flat JSON object whose member names are the changed column
//! names, e.g. `{"Status":"Open","Priority":1}`. Each trail carries two of
//! them: one for the values before the mutation and one for the values after.
//!
//! - [`encode_change_set`] builds both blobs from parallel column/value
//!   slices. Sets of up to [`SMALL_SET_THRESHOLD`] columns are written
//!   directly into the output text; larger sets go through a JSON map.
//!   Readers cannot tell which path produced a blob.
//! - [`get_value`] pulls a single member out of a blob without materializing
//!   the others.
//! - [`decode_all`] materializes the whole blob as a [`crate::FieldMap`].
//!
//! Decoding is best-effort: a missing or malformed blob reads as "no value",
//! never as an error. [`try_decode_all`] is the strict variant for callers
//! that want to know.

mod decode;
mod encode;

pub use decode::{decode_all, get_value, try_decode_all};
pub use encode::{EncodedChangeSet, SMALL_SET_THRESHOLD, encode_change_set, encode_map};
