//! The audit trail record.
//!
//! One `Trail` is created per detected mutation, populated in full, handed to
//! the persistence boundary, and never updated afterwards. The mutators below
//! exist for the populating step only; nothing here guards against calling
//! them on a record that has already been persisted.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::blob;
use crate::enums::TrailType;
use crate::errors::CoreError;
use crate::identity::{Canonical, Entity};
use crate::ids::{PREFIX_TRAIL, generate_id};
use crate::value::{FieldMap, FieldValue};

/// A single change event: who changed which record, when, and from what to what.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Trail {
    pub id: String,
    /// Name of the audited record type.
    pub entity_name: String,
    /// Stringified identifier of the audited record.
    pub primary_key: String,
    pub timestamp: DateTime<Utc>,
    pub trail_type: TrailType,
    /// Changed field names in the order the producer reported them.
    pub changed_columns: Vec<String>,
    /// Blob of values before the mutation; `None` when there are none.
    pub old_blob: Option<String>,
    /// Blob of values after the mutation; `None` when there are none.
    pub new_blob: Option<String>,
    /// Actor that made the change. Lookup only; cleared when the actor is deleted.
    pub actor_id: Option<String>,
}

/// One changed column with its decoded before/after values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChange<'a> {
    pub column: &'a str,
    pub old: Option<FieldValue>,
    pub new: Option<FieldValue>,
}

impl Trail {
    /// Start a trail for a record, stamped with a fresh ID and the current time.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `entity_name` is empty, or
    /// `CoreError::Other` if no ID could be generated.
    pub fn new(
        entity_name: impl Into<String>,
        primary_key: impl Into<String>,
        trail_type: TrailType,
    ) -> Result<Self, CoreError> {
        let entity_name = entity_name.into();
        if entity_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "trail entity name must not be empty".into(),
            ));
        }

        Ok(Self {
            id: generate_id(PREFIX_TRAIL)?,
            entity_name,
            primary_key: primary_key.into(),
            timestamp: Utc::now(),
            trail_type,
            changed_columns: Vec::new(),
            old_blob: None,
            new_blob: None,
            actor_id: None,
        })
    }

    #[must_use]
    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// Assign pre-serialized blobs as-is, without validation.
    ///
    /// Leaves `changed_columns` untouched.
    pub fn set_values_from_json(&mut self, old_blob: Option<String>, new_blob: Option<String>) {
        self.old_blob = old_blob;
        self.new_blob = new_blob;
    }

    /// Encode a change set into this trail.
    ///
    /// Replaces `changed_columns` with `columns` and both blobs with the
    /// encoded values. See [`blob::encode_change_set`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ArgumentShape` if the slices differ in length; the
    /// trail is left unchanged.
    pub fn set_values_from_span<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        old: &[FieldValue],
        new: &[FieldValue],
    ) -> Result<(), CoreError> {
        let encoded = blob::encode_change_set(columns, old, new)?;
        self.changed_columns = encoded.changed_columns;
        self.old_blob = encoded.old_blob;
        self.new_blob = encoded.new_blob;
        Ok(())
    }

    /// Value of `column` before the mutation, if recorded and readable.
    #[must_use]
    pub fn old_value(&self, column: &str) -> Option<FieldValue> {
        blob::get_value(self.old_blob.as_deref(), column)
    }

    /// Value of `column` after the mutation, if recorded and readable.
    #[must_use]
    pub fn new_value(&self, column: &str) -> Option<FieldValue> {
        blob::get_value(self.new_blob.as_deref(), column)
    }

    /// Decode the whole old blob. Empty if absent or unreadable.
    #[must_use]
    pub fn old_values(&self) -> FieldMap {
        blob::decode_all(self.old_blob.as_deref())
    }

    /// Decode the whole new blob. Empty if absent or unreadable.
    #[must_use]
    pub fn new_values(&self) -> FieldMap {
        blob::decode_all(self.new_blob.as_deref())
    }

    /// Replace the old blob with an encoding of `values`; an empty map clears it.
    pub fn set_old_values(&mut self, values: &FieldMap) {
        self.old_blob = blob::encode_map(values);
    }

    /// Replace the new blob with an encoding of `values`; an empty map clears it.
    pub fn set_new_values(&mut self, values: &FieldMap) {
        self.new_blob = blob::encode_map(values);
    }

    /// Each changed column paired with its old and new value.
    ///
    /// Decodes each blob once rather than once per column.
    #[must_use]
    pub fn changes(&self) -> Vec<ColumnChange<'_>> {
        let old = self.old_values();
        let new = self.new_values();
        self.changed_columns
            .iter()
            .map(|column| ColumnChange {
                column,
                old: old.get(column).filter(|v| !v.is_null()).cloned(),
                new: new.get(column).filter(|v| !v.is_null()).cloned(),
            })
            .collect()
    }
}

impl Canonical for Trail {}

impl Entity for Trail {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}
