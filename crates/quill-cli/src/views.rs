//! Serializable response shapes for CLI output.

use std::collections::BTreeMap;
use std::fmt;

use quill_core::{FieldMap, FieldValue, Trail, TrailType};
use serde::Serialize;
use serde_json::Value;

fn json_or_null(value: Option<&FieldValue>) -> Value {
    value.map_or(Value::Null, FieldValue::to_json)
}

fn json_map(values: &FieldMap) -> BTreeMap<String, Value> {
    values
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

fn text_or_dash(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChangeView {
    pub column: String,
    pub old: Value,
    pub new: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TrailView {
    pub id: String,
    pub entity: String,
    pub key: String,
    pub timestamp: String,
    pub trail_type: TrailType,
    pub actor_id: Option<String>,
    pub changes: Vec<ChangeView>,
}

impl TrailView {
    /// Build a view of `trail`, optionally narrowed to a single column.
    pub fn new(trail: &Trail, field: Option<&str>) -> Self {
        let changes = trail
            .changes()
            .into_iter()
            .filter(|change| field.is_none_or(|f| change.column == f))
            .map(|change| ChangeView {
                column: change.column.to_string(),
                old: json_or_null(change.old.as_ref()),
                new: json_or_null(change.new.as_ref()),
            })
            .collect();

        Self {
            id: trail.id.clone(),
            entity: trail.entity_name.clone(),
            key: trail.primary_key.clone(),
            timestamp: trail.timestamp.to_rfc3339(),
            trail_type: trail.trail_type,
            actor_id: trail.actor_id.clone(),
            changes,
        }
    }
}

impl fmt::Display for TrailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}/{}",
            self.timestamp, self.id, self.trail_type, self.entity, self.key
        )?;
        if let Some(actor) = &self.actor_id {
            write!(f, " by {actor}")?;
        }
        for change in &self.changes {
            write!(
                f,
                "\n  {}: {} -> {}",
                change.column,
                text_or_dash(&change.old),
                text_or_dash(&change.new)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entity: String,
    pub key: String,
    pub trails: Vec<TrailView>,
}

impl fmt::Display for HistoryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trails.is_empty() {
            return write!(f, "No trails for {}/{}", self.entity, self.key);
        }
        for (i, trail) in self.trails.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{trail}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    #[serde(flatten)]
    pub trail: TrailView,
    pub changed_columns: Vec<String>,
    pub old_values: BTreeMap<String, Value>,
    pub new_values: BTreeMap<String, Value>,
}

impl ShowResponse {
    pub fn new(trail: &Trail) -> Self {
        Self {
            trail: TrailView::new(trail, None),
            changed_columns: trail.changed_columns.clone(),
            old_values: json_map(&trail.old_values()),
            new_values: json_map(&trail.new_values()),
        }
    }
}

impl fmt::Display for ShowResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trail)?;
        for (label, values) in [("old", &self.old_values), ("new", &self.new_values)] {
            write!(f, "\n{label}:")?;
            if values.is_empty() {
                write!(f, " (none)")?;
            }
            for (name, value) in values {
                write!(f, "\n  {name} = {}", text_or_dash(value))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DetachResponse {
    pub actor_id: String,
    pub detached: usize,
}

impl fmt::Display for DetachResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Detached actor {} from {} trail(s)",
            self.actor_id, self.detached
        )
    }
}
