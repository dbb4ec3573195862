use anyhow::Context;
use quill_store::TrailStore;

use crate::cli::GlobalFlags;
use crate::output::output;
use crate::views::{HistoryResponse, TrailView};

pub fn handle(
    store: &TrailStore,
    entity: &str,
    key: &str,
    field: Option<&str>,
    limit: u32,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = fetch(store, entity, key, field, limit)?;
    output(&response, flags.format)
}

/// Newest-first history, limited to `limit` trails. With `field`, only trails
/// that changed that field are kept.
pub fn fetch(
    store: &TrailStore,
    entity: &str,
    key: &str,
    field: Option<&str>,
    limit: u32,
) -> anyhow::Result<HistoryResponse> {
    let history = store
        .history(entity, key)
        .with_context(|| format!("failed to read history of {entity}/{key}"))?;

    let trails = history
        .iter()
        .rev()
        .filter(|trail| field.is_none_or(|f| trail.changed_columns.iter().any(|c| c == f)))
        .take(limit as usize)
        .map(|trail| TrailView::new(trail, field))
        .collect();

    Ok(HistoryResponse {
        entity: entity.to_string(),
        key: key.to_string(),
        trails,
    })
}
