use anyhow::Context;
use quill_store::TrailStore;

use crate::cli::GlobalFlags;
use crate::output::output;
use crate::views::ShowResponse;

pub fn handle(store: &TrailStore, id: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let trail = store
        .find(id)
        .with_context(|| format!("failed to look up trail {id}"))?
        .with_context(|| format!("trail not found: {id}"))?;
    output(&ShowResponse::new(&trail), flags.format)
}
