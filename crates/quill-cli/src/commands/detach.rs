use anyhow::Context;
use quill_store::TrailStore;

use crate::cli::GlobalFlags;
use crate::output::output;
use crate::views::DetachResponse;

pub fn handle(store: &TrailStore, actor_id: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let detached = store
        .detach_actor(actor_id)
        .with_context(|| format!("failed to detach actor {actor_id}"))?;
    output(
        &DetachResponse {
            actor_id: actor_id.to_string(),
            detached,
        },
        flags.format,
    )
}
