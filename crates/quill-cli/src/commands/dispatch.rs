use quill_config::QuillConfig;
use quill_store::TrailStore;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: &Commands,
    store: &TrailStore,
    config: &QuillConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::History { entity, key, field } => {
            let limit = flags.limit.unwrap_or(config.general.default_limit);
            commands::history::handle(store, entity, key, field.as_deref(), limit, flags)
        }
        Commands::Show { id } => commands::show::handle(store, id, flags),
        Commands::DetachActor { actor_id } => commands::detach::handle(store, actor_id, flags),
    }
}
