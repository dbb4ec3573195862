use clap::{Parser, Subcommand};

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `quill` binary.
#[derive(Debug, Parser)]
#[command(name = "quill", version, about = "Quill - query audit trails")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, text, raw
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Trail store directory (overrides `store.dir`)
    #[arg(short, long, global = true)]
    pub store: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            store: self.store.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Change history of one record, newest first.
    History {
        /// Audited record type, e.g. `Ticket`.
        entity: String,
        /// Identifier of the audited record.
        key: String,
        /// Only show changes to this field.
        #[arg(long)]
        field: Option<String>,
    },
    /// A single trail with its fully decoded values.
    Show {
        /// Trail ID, e.g. `trl-3fa94c0b1d2e7a55`.
        id: String,
    },
    /// Clear references to a deleted actor.
    #[command(name = "detach-actor")]
    DetachActor {
        actor_id: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn history_parses_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "quill", "history", "Ticket", "42", "--field", "Status", "-f", "json", "-l", "5",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.limit, Some(5));
        match cli.command {
            Commands::History { entity, key, field } => {
                assert_eq!(entity, "Ticket");
                assert_eq!(key, "42");
                assert_eq!(field.as_deref(), Some("Status"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn detach_actor_uses_kebab_case_name() {
        let cli = Cli::try_parse_from(["quill", "--store", "/tmp/t", "detach-actor", "usr-1"])
            .unwrap();
        assert_eq!(cli.global_flags().store.as_deref(), Some("/tmp/t"));
        assert!(matches!(cli.command, Commands::DetachActor { ref actor_id } if actor_id == "usr-1"));
    }

    #[test]
    fn default_format_is_text() {
        let cli = Cli::try_parse_from(["quill", "show", "trl-1"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
    }
}
