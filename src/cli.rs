use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::mount::MountProps;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "speakers")]
#[command(about = "Manage the speaker profiles of an Indico event", version)]
#[command(after_help = "EXAMPLES:
    speakers list --event 42                  List speakers
    speakers list --event 42 --search ann     Filter by name
    speakers edit 7 --description \"Bio\"       Update a description
    speakers edit 7 --photo ./ann.jpg         Replace a photo
    speakers browse --event 42                Interactive session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the speakers of an event
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    speakers list --event 42
    speakers list --search \"lee\" --format json"
    )]
    List(ListArgs),
    /// Edit a speaker's description and photo
    #[command(after_help = "EXAMPLES:
    speakers edit 7 --description \"Works on compilers\"
    speakers edit 7 --clear-description
    speakers edit 7 --photo ./portrait.png --event 42")]
    Edit(EditArgs),
    /// Upload a speaker photo through the standalone upload endpoint
    #[command(after_help = "EXAMPLES:
    speakers upload-photo 7 ./portrait.jpg")]
    UploadPhoto(UploadPhotoArgs),
    /// Browse and edit speakers interactively
    #[command(after_help = "EXAMPLES:
    speakers browse --event 42")]
    Browse(EventArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    speakers completions bash > ~/.bash_completion.d/speakers
    speakers completions zsh > ~/.zfunc/_speakers
    speakers completions fish > ~/.config/fish/completions/speakers.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    speakers init")]
    Init,
}

#[derive(Args, Clone)]
pub struct EventArgs {
    /// Event ID, bare or JSON-quoted (uses default_event if not specified)
    #[arg(long, short, value_name = "EVENT_ID", value_parser = MountProps::from_event_id_attribute)]
    pub event: Option<MountProps>,
}

#[derive(Args, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub event: EventArgs,

    /// Only show speakers whose name contains this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Speaker ID
    pub id: u64,

    #[command(flatten)]
    pub event: EventArgs,

    /// New description
    #[arg(long, short, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Send an empty description
    #[arg(long)]
    pub clear_description: bool,

    /// Path to a new photo (png, jpg or jpeg)
    #[arg(long, short)]
    pub photo: Option<String>,
}

#[derive(Args)]
pub struct UploadPhotoArgs {
    /// Speaker ID
    pub id: u64,

    /// Path to the photo (png, jpg or jpeg)
    pub file: String,

    #[command(flatten)]
    pub event: EventArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from([
            "speakers",
            "edit",
            "7",
            "--event",
            "42",
            "--description",
            "Bio",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit(args) => {
                assert_eq!(args.id, 7);
                assert_eq!(args.event.event.map(|props| props.event_id), Some(42));
                assert_eq!(args.description.as_deref(), Some("Bio"));
                assert!(!args.clear_description);
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_description_conflicts_with_clear() {
        assert!(Cli::try_parse_from([
            "speakers",
            "edit",
            "7",
            "--description",
            "Bio",
            "--clear-description",
        ])
        .is_err());
    }

    #[test]
    fn test_event_accepts_quoted_id() {
        let cli = Cli::try_parse_from(["speakers", "browse", "-e", "\"42\""]).unwrap();
        match cli.command {
            Commands::Browse(args) => {
                assert_eq!(args.event, Some(MountProps { event_id: 42 }));
            }
            _ => panic!("expected browse"),
        }
        assert!(Cli::try_parse_from(["speakers", "list", "--event", "soon"]).is_err());
    }

    #[test]
    fn test_json_flag_overrides_format() {
        let cli = Cli::try_parse_from(["speakers", "--json", "list"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Json);
        let cli = Cli::try_parse_from(["speakers", "list", "-o", "compact"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Compact);
    }
}
