use std::io::{self, BufRead, Write};
use std::sync::Arc;

use colored::Colorize;

use crate::cli::EventArgs;
use crate::client::IndicoClient;
use crate::commands::speakers::{host, print_speaker, render};
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::panel::{RowAction, SpeakerPanel, SubmitOutcome};
use crate::types::PhotoFile;

const CONTAINER: &str = "browse";

const HELP: &str = "Commands:
  list                 Show the speakers matching the current search
  search <text>        Filter speakers by name
  clear                Clear the search
  edit <id>            Open the edit form for a speaker
  desc [text]          Set the description in the open form (empty clears it)
  photo <path>         Pick a photo for the open form
  nophoto              Drop the picked photo
  save                 Submit the open form
  cancel               Close the form without saving
  delete <id>          Not available for speaker profiles
  refresh              Fetch the speaker list again
  help                 Show this help
  quit                 Leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    List,
    Search(String),
    Clear,
    Edit(u64),
    Description(String),
    Photo(String),
    DropPhoto,
    Save,
    Cancel,
    Delete(u64),
    Refresh,
    Help,
    Quit,
}

fn parse_id(arg: &str) -> std::result::Result<u64, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("expected a speaker id, got \"{}\"", arg.trim()))
}

fn parse_command(line: &str) -> std::result::Result<BrowseCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "list" | "ls" => Ok(BrowseCommand::List),
        "search" | "/" => Ok(BrowseCommand::Search(rest.to_string())),
        "clear" => Ok(BrowseCommand::Clear),
        "edit" => parse_id(rest).map(BrowseCommand::Edit),
        "desc" | "description" => Ok(BrowseCommand::Description(rest.to_string())),
        "photo" if !rest.is_empty() => Ok(BrowseCommand::Photo(rest.to_string())),
        "photo" => Err("photo needs a file path".to_string()),
        "nophoto" => Ok(BrowseCommand::DropPhoto),
        "save" => Ok(BrowseCommand::Save),
        "cancel" => Ok(BrowseCommand::Cancel),
        "delete" | "rm" => parse_id(rest).map(BrowseCommand::Delete),
        "refresh" => Ok(BrowseCommand::Refresh),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command \"{other}\" (try help)")),
    }
}

fn print_form_state(panel: &SpeakerPanel) {
    if !panel.modal_opened() {
        return;
    }
    let Some(form) = panel.form() else {
        return;
    };
    match form.speaker() {
        Some(speaker) => println!("{} {} <{}>", form.header().bold(), speaker.name, speaker.email),
        None => println!("{}", form.header().bold()),
    }
    let values = form.values();
    println!(
        "  Description: {}",
        values.description.as_deref().unwrap_or("-")
    );
    if values.description != form.initial_values().description {
        println!(
            "  {}",
            format!(
                "was: {}",
                form.initial_values().description.as_deref().unwrap_or("-")
            )
            .bright_black()
        );
    }
    match values.photo_file() {
        Some(file) => println!("  Photo:       {}", file.filename),
        None => println!(
            "  Photo:       {} ({})",
            "unchanged".bright_black(),
            form.photo_type().extensions.join(", ")
        ),
    }
}

/// Notice for `cancel`, only while a form with unsaved changes is open.
fn discard_message(panel: &SpeakerPanel) -> Option<String> {
    if !panel.modal_opened() {
        return None;
    }
    panel
        .selected_speaker()
        .map(|speaker| format!("Discarded changes to {}", speaker.name))
}

/// Run one command against the panel. Returns false when the session should end.
async fn apply(panel: &mut SpeakerPanel, command: BrowseCommand) -> Result<bool> {
    match command {
        BrowseCommand::List => render(panel),
        BrowseCommand::Search(term) => {
            panel.set_search_term(term);
            render(panel);
        }
        BrowseCommand::Clear => {
            panel.set_search_term("");
            render(panel);
        }
        BrowseCommand::Edit(id) => {
            panel.activate(id, RowAction::Edit)?;
            print_form_state(panel);
        }
        BrowseCommand::Description(text) => match panel.form_mut() {
            Some(form) => {
                form.set_description(Some(text));
                print_form_state(panel);
            }
            None => output::print_message("No form open. Use: edit <id>"),
        },
        BrowseCommand::Photo(path) => match panel.form_mut() {
            Some(form) => {
                form.accept_photo(PhotoFile::from_path(&path)?)?;
                print_form_state(panel);
            }
            None => output::print_message("No form open. Use: edit <id>"),
        },
        BrowseCommand::DropPhoto => match panel.form_mut() {
            Some(form) => {
                form.clear_photo();
                print_form_state(panel);
            }
            None => output::print_message("No form open. Use: edit <id>"),
        },
        BrowseCommand::Save => {
            if let SubmitOutcome::Saved(speaker) = panel.submit_form().await {
                print_speaker(&speaker);
            }
        }
        BrowseCommand::Cancel => {
            if let Some(message) = discard_message(panel) {
                output::print_message(&message);
            }
            panel.close_modal();
        }
        BrowseCommand::Delete(id) => {
            panel.activate(id, RowAction::Delete)?;
            output::print_message(&format!("{}: not available", RowAction::Delete.tooltip()));
        }
        BrowseCommand::Refresh => {
            panel.refresh().await?;
            render(panel);
        }
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => return Ok(false),
    }
    Ok(true)
}

pub async fn run(client: &Arc<IndicoClient>, config: &Config, args: EventArgs) -> Result<()> {
    let props = config.resolve_event(args.event)?;
    let mut host = host(client);
    let panel = host.mount(CONTAINER, props).await?;
    render(panel);
    println!("{}", "Type help for commands.".bright_black());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", ">".cyan());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let command = match parse_command(&line?) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    eprintln!("{message}");
                }
                continue;
            }
        };

        let Some(panel) = host.get_mut(CONTAINER) else {
            break;
        };
        match apply(panel, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{} {e}", "Error:".red().bold()),
        }
    }

    host.unmount(CONTAINER);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::testing::{speaker, FakeApi, RecordingReporter};

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("list"), Ok(BrowseCommand::List));
        assert_eq!(
            parse_command("search  ann lee "),
            Ok(BrowseCommand::Search("ann lee".to_string()))
        );
        assert_eq!(parse_command("EDIT 12"), Ok(BrowseCommand::Edit(12)));
        assert_eq!(parse_command("delete 3"), Ok(BrowseCommand::Delete(3)));
        assert_eq!(parse_command("q"), Ok(BrowseCommand::Quit));
        assert_eq!(parse_command("nophoto"), Ok(BrowseCommand::DropPhoto));
    }

    #[test]
    fn test_parse_desc_without_text_clears() {
        assert_eq!(
            parse_command("desc"),
            Ok(BrowseCommand::Description(String::new()))
        );
        assert_eq!(
            parse_command("desc Builds compilers"),
            Ok(BrowseCommand::Description("Builds compilers".to_string()))
        );
    }

    #[tokio::test]
    async fn test_cancel_after_save_discards_nothing() {
        let api = Arc::new(FakeApi::with_lists(vec![
            vec![speaker(1, "Ann")],
            vec![speaker(1, "Ann")],
        ]));
        *api.update_result.lock().unwrap() = Some(speaker(1, "Ann"));
        let mut panel = SpeakerPanel::new(42, api, Arc::new(RecordingReporter::default()));
        panel.refresh().await.unwrap();
        assert_eq!(discard_message(&panel), None);

        panel.activate(1, RowAction::Edit).unwrap();
        assert_eq!(
            discard_message(&panel).as_deref(),
            Some("Discarded changes to Ann")
        );

        assert!(matches!(panel.submit_form().await, SubmitOutcome::Saved(_)));
        assert!(panel.selected_speaker().is_some());
        assert_eq!(discard_message(&panel), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("edit ann").is_err());
        assert!(parse_command("photo").is_err());
        assert_eq!(parse_command("   "), Err(String::new()));
        assert!(parse_command("frobnicate").unwrap_err().contains("unknown"));
    }
}
