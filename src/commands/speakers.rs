use std::sync::Arc;

use colored::Colorize;
use tabled::Tabled;

use crate::cli::{EditArgs, ListArgs, OutputFormat, UploadPhotoArgs};
use crate::client::IndicoClient;
use crate::config::Config;
use crate::error::{Result, SpeakersError};
use crate::mount::PanelHost;
use crate::output::{self, actions_label, truncate, TerminalReporter};
use crate::panel::{SpeakerPanel, SpeakerRow, SubmitOutcome};
use crate::types::{PhotoFile, Speaker};

const CONTAINER: &str = "speakers";

#[derive(Tabled)]
struct SpeakerTableRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Photo")]
    photo: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "")]
    actions: String,
}

impl From<&SpeakerRow> for SpeakerTableRow {
    fn from(row: &SpeakerRow) -> Self {
        Self {
            id: row.id,
            photo: truncate(&row.thumbnail_url, 30),
            name: truncate(&row.name, 30),
            email: truncate(&row.email, 30),
            description: truncate(&row.description, 50),
            actions: actions_label(&row.actions),
        }
    }
}

pub fn host(client: &Arc<IndicoClient>) -> PanelHost {
    PanelHost::new(client.clone(), Arc::new(TerminalReporter))
}

/// Print the panel's filtered speakers, or its empty-state message.
pub fn render(panel: &SpeakerPanel) {
    if let Some(empty) = panel.empty_state() {
        output::print_message(empty.message());
        return;
    }

    output::print_table(&panel.rows(), |row| SpeakerTableRow::from(row), |row| {
        format!(
            "{} | {} | {} | {}",
            row.id,
            row.name,
            row.email,
            truncate(&row.description, 60)
        )
    });
}

pub fn print_speaker(speaker: &Speaker) {
    output::print_item(speaker, |s| {
        println!("{} {}", s.name.bold(), format!("#{}", s.id).bright_black());
        println!("  Email:       {}", s.email);
        println!("  Photo:       {}", s.thumbnail_url());
        match s.speaker_description.as_deref() {
            Some(description) if !description.is_empty() => {
                println!("  Description: {description}");
            }
            _ => println!("  Description: {}", "-".bright_black()),
        }
    });
}

pub async fn list(client: &Arc<IndicoClient>, config: &Config, args: ListArgs) -> Result<()> {
    let props = config.resolve_event(args.event.event)?;
    let mut host = host(client);
    let panel = host.mount(CONTAINER, props).await?;

    if let Some(term) = args.search {
        panel.set_search_term(term);
    }

    render(panel);
    Ok(())
}

pub async fn edit(client: &Arc<IndicoClient>, config: &Config, args: EditArgs) -> Result<()> {
    let props = config.resolve_event(args.event.event)?;
    let mut host = host(client);
    let panel = host.mount(CONTAINER, props).await?;

    let form = panel.open_edit(args.id)?;
    if args.clear_description {
        form.set_description(Some(String::new()));
    } else if let Some(description) = args.description {
        form.set_description(Some(description));
    }
    if let Some(path) = args.photo {
        form.accept_photo(PhotoFile::from_path(&path)?)?;
    }

    match panel.submit_form().await {
        SubmitOutcome::Saved(speaker) => {
            print_speaker(&speaker);
            output::print_message(&format!("Updated speaker profile of {}", speaker.name));
            Ok(())
        }
        SubmitOutcome::Failed => Err(SpeakersError::Reported),
    }
}

pub async fn upload_photo(
    client: &Arc<IndicoClient>,
    config: &Config,
    args: UploadPhotoArgs,
) -> Result<()> {
    let props = config.resolve_event(args.event.event)?;
    let file = PhotoFile::from_path(&args.file)?;

    // Mounting checks that the speaker belongs to the event before uploading
    let mut host = host(client);
    let panel = host.mount(CONTAINER, props).await?;
    let form = panel.open_edit(args.id)?;
    form.accept_photo(file)?;

    let url = form
        .photo_upload_url(client.routes())
        .ok_or(SpeakersError::NoSpeakerSelected)?;
    let file = form
        .values()
        .photo_file()
        .ok_or(SpeakersError::NoSpeakerSelected)?;
    let response = client.upload_photo(url, file).await?;

    match output::format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
        }
        _ => output::print_message(&format!(
            "Uploaded \"{}\" for speaker {}",
            file.filename, args.id
        )),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::testing::speaker;

    #[test]
    fn test_table_row_from_panel_row() {
        colored::control::set_override(false);
        let row = SpeakerRow::from(&speaker(3, "Cy"));
        let table_row = SpeakerTableRow::from(&row);
        assert_eq!(table_row.id, 3);
        assert_eq!(table_row.photo, "/user/3/picture");
        assert_eq!(table_row.actions, "edit delete");

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["actions"], serde_json::json!(["edit", "delete"]));
    }
}
