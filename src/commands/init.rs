use std::io::{self, Write};

use crate::client::Routes;
use crate::config::Config;
use crate::error::{Result, SpeakersError};

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn toml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn render_config(base_url: &str, api_token: &str, default_event: Option<u64>) -> String {
    let mut content = format!("base_url = {}\n", toml_string(base_url));
    if !api_token.is_empty() {
        content.push_str(&format!("api_token = {}\n", toml_string(api_token)));
    }
    if let Some(event) = default_event {
        content.push_str(&format!("default_event = {event}\n"));
    }
    content
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Speakers CLI Configuration");
    println!("==========================\n");

    let base_url = prompt("Enter your Indico server URL (e.g., https://indico.example.org): ")?;
    if base_url.is_empty() {
        return Err(SpeakersError::MissingBaseUrl);
    }
    Routes::new(&base_url)?;

    let api_token = prompt("Enter an API token with event management scope [optional]: ")?;

    let default_event = prompt("Enter default event ID [optional]: ")?;
    let default_event = if default_event.is_empty() {
        None
    } else {
        Some(
            default_event
                .parse::<u64>()
                .map_err(|_| SpeakersError::InvalidEventId(default_event.clone()))?,
        )
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SpeakersError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(
        &config_path,
        render_config(&base_url, &api_token, default_event),
    )
    .map_err(|e| SpeakersError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'speakers' commands!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_round_trips() {
        let content = render_config("https://indico.example.org", "tok\"en", Some(42));
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://indico.example.org"));
        assert_eq!(config.api_token.as_deref(), Some("tok\"en"));
        assert_eq!(config.default_event, Some(42));
    }

    #[test]
    fn test_render_config_skips_empty() {
        let content = render_config("https://indico.example.org", "", None);
        assert_eq!(content, "base_url = \"https://indico.example.org\"\n");
    }
}
