use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Result, SpeakersError};
use crate::mount::MountProps;

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub default_event: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| SpeakersError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| SpeakersError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "speakers")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(SpeakersError::NoConfigDir)
    }

    /// Get server URL with env var taking precedence over config file
    pub fn base_url(&self) -> Result<String> {
        Self::pick(std::env::var("INDICO_URL").ok(), self.base_url.as_ref())
            .ok_or(SpeakersError::MissingBaseUrl)
    }

    /// Get API token with env var taking precedence over config file
    pub fn api_token(&self) -> Option<String> {
        Self::pick(std::env::var("INDICO_TOKEN").ok(), self.api_token.as_ref())
    }

    fn pick(env: Option<String>, file: Option<&String>) -> Option<String> {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| file.cloned())
    }

    /// Get mount props for an event, preferring explicit argument over default
    pub fn resolve_event(&self, explicit: Option<MountProps>) -> Result<MountProps> {
        explicit
            .or(self.default_event.map(|event_id| MountProps { event_id }))
            .ok_or(SpeakersError::NoEvent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
base_url = "https://indico.example.org"
api_token = "indp_abc"
default_event = 42
"#,
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://indico.example.org"));
        assert_eq!(config.api_token.as_deref(), Some("indp_abc"));
        assert_eq!(config.default_event, Some(42));
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert!(config.base_url.is_none());
        assert!(config.default_event.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_event() {
        assert!(Config::parse("default_event = \"soon\"").is_err());
    }

    #[test]
    fn test_resolve_event() {
        let config = Config {
            default_event: Some(7),
            ..Default::default()
        };
        let explicit = MountProps { event_id: 3 };
        assert_eq!(config.resolve_event(Some(explicit)).unwrap().event_id, 3);
        assert_eq!(config.resolve_event(None).unwrap().event_id, 7);
        assert!(matches!(
            Config::default().resolve_event(None),
            Err(SpeakersError::NoEvent)
        ));
    }

    #[test]
    fn test_env_wins_unless_blank() {
        let file = Some("https://file.example.org".to_string());
        assert_eq!(
            Config::pick(Some("https://env.example.org".into()), file.as_ref()).as_deref(),
            Some("https://env.example.org")
        );
        assert_eq!(
            Config::pick(Some("  ".into()), file.as_ref()).as_deref(),
            Some("https://file.example.org")
        );
        assert_eq!(Config::pick(None, None), None);
    }
}
