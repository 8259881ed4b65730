use serde::{Deserialize, Serialize};

/// Speaker profile as returned by the backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub speaker_description: Option<String>,
    #[serde(default)]
    pub speaker_photo_url: Option<String>,
    pub avatar_url: String,
}

impl Speaker {
    /// URL of the thumbnail shown in the list, falling back to the avatar.
    pub fn thumbnail_url(&self) -> &str {
        self.speaker_photo_url.as_deref().unwrap_or(&self.avatar_url)
    }

    pub fn description(&self) -> &str {
        self.speaker_description.as_deref().unwrap_or("")
    }
}
