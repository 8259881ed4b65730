//! Modal form for editing a speaker's photo and description.

use url::Url;

use crate::client::Routes;
use crate::error::Result;
use crate::types::{FileType, PhotoFile, Speaker, UploadSlot};

/// Slot the photo widget stores its selection under.
pub const PHOTO_SLOT_ID: &str = "1";

/// Values handed to the submit handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSpeakerFormData {
    pub description: Option<String>,
    pub photo: Option<Vec<UploadSlot>>,
}

impl EditSpeakerFormData {
    /// First file of the photo slot, if one was picked.
    pub fn photo_file(&self) -> Option<&PhotoFile> {
        self.photo
            .as_ref()?
            .iter()
            .find(|slot| slot.slot_id == PHOTO_SLOT_ID)?
            .files
            .first()
    }
}

pub fn speaker_photo_type() -> FileType {
    FileType {
        id: 1,
        name: "Speaker Photo".to_string(),
        extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
        allow_multiple_files: false,
        filename_pattern: None,
    }
}

#[derive(Debug, Clone)]
pub struct EditSpeakerForm {
    speaker: Option<Speaker>,
    event_id: u64,
    photo_type: FileType,
    disabled_until_change: bool,
    initial: EditSpeakerFormData,
    values: EditSpeakerFormData,
}

impl EditSpeakerForm {
    pub fn new(speaker: Option<Speaker>, event_id: u64) -> Self {
        let initial = EditSpeakerFormData {
            description: speaker
                .as_ref()
                .and_then(|s| s.speaker_description.clone()),
            photo: None,
        };
        Self {
            speaker,
            event_id,
            photo_type: speaker_photo_type(),
            disabled_until_change: false,
            values: initial.clone(),
            initial,
        }
    }

    pub fn header(&self) -> &'static str {
        if self.speaker.is_some() {
            "Edit Speaker Profile"
        } else {
            "Create Speaker Profile"
        }
    }

    pub fn speaker(&self) -> Option<&Speaker> {
        self.speaker.as_ref()
    }

    pub fn photo_type(&self) -> &FileType {
        &self.photo_type
    }

    /// Where the embedded uploader posts photos. Only exists for an existing speaker.
    pub fn photo_upload_url(&self, routes: &Routes) -> Option<Url> {
        self.speaker
            .as_ref()
            .map(|s| routes.upload_speaker_photo(self.event_id, s.id))
    }

    pub fn initial_values(&self) -> &EditSpeakerFormData {
        &self.initial
    }

    pub fn values(&self) -> &EditSpeakerFormData {
        &self.values
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.values.description = description;
    }

    /// Validate and store the photo selection, replacing any earlier one.
    pub fn accept_photo(&mut self, file: PhotoFile) -> Result<()> {
        let slot = self.photo_type.collect(vec![file])?;
        self.values.photo = Some(vec![slot]);
        Ok(())
    }

    pub fn clear_photo(&mut self) {
        self.values.photo = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn can_submit(&self) -> bool {
        !self.disabled_until_change || self.is_dirty()
    }

    /// The only way data leaves the form.
    pub fn submit(&self) -> EditSpeakerFormData {
        self.values.clone()
    }
}
