//! Multipart body sent to the speaker update endpoint.

use reqwest::multipart::{Form, Part};

use crate::error::Result;
use crate::form::EditSpeakerFormData;
use crate::types::PhotoFile;

pub const PHOTO_FIELD: &str = "photo";
pub const DESCRIPTION_FIELD: &str = "description";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text { name: String, value: String },
    File { name: String, file: PhotoFile },
}

impl PayloadPart {
    pub fn name(&self) -> &str {
        match self {
            PayloadPart::Text { name, .. } | PayloadPart::File { name, .. } => name,
        }
    }
}

/// Ordered list of form-data parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<PayloadPart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the update body from submitted form values. A missing photo adds
    /// no `photo` part; a description of `Some("")` still adds an empty
    /// `description` part so that clearing is distinguishable from leaving it.
    pub fn from_form_data(form_data: &EditSpeakerFormData) -> Self {
        let mut payload = Self::new();
        if let Some(photo) = form_data.photo_file() {
            payload.append_file(PHOTO_FIELD, photo.clone());
        }
        if let Some(description) = &form_data.description {
            payload.append_text(DESCRIPTION_FIELD, description.clone());
        }
        payload
    }

    pub fn append_text(&mut self, name: &str, value: impl Into<String>) {
        self.parts.push(PayloadPart::Text {
            name: name.to_string(),
            value: value.into(),
        });
    }

    pub fn append_file(&mut self, name: &str, file: PhotoFile) {
        self.parts.push(PayloadPart::File {
            name: name.to_string(),
            file,
        });
    }

    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    #[cfg(test)]
    pub fn has_field(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name() == name)
    }

    #[cfg(test)]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            PayloadPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                PayloadPart::Text { name, value } => form.text(name, value),
                PayloadPart::File { name, file } => {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.filename)
                        .mime_str(&file.content_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UploadSlot;

    fn photo_slot(slot_id: &str, filename: &str) -> UploadSlot {
        UploadSlot {
            slot_id: slot_id.to_string(),
            files: vec![PhotoFile::new(filename, vec![0x89, 0x50])],
        }
    }

    #[test]
    fn test_untouched_form_is_empty() {
        let payload = MultipartPayload::from_form_data(&EditSpeakerFormData::default());
        assert!(payload.parts().is_empty());
    }

    #[test]
    fn test_missing_photo_adds_no_photo_part() {
        let form_data = EditSpeakerFormData {
            description: Some("Talks about Rust".to_string()),
            photo: None,
        };
        let payload = MultipartPayload::from_form_data(&form_data);
        assert!(!payload.has_field(PHOTO_FIELD));
        assert_eq!(payload.text(DESCRIPTION_FIELD), Some("Talks about Rust"));
    }

    #[test]
    fn test_cleared_description_is_sent() {
        let form_data = EditSpeakerFormData {
            description: Some(String::new()),
            photo: None,
        };
        let payload = MultipartPayload::from_form_data(&form_data);
        assert!(payload.has_field(DESCRIPTION_FIELD));
        assert_eq!(payload.text(DESCRIPTION_FIELD), Some(""));
    }

    #[test]
    fn test_photo_comes_first() {
        let form_data = EditSpeakerFormData {
            description: Some("Bio".to_string()),
            photo: Some(vec![photo_slot("1", "me.png")]),
        };
        let payload = MultipartPayload::from_form_data(&form_data);
        let names: Vec<&str> = payload.parts().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec![PHOTO_FIELD, DESCRIPTION_FIELD]);
    }

    #[test]
    fn test_photo_from_other_slot_is_ignored() {
        let form_data = EditSpeakerFormData {
            description: None,
            photo: Some(vec![photo_slot("2", "other.png")]),
        };
        let payload = MultipartPayload::from_form_data(&form_data);
        assert!(!payload.has_field(PHOTO_FIELD));
    }
}
