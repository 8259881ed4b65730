use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::error::{Result, SpeakersError};

/// A file picked for upload, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PhotoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl PhotoFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename);
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    pub fn from_path(file: &str) -> Result<Self> {
        let path = Path::new(file);

        if !path.exists() {
            return Err(SpeakersError::FileNotFound(file.to_string()));
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();

        let bytes = std::fs::read(path).map_err(|e| SpeakersError::FileRead {
            path: file.to_string(),
            source: e,
        })?;

        Ok(Self::new(filename, bytes))
    }

    /// Lowercased extension, empty if the filename has none.
    pub fn extension(&self) -> String {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

fn guess_content_type(filename: &str) -> String {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Files collected by the upload widget for one file type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    pub slot_id: String,
    pub files: Vec<PhotoFile>,
}

/// Constraints the upload widget enforces for one slot.
#[derive(Debug, Clone)]
pub struct FileType {
    pub id: u32,
    pub name: String,
    pub extensions: Vec<String>,
    pub allow_multiple_files: bool,
    pub filename_pattern: Option<Regex>,
}

impl FileType {
    pub fn slot_id(&self) -> String {
        self.id.to_string()
    }

    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(ext))
    }

    /// Validate a selection and wrap it into this type's slot.
    pub fn collect(&self, files: Vec<PhotoFile>) -> Result<UploadSlot> {
        if files.len() > 1 && !self.allow_multiple_files {
            return Err(SpeakersError::InvalidPhoto {
                filename: files
                    .iter()
                    .map(|f| f.filename.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: format!("{} accepts a single file", self.name),
            });
        }

        for file in &files {
            let ext = file.extension();
            if !self.accepts_extension(&ext) {
                let allowed: Vec<&str> = self.extensions.iter().map(|e| e.trim()).collect();
                return Err(SpeakersError::InvalidPhoto {
                    filename: file.filename.clone(),
                    reason: format!("expected one of: {}", allowed.join(", ")),
                });
            }
            if let Some(pattern) = &self.filename_pattern {
                if !pattern.is_match(&file.filename) {
                    return Err(SpeakersError::InvalidPhoto {
                        filename: file.filename.clone(),
                        reason: format!("filename must match {}", pattern.as_str()),
                    });
                }
            }
        }

        Ok(UploadSlot {
            slot_id: self.slot_id(),
            files,
        })
    }
}
