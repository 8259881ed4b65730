mod speaker;
mod upload;

pub use speaker::Speaker;
pub use upload::{FileType, PhotoFile, UploadSlot};
