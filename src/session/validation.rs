use crate::error::ValidationError;
use crate::session::SelectedFile;
use std::fs;
use std::path::Path;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["application/pdf", "image/png", "image/jpeg", "image/webp"];

/// Extensions offered by the file dialog; `jpg` and `jpeg` both map to JPEG.
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["pdf", "png", "jpg", "jpeg", "webp"];

pub fn validate_upload_file(file: SelectedFile) -> Result<SelectedFile, ValidationError> {
    if !ACCEPTED_MIME_TYPES.contains(&file.mime.as_str()) {
        return Err(ValidationError::UnsupportedType { mime: file.mime });
    }

    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size: file.size });
    }

    Ok(file)
}

pub fn validate_sustainability_input(
    file: Option<&SelectedFile>,
    text: Option<&str>,
) -> Result<(), ValidationError> {
    let has_text = text.is_some_and(|text| !text.trim().is_empty());
    if file.is_none() && !has_text {
        return Err(ValidationError::MissingInput);
    }
    Ok(())
}

/// Describe a file on disk without judging it.
///
/// Only the metadata is read; contents are loaded when a request is built.
pub fn describe_path(path: &Path) -> Result<SelectedFile, ValidationError> {
    let metadata = fs::metadata(path).map_err(|err| ValidationError::Unreadable {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    if !metadata.is_file() {
        return Err(ValidationError::Unreadable {
            path: path.to_path_buf(),
            message: "not a regular file".to_string(),
        });
    }

    let mime = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(SelectedFile::new(path, mime, metadata.len()))
}
