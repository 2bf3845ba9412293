//! Input validation for a transform request.
//!
//! Runs before anything is written or sent upstream; a request rejected
//! here never reaches the external service.

use crate::error::CoreError;

/// Metadata of an uploaded file, as received from the multipart form.
#[derive(Debug, Clone, Copy)]
pub struct UploadMeta<'a> {
    pub content_type: Option<&'a str>,
    pub size_bytes: usize,
}

/// Check the uploaded file and the prompt.
///
/// Returns the trimmed prompt on success. Checks run in the order a user
/// would fix them: missing file, wrong type, too large, missing prompt.
pub fn validate_request<'p>(
    file: Option<UploadMeta<'_>>,
    prompt: Option<&'p str>,
    max_upload_bytes: usize,
) -> Result<&'p str, CoreError> {
    let file = file.ok_or_else(|| CoreError::Validation("No image file uploaded".into()))?;

    let is_image = file
        .content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return Err(CoreError::Validation("Only image files are allowed!".into()));
    }

    if file.size_bytes > max_upload_bytes {
        return Err(CoreError::Validation(too_large_message(max_upload_bytes)));
    }

    match prompt.map(str::trim) {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(CoreError::Validation("No prompt provided".into())),
    }
}

/// Message for an upload over the size ceiling.
pub fn too_large_message(max_upload_bytes: usize) -> String {
    format!("File too large. Maximum size is {}.", format_size(max_upload_bytes))
}

fn format_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}
