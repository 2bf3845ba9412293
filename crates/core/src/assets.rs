//! Image content-type inference for stored assets.
//!
//! The mapping is extension based only. Anything unrecognized falls back to
//! JPEG; no attempt is made to sniff file contents.

pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";
pub const MIME_GIF: &str = "image/gif";
pub const MIME_JPEG: &str = "image/jpeg";

/// Infer the MIME type of a stored asset from its file extension.
///
/// ```
/// use restyle_core::assets::content_type_for_filename;
///
/// assert_eq!(content_type_for_filename("generated-1.png"), "image/png");
/// assert_eq!(content_type_for_filename("photo.HEIC"), "image/jpeg");
/// assert_eq!(content_type_for_filename("no-extension"), "image/jpeg");
/// ```
pub fn content_type_for_filename(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => MIME_PNG,
        Some("webp") => MIME_WEBP,
        Some("gif") => MIME_GIF,
        _ => MIME_JPEG,
    }
}

/// Pick the file extension for a downloaded image from its `Content-Type`
/// header value. Missing or unrecognized values map to `jpg`.
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let ct = content_type.unwrap_or_default().to_ascii_lowercase();
    if ct.contains("png") {
        "png"
    } else if ct.contains("webp") {
        "webp"
    } else if ct.contains("gif") {
        "gif"
    } else {
        "jpg"
    }
}

/// Whether `filename` is a plain file name that cannot escape the asset
/// store root (no separators, no parent references, not empty).
pub fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}
