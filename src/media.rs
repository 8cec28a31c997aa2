//! Timetable image content types accepted by both the server and the client form.

pub const ACCEPTED_IMAGE_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];

pub const INVALID_IMAGE_MESSAGE: &str = "Please upload an image file (JPEG, PNG, GIF, or WebP)";

/// Compares the declared type case-insensitively and ignores parameters
/// such as `; charset=binary`.
pub fn is_accepted_image_type(content_type: &str) -> bool {
    let essence = essence(content_type);
    ACCEPTED_IMAGE_TYPES.iter().any(|accepted| *accepted == essence)
}

/// File extension used for stored copies of an accepted image.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match essence(content_type).as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn essence(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}
