//! Blob keys for uploaded images

use uuid::Uuid;

/// Longest file stem kept in a key
const MAX_NAME_CHARS: usize = 100;

/// Raster formats and the extension their keys carry
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/avif", "avif"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
];

/// Extension for a declared image content type, if it is a known raster format
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    IMAGE_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Build a collision-resistant object key `{uuid}_{stem}[.ext]` for an upload.
///
/// Only the stem of the client file name is kept; the extension comes from the
/// declared content type, and types outside the raster allow-list get none.
/// Directory components are dropped and anything outside `[A-Za-z0-9-_]` becomes `_`,
/// so the key is safe as a path segment and as an S3 key.
pub fn object_key(file_name: Option<&str>, content_type: &str) -> String {
    let base = file_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    let stem = base.split_once('.').map_or(base, |(stem, _)| stem);

    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();

    if name.trim_matches('_').is_empty() {
        name = "upload".to_string();
    }

    match image_extension(content_type) {
        Some(ext) => format!("{}_{name}.{ext}", Uuid::new_v4()),
        None => format!("{}_{name}", Uuid::new_v4()),
    }
}
