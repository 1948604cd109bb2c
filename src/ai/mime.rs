/// Image MIME types the upstream vision models are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the MIME type from a filename suffix (case-insensitive).
///
/// Only `.png` maps to PNG; everything else, including a missing suffix,
/// is sent as JPEG.
pub fn detect_image_mime(filename: &str) -> ImageMime {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".png") {
        ImageMime::Png
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        ImageMime::Jpeg
    } else {
        tracing::debug!(
            "Unrecognized image suffix in {:?}, falling back to image/jpeg",
            filename
        );
        ImageMime::Jpeg
    }
}
