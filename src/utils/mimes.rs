use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

pub static DEFAULT_MIME_TYPE: &str = "application/octet-stream";

// https://developer.mozilla.org/en-US/docs/Web/HTTP/Basics_of_HTTP/MIME_types/Common_types
static COMMON_MIME_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let table: &[(&str, &str)] = &[
        ("aac", "audio/aac"),
        ("avif", "image/avif"),
        ("avi", "video/x-msvideo"),
        ("bin", "application/octet-stream"),
        ("bmp", "image/bmp"),
        ("bz", "application/x-bzip"),
        ("bz2", "application/x-bzip2"),
        ("css", "text/css"),
        ("csv", "text/csv"),
        ("epub", "application/epub+zip"),
        ("gz", "application/gzip"),
        ("gif", "image/gif"),
        ("htm, html", "text/html"),
        ("ico", "image/vnd.microsoft.icon"),
        ("ics", "text/calendar"),
        ("jpeg, jpg", "image/jpeg"),
        ("js, mjs", "text/javascript"),
        ("json", "application/json"),
        ("jsonld", "application/ld+json"),
        ("md", "text/markdown"),
        ("mp3", "audio/mpeg"),
        ("mp4", "video/mp4"),
        ("mpeg", "video/mpeg"),
        ("oga", "audio/ogg"),
        ("ogv", "video/ogg"),
        ("otf", "font/otf"),
        ("png", "image/png"),
        ("pdf", "application/pdf"),
        ("rtf", "application/rtf"),
        ("sh", "application/x-sh"),
        ("svg", "image/svg+xml"),
        ("tar", "application/x-tar"),
        ("tif, tiff", "image/tiff"),
        ("ttf", "font/ttf"),
        ("txt", "text/plain"),
        ("wav", "audio/wav"),
        ("weba", "audio/webm"),
        ("webm", "video/webm"),
        ("webp", "image/webp"),
        ("woff", "font/woff"),
        ("woff2", "font/woff2"),
        ("xhtml", "application/xhtml+xml"),
        ("xml", "application/xml"),
        ("zip", "application/zip"),
        ("7z", "application/x-7z-compressed"),
        ("toml", "application/toml"),
        ("rs, py, go, c, h, cpp, hpp", "text/plain"),
    ];

    let mut m = HashMap::new();
    for &(keys, val) in table.iter() {
        for key in keys.split(',') {
            m.insert(key.trim(), val);
        }
    }
    m
});

/// Guesses a media type from the extension of `path`.
pub fn mime_type_for_path<P: AsRef<Path>>(path: P) -> &'static str {
    let ext = match path.as_ref().extension().and_then(|v| v.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME_TYPE,
    };

    match COMMON_MIME_TYPES.get(ext.as_str()) {
        Some(v) => v,
        None => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::mime_type_for_path;

    #[test]
    fn by_extension() {
        assert_eq!(mime_type_for_path("a/b/index.HTML"), "text/html");
        assert_eq!(mime_type_for_path("photo.jpg"), "image/jpeg");
        assert_eq!(mime_type_for_path("main.rs"), "text/plain");
        assert_eq!(mime_type_for_path("Makefile"), "application/octet-stream");
    }
}
