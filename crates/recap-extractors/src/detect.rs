//! Filename-based format detection.
//!
//! Routing is driven purely by the filename extension; content is never
//! sniffed. Unknown extensions fail closed.

use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::types::Category;

/// Guess the MIME type for a filename from its extension.
pub fn guess_mime_type(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    let mime = match ext.as_str() {
        "pdf" => "application/pdf",

        "mp3" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "wma" => "audio/x-ms-wma",
        "weba" => "audio/webm",
        "aif" | "aiff" => "audio/x-aiff",
        "amr" => "audio/amr",

        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "mpeg" | "mpg" => "video/mpeg",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "3gp" => "video/3gpp",
        "ogv" => "video/ogg",

        "txt" | "text" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "xml" => "text/xml",
        "ics" => "text/calendar",
        "css" => "text/css",
        "vtt" => "text/vtt",
        "srt" => "text/plain",

        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "ico" => "image/vnd.microsoft.icon",

        "json" => "application/json",
        "zip" => "application/zip",
        "js" => "application/javascript",
        "rtf" => "application/rtf",
        _ => return None,
    };

    Some(mime)
}

/// Map a MIME type to the category that extracts it.
pub fn category_for_mime(mime_type: &str) -> Option<Category> {
    if mime_type == "application/pdf" {
        Some(Category::Document)
    } else if mime_type.starts_with("audio/") {
        Some(Category::Audio)
    } else if mime_type.starts_with("video/") {
        Some(Category::Video)
    } else if mime_type.starts_with("text/") {
        Some(Category::PlainText)
    } else if mime_type.starts_with("image/") {
        Some(Category::Image)
    } else {
        None
    }
}

/// Detect the content category of a file from its name.
pub fn detect(filename: &str) -> ExtractResult<Category> {
    guess_mime_type(filename)
        .and_then(category_for_mime)
        .ok_or_else(|| ExtractError::UnsupportedFormat(filename.to_string()))
}
