//! Best-effort content type detection from leading bytes.

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect a MIME type from the first bytes of a payload.
///
/// Falls back to `text/plain; charset=utf-8` for valid UTF-8 without control
/// characters, and to `application/octet-stream` otherwise.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    if data.is_empty() {
        return "text/plain; charset=utf-8";
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return "image/gif";
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    // WAV: RIFF ... WAVE
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
        return "audio/wave";
    }

    if data.starts_with(b"BM") && data.len() >= 14 {
        return "image/bmp";
    }

    if data.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return "image/x-icon";
    }

    if data.starts_with(b"%PDF-") {
        return "application/pdf";
    }

    if data.starts_with(b"ID3") {
        return "audio/mpeg";
    }

    // MPEG audio frame sync
    if data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0 {
        return "audio/mpeg";
    }

    if data.starts_with(b"OggS") {
        return "application/ogg";
    }

    if data.starts_with(b"fLaC") {
        return "audio/flac";
    }

    // ISO base media: ....ftyp
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return match &data[8..11] {
            b"M4A" => "audio/mp4",
            _ => "video/mp4",
        };
    }

    // Matroska / WebM: 1A 45 DF A3
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return "video/webm";
    }

    if data.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }

    if looks_like_text(data) {
        return "text/plain; charset=utf-8";
    }

    OCTET_STREAM
}

fn looks_like_text(data: &[u8]) -> bool {
    // A multi-byte sequence may be cut off at the sniff boundary.
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&data[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0C'))
}
