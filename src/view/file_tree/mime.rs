//! Best-effort content type detection from the first bytes of a file.

use std::path::Path;

/// Number of leading bytes inspected
pub const SNIFF_LEN: usize = 512;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// Classify a file from its first [`SNIFF_LEN`] bytes.
///
/// Magic numbers win; otherwise text gets a type from the extension (or plain
/// text), anything else is an octet stream. An empty head gives an empty
/// string.
pub fn sniff(path: &Path, head: &[u8]) -> String {
    if head.is_empty() {
        return String::new();
    }

    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }

    if looks_textual(head) {
        let guess = mime_guess::from_path(path)
            .iter()
            .find(|m| m.type_() == mime_guess::mime::TEXT);
        return match guess {
            Some(mime) => format!("{}; charset=utf-8", mime.essence_str()),
            None => TEXT_PLAIN.to_string(),
        };
    }

    OCTET_STREAM.to_string()
}

/// No NUL bytes and valid UTF-8, allowing a multi-byte sequence to be cut at
/// the end of the buffer.
fn looks_textual(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
