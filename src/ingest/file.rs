use tracing::debug;

use super::rtf::{is_rtf, rtf_to_text};
use crate::utils::encoding::decode_text;

/// Turn an uploaded file into source text: decode it, then strip RTF
/// formatting if the content is RTF.
pub fn text_from_upload(bytes: &[u8]) -> String {
    let content = decode_text(bytes);
    if is_rtf(&content) {
        debug!("Stripping RTF markup from {} byte upload", bytes.len());
        rtf_to_text(&content)
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtf_upload_becomes_plain_text() {
        let bytes = b"{\\rtf1\\ansi{\\fonttbl\\f0 Arial;}\\f0 Bonjour \\'e0 tous\\par}";
        assert_eq!(text_from_upload(bytes), "Bonjour \u{e0} tous");
    }

    #[test]
    fn plain_upload_is_kept_verbatim() {
        assert_eq!(text_from_upload("line one\nline two\n".as_bytes()), "line one\nline two\n");
    }
}
