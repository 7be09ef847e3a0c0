use std::fs;
use anyhow::Result;

/// Decode bytes as UTF-8 (dropping a BOM), falling back to Windows-1252,
/// the code page most RTF writers use.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            cow.into_owned()
        }
    }
}

/// Load text file with encoding detection
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let bytes = fs::read(file_path)?;
    Ok(decode_text(&bytes))
}
