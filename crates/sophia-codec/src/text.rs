use base64::{DecodeError, Engine as _, engine::general_purpose::STANDARD as BASE64};

/// Encode bytes as padded standard base64.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard base64, ignoring leading and trailing whitespace
/// (editors like to append a newline to saved text files).
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64.decode(text.trim_ascii())
}
