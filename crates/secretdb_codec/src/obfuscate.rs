//! Base64 obfuscation codec.

use crate::{from_canonical_json, to_canonical_json, Codec, CodecError, CodecResult, Record};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Stores records as standard (padded) base64 of their JSON text.
///
/// This is obfuscation, not encryption: anyone can reverse it. Use
/// [`AesGcmCodec`](crate::AesGcmCodec) when the data must stay confidential.
///
/// New blobs carry UTF-8 text. Earlier releases wrote the same layout but
/// encoded each character as one Latin-1 byte, so decoding falls back to
/// Latin-1 when the bytes are not valid UTF-8. Old stores therefore read back
/// correctly for any text in the U+0000..=U+00FF range.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Base64Codec {
    /// Creates the base64 codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for Base64Codec {
    fn encode(&self, record: &Record) -> CodecResult<String> {
        Ok(STANDARD.encode(to_canonical_json(record)?))
    }

    fn decode(&self, blob: &str) -> CodecResult<Record> {
        let bytes = STANDARD
            .decode(blob)
            .map_err(|e| CodecError::decoding_failed(format!("invalid base64: {e}")))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => latin1(e.as_bytes()),
        };
        from_canonical_json(&text)
    }

    fn name(&self) -> &'static str {
        "base64"
    }
}

/// Every byte is the code point of the same value.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
