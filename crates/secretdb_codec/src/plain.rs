//! Identity codec: the blob is the record's canonical JSON text.

use crate::{from_canonical_json, to_canonical_json, Codec, CodecResult, Record};

/// Stores records as plain JSON text.
///
/// Offers no confidentiality at all; useful for fixtures and for inspecting
/// table files by eye.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl PlainCodec {
    /// Creates the plain codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for PlainCodec {
    fn encode(&self, record: &Record) -> CodecResult<String> {
        to_canonical_json(record)
    }

    fn decode(&self, blob: &str) -> CodecResult<Record> {
        from_canonical_json(blob)
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}
