//! # SecretDB Codec
//!
//! Record codecs for SecretDB.
//!
//! A codec turns one record into an opaque blob string and back. Every codec
//! first renders the record in its canonical textual form (compact JSON with
//! sorted object keys) and then transforms that text:
//!
//! - [`PlainCodec`] - stores the JSON text as-is (debugging, fixtures)
//! - [`Base64Codec`] - reversible obfuscation, standard base64 of the text
//! - [`AesGcmCodec`] - AES-256-GCM encryption with a caller-supplied key
//!
//! ## Contract
//!
//! - `decode(encode(r)) == r` for every record
//! - `encode` need not be deterministic (AES-GCM uses a fresh nonce per call)
//! - `decode` fails with [`CodecError`] on malformed blobs or a foreign key;
//!   callers must propagate the failure rather than skip the blob
//!
//! ## Usage
//!
//! ```
//! use secretdb_codec::{Base64Codec, Codec};
//! use serde_json::json;
//!
//! let codec = Base64Codec::new();
//! let record = json!({"name": "prince", "age": 24});
//! let blob = codec.encode(&record).unwrap();
//! assert_eq!(codec.decode(&blob).unwrap(), record);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod crypto;
mod error;
mod obfuscate;
mod plain;

pub use crypto::{AesGcmCodec, EncryptionKey, KEY_SIZE};
pub use error::{CodecError, CodecResult};
pub use obfuscate::Base64Codec;
pub use plain::PlainCodec;

/// A single stored record: any JSON value, usually an object.
pub type Record = serde_json::Value;

/// Strategy for converting records to stored blobs and back.
///
/// Implementations are pure: the output depends only on the input and the
/// codec's own configuration (such as a key), never on other records.
pub trait Codec: Send + Sync {
    /// Encodes one record into an opaque blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or encrypted.
    fn encode(&self, record: &Record) -> CodecResult<String>;

    /// Decodes a blob produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is malformed or was produced by an
    /// incompatible codec or key.
    fn decode(&self, blob: &str) -> CodecResult<Record>;

    /// Short identifier used in logs and the CLI.
    fn name(&self) -> &'static str;
}

/// Renders a record in canonical textual form.
pub(crate) fn to_canonical_json(record: &Record) -> CodecResult<String> {
    serde_json::to_string(record).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Parses canonical textual form back into a record.
pub(crate) fn from_canonical_json(text: &str) -> CodecResult<Record> {
    serde_json::from_str(text).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map, Number, Value};

    fn codecs() -> Vec<Box<dyn Codec>> {
        vec![
            Box::new(PlainCodec::new()),
            Box::new(Base64Codec::new()),
            Box::new(AesGcmCodec::new(EncryptionKey::generate())),
        ]
    }

    fn record_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            any::<u64>().prop_map(|n| Value::Number(n.into())),
            any::<f64>()
                .prop_filter_map("finite", Number::from_f64)
                .prop_map(Value::Number),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-zA-Z_]{1,8}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
            ]
        })
    }

    #[test]
    fn roundtrip_nested_record() {
        let record = json!({
            "name": "prince",
            "age": 24,
            "tags": ["a", "b"],
            "address": {"state": "Delhi", "country": "INDIA"},
            "score": 9.75,
            "active": true,
            "nick": null,
        });
        for codec in codecs() {
            let blob = codec.encode(&record).unwrap();
            assert_eq!(codec.decode(&blob).unwrap(), record, "{}", codec.name());
        }
    }

    #[test]
    fn roundtrip_scalar_record() {
        for codec in codecs() {
            let blob = codec.encode(&json!("just text")).unwrap();
            assert_eq!(codec.decode(&blob).unwrap(), json!("just text"));
        }
    }

    #[test]
    fn codecs_reject_garbage() {
        for codec in codecs() {
            assert!(codec.decode("%%% not a blob %%%").is_err(), "{}", codec.name());
        }
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let text = to_canonical_json(&json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(text, r#"{"a":2,"b":1}"#);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_all_codecs(record in record_strategy()) {
            for codec in codecs() {
                let blob = codec.encode(&record).unwrap();
                prop_assert_eq!(codec.decode(&blob).unwrap(), record.clone());
            }
        }
    }
}
