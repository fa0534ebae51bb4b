//! AES-256-GCM record codec.
//!
//! A blob is `base64(nonce || ciphertext || tag)`: a fresh 12-byte nonce per
//! record, then the sealed canonical JSON. The key never touches the blob, so
//! a table is readable only by a codec built from the same key.

use crate::{from_canonical_json, to_canonical_json, Codec, CodecError, CodecResult, Record};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of an [`EncryptionKey`] in bytes.
pub const KEY_SIZE: usize = 32;

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// HKDF context string; changing it changes every passphrase-derived key.
const KEY_INFO: &[u8] = b"secretdb-record-key-v1";

/// A 256-bit record key. Wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// A random key from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = Self([0; KEY_SIZE]);
        rand::thread_rng().fill_bytes(&mut key.0);
        key
    }

    /// Wraps raw key material.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidKeySize`] unless `bytes` is exactly
    /// [`KEY_SIZE`] long.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let material: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CodecError::invalid_key_size(bytes.len(), KEY_SIZE))?;
        Ok(Self(material))
    }

    /// Derives a key from a passphrase and salt with HKDF-SHA256.
    ///
    /// Deterministic, so a table can be reopened from the passphrase alone.
    /// HKDF does not stretch its input: a weak passphrase gives a weak key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::KeyDerivationFailed`] if HKDF rejects the output
    /// length.
    pub fn from_passphrase(passphrase: &str, salt: &str) -> CodecResult<Self> {
        let mut key = Self([0; KEY_SIZE]);
        Hkdf::<Sha256>::new(Some(salt.as_bytes()), passphrase.as_bytes())
            .expand(KEY_INFO, &mut key.0)
            .map_err(|e| CodecError::key_derivation_failed(e.to_string()))?;
        Ok(key)
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}

/// Seals each record on its own with AES-256-GCM.
///
/// Encoding the same record twice gives different blobs. Decoding with a
/// different key, or a blob that was altered, fails with
/// [`CodecError::DecryptionFailed`].
///
/// ```
/// use secretdb_codec::{AesGcmCodec, Codec, EncryptionKey};
/// use serde_json::json;
///
/// let codec = AesGcmCodec::new(EncryptionKey::generate());
/// let blob = codec.encode(&json!({"secret": true})).unwrap();
/// assert_eq!(codec.decode(&blob).unwrap(), json!({"secret": true}));
/// ```
pub struct AesGcmCodec {
    cipher: Aes256Gcm,
}

impl AesGcmCodec {
    /// Builds the codec; the key is consumed and wiped once the cipher is set up.
    #[must_use]
    pub fn new(key: EncryptionKey) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0)),
        }
    }
}

impl Codec for AesGcmCodec {
    fn encode(&self, record: &Record) -> CodecResult<String> {
        let mut sealed = vec![0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut sealed);

        let text = to_canonical_json(record)?;
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&sealed), text.as_bytes())
            .map_err(|_| CodecError::encoding_failed("AES-GCM sealing failed"))?;
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }

    fn decode(&self, blob: &str) -> CodecResult<Record> {
        let sealed = STANDARD
            .decode(blob)
            .map_err(|e| CodecError::decoding_failed(format!("invalid base64: {e}")))?;
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CodecError::decryption_failed(format!(
                "blob is {} bytes, shorter than nonce and tag",
                sealed.len()
            )));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::decryption_failed("wrong key or altered blob"))?;
        let text = String::from_utf8(plaintext)
            .map_err(|e| CodecError::decoding_failed(format!("invalid UTF-8: {e}")))?;
        from_canonical_json(&text)
    }

    fn name(&self) -> &'static str {
        "aes-gcm"
    }
}

impl std::fmt::Debug for AesGcmCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCodec").finish_non_exhaustive()
    }
}
