//! Database configuration.

use secretdb_codec::{AesGcmCodec, Base64Codec, Codec, EncryptionKey, PlainCodec};
use std::sync::Arc;

/// Directory used by [`Database::open_default`](crate::Database::open_default).
pub const DEFAULT_ROOT: &str = "SecretDb";

/// Which codec records are stored with.
#[derive(Debug, Clone, Default)]
pub enum CodecKind {
    /// Plain JSON text.
    Plain,
    /// Base64 of the JSON text (reversible obfuscation).
    #[default]
    Base64,
    /// AES-256-GCM with the given key.
    AesGcm(EncryptionKey),
}

impl CodecKind {
    /// Instantiates the codec.
    #[must_use]
    pub fn build(&self) -> Arc<dyn Codec> {
        match self {
            CodecKind::Plain => Arc::new(PlainCodec::new()),
            CodecKind::Base64 => Arc::new(Base64Codec::new()),
            CodecKind::AesGcm(key) => Arc::new(AesGcmCodec::new(key.clone())),
        }
    }

    /// Short identifier of the codec.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CodecKind::Plain => "plain",
            CodecKind::Base64 => "base64",
            CodecKind::AesGcm(_) => "aes-gcm",
        }
    }
}

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Codec used for every table of the database.
    pub codec: CodecKind,

    /// Whether to create the database directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether table files are pretty-printed.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            codec: CodecKind::default(),
            create_if_missing: true,
            pretty: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record codec.
    #[must_use]
    pub fn codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    /// Encrypts records with AES-256-GCM under `key`.
    #[must_use]
    pub fn encryption_key(self, key: EncryptionKey) -> Self {
        self.codec(CodecKind::AesGcm(key))
    }

    /// Sets whether to create the directory if missing.
    #[must_use]
    pub fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether table files are pretty-printed.
    #[must_use]
    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.create_if_missing);
        assert!(config.pretty);
        assert_eq!(config.codec.name(), "base64");
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .create_if_missing(false)
            .pretty(false)
            .encryption_key(EncryptionKey::generate());

        assert!(!config.create_if_missing);
        assert!(!config.pretty);
        assert_eq!(config.codec.name(), "aes-gcm");
        assert_eq!(config.codec.build().name(), "aes-gcm");
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = EncryptionKey::from_bytes(&[9u8; 32]).unwrap();
        let shown = format!("{:?}", Config::new().encryption_key(key));
        assert!(shown.contains("REDACTED"));
    }
}
