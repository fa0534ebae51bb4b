//! CLI command implementations.

pub mod records;
pub mod tables;

use serde_json::Value;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Errors raised by the CLI itself, before reaching the database.
#[derive(Debug, Error)]
pub enum CliError {
    /// The aes-gcm codec was selected without a passphrase.
    #[error("the aes-gcm codec needs --passphrase or SECRETDB_PASSPHRASE")]
    MissingPassphrase,

    /// Deriving the key failed.
    #[error(transparent)]
    Codec(#[from] secretdb_codec::CodecError),

    /// A JSON argument did not parse.
    #[error("invalid JSON argument: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A command result to print on stdout.
#[derive(Debug, PartialEq)]
pub struct Output(pub Value);

impl Output {
    /// Prints the value as JSON followed by a newline.
    pub fn print(&self, compact: bool) -> Result<(), CliError> {
        let text = if compact {
            serde_json::to_string(&self.0)?
        } else {
            serde_json::to_string_pretty(&self.0)?
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        Ok(())
    }
}

/// Parses a JSON argument; `-` reads the document from stdin.
pub fn read_json(arg: &str) -> Result<Value, CliError> {
    if arg == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        parse_json(&buffer)
    } else {
        parse_json(arg)
    }
}

fn parse_json(text: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str(text)?)
}
