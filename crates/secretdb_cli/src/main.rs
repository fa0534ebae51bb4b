//! SecretDB CLI
//!
//! Command-line access to a SecretDB directory.
//!
//! # Commands
//!
//! - `create` - Append one record or an array of records to a table
//! - `find` - Query a table
//! - `update` - Merge a patch into matching records
//! - `delete` - Remove matching records
//! - `tables` - List tables
//! - `drop` - Delete a table
//!
//! JSON arguments may be given inline or as `-` to read them from stdin.
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{CliError, Output};
use secretdb_codec::EncryptionKey;
use secretdb_core::{CodecKind, Config, Database, DEFAULT_ROOT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SecretDB command-line tools.
#[derive(Parser)]
#[command(name = "secretdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long, default_value = DEFAULT_ROOT)]
    path: PathBuf,

    /// Record codec of the database
    #[arg(global = true, long, value_enum, default_value_t = CodecArg::Base64)]
    codec: CodecArg,

    /// Passphrase for the aes-gcm codec
    #[arg(global = true, long, env = "SECRETDB_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Salt mixed into the passphrase-derived key
    #[arg(global = true, long, default_value = "secretdb")]
    salt: String,

    /// Print single-line JSON instead of pretty JSON
    #[arg(global = true, long)]
    compact: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CodecArg {
    /// Plain JSON text
    Plain,
    /// Base64-obfuscated JSON
    Base64,
    /// AES-256-GCM encrypted JSON (needs --passphrase)
    AesGcm,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a record (object or scalar) or an array of records
    Create {
        /// Table name
        table: String,
        /// Record JSON, or `-` for stdin
        data: String,
    },

    /// Find records; prints {"count", "data"}
    Find {
        /// Table name
        table: String,
        /// Query JSON ({"where", "limit", "offset"}), or `-` for stdin
        query: Option<String>,
    },

    /// Merge query.data into every record matching query.where
    Update {
        /// Table name
        table: String,
        /// Query JSON ({"where", "data"}), or `-` for stdin
        query: String,
    },

    /// Delete every record matching query.where
    Delete {
        /// Table name
        table: String,
        /// Query JSON ({"where"}), or `-` for stdin
        query: String,
    },

    /// List tables
    Tables,

    /// Delete a table and all of its records
    Drop {
        /// Table name
        table: String,
    },

    /// Show version information
    Version,
}

fn config_from(cli: &Cli) -> Result<Config, CliError> {
    let codec = match cli.codec {
        CodecArg::Plain => CodecKind::Plain,
        CodecArg::Base64 => CodecKind::Base64,
        CodecArg::AesGcm => {
            let passphrase = cli.passphrase.as_deref().ok_or(CliError::MissingPassphrase)?;
            let key = EncryptionKey::from_passphrase(passphrase, &cli.salt)?;
            CodecKind::AesGcm(key)
        }
    };
    Ok(Config::new().codec(codec).pretty(!cli.compact))
}

fn open(cli: &Cli) -> Result<Database, Box<dyn std::error::Error>> {
    Ok(Database::open_with_config(&cli.path, config_from(cli)?)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for results
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output: Output = match &cli.command {
        Commands::Create { table, data } => commands::records::create(&open(&cli)?, table, data)?,
        Commands::Find { table, query } => {
            commands::records::find(&open(&cli)?, table, query.as_deref())?
        }
        Commands::Update { table, query } => {
            commands::records::update(&open(&cli)?, table, query)?
        }
        Commands::Delete { table, query } => {
            commands::records::delete(&open(&cli)?, table, query)?
        }
        Commands::Tables => commands::tables::list(&open(&cli)?)?,
        Commands::Drop { table } => commands::tables::drop(&open(&cli)?, table)?,
        Commands::Version => {
            println!("SecretDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("SecretDB Core v{}", secretdb_core::VERSION);
            return Ok(());
        }
    };

    output.print(cli.compact)?;
    Ok(())
}
