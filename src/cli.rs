//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and then
//! dispatched to the command handlers.
//!
//! Passwords are optional positionals everywhere.  When omitted, the
//! `FLOW_BACKUP_PASSPHRASE` environment variable is used instead.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "bsv-skills",
    about   = "BSV wallet, identity and backup skills",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Path to an extra configuration file.
    ///
    /// Layered over `<config dir>/bsv-skills/config.toml`; its values win.
    /// With `init`, the file to create.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the registry, `backups/` and `temp/`.
    #[arg(long, global = true, value_name = "DIR")]
    pub bsv_dir: Option<PathBuf>,

    /// Block-explorer base URL, e.g. `https://api.whatsonchain.com/v1/bsv/test`.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Print the resolved configuration and exit without running anything.
    #[arg(long)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Subcommand>,
}

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum Subcommand {
    /// Show the current BSV exchange rate.
    Price,

    /// Show balance, history or UTXOs of an address.
    Lookup {
        address: String,
        /// balance, history, utxos or info (balance + history).
        mode: Option<String>,
    },

    /// Decode a raw transaction hex, or a txid (fetched first).
    Decode {
        #[arg(value_name = "TX_HEX_OR_TXID")]
        tx: String,
    },

    /// Create and inspect BAP identity backups.
    #[command(subcommand)]
    Identity(IdentityCommand),

    /// Encrypt and decrypt backup files.
    #[command(subcommand)]
    Backup(BackupCommand),

    /// Send BSV (not implemented yet).
    Send {
        /// Ignored until the skill is implemented.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        rest: Vec<String>,
    },

    /// ECDH message encryption (not implemented yet).
    EncryptMessage {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        rest: Vec<String>,
    },

    /// BSocial posts (not implemented yet).
    #[command(subcommand)]
    Posts(PostsCommand),

    /// Inspect the backup registry.
    #[command(subcommand)]
    Registry(RegistryCommand),

    /// Scaffold a commented config file.
    ///
    /// Writes to `--config` if given, else the global config path.  Exits
    /// with an error if the file already exists.
    Init,
}

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum IdentityCommand {
    /// Create a new encrypted BAP identity backup.
    Create {
        name: String,
        /// type42 (recommended) or legacy.
        #[arg(value_name = "TYPE")]
        identity_type: String,
        output: Option<String>,
        password: Option<String>,
    },

    /// List the members of an identity backup.
    List {
        backup: String,
        password: Option<String>,
    },

    /// Export one member of an identity backup.
    ExportMember {
        backup: String,
        index: String,
        output: Option<String>,
        password: Option<String>,
    },
}

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum BackupCommand {
    /// Encrypt a file into `backups/<name>.bep` (or OUTPUT).
    Encrypt {
        input: String,
        output: Option<String>,
        password: Option<String>,
    },

    /// Decrypt a backup.  OUTPUT `-` prints to the console; omitted writes
    /// to the temp directory.
    Decrypt {
        backup: String,
        output: Option<String>,
        password: Option<String>,
    },
}

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum PostsCommand {
    /// Publish a post (not implemented yet).
    Create {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        rest: Vec<String>,
    },

    /// Read posts of an address (not implemented yet).
    Read { address: String },
}

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum RegistryCommand {
    /// List recorded backups.
    Show,

    /// Mark a recorded backup as the default.
    SetDefault { file: String },
}
