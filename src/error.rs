//! Domain errors surfaced by the skills.
//!
//! Every failure a user can hit while running a skill maps onto one variant
//! of [`SkillError`].  `main` prints the `Display` text behind a red marker
//! and exits with status 1; nothing here is machine-readable on purpose.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Environment variable consulted when no password is passed positionally.
pub const PASSPHRASE_ENV: &str = "FLOW_BACKUP_PASSPHRASE";

/// The external operation a tool failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    IdentityCreation,
    MemberExport,
    MemberListing,
    Encryption,
    Decryption,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::IdentityCreation => "Identity creation",
            Self::MemberExport => "Member export",
            Self::MemberListing => "Member listing",
            Self::Encryption => "Encryption",
            Self::Decryption => "Decryption",
        })
    }
}

#[derive(Debug, Error)]
pub enum SkillError {
    /// A positional value was present but unusable.
    #[error("{0}")]
    InvalidArgument(String),

    #[error(
        "No password provided. Set FLOW_BACKUP_PASSPHRASE environment variable or pass password as argument."
    )]
    MissingCredential,

    #[error("{tool} CLI not installed. Install with:\n{install}")]
    ToolNotInstalled {
        tool: String,
        install: &'static str,
    },

    #[error("{operation} failed: {detail}")]
    ExternalToolFailure { operation: Operation, detail: String },

    #[error("Decryption failed: Invalid password or corrupted backup file")]
    InvalidPasswordOrCorruptedFile,

    /// `context` names what was being fetched, `reason` is the HTTP status
    /// text or the transport error.
    #[error("{context}: {reason}")]
    RemoteRequestFailure { context: String, reason: String },

    #[error("{kind} file not found: {}", .path.display())]
    FileNotFound { kind: &'static str, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn remote(context: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::RemoteRequestFailure {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

pub type SkillResult<T> = Result<T, SkillError>;
