//! Subcommand handlers.
//!
//! Each file corresponds to one skill:
//!
//! | File             | Invocation                                   |
//! |------------------|----------------------------------------------|
//! | `price.rs`       | `bsv-skills price`                           |
//! | `lookup.rs`      | `bsv-skills lookup <address> [mode]`         |
//! | `decode.rs`      | `bsv-skills decode <tx-hex-or-txid>`         |
//! | `identity.rs`    | `bsv-skills identity create\|list\|export-member` |
//! | `backup.rs`      | `bsv-skills backup encrypt\|decrypt`         |
//! | `registry.rs`    | `bsv-skills registry show\|set-default`      |
//! | `placeholder.rs` | `send`, `encrypt-message`, `posts …`         |
//! | `init.rs`        | `bsv-skills init`                            |
//!
//! Handlers validate everything they can before touching a tool, the
//! network or the filesystem, and write their report to the `out` writer
//! they are given.

pub mod backup;
pub mod decode;
pub mod identity;
pub mod init;
pub mod lookup;
pub mod placeholder;
pub mod price;
pub mod registry;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{
    config::PathsConfig,
    error::{SkillError, SkillResult},
    registry::RegistryStore,
};

pub use placeholder::Placeholder;

/// Shortest password accepted when creating a new encrypted artifact.
pub const MIN_PASSWORD_LEN: usize = 8;

/// What a handler finished with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The skill exists but its integration is not built yet.
    NotImplemented(Placeholder),
}

/// Per-invocation inputs shared by the handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub paths: PathsConfig,
    /// Value of `FLOW_BACKUP_PASSPHRASE`, read once in `main`.
    pub passphrase: Option<String>,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn registry(&self) -> RegistryStore {
        RegistryStore::new(self.paths.registry_path())
    }

    /// Positional password, else the environment passphrase.  Empty
    /// strings count as absent.
    pub fn password(&self, arg: Option<&str>) -> SkillResult<String> {
        given(arg)
            .or_else(|| given(self.passphrase.as_deref()))
            .map(str::to_string)
            .ok_or(SkillError::MissingCredential)
    }

    /// Like [`Context::password`] but also enforces [`MIN_PASSWORD_LEN`].
    pub fn new_password(&self, arg: Option<&str>) -> SkillResult<String> {
        let password = self.password(arg)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SkillError::invalid(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(password)
    }

    /// Absolute paths are taken as-is; anything else lives in the backups
    /// directory.
    pub fn in_backups(&self, file: &str) -> PathBuf {
        let p = Path::new(file);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.paths.backups_dir().join(p)
        }
    }
}

/// An optional positional, with `""` meaning "not given".  Lets a later
/// positional (the password) be passed while keeping an earlier default.
pub(crate) fn given(arg: Option<&str>) -> Option<&str> {
    arg.filter(|a| !a.is_empty())
}

/// Resolve `p` against the working directory.
pub(crate) fn absolute(p: &str) -> SkillResult<PathBuf> {
    Ok(std::path::absolute(p)?)
}

/// Last path component as a display string.
pub(crate) fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}


#[cfg(test)]
mod tests {
    use super::{testing::context, *};

    #[test]
    fn positional_password_wins_over_env() {
        let ctx = context(Path::new("/x"), Some("from-env-123"));
        assert_eq!(ctx.password(Some("from-arg-123")).unwrap(), "from-arg-123");
    }

    #[test]
    fn env_password_is_the_fallback() {
        let ctx = context(Path::new("/x"), Some("from-env-123"));
        assert_eq!(ctx.password(None).unwrap(), "from-env-123");
        assert_eq!(ctx.password(Some("")).unwrap(), "from-env-123");
    }

    #[test]
    fn no_password_anywhere_is_missing_credential() {
        let ctx = context(Path::new("/x"), Some(""));
        assert!(matches!(ctx.password(None), Err(SkillError::MissingCredential)));
    }

    #[test]
    fn short_new_password_is_invalid() {
        let ctx = context(Path::new("/x"), None);
        let err = ctx.new_password(Some("1234567")).unwrap_err();
        assert!(matches!(err, SkillError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Password must be at least 8 characters long");
        assert!(ctx.new_password(Some("12345678")).is_ok());
    }

    #[test]
    fn empty_positional_counts_as_absent() {
        assert_eq!(given(Some("")), None);
        assert_eq!(given(Some("out.bep")), Some("out.bep"));
        assert_eq!(given(None), None);
    }

    #[test]
    fn relative_backup_names_resolve_under_backups_dir() {
        let ctx = context(Path::new("/data/bsv"), None);
        assert_eq!(
            ctx.in_backups("id.bep"),
            PathBuf::from("/data/bsv/backups/id.bep")
        );
        assert_eq!(ctx.in_backups("/tmp/id.bep"), PathBuf::from("/tmp/id.bep"));
    }
}
