//! The backup registry: a small JSON file tracking known backup files.
//!
//! ```json
//! {
//!   "backups": {
//!     "alice-identity.bep": {
//!       "created": "2026-01-02T03:04:05Z",
//!       "type": "BapMasterBackup",
//!       "identityType": "type42",
//!       "name": "Alice"
//!     },
//!     "wallet.bep": { "created": "2026-01-02T03:05:00Z", "source": "wallet.json" }
//!   },
//!   "defaultBackup": null,
//!   "identityBackup": "alice-identity.bep"
//! }
//! ```
//!
//! The file is shared with other tools and never checked against a schema.
//! Any JSON object loads: fields of an unexpected type are kept as their
//! JSON text, a `null` or non-object `backups` reads as empty, and only a
//! file that is not a JSON object at all counts as unreadable.
//!
//! Bookkeeping is best-effort.  [`RegistryStore::load`] never fails, and
//! callers downgrade every [`RegistryError`] to a warning so a broken
//! registry can never abort the operation the user actually asked for.
//!
//! There is no locking.  Two processes updating the registry at the same
//! time race on read-modify-write and the last writer wins.  Writes are
//! atomic (temp file + rename) so the file itself is never torn.

use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// `type` value that marks an identity (BAP master) backup.
pub const IDENTITY_BACKUP_TYPE: &str = "BapMasterBackup";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not write registry {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not serialise registry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("'{0}' is not a known backup")]
    UnknownBackup(String),
}

// ─── Data model ───────────────────────────────────────────────────────────────

/// Metadata for one backup file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    /// RFC 3339 as written by this tool; anything else is kept verbatim.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub created: String,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,

    #[serde(
        default,
        rename = "type",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub identity_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Keys written by other tools, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BackupRecord {
    /// Record for a plain encrypted file, remembering where it came from.
    pub fn encrypted(source: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            created: format_timestamp(&created),
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Record for a freshly created BAP identity backup.
    pub fn identity(
        name: impl Into<String>,
        identity_type: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            created: format_timestamp(&created),
            kind: Some(IDENTITY_BACKUP_TYPE.into()),
            identity_type: Some(identity_type.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        self.kind.as_deref() == Some(IDENTITY_BACKUP_TYPE)
    }
}

/// The whole registry file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    #[serde(default, deserialize_with = "lenient::records")]
    pub backups: BTreeMap<String, BackupRecord>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub default_backup: Option<String>,

    /// First identity backup ever recorded.  Never reassigned.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub identity_backup: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Registry {
    /// Insert or replace `filename`, claiming `identity_backup` if it is
    /// still empty and the record is an identity backup.
    pub fn insert(&mut self, filename: &str, record: BackupRecord) {
        if record.is_identity() && self.identity_backup.is_none() {
            self.identity_backup = Some(filename.to_string());
        }
        self.backups.insert(filename.to_string(), record);
    }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Registry bound to its file on disk.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry, or the empty shape if the file is missing or not
    /// valid JSON.
    pub fn load(&self) -> Registry {
        match self.read() {
            Ok(Some(registry)) => registry,
            Ok(None) => Registry::default(),
            Err(e) => {
                log::warn!(
                    "ignoring unreadable registry {}: {e}",
                    self.path.display()
                );
                Registry::default()
            },
        }
    }

    /// `Ok(None)` when the file does not exist, `Err` when it exists but
    /// cannot be read or parsed.
    fn read(&self) -> Result<Option<Registry>, String> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| e.to_string())
    }

    /// Overwrite the file with `registry`, creating the parent directory.
    pub fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(registry)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let write_err = |source| RegistryError::Write {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(write_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// Merge one entry into the registry and write it back.
    ///
    /// A registry file that exists but cannot be parsed is copied aside to
    /// `<name>.corrupt` before being replaced, so its contents stay
    /// recoverable.
    pub fn record_backup(
        &self,
        filename: &str,
        record: BackupRecord,
    ) -> Result<Registry, RegistryError> {
        let mut registry = match self.read() {
            Ok(found) => found.unwrap_or_default(),
            Err(e) => {
                let aside = self.corrupt_path();
                log::warn!(
                    "registry {} is unreadable ({e}); keeping a copy at {}",
                    self.path.display(),
                    aside.display()
                );
                if let Err(e) = std::fs::copy(&self.path, &aside) {
                    log::warn!("could not copy aside {}: {e}", self.path.display());
                }
                Registry::default()
            },
        };

        registry.insert(filename, record);
        self.save(&registry)?;
        log::debug!("recorded {filename} in {}", self.path.display());
        Ok(registry)
    }

    /// Point `defaultBackup` at an already recorded file.
    pub fn set_default(&self, filename: &str) -> Result<Registry, RegistryError> {
        let mut registry = self.load();
        if !registry.backups.contains_key(filename) {
            return Err(RegistryError::UnknownBackup(filename.to_string()));
        }
        registry.default_backup = Some(filename.to_string());
        self.save(&registry)?;
        Ok(registry)
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }
}

/// Deserializers that accept whatever JSON another writer left behind.
mod lenient {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    use super::BackupRecord;

    fn text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(text(Value::deserialize(d)?))
    }

    pub fn records<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, BackupRecord>, D::Error> {
        let entries = match Value::deserialize(d)? {
            Value::Object(entries) => entries,
            Value::Null => return Ok(BTreeMap::new()),
            other => {
                log::warn!("ignoring non-object 'backups' in registry: {other}");
                return Ok(BTreeMap::new());
            },
        };
        entries
            .into_iter()
            .map(|(file, value)| {
                let record = match value {
                    Value::Object(fields) => serde_json::from_value(Value::Object(fields))
                        .map_err(serde::de::Error::custom)?,
                    // keep a bare value rather than drop the entry
                    other => BackupRecord {
                        extra: Map::from_iter([("value".to_string(), other)]),
                        ..BackupRecord::default()
                    },
                };
                Ok((file, record))
            })
            .collect()
    }
}

/// Render a timestamp the way the registry stores it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
