//! Configuration types and loading logic.
//!
//! `Config` maps 1-to-1 onto `config.toml`.  Every section has a `Default`
//! impl so the file is entirely optional: without one the skills talk to the
//! public WhatsOnChain mainnet API, keep state under `/.flow/.bsv` and invoke
//! `bap` / `bbackup` from `$PATH`.
//!
//! # File format
//!
//! ```toml
//! [api]
//! base_url = "https://api.whatsonchain.com/v1/bsv/main"
//!
//! [paths]
//! bsv_dir = "/.flow/.bsv"   # registry, backups/ and temp/ live here
//!
//! [tools]
//! bap     = "bap"
//! bbackup = "bbackup"
//! ```
//!
//! Two files are consulted: the global one under the user's config directory
//! and an explicit `--config` path.  They are merged table-by-table with the
//! explicit file winning, then deserialised once.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ─── Top-level ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

// ─── [api] ────────────────────────────────────────────────────────────────────

/// Remote block-explorer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.  No trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

// ─── [paths] ──────────────────────────────────────────────────────────────────

/// Where the registry and backup artifacts are kept.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_bsv_dir")]
    pub bsv_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bsv_dir: default_bsv_dir(),
        }
    }
}

impl PathsConfig {
    /// Encrypted backups and identity files.
    pub fn backups_dir(&self) -> PathBuf {
        self.bsv_dir.join("backups")
    }

    /// Scratch space for decrypted output.
    pub fn temp_dir(&self) -> PathBuf {
        self.bsv_dir.join("temp")
    }

    /// The JSON backup registry.
    pub fn registry_path(&self) -> PathBuf {
        self.bsv_dir.join("config.json")
    }
}

// ─── [tools] ──────────────────────────────────────────────────────────────────

/// Program names (or absolute paths) of the external CLIs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_bap")]
    pub bap: String,

    #[serde(default = "default_bbackup")]
    pub bbackup: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bap: default_bap(),
            bbackup: default_bbackup(),
        }
    }
}

// ─── Defaults ─────────────────────────────────────────────────────────────────

// Free functions so `#[serde(default = "…")]` can fill individual fields.

pub fn default_base_url() -> String {
    "https://api.whatsonchain.com/v1/bsv/main".into()
}

pub fn default_bsv_dir() -> PathBuf {
    PathBuf::from("/.flow/.bsv")
}

pub fn default_bap() -> String {
    "bap".into()
}

pub fn default_bbackup() -> String {
    "bbackup".into()
}

/// `<config_dir>/bsv-skills/config.toml`, if the platform has a config dir.
pub fn global_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|d| d.join("bsv-skills").join("config.toml"))
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Parse `path` into a raw TOML table.
///
/// Returns `Ok(None)` when the file does not exist and an error when it
/// exists but cannot be read or is not valid TOML.
pub fn parse_table(path: &Path) -> Result<Option<toml::Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let table: toml::Table = toml::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(table))
}

/// Recursively overlay `top` onto `base`.  Nested tables merge key-by-key;
/// any other value in `top` replaces the one in `base`.
pub fn merge_tables(mut base: toml::Table, top: toml::Table) -> toml::Table {
    for (key, value) in top {
        match (base.remove(&key), value) {
            (Some(toml::Value::Table(b)), toml::Value::Table(t)) => {
                base.insert(key, toml::Value::Table(merge_tables(b, t)));
            },
            (_, v) => {
                base.insert(key, v);
            },
        }
    }
    base
}

/// Load the global config, overlay the explicit one and deserialise.
///
/// Either file may be absent.  An explicit path that does not exist only
/// produces a log warning so a stale `--config` in a shell alias still runs.
pub fn load_merged(global: Option<&Path>, explicit: Option<&Path>) -> Result<Config> {
    let base = match global {
        Some(p) => parse_table(p)?.unwrap_or_default(),
        None => toml::Table::new(),
    };

    let top = match explicit {
        Some(p) => parse_table(p)?.unwrap_or_else(|| {
            log::warn!("config file '{}' not found, using defaults", p.display());
            toml::Table::new()
        }),
        None => toml::Table::new(),
    };

    let merged = merge_tables(base, top);
    toml::Value::Table(merged)
        .try_into()
        .context("invalid configuration")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
