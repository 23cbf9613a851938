//! `bsv-skills init` — scaffold a commented `config.toml`.

use std::{io::Write, path::Path};

use anyhow::{Context, Result, bail};

use crate::config::{default_bap, default_base_url, default_bbackup, default_bsv_dir};

/// Starter file.  Every value is the built-in default, so the file changes
/// nothing until edited.
fn template() -> String {
    format!(
        "\
# bsv-skills configuration
#
# Values given here override the built-in defaults.  Values given on the
# command line (--bsv-dir, --api-url) override this file.

[api]
# Block-explorer endpoint.  Use .../v1/bsv/test for testnet.
base_url = \"{base_url}\"

[paths]
# Registry (config.json), backups/ and temp/ live here.
bsv_dir = \"{bsv_dir}\"

[tools]
# Program names on $PATH, or absolute paths.
bap     = \"{bap}\"
bbackup = \"{bbackup}\"
",
        base_url = default_base_url(),
        bsv_dir = default_bsv_dir().display(),
        bap = default_bap(),
        bbackup = default_bbackup(),
    )
}

/// Write the template to `path`.  Refuses to touch an existing file.
pub fn run(path: &Path, out: &mut dyn Write) -> Result<()> {
    if path.exists() {
        bail!(
            "'{}' already exists; remove it first to regenerate",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, template()).with_context(|| format!("writing {}", path.display()))?;

    writeln!(out, "✅ Created {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, load_merged};

    #[test]
    fn template_parses_to_defaults() {
        let cfg: Config = toml::from_str(&template()).unwrap();
        assert_eq!(cfg.api.base_url, default_base_url());
        assert_eq!(cfg.paths.bsv_dir, default_bsv_dir());
        assert_eq!(cfg.tools.bap, "bap");
    }

    #[test]
    fn writes_into_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut buf = Vec::new();
        run(&path, &mut buf).unwrap();

        let cfg = load_merged(None, Some(&path)).unwrap();
        assert_eq!(cfg.tools.bbackup, "bbackup");
        assert!(String::from_utf8(buf).unwrap().contains("Created"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\n").unwrap();

        let err = run(&path, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[api]\n");
    }
}
