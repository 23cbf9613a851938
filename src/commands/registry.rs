//! `bsv-skills registry show|set-default` — inspect the backup registry.

use std::io::Write;

use super::{Context, Outcome};
use crate::{
    error::{SkillError, SkillResult},
    registry::RegistryError,
};

pub fn show(ctx: &Context, out: &mut dyn Write) -> SkillResult<Outcome> {
    let store = ctx.registry();
    let registry = store.load();

    writeln!(out, "Registry: {}", store.path().display())?;
    if registry.backups.is_empty() {
        writeln!(out, "No backups recorded.")?;
        return Ok(Outcome::Done);
    }

    writeln!(out)?;
    for (file, record) in &registry.backups {
        let mut marks = Vec::new();
        if registry.default_backup.as_deref() == Some(file.as_str()) {
            marks.push("default");
        }
        if registry.identity_backup.as_deref() == Some(file.as_str()) {
            marks.push("identity");
        }
        let marks = if marks.is_empty() {
            String::new()
        } else {
            format!(" [{}]", marks.join(", "))
        };
        writeln!(out, "{file}{marks}")?;
        if !record.created.is_empty() {
            writeln!(out, "  created: {}", record.created)?;
        }
        if let Some(source) = &record.source {
            writeln!(out, "  source:  {source}")?;
        }
        if let Some(name) = &record.name {
            let kind = record.identity_type.as_deref().unwrap_or("?");
            writeln!(out, "  identity: {name} ({kind})")?;
        }
    }
    Ok(Outcome::Done)
}

pub fn set_default(ctx: &Context, file: &str, out: &mut dyn Write) -> SkillResult<Outcome> {
    let store = ctx.registry();
    match store.set_default(file) {
        Ok(_) => {
            writeln!(out, "Default backup: {file}")?;
            Ok(Outcome::Done)
        },
        Err(RegistryError::UnknownBackup(name)) => Err(SkillError::invalid(format!(
            "'{name}' is not in the backup registry"
        ))),
        Err(RegistryError::Write { source, .. }) => Err(SkillError::Io(source)),
        Err(RegistryError::Serialize(e)) => Err(SkillError::Io(std::io::Error::other(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::testing::{context, text},
        registry::BackupRecord,
    };

    #[test]
    fn empty_registry_says_so() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), None);
        let mut buf = Vec::new();
        show(&ctx, &mut buf).unwrap();
        assert!(text(buf).ends_with("No backups recorded.\n"));
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn snapshot_listing_marks_identity_and_default() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), None);
        let store = ctx.registry();
        store
            .record_backup(
                "alice-identity.bep",
                BackupRecord::identity("Alice", "type42", ctx.now),
            )
            .unwrap();
        store
            .record_backup("wallet.bep", BackupRecord::encrypted("wallet.json", ctx.now))
            .unwrap();
        store.set_default("wallet.bep").unwrap();

        let mut buf = Vec::new();
        show(&ctx, &mut buf).unwrap();
        let out = text(buf);
        let listing = out.split_once("\n\n").unwrap().1;
        insta::assert_snapshot!(listing.trim(), @r"
        alice-identity.bep [identity]
          created: 2026-03-14T15:09:26.000Z
          identity: Alice (type42)
        wallet.bep [default]
          created: 2026-03-14T15:09:26.000Z
          source:  wallet.json
        ");
    }

    #[test]
    fn set_default_on_unknown_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), None);
        let err = set_default(&ctx, "ghost.bep", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SkillError::InvalidArgument(_)));
    }
}
