//! `bsv-skills identity create|list|export-member` — BAP identity backups.

use std::{io::Write, path::PathBuf};

use super::{Context, Outcome, absolute, file_name, given};
use crate::{
    error::{SkillError, SkillResult},
    registry::BackupRecord,
    tools::{IdentityTool, IdentityType, NewIdentity, ToolOutput},
    ui,
};

/// Positional arguments of `identity create`.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    pub name: String,
    pub identity_type: String,
    pub output: Option<String>,
    pub password: Option<String>,
}

/// Filesystem-safe stem for an identity name: lowercase ASCII letters and
/// digits, every other run of characters collapsed to one `-`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "unnamed".into()
    } else {
        trimmed.to_string()
    }
}

pub fn create(
    tool: &dyn IdentityTool,
    ctx: &Context,
    args: &CreateArgs,
    out: &mut dyn Write,
) -> SkillResult<Outcome> {
    let identity_type: IdentityType = args.identity_type.parse()?;
    let password = ctx.new_password(args.password.as_deref())?;
    let name = args.name.trim();
    if name.is_empty() {
        return Err(SkillError::invalid("Identity name is required"));
    }

    let backups = ctx.paths.backups_dir();
    std::fs::create_dir_all(&backups)?;

    let output = match given(args.output.as_deref()) {
        Some(p) => absolute(p)?,
        None => backups.join(format!("{}-identity.bep", slug(name))),
    };

    writeln!(out, "Creating BAP {identity_type} identity...")?;
    writeln!(out, "Name: {name}")?;
    writeln!(out, "Output: {}", output.display())?;

    let req = NewIdentity {
        name,
        identity_type,
        password: &password,
        output: &output,
    };
    let result = ui::with_spinner("Creating identity", || tool.create(&req))?;
    report(&result, "✅ BAP identity created successfully!", out)?;

    let filename = file_name(&output);
    let record = BackupRecord::identity(name, identity_type.as_str(), ctx.now);
    let registry = ctx.registry();
    match registry.record_backup(&filename, record) {
        Ok(_) => {
            writeln!(out)?;
            writeln!(
                out,
                "✅ Updated identity registry: {}",
                registry.path().display()
            )?;
        },
        Err(e) => log::warn!("Could not update identity registry: {e}"),
    }

    ui::heading(out, "📋 Next steps:")?;
    writeln!(out, "  1. List identity members: bsv-skills identity list {filename}")?;
    writeln!(
        out,
        "  2. Export member identity: bsv-skills identity export-member {filename} 0"
    )?;
    writeln!(out, "  3. Use for signing attestations")?;
    Ok(Outcome::Done)
}

pub fn list(
    tool: &dyn IdentityTool,
    ctx: &Context,
    backup: &str,
    password: Option<&str>,
    out: &mut dyn Write,
) -> SkillResult<Outcome> {
    let password = ctx.password(password)?;
    let path = ctx.in_backups(backup);

    writeln!(out, "Listing members in: {}", path.display())?;
    writeln!(out)?;

    let result = ui::with_spinner("Reading backup", || tool.list_members(&path, &password))?;
    if let Some(w) = &result.warning {
        ui::warning(out, w)?;
    }
    writeln!(out, "{}", result.stdout.trim_end())?;
    Ok(Outcome::Done)
}

/// Positional arguments of `identity export-member`.
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    pub backup: String,
    pub index: String,
    pub output: Option<String>,
    pub password: Option<String>,
}

pub fn export_member(
    tool: &dyn IdentityTool,
    ctx: &Context,
    args: &ExportArgs,
    out: &mut dyn Write,
) -> SkillResult<Outcome> {
    let index: u32 = args.index.trim().parse().map_err(|_| {
        SkillError::invalid(format!(
            "member index must be a non-negative integer, got '{}'",
            args.index
        ))
    })?;
    let password = ctx.password(args.password.as_deref())?;
    let backup = ctx.in_backups(&args.backup);
    let output: PathBuf = match given(args.output.as_deref()) {
        Some(p) => absolute(p)?,
        None => ctx.paths.backups_dir().join(format!("member-{index}.bep")),
    };

    writeln!(out, "Exporting member {index} from: {}", backup.display())?;
    writeln!(out, "Output: {}", output.display())?;
    writeln!(out)?;

    let result = ui::with_spinner("Exporting member", || {
        tool.export_member(&backup, &password, index, &output)
    })?;
    report(&result, "✅ Member exported successfully!", out)?;
    Ok(Outcome::Done)
}

fn report(result: &ToolOutput, banner: &str, out: &mut dyn Write) -> std::io::Result<()> {
    if let Some(w) = &result.warning {
        ui::warning(out, w)?;
    }
    writeln!(out, "{banner}")?;
    let stdout = result.stdout.trim_end();
    if !stdout.is_empty() {
        writeln!(out, "{stdout}")?;
    }
    Ok(())
}
