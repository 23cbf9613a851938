//! `bsv-skills backup encrypt|decrypt` — password-encrypted backup files.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use super::{Context, Outcome, absolute, file_name, given};
use crate::{
    error::{SkillError, SkillResult},
    registry::BackupRecord,
    tools::BackupTool,
    ui,
};

/// Extension of encrypted backup files.
const BACKUP_EXT: &str = "bep";

pub fn encrypt(
    tool: &dyn BackupTool,
    ctx: &Context,
    input: &str,
    output: Option<&str>,
    password: Option<&str>,
    out: &mut dyn Write,
) -> SkillResult<Outcome> {
    let password = ctx.new_password(password)?;

    let input_path = absolute(input)?;
    if !input_path.exists() {
        return Err(SkillError::FileNotFound {
            kind: "Input",
            path: input_path,
        });
    }

    let backups = ctx.paths.backups_dir();
    let output_path = match given(output) {
        Some(p) => absolute(p)?,
        None => {
            let stem = input_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "backup".into());
            backups.join(format!("{stem}.{BACKUP_EXT}"))
        },
    };
    std::fs::create_dir_all(&backups)?;

    writeln!(out, "Encrypting {}...", input_path.display())?;
    writeln!(out, "Output: {}", output_path.display())?;

    let result = ui::with_spinner("Encrypting", || {
        tool.encrypt(&input_path, &password, &output_path)
    })?;
    if let Some(w) = &result.warning {
        ui::warning(out, w)?;
    }
    writeln!(out, "✅ Encryption successful!")?;
    let stdout = result.stdout.trim_end();
    if !stdout.is_empty() {
        writeln!(out, "{stdout}")?;
    }

    let registry = ctx.registry();
    let record = BackupRecord::encrypted(file_name(&input_path), ctx.now);
    match registry.record_backup(&file_name(&output_path), record) {
        Ok(_) => writeln!(out, "Updated backup registry: {}", registry.path().display())?,
        Err(e) => log::warn!("Could not update backup registry: {e}"),
    }
    Ok(Outcome::Done)
}

/// Where decrypted plaintext goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Printed to stdout (`-` on the command line).
    Console,
    /// An explicit file.
    File(PathBuf),
    /// The scratch directory; the user is reminded to clean it up.
    Temp(PathBuf),
}

impl Destination {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Console => None,
            Self::File(p) | Self::Temp(p) => Some(p.as_path()),
        }
    }
}

/// An existing path as given, else the same file name under the backups
/// directory.
pub fn locate_backup(ctx: &Context, input: &str) -> SkillResult<PathBuf> {
    let direct = absolute(input)?;
    if direct.exists() {
        return Ok(direct);
    }
    let fallback = ctx.paths.backups_dir().join(file_name(Path::new(input)));
    if fallback.exists() {
        return Ok(fallback);
    }
    Err(SkillError::FileNotFound {
        kind: "Backup",
        path: PathBuf::from(input),
    })
}

pub fn decrypt(
    tool: &dyn BackupTool,
    ctx: &Context,
    input: &str,
    output: Option<&str>,
    password: Option<&str>,
    out: &mut dyn Write,
) -> SkillResult<Outcome> {
    let password = ctx.password(password)?;

    let input_path = locate_backup(ctx, input)?;
    if input_path != absolute(input)? {
        writeln!(out, "Found backup in: {}", input_path.display())?;
    }
    writeln!(out, "Decrypting {}...", input_path.display())?;

    let destination = match given(output) {
        Some("-") => Destination::Console,
        Some(p) => Destination::File(absolute(p)?),
        None => {
            let temp = ctx.paths.temp_dir();
            std::fs::create_dir_all(&temp)?;
            let name = file_name(&input_path);
            let stem = name
                .strip_suffix(&format!(".{BACKUP_EXT}"))
                .unwrap_or(&name);
            let path = temp.join(format!("{stem}.json"));
            writeln!(out, "Temporary output: {}", path.display())?;
            Destination::Temp(path)
        },
    };

    let result = ui::with_spinner("Decrypting", || {
        tool.decrypt(&input_path, &password, destination.path())
    })?;
    if let Some(w) = &result.warning {
        ui::warning(out, w)?;
    }
    writeln!(out, "✅ Decryption successful!")?;

    match &destination {
        Destination::Console => {
            writeln!(out)?;
            writeln!(out, "--- Decrypted Content ---")?;
            writeln!(out, "{}", result.stdout.trim_end())?;
        },
        Destination::File(p) => writeln!(out, "Saved to: {}", p.display())?,
        Destination::Temp(p) => {
            writeln!(out, "Saved to: {}", p.display())?;
            writeln!(out)?;
            writeln!(
                out,
                "⚠️  Temporary file will be auto-cleaned after your operation."
            )?;
            writeln!(out, "   If you need it longer, copy it elsewhere.")?;
        },
    }
    Ok(Outcome::Done)
}
