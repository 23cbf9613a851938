//! Capability interfaces over the external `bap` and `bbackup` CLIs.
//!
//! Command handlers only ever see [`IdentityTool`] and [`BackupTool`].  The
//! shipped implementations shell out through [`crate::runner`]; a native
//! library binding can replace them without touching any call site, and
//! tests substitute counting fakes.

use std::{ffi::OsString, fmt, path::Path, str::FromStr};

use crate::{
    error::{Operation, SkillError, SkillResult},
    runner::{self, Captured},
};

const BAP_INSTALL: &str = "  git clone https://github.com/b-open-io/bap-cli.git\n  \
                           cd bap-cli && bun install && bun run build && bun link";

const BBACKUP_INSTALL: &str = "  git clone https://github.com/b-open-io/bitcoin-backup.git\n  \
                               cd bitcoin-backup && bun install && bun run build && bun link";

/// Substrings of a decrypt failure that mean "wrong password or bad file".
const BAD_PASSWORD_MARKERS: [&str; 2] = ["Invalid password", "Decryption failed"];

// ─── Identity type ────────────────────────────────────────────────────────────

/// Key-derivation scheme of a new BAP identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityType {
    /// BRC-42 derivation (recommended).
    Type42,
    /// BIP32 derivation.
    Legacy,
}

impl IdentityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type42 => "type42",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentityType {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type42" => Ok(Self::Type42),
            "legacy" => Ok(Self::Legacy),
            _ => Err(SkillError::invalid("type must be 'type42' or 'legacy'")),
        }
    }
}

// ─── Capability traits ────────────────────────────────────────────────────────

/// What a successful tool run printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    /// stderr chatter worth showing the user even though the run succeeded.
    pub warning: Option<String>,
}

/// Arguments of a BAP identity creation.
#[derive(Debug, Clone, Copy)]
pub struct NewIdentity<'a> {
    pub name: &'a str,
    pub identity_type: IdentityType,
    pub password: &'a str,
    pub output: &'a Path,
}

/// Creates and inspects encrypted BAP identity backups.
pub trait IdentityTool {
    fn create(&self, req: &NewIdentity<'_>) -> SkillResult<ToolOutput>;

    fn list_members(&self, backup: &Path, password: &str) -> SkillResult<ToolOutput>;

    fn export_member(
        &self,
        backup: &Path,
        password: &str,
        index: u32,
        output: &Path,
    ) -> SkillResult<ToolOutput>;
}

/// Encrypts and decrypts backup files.
pub trait BackupTool {
    fn encrypt(&self, input: &Path, password: &str, output: &Path) -> SkillResult<ToolOutput>;

    /// `output == None` returns the plaintext in [`ToolOutput::stdout`].
    fn decrypt(
        &self,
        input: &Path,
        password: &str,
        output: Option<&Path>,
    ) -> SkillResult<ToolOutput>;
}

// ─── Process-backed implementations ───────────────────────────────────────────

/// [`IdentityTool`] backed by the `bap` CLI.
#[derive(Debug, Clone)]
pub struct BapCli {
    program: String,
}

impl BapCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl IdentityTool for BapCli {
    fn create(&self, req: &NewIdentity<'_>) -> SkillResult<ToolOutput> {
        let args = runner::bap_new_args(
            &self.program,
            req.identity_type.as_str(),
            req.password,
            req.name,
            req.output,
        );
        let captured = invoke(&args, "bap", BAP_INSTALL, Operation::IdentityCreation)?;
        Ok(with_warning(captured, &[]))
    }

    fn list_members(&self, backup: &Path, password: &str) -> SkillResult<ToolOutput> {
        let args = runner::bap_list_args(&self.program, backup, password);
        let captured = invoke(&args, "bap", BAP_INSTALL, Operation::MemberListing)?;
        Ok(with_warning(captured, &[]))
    }

    fn export_member(
        &self,
        backup: &Path,
        password: &str,
        index: u32,
        output: &Path,
    ) -> SkillResult<ToolOutput> {
        let args = runner::bap_member_args(&self.program, backup, password, index, output);
        let captured = invoke(&args, "bap", BAP_INSTALL, Operation::MemberExport)?;
        Ok(with_warning(captured, &[]))
    }
}

/// [`BackupTool`] backed by the `bbackup` CLI.
#[derive(Debug, Clone)]
pub struct BbackupCli {
    program: String,
}

impl BbackupCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BackupTool for BbackupCli {
    fn encrypt(&self, input: &Path, password: &str, output: &Path) -> SkillResult<ToolOutput> {
        let args = runner::bbackup_enc_args(&self.program, input, password, output);
        let captured = invoke(&args, "bbackup", BBACKUP_INSTALL, Operation::Encryption)?;
        Ok(with_warning(captured, &["Encrypted"]))
    }

    fn decrypt(
        &self,
        input: &Path,
        password: &str,
        output: Option<&Path>,
    ) -> SkillResult<ToolOutput> {
        let args = runner::bbackup_dec_args(&self.program, input, password, output);
        let captured = invoke(&args, "bbackup", BBACKUP_INSTALL, Operation::Decryption)
            .map_err(normalize_decrypt_error)?;
        Ok(with_warning(captured, &["Decrypted"]))
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Spawn `args` and turn every way it can go wrong into a [`SkillError`].
fn invoke(
    args: &[OsString],
    tool: &str,
    install: &'static str,
    operation: Operation,
) -> SkillResult<Captured> {
    let not_installed = || SkillError::ToolNotInstalled {
        tool: tool.to_string(),
        install,
    };

    let captured = match runner::run_captured(args) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_installed()),
        Err(e) => {
            return Err(SkillError::ExternalToolFailure {
                operation,
                detail: e.to_string(),
            });
        },
    };

    if captured.success {
        return Ok(captured);
    }

    let detail = captured.failure_text();
    // A wrapper script can run but fail to find the real tool.
    if detail.contains("command not found") {
        return Err(not_installed());
    }
    Err(SkillError::ExternalToolFailure { operation, detail })
}

/// Collapse password/corruption failures into one error, dropping detail.
fn normalize_decrypt_error(err: SkillError) -> SkillError {
    match err {
        SkillError::ExternalToolFailure { ref detail, .. }
            if BAD_PASSWORD_MARKERS.iter().any(|m| detail.contains(m)) =>
        {
            SkillError::InvalidPasswordOrCorruptedFile
        },
        other => other,
    }
}

/// Keep stdout, and surface stderr as a warning unless it only contains one
/// of the `expected` progress words.
fn with_warning(captured: Captured, expected: &[&str]) -> ToolOutput {
    let stderr = captured.stderr.trim();
    let warning = (!stderr.is_empty() && !expected.iter().any(|e| stderr.contains(e)))
        .then(|| stderr.to_string());
    ToolOutput {
        stdout: captured.stdout,
        warning,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
