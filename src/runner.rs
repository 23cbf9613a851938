//! Argument construction and captured execution for the external CLIs.
//!
//! The builders below are pure: they only assemble the argument vector for
//! `bap` or `bbackup`, so every one of them is unit-testable without either
//! tool installed.  [`run_captured`] is the single place a child process is
//! actually spawned.
//!
//! Arguments are passed to the OS as a vector, never through a shell, so
//! passwords and paths containing spaces or quotes need no escaping.

use std::{
    borrow::Cow,
    ffi::{OsStr, OsString},
    path::Path,
    process::{Command, Output, Stdio},
};

/// One argument vector entry.  Paths stay `OsString` end to end so a
/// non-UTF-8 file name reaches the tool byte for byte.
fn arg(s: impl AsRef<OsStr>) -> OsString {
    s.as_ref().to_os_string()
}

// ─── bap ──────────────────────────────────────────────────────────────────────

/// `bap new --type <type> --password <pw> --name <name> --output <path>`
pub fn bap_new_args(
    program: &str,
    identity_type: &str,
    password: &str,
    name: &str,
    output: &Path,
) -> Vec<OsString> {
    vec![
        arg(program),
        arg("new"),
        arg("--type"),
        arg(identity_type),
        arg("--password"),
        arg(password),
        arg("--name"),
        arg(name),
        arg("--output"),
        arg(output),
    ]
}

/// `bap list <backup> --password <pw>`
pub fn bap_list_args(program: &str, backup: &Path, password: &str) -> Vec<OsString> {
    vec![
        arg(program),
        arg("list"),
        arg(backup),
        arg("--password"),
        arg(password),
    ]
}

/// `bap member <backup> --password <pw> --index <i> --output <path>`
pub fn bap_member_args(
    program: &str,
    backup: &Path,
    password: &str,
    index: u32,
    output: &Path,
) -> Vec<OsString> {
    vec![
        arg(program),
        arg("member"),
        arg(backup),
        arg("--password"),
        arg(password),
        arg("--index"),
        arg(index.to_string()),
        arg("--output"),
        arg(output),
    ]
}

// ─── bbackup ──────────────────────────────────────────────────────────────────

/// `bbackup enc <input> -p <pw> -o <output>`
pub fn bbackup_enc_args(
    program: &str,
    input: &Path,
    password: &str,
    output: &Path,
) -> Vec<OsString> {
    vec![
        arg(program),
        arg("enc"),
        arg(input),
        arg("-p"),
        arg(password),
        arg("-o"),
        arg(output),
    ]
}

/// `bbackup dec <input> -p <pw> [-o <output>]`
///
/// Without an output path bbackup writes the plaintext to stdout.
pub fn bbackup_dec_args(
    program: &str,
    input: &Path,
    password: &str,
    output: Option<&Path>,
) -> Vec<OsString> {
    let mut cmd = vec![
        arg(program),
        arg("dec"),
        arg(input),
        arg("-p"),
        arg(password),
    ];
    if let Some(out) = output {
        cmd.extend([arg("-o"), arg(out)]);
    }
    cmd
}

/// Copy of `args` with the value after every password flag masked, for logs.
pub fn redacted(args: &[OsString]) -> String {
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for a in args {
        if mask_next {
            out.push("****".into());
            mask_next = false;
            continue;
        }
        mask_next = a == "--password" || a == "-p";
        out.push(a.to_string_lossy());
    }
    out.join(" ")
}

// ─── Captured execution ───────────────────────────────────────────────────────

/// What a finished child process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// stderr if it has anything to say, otherwise stdout.  Used as the
    /// detail of a failure message.
    pub fn failure_text(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        text.trim().to_string()
    }
}

/// Run `args[0]` with the remaining arguments, capturing stdout and stderr.
///
/// The `Err` case is a spawn failure (program missing, not executable, …);
/// a program that runs and exits non-zero is `Ok` with `success == false`.
pub fn run_captured(args: &[OsString]) -> std::io::Result<Captured> {
    let (prog, rest) = args.split_first().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "cannot run an empty command")
    })?;

    log::debug!("running: {}", redacted(args));

    let output: Output = Command::new(prog)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;

    let captured = Captured {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    log::debug!("{} exited with {}", prog.to_string_lossy(), output.status);
    Ok(captured)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
