//! Terminal UI — spinners, icons and small formatting helpers.
//!
//! Command handlers write their reports to a `&mut dyn Write` so tests can
//! capture them.  Only the spinner and the final error line touch the real
//! terminal directly, and both go to stderr so piping stdout stays clean.

use std::{fmt::Display, io::Write, time::Duration};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames — same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn icon_err() -> console::StyledObject<&'static str> {
    style("❌").red().bold()
}

fn icon_warn() -> console::StyledObject<&'static str> {
    style("⚠️ ").yellow().bold()
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // The template is a literal; a parse failure would only lose the styling.
    if let Ok(s) = ProgressStyle::with_template("  {spinner:.cyan}  {msg}") {
        pb.set_style(s.tick_chars(SPINNER_CHARS));
    }
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `f` behind a spinner labelled `label`.
///
/// The spinner draws on stderr and is hidden automatically when stderr is
/// not a terminal.  It is cleared before returning.
pub fn with_spinner<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let spinner = make_spinner(label);
    let result = f();
    spinner.finish_and_clear();
    result
}

// ─── Report helpers ───────────────────────────────────────────────────────────

/// Blank line, bold section title, blank line.
pub fn heading(out: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(title).bold())?;
    writeln!(out)
}

/// Non-fatal notice inside a report.
pub fn warning(out: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(out, "{} {} {msg}", icon_warn(), style("Warning:").yellow())
}

/// The single line printed for a failed invocation.
pub fn print_error(err: &dyn Display) {
    eprintln!("{} {} {err}", icon_err(), style("Error:").red().bold());
}

// ─── Formatting ───────────────────────────────────────────────────────────────

const SATS_PER_BSV: u64 = 100_000_000;

/// Exact decimal BSV amount for `sats`, trailing zeros trimmed.
///
/// `100_000_000` → `"1"`, `150_000` → `"0.0015"`, `-1` → `"-0.00000001"`.
pub fn format_bsv(sats: i64) -> String {
    let sign = if sats < 0 { "-" } else { "" };
    let abs = sats.unsigned_abs();
    let whole = abs / SATS_PER_BSV;
    let frac = abs % SATS_PER_BSV;
    if frac == 0 {
        return format!("{sign}{whole}");
    }
    let digits = format!("{frac:08}");
    format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_coins_have_no_fraction() {
        assert_eq!(format_bsv(100_000_000), "1");
        assert_eq!(format_bsv(2_100_000_000_000_000), "21000000");
        assert_eq!(format_bsv(0), "0");
    }

    #[test]
    fn fractions_are_exact_and_trimmed() {
        assert_eq!(format_bsv(150_000), "0.0015");
        assert_eq!(format_bsv(123_456_789), "1.23456789");
        assert_eq!(format_bsv(1), "0.00000001");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_bsv(-1), "-0.00000001");
        assert_eq!(format_bsv(-250_000_000), "-2.5");
    }

    #[test]
    fn with_spinner_returns_closure_value() {
        assert_eq!(with_spinner("Working", || 7), 7);
    }

    #[test]
    fn warning_mentions_message() {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        warning(&mut buf, "stderr noise").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Warning: stderr noise"));
    }
}
