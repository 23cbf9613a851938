//! `bsv-skills lookup <address> [balance|history|utxos|info]`

use std::{io::Write, str::FromStr};

use super::Outcome;
use crate::{
    api::{Balance, ChainApi, HistoryEntry, Utxo},
    error::{SkillError, SkillResult},
    ui,
};

/// Lists are cut to this many entries on screen.
const SHOWN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Balance,
    History,
    Utxos,
    /// Balance followed by history.
    #[default]
    Info,
}

impl FromStr for Mode {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(Self::Balance),
            "history" => Ok(Self::History),
            "utxos" => Ok(Self::Utxos),
            "info" => Ok(Self::Info),
            other => Err(SkillError::invalid(format!(
                "unknown mode '{other}' (expected balance, history, utxos or info)"
            ))),
        }
    }
}

pub fn run(
    api: &dyn ChainApi,
    address: &str,
    mode: Option<&str>,
    out: &mut dyn Write,
) -> SkillResult<Outcome> {
    let mode = mode.map(Mode::from_str).transpose()?.unwrap_or_default();

    if matches!(mode, Mode::Balance | Mode::Info) {
        let balance = ui::with_spinner("Fetching balance", || api.balance(address))?;
        render_balance(address, &balance, out)?;
    }
    if matches!(mode, Mode::History | Mode::Info) {
        let history = ui::with_spinner("Fetching history", || api.history(address))?;
        render_history(&history, out)?;
    }
    if mode == Mode::Utxos {
        let utxos = ui::with_spinner("Fetching UTXOs", || api.unspent(address))?;
        render_utxos(&utxos, out)?;
    }
    Ok(Outcome::Done)
}

fn render_balance(address: &str, b: &Balance, out: &mut dyn Write) -> std::io::Result<()> {
    ui::heading(out, "💰 Address Balance")?;
    writeln!(out, "Address: {address}")?;
    writeln!(out, "Confirmed: {} satoshis", b.confirmed)?;
    writeln!(out, "Unconfirmed: {} satoshis", b.unconfirmed)?;
    writeln!(out, "Total: {} BSV", ui::format_bsv(b.total()))
}

fn render_history(history: &[HistoryEntry], out: &mut dyn Write) -> std::io::Result<()> {
    ui::heading(out, "📜 Transaction History")?;
    writeln!(out, "Total transactions: {}", history.len())?;
    if !history.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recent transactions:")?;
        for tx in history.iter().take(SHOWN) {
            writeln!(out, "  {} (height: {})", tx.tx_hash, tx.height)?;
        }
        more(history.len(), out)?;
    }
    Ok(())
}

fn render_utxos(utxos: &[Utxo], out: &mut dyn Write) -> std::io::Result<()> {
    ui::heading(out, "📦 Unspent Outputs (UTXOs)")?;
    writeln!(out, "Total UTXOs: {}", utxos.len())?;
    for (i, u) in utxos.iter().take(SHOWN).enumerate() {
        writeln!(out)?;
        writeln!(out, "UTXO {}:", i + 1)?;
        writeln!(out, "  TX: {}:{}", u.tx_hash, u.tx_pos)?;
        writeln!(out, "  Value: {} satoshis", u.value)?;
        writeln!(out, "  Height: {}", u.height)?;
    }
    more(utxos.len(), out)
}

fn more(total: usize, out: &mut dyn Write) -> std::io::Result<()> {
    if total > SHOWN {
        writeln!(out)?;
        writeln!(out, "  … and {} more", total - SHOWN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{FakeApi, text};

    const ADDR: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";

    fn quiet() {
        console::set_colors_enabled(false);
    }

    fn history(n: usize) -> Vec<HistoryEntry> {
        (0..n)
            .map(|i| HistoryEntry {
                tx_hash: format!("tx{i}"),
                height: 800_000 + i as i64,
            })
            .collect()
    }

    #[test]
    fn balance_mode_shows_total_in_bsv() {
        quiet();
        let api = FakeApi {
            balance: Some(Balance {
                confirmed: 100_000_000,
                unconfirmed: 0,
            }),
            ..FakeApi::default()
        };
        let mut buf = Vec::new();
        run(&api, ADDR, Some("balance"), &mut buf).unwrap();

        let out = text(buf);
        assert!(out.contains("Confirmed: 100000000 satoshis"));
        assert!(out.contains("Total: 1 BSV"));
        assert_eq!(api.calls(), [format!("balance {ADDR}")]);
    }

    #[test]
    fn default_mode_is_info_balance_then_history() {
        quiet();
        let api = FakeApi {
            balance: Some(Balance {
                confirmed: 1,
                unconfirmed: 2,
            }),
            history: Some(history(2)),
            ..FakeApi::default()
        };
        run(&api, ADDR, None, &mut Vec::new()).unwrap();
        assert_eq!(api.calls(), [
            format!("balance {ADDR}"),
            format!("history {ADDR}")
        ]);
    }

    #[test]
    fn history_is_truncated_to_five() {
        quiet();
        let api = FakeApi {
            history: Some(history(8)),
            ..FakeApi::default()
        };
        let mut buf = Vec::new();
        run(&api, ADDR, Some("history"), &mut buf).unwrap();

        let out = text(buf);
        assert!(out.contains("Total transactions: 8"));
        assert!(out.contains("  tx4 (height: 800004)"));
        assert!(!out.contains("tx5"));
        assert!(out.contains("… and 3 more"));
    }

    #[test]
    fn snapshot_utxo_report() {
        quiet();
        let api = FakeApi {
            unspent: Some(vec![Utxo {
                tx_hash: "ab".repeat(32),
                tx_pos: 1,
                value: 1_500,
                height: 812_345,
            }]),
            ..FakeApi::default()
        };
        let mut buf = Vec::new();
        run(&api, ADDR, Some("utxos"), &mut buf).unwrap();
        insta::assert_snapshot!(text(buf).trim(), @r"
        📦 Unspent Outputs (UTXOs)

        Total UTXOs: 1

        UTXO 1:
          TX: abababababababababababababababababababababababababababababababab:1
          Value: 1500 satoshis
          Height: 812345
        ");
    }

    #[test]
    fn unknown_mode_fails_before_any_request() {
        let api = FakeApi::default();
        let err = run(&api, ADDR, Some("everything"), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SkillError::InvalidArgument(_)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn failed_balance_stops_before_history() {
        let api = FakeApi {
            history: Some(history(1)),
            ..FakeApi::default()
        };
        assert!(run(&api, ADDR, Some("info"), &mut Vec::new()).is_err());
        assert_eq!(api.calls().len(), 1);
    }
}
