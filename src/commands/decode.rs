//! `bsv-skills decode <tx-hex-or-txid>`
//!
//! A 64-character hex argument is a txid: its raw hex is fetched first and
//! then handed to the decode endpoint.  Anything else is decoded as-is.

use std::io::Write;

use super::Outcome;
use crate::{api::ChainApi, error::SkillResult, ui};

/// `true` for exactly 64 hex digits, either case.
pub fn is_txid(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn run(api: &dyn ChainApi, tx: &str, out: &mut dyn Write) -> SkillResult<Outcome> {
    let hex = if is_txid(tx) {
        writeln!(out, "Fetching transaction {tx}...")?;
        ui::with_spinner("Fetching transaction", || api.transaction(tx))?.hex
    } else {
        tx.to_string()
    };

    writeln!(out, "Decoding transaction...")?;
    let decoded = ui::with_spinner("Decoding", || api.decode(&hex))?;

    ui::heading(out, "📄 Decoded Transaction")?;
    let pretty = serde_json::to_string_pretty(&decoded).map_err(std::io::Error::other)?;
    writeln!(out, "{pretty}")?;
    Ok(Outcome::Done)
}
