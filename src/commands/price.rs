//! `bsv-skills price` — current BSV exchange rate.

use std::io::Write;

use super::{Context, Outcome};
use crate::{
    api::{ChainApi, ExchangeRate},
    error::SkillResult,
    registry::format_timestamp,
    ui,
};

pub fn run(api: &dyn ChainApi, ctx: &Context, out: &mut dyn Write) -> SkillResult<Outcome> {
    let rate = ui::with_spinner("Fetching exchange rate", || api.exchange_rate())?;
    render(&rate, ctx, out)?;
    Ok(Outcome::Done)
}

fn render(rate: &ExchangeRate, ctx: &Context, out: &mut dyn Write) -> std::io::Result<()> {
    ui::heading(out, "💰 BSV Price Information")?;
    writeln!(out, "Price: ${:.2} {}", rate.rate, rate.currency)?;
    writeln!(out, "Currency: {}", rate.currency)?;
    writeln!(out, "Timestamp: {}", format_timestamp(&ctx.now))?;
    writeln!(out)
}
