//! AI summary of recent activity.

use std::io::Write;

use anyhow::{Context, Result};
use bt_core::digest::{self, InsightEntry};
use bt_core::{StateStore, Tracker};
use bt_llm::Client;
use chrono::Local;

use super::util::{Clock, Zone};
use crate::Config;

pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    config: &Config,
    clock: &Clock,
) -> Result<()> {
    let client = config
        .api_key()
        .map(Client::new)
        .transpose()
        .context("failed to create LLM client")?;
    summarize(writer, tracker, client.as_ref(), &config.model, clock)
}

/// Writes the model's summary, or a fallback message when it can't be had.
pub fn summarize<W: Write, S: StateStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    client: Option<&Client>,
    model: &str,
    clock: &Clock,
) -> Result<()> {
    let entries = projection(tracker, clock);
    tracing::debug!(entries = entries.len(), "projected logs for insights");

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let text = runtime.block_on(bt_llm::generate_insights(client, model, &entries));
    writeln!(writer, "{}", text.trim_end())?;
    Ok(())
}

fn projection<S: StateStore>(tracker: &Tracker<S>, clock: &Clock) -> Vec<InsightEntry> {
    let unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();
    let logs = tracker.logs().as_slice();
    match clock.zone {
        Zone::Local => digest::insight_projection(logs, unit, &Local),
        Zone::Fixed(offset) => digest::insight_projection(logs, unit, &offset),
    }
}
