//! The `sync` pipeline: fetch → map → render.
//!
//! The current date is passed in once, as `today`, and every date of the run
//! is derived from it.

use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::core::countries::from_tedb_code;
use crate::core::{OutputPaths, SyncError};
use crate::mapper::map_with_report;
use crate::render::{write_json, write_markdown};
use crate::tedb::{RateSource, RatesQuery};

/// What the caller asked for on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRequest {
    /// `--from`: requested window start.
    pub date_from: Option<NaiveDate>,
    /// `--to`: requested window end.
    pub date_to: Option<NaiveDate>,
    /// `--states`: comma-separated ISO codes.
    pub states: Option<String>,
}

/// Everything a run needs, resolved against a fixed `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// Snapshot label of the run.
    pub snapshot: NaiveDate,
    /// `--from`, defaulting to today. Recorded only; the fetch ignores it.
    pub requested_from: NaiveDate,
    /// `--to`, defaulting to today. Recorded only; the fetch ignores it.
    pub requested_to: NaiveDate,
    /// The request actually sent upstream.
    pub query: RatesQuery,
}

impl SyncPlan {
    /// Resolve a request against `today`.
    ///
    /// The fetch window is always the trailing `window_days` up to and
    /// including `today`, whatever `--from`/`--to` say.
    pub fn new(today: NaiveDate, request: &SyncRequest, window_days: u64) -> Self {
        let window_start = today
            .checked_sub_days(Days::new(window_days))
            .unwrap_or(NaiveDate::MIN);
        let member_states = request
            .states
            .as_deref()
            .map(parse_states)
            .unwrap_or_default();

        Self {
            snapshot: today,
            requested_from: request.date_from.unwrap_or(today),
            requested_to: request.date_to.unwrap_or(today),
            query: RatesQuery::new(window_start, today).with_member_states(member_states),
        }
    }
}

/// Split a `--states` value into uppercase ISO codes.
///
/// Blank items are dropped, duplicates keep their first position, and
/// TEDB's `EL` is read as Greece (`GR`).
pub fn parse_states(csv: &str) -> Vec<String> {
    let mut states: Vec<String> = Vec::new();
    for code in csv.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let code = from_tedb_code(code);
        if !states.contains(&code) {
            states.push(code);
        }
    }
    states
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Snapshot label.
    pub snapshot: NaiveDate,
    /// Rates written.
    pub rates: usize,
    /// Upstream entries skipped during mapping.
    pub skipped: usize,
}

/// Run fetch → map → render against `source`.
///
/// Stages run strictly in order and the first failure ends the run, so a
/// failed fetch or mapping never touches the output files.
pub async fn run_sync<S: RateSource>(
    source: &S,
    plan: &SyncPlan,
    outputs: &OutputPaths,
) -> Result<SyncSummary, SyncError> {
    if plan.requested_from != plan.snapshot || plan.requested_to != plan.snapshot {
        warn!(
            from = %plan.requested_from,
            to = %plan.requested_to,
            "--from/--to do not change the fetch window; fetching {} to {}",
            plan.query.date_from,
            plan.query.date_to
        );
    }

    info!("Fetching TEDB VAT rates snapshot on {} ...", plan.snapshot);
    let raw = source.fetch(&plan.query).await?;

    info!("Mapping to unified model ...");
    let outcome = map_with_report(&raw)?;

    info!("Writing outputs ...");
    write_json(&outcome.dataset, &outputs.json)?;
    write_markdown(&outcome.dataset, &outputs.markdown)?;

    info!(
        json = %outputs.json.display(),
        markdown = %outputs.markdown.display(),
        "Done."
    );
    Ok(SyncSummary {
        snapshot: outcome.dataset.snapshot,
        rates: outcome.dataset.rates.len(),
        skipped: outcome.skipped.len(),
    })
}
