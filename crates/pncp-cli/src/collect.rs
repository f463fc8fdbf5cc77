//! Collection stage: query window, PNCP fetch, raw artifacts.
//!
//! Organization filtering is deliberately left to the transform stage so the
//! raw data stays reusable when the filter configuration changes.

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use pncp_client::{PncpClient, Sleeper, CONTRACTS_ENDPOINT};
use pncp_core::{AppConfig, CollectionStatus, Parametros};
use pncp_store::{ArtifactStore, RawArtifacts};

/// Compact date format expected by `dataInicial` / `dataFinal`.
const PNCP_DATE_FORMAT: &str = "%Y%m%d";

/// Counts reported after a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollectSummary {
    pub contracts: usize,
    pub success: bool,
}

/// `[today - window_days, today]`, clamped at the earliest representable date.
pub(crate) fn query_window(today: NaiveDate, window_days: u32) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// Query parameters for the window, formatted as `YYYYMMDD`.
pub(crate) fn window_params(start: NaiveDate, end: NaiveDate) -> [(&'static str, String); 2] {
    [
        ("dataInicial", start.format(PNCP_DATE_FORMAT).to_string()),
        ("dataFinal", end.format(PNCP_DATE_FORMAT).to_string()),
    ]
}

/// Runs the collection stage with the production client.
///
/// When `dry_run` is `true` the window and endpoint are printed and nothing
/// is fetched or written.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the raw artifacts cannot
/// be written. Fetch failures are not errors: they are recorded in the status
/// artifact.
pub(crate) async fn run_collect(
    config: &AppConfig,
    params: &Parametros,
    store: &ArtifactStore,
    dry_run: bool,
) -> anyhow::Result<CollectSummary> {
    let today = Utc::now().date_naive();

    if dry_run {
        let (start, end) = query_window(today, params.janela_pncp_dias);
        println!(
            "dry-run: would fetch {}{} from {} to {} into {}",
            config.pncp_base_url.trim_end_matches('/'),
            CONTRACTS_ENDPOINT,
            start.format(PNCP_DATE_FORMAT),
            end.format(PNCP_DATE_FORMAT),
            store.root().display()
        );
        return Ok(CollectSummary {
            contracts: 0,
            success: true,
        });
    }

    let client = PncpClient::new(
        &config.pncp_base_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_attempts,
        config.backoff_step_secs,
    )
    .context("failed to build PNCP client")?;

    let summary = collect_with_client(&client, store, params, today).await?;
    println!(
        "[collect] PNCP: contratos={} success={}",
        summary.contracts, summary.success
    );
    Ok(summary)
}

/// Fetches the contracts listing for the configured window and persists the
/// raw artifacts unconditionally: records, the reserved empty tenders list,
/// and the success flag.
///
/// # Errors
///
/// Returns an error if any raw artifact cannot be written.
pub(crate) async fn collect_with_client<S: Sleeper>(
    client: &PncpClient<S>,
    store: &ArtifactStore,
    params: &Parametros,
    today: NaiveDate,
) -> anyhow::Result<CollectSummary> {
    let (start, end) = query_window(today, params.janela_pncp_dias);
    let owned = window_params(start, end);
    let query: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();

    tracing::info!(
        endpoint = CONTRACTS_ENDPOINT,
        start = %start,
        end = %end,
        "collecting PNCP contracts"
    );
    let outcome = client.fetch_all(CONTRACTS_ENDPOINT, &query).await;

    store
        .save_raw(&RawArtifacts {
            contratos: &outcome.records,
            contratacoes: &[],
            status: CollectionStatus {
                success: outcome.success,
            },
        })
        .with_context(|| format!("failed to write raw artifacts under {}", store.root().display()))?;

    Ok(CollectSummary {
        contracts: outcome.records.len(),
        success: outcome.success,
    })
}
