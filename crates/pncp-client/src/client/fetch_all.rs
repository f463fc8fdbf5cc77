//! Multi-page fetch loop for `PncpClient`.

use serde_json::Value;

use crate::error::PncpError;
use crate::retry::Sleeper;
use crate::types::FetchOutcome;

use super::{PncpClient, MAX_PAGES};

impl<S: Sleeper> PncpClient<S> {
    /// Fetches every page of `endpoint`, strictly in sequence.
    ///
    /// Starts at page 1 and stops at the first empty page or once the page
    /// number reaches the reported `totalPaginas`, whichever comes first.
    ///
    /// **All-or-nothing per run**: a page that still fails after all attempts
    /// (or a 4xx) aborts the loop. The records from earlier pages are kept in
    /// the outcome but `success` is `false`, and callers must treat the batch
    /// as tainted. Errors are logged here, never returned.
    pub async fn fetch_all(&self, endpoint: &str, base_params: &[(&str, &str)]) -> FetchOutcome {
        let mut records: Vec<Value> = Vec::new();
        match self.collect_pages(endpoint, base_params, &mut records).await {
            Ok(pages) => {
                tracing::info!(endpoint, pages, records = records.len(), "PNCP fetch complete");
                FetchOutcome {
                    records,
                    success: true,
                }
            }
            Err(err) => {
                tracing::error!(
                    endpoint,
                    records = records.len(),
                    error = %err,
                    "PNCP fetch aborted; marking run as failed"
                );
                FetchOutcome {
                    records,
                    success: false,
                }
            }
        }
    }

    /// Appends every page's items to `records`; returns the number of pages
    /// requested.
    async fn collect_pages(
        &self,
        endpoint: &str,
        base_params: &[(&str, &str)],
        records: &mut Vec<Value>,
    ) -> Result<u32, PncpError> {
        let mut page = 1u32;
        loop {
            if page > MAX_PAGES {
                return Err(PncpError::PaginationLimit {
                    endpoint: endpoint.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let fetched = self.fetch_page(endpoint, base_params, page).await?;
            if fetched.items.is_empty() {
                tracing::debug!(endpoint, page, "empty page; stopping");
                return Ok(page);
            }

            tracing::info!(
                endpoint,
                page,
                total_pages = fetched.total_pages,
                items = fetched.items.len(),
                "fetched PNCP page"
            );
            records.extend(fetched.items);

            if page >= fetched.total_pages {
                return Ok(page);
            }
            page += 1;
        }
    }
}
