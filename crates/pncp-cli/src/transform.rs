//! Transform command handler.

use anyhow::Context;
use pncp_core::Parametros;
use pncp_store::ArtifactStore;

/// Runs the transform stage and prints the one-line summary.
///
/// # Errors
///
/// Returns an error if raw data is malformed or outputs cannot be written.
pub(crate) fn run_transform(store: &ArtifactStore, params: &Parametros) -> anyhow::Result<()> {
    let summary = pncp_transform::run_transform(store, params)
        .with_context(|| format!("transform failed under {}", store.root().display()))?;

    if summary.fetch_failed {
        println!("[transform] Coleta falhou; saídas vazias com flag fetch_failed");
    } else {
        println!(
            "[transform] Processamento concluído: contratos={} fornecedores={}",
            summary.contracts, summary.suppliers
        );
    }
    Ok(())
}
