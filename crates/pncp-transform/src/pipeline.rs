//! Transform stage: raw PNCP records in, facts, suppliers and flags out.

use pncp_core::{CollectionStatus, ContractFact, FlagSet, Parametros, SupplierAggregate};
use pncp_store::{ArtifactStore, ProcessedArtifacts, StoreError};
use serde_json::Value;

use crate::aggregate::{build_flags, SupplierLedger};
use crate::filter::OrgFilter;
use crate::record::ContractRecord;

/// Everything the transform stage persists.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub fatos_contratos: Vec<ContractFact>,
    pub fatos_pagamentos: Vec<Value>,
    pub fornecedores: Vec<SupplierAggregate>,
    pub flags: FlagSet,
}

/// Counts reported after a transform run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSummary {
    pub contracts: usize,
    pub suppliers: usize,
    pub fetch_failed: bool,
}

/// Projects, filters and aggregates one batch of raw contracts.
///
/// A failed collection run taints the whole batch: no record is consumed,
/// facts and suppliers are empty, and the flags carry only `fetch_failed`.
#[must_use]
pub fn transform(
    contratos: &[Value],
    status: CollectionStatus,
    filter: &OrgFilter,
) -> TransformOutput {
    if !status.success {
        return TransformOutput {
            fatos_contratos: Vec::new(),
            fatos_pagamentos: Vec::new(),
            fornecedores: Vec::new(),
            flags: FlagSet::fetch_failed(),
        };
    }

    let mut facts = Vec::new();
    let mut ledger = SupplierLedger::new();

    for raw in contratos {
        let record = ContractRecord::new(raw);
        let orgao = record.org_name();
        if !filter.accepts(&orgao) {
            continue;
        }
        let fact = record.to_fact(orgao);
        ledger.record(
            &fact.fornecedor_cnpj,
            &fact.fornecedor_nome,
            fact.valor_contratado,
        );
        facts.push(fact);
    }

    let fornecedores = ledger.into_vec();
    let flags = build_flags(true, &fornecedores);
    TransformOutput {
        fatos_contratos: facts,
        fatos_pagamentos: Vec::new(),
        fornecedores,
        flags,
    }
}

/// Runs the transform stage against the artifacts in `store`.
///
/// Missing raw files are treated as empty input, so the stage can run
/// before any collection has happened.
///
/// # Errors
///
/// Returns [`StoreError`] if a raw file exists but is malformed, or if a
/// processed artifact cannot be written.
pub fn run_transform(
    store: &ArtifactStore,
    params: &Parametros,
) -> Result<TransformSummary, StoreError> {
    let contratos = store.load_raw_contracts()?;
    let contratacoes = store.load_raw_tenders()?;
    let status = store.load_status();

    if store.payments_placeholder_present() {
        tracing::info!("payments placeholder found; payment facts not integrated yet");
    } else {
        tracing::debug!("no payments data; payment facts stay empty");
    }

    let filter = OrgFilter::new(&params.orgaos_nome_filtro);
    tracing::info!(
        contracts = contratos.len(),
        tenders = contratacoes.len(),
        filters = params.orgaos_nome_filtro.len(),
        fetch_success = status.success,
        "transforming raw PNCP data"
    );

    let output = transform(&contratos, status, &filter);
    if output.flags.is_fetch_failed() {
        tracing::warn!("last collection run failed; writing empty outputs with fetch_failed flag");
    }

    store.save_processed(&ProcessedArtifacts {
        fatos_contratos: &output.fatos_contratos,
        fatos_pagamentos: &output.fatos_pagamentos,
        fornecedores: &output.fornecedores,
        flags: &output.flags,
    })?;

    Ok(TransformSummary {
        contracts: output.fatos_contratos.len(),
        suppliers: output.fornecedores.len(),
        fetch_failed: output.flags.is_fetch_failed(),
    })
}
