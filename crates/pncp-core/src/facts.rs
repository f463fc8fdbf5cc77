//! Persisted pipeline records.
//!
//! Field names follow the JSON consumed by the dashboard, so the serde
//! representation is part of the public contract.

use serde::{Deserialize, Serialize};

/// Outcome of one collection run, written next to the raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStatus {
    pub success: bool,
}

impl Default for CollectionStatus {
    /// No status file means no failed run was recorded.
    fn default() -> Self {
        Self { success: true }
    }
}

/// Normalized, filtered projection of one raw contract record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFact {
    /// `dataPublicacao`, falling back to `dataInclusao`.
    pub data_publicacao: Option<String>,
    pub orgao: String,
    pub fornecedor_nome: String,
    pub fornecedor_cnpj: String,
    pub objeto: String,
    pub valor_estimado: f64,
    pub valor_contratado: f64,
    pub vigencia_fim: String,
}

/// Running totals for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierAggregate {
    pub cnpj: String,
    pub nome: String,
    pub total_contratado: f64,
    /// Reserved for the payments integration; always zero for now.
    pub total_pago: f64,
}

impl SupplierAggregate {
    #[must_use]
    pub fn new(cnpj: &str, nome: &str) -> Self {
        Self {
            cnpj: cnpj.to_owned(),
            nome: nome.to_owned(),
            total_contratado: 0.0,
            total_pago: 0.0,
        }
    }
}

/// Alerting output of the transform stage.
///
/// Serialized untagged so the two shapes match the dashboard contract:
/// `{"fetch_failed": true}` or `{"top_fornecedores_contratados": [...], "msg": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagSet {
    FetchFailed {
        fetch_failed: bool,
    },
    TopSuppliers {
        top_fornecedores_contratados: Vec<SupplierAggregate>,
        msg: String,
    },
}

impl FlagSet {
    #[must_use]
    pub fn fetch_failed() -> Self {
        FlagSet::FetchFailed { fetch_failed: true }
    }

    #[must_use]
    pub fn is_fetch_failed(&self) -> bool {
        matches!(self, FlagSet::FetchFailed { fetch_failed: true })
    }
}
