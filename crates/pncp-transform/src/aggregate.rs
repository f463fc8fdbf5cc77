//! Per-supplier totals and the top-supplier alert.

use std::collections::HashMap;

use pncp_core::{normalize_text, FlagSet, SupplierAggregate};

/// Number of suppliers reported in the top-supplier flag.
pub const TOP_SUPPLIERS: usize = 5;

pub const PAYMENTS_PENDING_MSG: &str =
    "Alertas completos só serão gerados após integração dos pagamentos PMSP.";

/// Identity of a supplier across contracts.
///
/// Tax ids and normalized names live in separate namespaces, so a supplier
/// whose name happens to look like another supplier's tax id never merges
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SupplierKey {
    TaxId(String),
    Name(String),
}

impl SupplierKey {
    /// Tax id when present, otherwise the normalized supplier name.
    #[must_use]
    pub fn for_supplier(tax_id: &str, name: &str) -> Self {
        if tax_id.is_empty() {
            SupplierKey::Name(normalize_text(name))
        } else {
            SupplierKey::TaxId(tax_id.to_owned())
        }
    }
}

/// Running supplier totals for one transform run, in first-seen order.
#[derive(Debug, Default)]
pub struct SupplierLedger {
    entries: Vec<SupplierAggregate>,
    index: HashMap<SupplierKey, usize>,
}

impl SupplierLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `valor_contratado` to the supplier's total, creating the entry on
    /// first sight. The entry's tax id and name track the latest contract.
    pub fn record(&mut self, tax_id: &str, name: &str, valor_contratado: f64) {
        let key = SupplierKey::for_supplier(tax_id, name);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push(SupplierAggregate::new(tax_id, name));
                let idx = self.entries.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        let entry = &mut self.entries[idx];
        tax_id.clone_into(&mut entry.cnpj);
        name.clone_into(&mut entry.nome);
        entry.total_contratado += valor_contratado;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SupplierAggregate> {
        self.entries
    }
}

/// The `n` largest suppliers by contracted total, descending.
///
/// The sort is stable: equal totals keep their first-seen order.
#[must_use]
pub fn top_suppliers(suppliers: &[SupplierAggregate], n: usize) -> Vec<SupplierAggregate> {
    let mut ranked = suppliers.to_vec();
    ranked.sort_by(|a, b| b.total_contratado.total_cmp(&a.total_contratado));
    ranked.truncate(n);
    ranked
}

/// Flags for a run: the failure marker, or the top suppliers.
#[must_use]
pub fn build_flags(fetch_succeeded: bool, suppliers: &[SupplierAggregate]) -> FlagSet {
    if !fetch_succeeded {
        return FlagSet::fetch_failed();
    }
    FlagSet::TopSuppliers {
        top_fornecedores_contratados: top_suppliers(suppliers, TOP_SUPPLIERS),
        msg: PAYMENTS_PENDING_MSG.to_owned(),
    }
}
