//! Read-only view over a raw PNCP contract record.
//!
//! Records are kept as untyped JSON; every accessor tolerates missing or
//! null fields and falls back to an empty string, `None`, or `0.0`.

use pncp_core::{parse_money, ContractFact};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct ContractRecord<'a>(&'a Value);

impl<'a> ContractRecord<'a> {
    #[must_use]
    pub fn new(raw: &'a Value) -> Self {
        Self(raw)
    }

    /// `orgaoEntidade.nomeOrgao`
    #[must_use]
    pub fn org_name(&self) -> String {
        text(self.nested("orgaoEntidade", "nomeOrgao"))
    }

    /// `fornecedor.razaoSocial`
    #[must_use]
    pub fn supplier_name(&self) -> String {
        text(self.nested("fornecedor", "razaoSocial"))
    }

    /// `fornecedor.cpfCnpj`
    #[must_use]
    pub fn supplier_tax_id(&self) -> String {
        text(self.nested("fornecedor", "cpfCnpj"))
    }

    #[must_use]
    pub fn objeto(&self) -> String {
        text(self.0.get("objeto"))
    }

    /// `dataPublicacao`, else `dataInclusao`, else `None`.
    #[must_use]
    pub fn publication_date(&self) -> Option<String> {
        ["dataPublicacao", "dataInclusao"]
            .into_iter()
            .map(|key| text(self.0.get(key)))
            .find(|s| !s.is_empty())
    }

    #[must_use]
    pub fn end_date(&self) -> String {
        text(self.0.get("dataVigenciaFim"))
    }

    #[must_use]
    pub fn estimated_value(&self) -> f64 {
        parse_money(self.0.get("valorEstimado"))
    }

    #[must_use]
    pub fn contracted_value(&self) -> f64 {
        parse_money(self.0.get("valorFinal"))
    }

    /// Projects the record into a [`ContractFact`], carrying `orgao` through
    /// as already extracted by the caller.
    #[must_use]
    pub fn to_fact(&self, orgao: String) -> ContractFact {
        ContractFact {
            data_publicacao: self.publication_date(),
            orgao,
            fornecedor_nome: self.supplier_name(),
            fornecedor_cnpj: self.supplier_tax_id(),
            objeto: self.objeto(),
            valor_estimado: self.estimated_value(),
            valor_contratado: self.contracted_value(),
            vigencia_fim: self.end_date(),
        }
    }

    fn nested(&self, outer: &str, inner: &str) -> Option<&'a Value> {
        self.0.get(outer).and_then(|o| o.get(inner))
    }
}

/// Scalar JSON as text; null, missing and structured values become `""`.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
