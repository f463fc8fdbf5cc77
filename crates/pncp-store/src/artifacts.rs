//! Artifact layout under the data directory.
//!
//! ```text
//! <data_dir>/raw/pncp/contratos.json
//! <data_dir>/raw/pncp/contratacoes.json
//! <data_dir>/raw/pncp/status_fetch_success.json
//! <data_dir>/raw/sp/placeholder.json          (payments collector, external)
//! <data_dir>/processed/fatos_contratos.json
//! <data_dir>/processed/fatos_pagamentos.json
//! <data_dir>/processed/fornecedores.json
//! <data_dir>/processed/flags.json
//! ```

use std::path::{Path, PathBuf};

use pncp_core::{CollectionStatus, ContractFact, FlagSet, SupplierAggregate};
use serde_json::Value;

use crate::error::StoreError;
use crate::json::{read_document, read_records, write_json};

/// Raw outputs of one collection run.
#[derive(Debug, Clone, Copy)]
pub struct RawArtifacts<'a> {
    pub contratos: &'a [Value],
    /// Tenders listing; reserved and currently always empty.
    pub contratacoes: &'a [Value],
    pub status: CollectionStatus,
}

/// Derived outputs of one transform run.
#[derive(Debug, Clone, Copy)]
pub struct ProcessedArtifacts<'a> {
    pub fatos_contratos: &'a [ContractFact],
    /// Reserved for the payments integration; currently always empty.
    pub fatos_pagamentos: &'a [Value],
    pub fornecedores: &'a [SupplierAggregate],
    pub flags: &'a FlagSet,
}

/// Paths and I/O for every artifact under one data directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn raw_pncp_dir(&self) -> PathBuf {
        self.root.join("raw").join("pncp")
    }

    fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    #[must_use]
    pub fn contracts_path(&self) -> PathBuf {
        self.raw_pncp_dir().join("contratos.json")
    }

    #[must_use]
    pub fn tenders_path(&self) -> PathBuf {
        self.raw_pncp_dir().join("contratacoes.json")
    }

    #[must_use]
    pub fn status_path(&self) -> PathBuf {
        self.raw_pncp_dir().join("status_fetch_success.json")
    }

    #[must_use]
    pub fn payments_placeholder_path(&self) -> PathBuf {
        self.root.join("raw").join("sp").join("placeholder.json")
    }

    #[must_use]
    pub fn contract_facts_path(&self) -> PathBuf {
        self.processed_dir().join("fatos_contratos.json")
    }

    #[must_use]
    pub fn payment_facts_path(&self) -> PathBuf {
        self.processed_dir().join("fatos_pagamentos.json")
    }

    #[must_use]
    pub fn suppliers_path(&self) -> PathBuf {
        self.processed_dir().join("fornecedores.json")
    }

    #[must_use]
    pub fn flags_path(&self) -> PathBuf {
        self.processed_dir().join("flags.json")
    }

    /// Writes the three raw artifacts, each a full overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any file cannot be written.
    pub fn save_raw(&self, raw: &RawArtifacts<'_>) -> Result<(), StoreError> {
        write_json(&self.contracts_path(), raw.contratos)?;
        write_json(&self.tenders_path(), raw.contratacoes)?;
        write_json(&self.status_path(), &raw.status)?;
        Ok(())
    }

    /// Writes the four processed artifacts, each a full overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any file cannot be written.
    pub fn save_processed(&self, processed: &ProcessedArtifacts<'_>) -> Result<(), StoreError> {
        write_json(&self.contract_facts_path(), processed.fatos_contratos)?;
        write_json(&self.payment_facts_path(), processed.fatos_pagamentos)?;
        write_json(&self.suppliers_path(), processed.fornecedores)?;
        write_json(&self.flags_path(), processed.flags)?;
        Ok(())
    }

    /// Raw contract records; empty when no collection has run yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but is not a JSON array.
    pub fn load_raw_contracts(&self) -> Result<Vec<Value>, StoreError> {
        read_records(&self.contracts_path())
    }

    /// Raw tender records; empty when no collection has run yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but is not a JSON array.
    pub fn load_raw_tenders(&self) -> Result<Vec<Value>, StoreError> {
        read_records(&self.tenders_path())
    }

    /// Status of the last collection run.
    ///
    /// An absent file counts as success so the transform stage can run
    /// before any fetch. A file that exists but cannot be read or parsed
    /// counts as a failed run, as does any document that is not an object.
    /// A missing `success` key counts as success.
    #[must_use]
    pub fn load_status(&self) -> CollectionStatus {
        let path = self.status_path();
        match read_document(&path) {
            Ok(None) => CollectionStatus::default(),
            Ok(Some(Value::Object(doc))) => {
                let success = match doc.get("success") {
                    None | Some(Value::Null) => true,
                    Some(v) => is_truthy(v),
                };
                CollectionStatus { success }
            }
            Ok(Some(other)) => {
                tracing::warn!(path = %path.display(), document = %other, "status file is not an object; treating run as failed");
                CollectionStatus { success: false }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "unreadable status file; treating run as failed");
                CollectionStatus { success: false }
            }
        }
    }

    /// Whether the external payments collector has left its marker file.
    #[must_use]
    pub fn payments_placeholder_present(&self) -> bool {
        self.payments_placeholder_path().is_file()
    }
}

/// JSON truthiness for the status flag: `false`, `0`, `""`, `[]`, `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
