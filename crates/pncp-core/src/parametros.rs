//! Pipeline parameters read from `config/parametros.json`.
//!
//! Loading never fails: a missing or malformed file, or a wrongly typed
//! field, falls back to the default value with a warning.

use std::path::Path;

use serde_json::Value;

pub const DEFAULT_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parametros {
    /// Organization-name substrings; empty means accept every organization.
    pub orgaos_nome_filtro: Vec<String>,
    /// Query window size in days, counted back from today.
    pub janela_pncp_dias: u32,
}

impl Default for Parametros {
    fn default() -> Self {
        Self {
            orgaos_nome_filtro: Vec::new(),
            janela_pncp_dias: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Parametros {
    /// Extracts parameters field by field from an already-parsed document.
    #[must_use]
    pub fn from_value(doc: &Value) -> Self {
        let mut params = Self::default();

        match doc.get("orgaos_nome_filtro") {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                params.orgaos_nome_filtro = items
                    .iter()
                    .filter_map(|item| {
                        let s = item.as_str();
                        if s.is_none() {
                            tracing::warn!(entry = %item, "ignoring non-text organization filter");
                        }
                        s.map(str::to_owned)
                    })
                    .collect();
            }
            Some(other) => {
                tracing::warn!(value = %other, "orgaos_nome_filtro is not a list; using no filters");
            }
        }

        match doc.get("janela_pncp_dias") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_u64().and_then(|d| u32::try_from(d).ok()) {
                Some(days) => params.janela_pncp_dias = days,
                None => tracing::warn!(
                    value = %v,
                    default = DEFAULT_WINDOW_DAYS,
                    "janela_pncp_dias is not a non-negative integer; using default"
                ),
            },
        }

        params
    }
}

/// Loads the parameter file at `path`.
///
/// JSON is expected; a `.yaml`/`.yml` extension switches to YAML.
#[must_use]
pub fn load_parametros(path: &Path) -> Parametros {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "parameter file unavailable; using defaults");
            return Parametros::default();
        }
    };

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed: Result<Value, String> = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    match parsed {
        Ok(doc) => Parametros::from_value(&doc),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "parameter file is malformed; using defaults");
            Parametros::default()
        }
    }
}
