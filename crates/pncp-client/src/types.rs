//! Response envelope of the PNCP listing endpoints.
//!
//! Every listing answers `{"data": [...], "totalPaginas": N, ...}`. Records
//! are kept as raw JSON; only the envelope is typed.

use serde::Deserialize;
use serde_json::Value;

/// Raw listing envelope as it arrives on the wire.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default, rename = "totalPaginas")]
    pub total_paginas: Option<u32>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    /// Reported page count; `1` when the server omits it or sends zero.
    pub total_pages: u32,
}

impl Page {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
        }
    }
}

impl From<PageEnvelope> for Page {
    fn from(envelope: PageEnvelope) -> Self {
        Self {
            items: envelope.data.unwrap_or_default(),
            total_pages: envelope.total_paginas.filter(|&n| n > 0).unwrap_or(1),
        }
    }
}

/// Result of a full paginated fetch.
///
/// `records` holds every item from the pages fetched before any failure;
/// when `success` is false the batch must not be treated as authoritative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub records: Vec<Value>,
    pub success: bool,
}
