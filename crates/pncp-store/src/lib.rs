//! On-disk artifacts shared between the collect and transform stages.
//!
//! Every artifact is a whole JSON document that each run replaces. Writes go
//! through a temp file in the target directory and an atomic rename, so a
//! reader sees either the previous run's file or the new one.

pub mod artifacts;
pub mod error;
pub mod json;

pub use artifacts::{ArtifactStore, ProcessedArtifacts, RawArtifacts};
pub use error::StoreError;
