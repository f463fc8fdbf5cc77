pub mod aggregate;
pub mod filter;
pub mod pipeline;
pub mod record;

pub use aggregate::{build_flags, top_suppliers, SupplierKey, SupplierLedger, TOP_SUPPLIERS};
pub use filter::{matches, OrgFilter};
pub use pipeline::{run_transform, transform, TransformOutput, TransformSummary};
pub use record::ContractRecord;
