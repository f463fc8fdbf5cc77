pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{PncpClient, CONTRACTS_ENDPOINT, MAX_PAGES, PAGE_SIZE};
pub use error::PncpError;
pub use retry::{Sleeper, TokioSleeper};
pub use types::{FetchOutcome, Page};
