pub mod batch;
pub mod fetcher;
pub mod normalizer;
pub mod response;
pub mod retry;

pub use crate::domain::model::{FetchOutcome, FetchSummary, NormalizeReport, RankBucket};
pub use crate::domain::ports::{DomainStrategy, RankApi, Storage};
pub use crate::utils::error::Result;
