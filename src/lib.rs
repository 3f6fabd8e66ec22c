pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{AizhanClient, LocalStorage};
pub use config::AppConfig;
#[cfg(feature = "cli")]
pub use config::Cli;

pub use core::{
    batch::{fetch_all, normalize_file, read_domains},
    fetcher::RankFetcher,
    normalizer::{Normalizer, PublicSuffixStrategy, RegexStrategy, StrategyKind},
    retry::RetryPolicy,
};
pub use domain::model::{FetchOutcome, FetchSummary, NormalizeReport, RankBucket};
pub use utils::error::{Result, ToolError};
