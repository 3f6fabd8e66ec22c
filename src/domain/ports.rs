use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Opens `path` in append mode, writes `line` plus a newline, closes it.
    fn append_line(
        &self,
        path: &str,
        line: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Remote ranking service. Returns the raw response body so callers can
/// look for sentinels before parsing.
#[async_trait]
pub trait RankApi: Send + Sync {
    async fn site_info(&self, domain: &str) -> Result<String>;
}

/// Reduces a lowercase host to its registrable domain.
pub trait DomainStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn registrable(&self, host: &str) -> Option<String>;
}
