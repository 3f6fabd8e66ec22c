use crate::core::response::{interpret, SiteInfoReply};
use crate::core::retry::RetryPolicy;
use crate::domain::model::FetchOutcome;
use crate::domain::ports::{RankApi, Storage};
use crate::utils::error::{Result, ToolError};

/// Response code the ranking service embeds when the caller is throttled.
pub const DEFAULT_RATE_LIMIT_SENTINEL: &str = r#""code":100008"#;

/// Queries one domain at a time and appends it to `<rank>.txt` in storage.
pub struct RankFetcher<A: RankApi, S: Storage> {
    api: A,
    storage: S,
    policy: RetryPolicy,
    rate_limit_sentinel: String,
}

impl<A: RankApi, S: Storage> RankFetcher<A, S> {
    pub fn new(api: A, storage: S, policy: RetryPolicy) -> Self {
        Self {
            api,
            storage,
            policy,
            rate_limit_sentinel: DEFAULT_RATE_LIMIT_SENTINEL.to_string(),
        }
    }

    pub fn with_rate_limit_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.rate_limit_sentinel = sentinel.into();
        self
    }

    /// Runs the per-domain state machine: rate limits and transient errors
    /// loop back until the retry limit is spent. Service errors, empty
    /// payloads and non-transient failures end the query at once.
    pub async fn fetch_rank(&self, domain: &str) -> FetchOutcome {
        let mut attempts = 0u32;

        while self.policy.has_attempts_left(attempts) {
            tracing::info!("🔎 Querying rank for {}", domain);

            match self.attempt(domain).await {
                Ok(outcome) => return outcome,
                Err(ToolError::RateLimited) => {
                    attempts += 1;
                    let delay = self.policy.rate_limit_delay();
                    tracing::warn!(
                        "⏳ Rate limited while querying {}, waiting {:?} ({}/{})",
                        domain,
                        delay,
                        attempts,
                        self.policy.limit
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if !e.is_transient() => {
                    tracing::error!(
                        "❌ Query for {} failed permanently: {} (category: {:?})",
                        domain,
                        e,
                        e.category()
                    );
                    return FetchOutcome::Aborted {
                        reason: e.to_string(),
                    };
                }
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        "⚠️ Query for {} failed: {} (category: {:?}), retrying ({}/{})",
                        domain,
                        e,
                        e.category(),
                        attempts,
                        self.policy.limit
                    );
                    tokio::time::sleep(self.policy.error_delay()).await;
                }
            }
        }

        tracing::error!(
            "❌ Giving up on {} after {} attempts",
            domain,
            attempts
        );
        FetchOutcome::Exhausted { attempts }
    }

    async fn attempt(&self, domain: &str) -> Result<FetchOutcome> {
        let body = self.api.site_info(domain).await?;

        if body.contains(&self.rate_limit_sentinel) {
            return Err(ToolError::RateLimited);
        }

        match interpret(&body)? {
            SiteInfoReply::Error(msg) => {
                tracing::error!("❌ Ranking service rejected {}: {}", domain, msg);
                Ok(FetchOutcome::ApiError(msg))
            }
            SiteInfoReply::Empty => {
                tracing::warn!("📭 No rank data returned for {}", domain);
                Ok(FetchOutcome::NoData)
            }
            SiteInfoReply::Rank(bucket) => {
                tracing::info!("📈 {} has PC rank {}", domain, bucket);
                let file_name = bucket.file_name();
                self.storage.append_line(&file_name, domain).await?;
                tracing::debug!("Appended {} to {}", domain, file_name);
                Ok(FetchOutcome::Recorded(bucket))
            }
        }
    }
}
