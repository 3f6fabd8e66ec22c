use crate::core::fetcher::RankFetcher;
use crate::core::normalizer::Normalizer;
use crate::domain::model::{FetchSummary, NormalizeReport};
use crate::domain::ports::{RankApi, Storage};
use crate::utils::error::{Result, ToolError};
use std::collections::BTreeSet;

async fn read_lines<S: Storage>(storage: &S, path: &str) -> Result<Vec<String>> {
    let bytes = match storage.read_file(path).await {
        Ok(bytes) => bytes,
        Err(ToolError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ToolError::InputNotFound {
                path: path.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    // 容忍非 UTF-8 位元組，逐行處理
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Reads `input`, normalizes every non-blank line and overwrites `output`
/// with the unique domains, sorted ascending, one per line.
pub async fn normalize_file<S: Storage>(
    storage: &S,
    normalizer: &Normalizer,
    input: &str,
    output: &str,
) -> Result<NormalizeReport> {
    tracing::info!(
        "📂 Normalizing {} with {} strategy",
        input,
        normalizer.strategy_name()
    );
    let lines = read_lines(storage, input).await?;

    let mut domains = BTreeSet::new();
    let mut rejected = 0usize;
    for line in &lines {
        match normalizer.normalize(line) {
            Some(domain) => {
                domains.insert(domain);
            }
            None => {
                rejected += 1;
                tracing::debug!("Skipping non-domain line: {}", line);
            }
        }
    }

    let sorted: Vec<&str> = domains.iter().map(String::as_str).collect();
    storage.write_file(output, sorted.join("\n").as_bytes()).await?;

    tracing::info!(
        "✅ Extracted {} unique domains from {} lines ({} rejected), saved to {}",
        domains.len(),
        lines.len(),
        rejected,
        output
    );

    Ok(NormalizeReport {
        lines_read: lines.len(),
        unique_domains: domains.len(),
        rejected,
        output_path: output.to_string(),
    })
}

/// Loads the rank input: trimmed non-blank lines in file order.
pub async fn read_domains<S: Storage>(storage: &S, path: &str) -> Result<Vec<String>> {
    let domains = read_lines(storage, path).await?;
    if domains.is_empty() {
        return Err(ToolError::NoDomains {
            path: path.to_string(),
        });
    }
    Ok(domains)
}

/// Queries every domain in order, one at a time. A failed domain never
/// stops the batch.
pub async fn fetch_all<A: RankApi, S: Storage>(
    fetcher: &RankFetcher<A, S>,
    domains: &[String],
) -> FetchSummary {
    let mut summary = FetchSummary::default();

    for (index, domain) in domains.iter().enumerate() {
        tracing::debug!("[{}/{}] {}", index + 1, domains.len(), domain);
        let outcome = fetcher.fetch_rank(domain).await;
        summary.record(domain, &outcome);
    }

    tracing::info!(
        "📊 Rank run finished: {} recorded, {} service errors, {} without data, {} failed",
        summary.recorded,
        summary.api_errors,
        summary.no_data,
        summary.failed.len()
    );
    if !summary.failed.is_empty() {
        tracing::warn!("Failed domains: {}", summary.failed.join(", "));
    }

    summary
}
