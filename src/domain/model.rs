use std::fmt;

/// A rank bucket as returned in the `pc_br` field, used as the result file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankBucket(String);

impl RankBucket {
    /// Accepts integer or string ranks. Values that cannot form a plain
    /// file name (null, objects, path separators) are rejected.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let raw = match value {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.trim().to_string(),
            _ => return None,
        };

        if raw.is_empty()
            || raw == "."
            || raw == ".."
            || raw.contains(['/', '\\', '\0'])
        {
            return None;
        }

        Some(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for RankBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal state of one domain's query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Recorded(RankBucket),
    ApiError(String),
    NoData,
    Exhausted { attempts: u32 },
    /// Non-transient failure, not retried
    Aborted { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    pub lines_read: usize,
    pub unique_domains: usize,
    pub rejected: usize,
    pub output_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub recorded: usize,
    pub api_errors: usize,
    pub no_data: usize,
    pub failed: Vec<String>,
}

impl FetchSummary {
    pub fn record(&mut self, domain: &str, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Recorded(_) => self.recorded += 1,
            FetchOutcome::ApiError(_) => self.api_errors += 1,
            FetchOutcome::NoData => self.no_data += 1,
            FetchOutcome::Exhausted { .. } | FetchOutcome::Aborted { .. } => {
                self.failed.push(domain.to_string())
            }
        }
    }

    pub fn total(&self) -> usize {
        self.recorded + self.api_errors + self.no_data + self.failed.len()
    }
}
