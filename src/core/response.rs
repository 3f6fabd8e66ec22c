use crate::domain::model::RankBucket;
use crate::utils::error::{Result, ToolError};
use serde_json::Value;

/// Interpreted shape of a `siteinfos` response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteInfoReply {
    /// `status == "error"`, with the service message
    Error(String),
    Rank(RankBucket),
    /// Success without results, or a status this tool does not know
    Empty,
}

fn malformed(message: impl Into<String>) -> ToolError {
    ToolError::MalformedResponse {
        message: message.into(),
    }
}

/// Parses a response body. Invalid JSON or missing required fields are
/// errors (transient); service-level errors and empty payloads are not.
pub fn interpret(body: &str) -> Result<SiteInfoReply> {
    let json: Value = serde_json::from_str(body)?;

    let status = json
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing 'status' field"))?;

    match status {
        "error" => {
            let msg = json
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            Ok(SiteInfoReply::Error(msg))
        }
        "success" => {
            let first = json
                .get("data")
                .and_then(|data| data.get("success"))
                .and_then(Value::as_array)
                .and_then(|results| results.first());

            let Some(first) = first else {
                return Ok(SiteInfoReply::Empty);
            };

            let pc_br = first
                .get("pc_br")
                .ok_or_else(|| malformed("missing 'pc_br' in first result"))?;

            RankBucket::from_value(pc_br)
                .map(SiteInfoReply::Rank)
                .ok_or_else(|| malformed(format!("unusable rank value: {}", pc_br)))
        }
        other => {
            tracing::debug!("Unrecognised status {:?}, treating as empty", other);
            Ok(SiteInfoReply::Empty)
        }
    }
}
