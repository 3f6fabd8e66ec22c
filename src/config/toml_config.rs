use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::core::fetcher::DEFAULT_RATE_LIMIT_SENTINEL;
use crate::core::normalizer::StrategyKind;
use crate::core::retry::RetryPolicy;
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "domain-rank.toml";

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub normalize: NormalizeConfig,
    pub rank: RankConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub key: Option<String>,
    pub timeout_seconds: u64,
    pub rate_limit_sentinel: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            key: None,
            timeout_seconds: 10,
            rate_limit_sentinel: DEFAULT_RATE_LIMIT_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub limit: u32,
    pub base_delay_seconds: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            limit: 3,
            base_delay_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub input: String,
    pub output: String,
    pub strategy: StrategyKind,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input: "zichan.txt".to_string(),
            output: "url.txt".to_string(),
            strategy: StrategyKind::PublicSuffix,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    pub input: String,
    pub results_dir: String,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            input: "url.txt".to_string(),
            results_dir: ".".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, defaults otherwise. Only used for the
    /// implicit config location; an explicit `--config` must exist.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ToolError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AIZHAN_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.limit,
            Duration::from_secs_f64(self.retry.base_delay_seconds),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    /// The API key, required only by the rank phase. A `${VAR}` left over
    /// from substitution counts as missing.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && !ENV_VAR_RE.is_match(key) => Ok(key),
            _ => Err(ToolError::MissingConfigError {
                field: "api.key".to_string(),
            }),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.endpoint", &self.api.endpoint)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        if self.api.rate_limit_sentinel.is_empty() {
            return Err(ToolError::InvalidConfigValueError {
                field: "api.rate_limit_sentinel".to_string(),
                value: String::new(),
                reason: "Sentinel cannot be empty, it would match every response".to_string(),
            });
        }

        validate_positive_number("retry.limit", self.retry.limit, 1)?;
        // Duration::from_secs_f64 panics on negative or non-finite input
        if !self.retry.base_delay_seconds.is_finite() {
            return Err(ToolError::InvalidConfigValueError {
                field: "retry.base_delay_seconds".to_string(),
                value: self.retry.base_delay_seconds.to_string(),
                reason: "Value must be a finite number".to_string(),
            });
        }
        validate_range("retry.base_delay_seconds", self.retry.base_delay_seconds, 0.0, 3600.0)?;

        validate_path("normalize.input", &self.normalize.input)?;
        validate_path("normalize.output", &self.normalize.output)?;
        validate_path("rank.input", &self.rank.input)?;
        validate_path("rank.results_dir", &self.rank.results_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file_content() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.api.endpoint, "https://apistore.aizhan.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.normalize.input, "zichan.txt");
        assert_eq!(config.normalize.output, "url.txt");
        assert_eq!(config.normalize.strategy, StrategyKind::PublicSuffix);
        assert_eq!(config.rank.input, "url.txt");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
endpoint = "http://127.0.0.1:9000"
key = "abc"
timeout_seconds = 5

[retry]
limit = 5
base_delay_seconds = 0.5

[normalize]
input = "assets.txt"
output = "domains.txt"
strategy = "regex"

[rank]
results_dir = "./ranks"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.require_api_key().unwrap(), "abc");
        assert_eq!(config.retry_policy().limit, 5);
        assert_eq!(config.retry_policy().base_delay, Duration::from_millis(500));
        assert_eq!(config.normalize.strategy, StrategyKind::Regex);
        assert_eq!(config.rank.results_dir, "./ranks");
        assert_eq!(config.rank.input, "url.txt");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOMAIN_RANK_TEST_KEY", "from-env");

        let config = AppConfig::from_toml_str(
            r#"
[api]
key = "${DOMAIN_RANK_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.require_api_key().unwrap(), "from-env");

        std::env::remove_var("DOMAIN_RANK_TEST_KEY");
    }

    #[test]
    fn test_unsubstituted_key_is_missing() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
key = "${DOMAIN_RANK_UNSET_VARIABLE}"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.require_api_key(),
            Err(ToolError::MissingConfigError { .. })
        ));
        assert!(AppConfig::default().require_api_key().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.api.endpoint = "invalid-url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.retry.limit = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.retry.base_delay_seconds = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[rank]\nresults_dir = \"out\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.rank.results_dir, "out");
    }

    #[test]
    fn test_missing_default_file_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::from_file_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.retry.limit, 3);
        assert!(AppConfig::from_file(dir.path().join("absent.toml")).is_err());
    }
}
