use crate::config::toml_config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::core::normalizer::StrategyKind;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "domain-rank")]
#[command(about = "Extract registrable domains from URL lists and bucket them by Baidu PC rank")]
pub struct Cli {
    /// Path to TOML configuration file (defaults apply when the default file is absent)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Normalize a URL list into a sorted file of unique registrable domains
    Normalize(NormalizeArgs),
    /// Query the rank of every domain in a file and append each to <rank>.txt
    Rank(RankArgs),
    /// Normalize, then rank the freshly written domain file
    Run {
        #[command(flatten)]
        normalize: NormalizeArgs,
        #[command(flatten)]
        rank: RankArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct NormalizeArgs {
    /// Raw URL list to read
    #[arg(long = "input")]
    pub input: Option<String>,

    /// Where to write the sorted domains
    #[arg(long)]
    pub output: Option<String>,

    /// Domain extraction strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyKind>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RankArgs {
    /// Domain file to query (ignored by `run`, which uses the normalize output)
    #[arg(long = "domains")]
    pub domains: Option<String>,

    /// Ranking API key
    #[arg(long, env = "AIZHAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory receiving the <rank>.txt files
    #[arg(long)]
    pub results_dir: Option<String>,

    /// Maximum attempts per domain
    #[arg(long)]
    pub retry_limit: Option<u32>,
}

impl NormalizeArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.normalize.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.normalize.output = output.clone();
        }
        if let Some(strategy) = self.strategy {
            config.normalize.strategy = strategy;
        }
    }
}

impl RankArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(domains) = &self.domains {
            config.rank.input = domains.clone();
        }
        if let Some(key) = &self.api_key {
            config.api.key = Some(key.clone());
        }
        if let Some(dir) = &self.results_dir {
            config.rank.results_dir = dir.clone();
        }
        if let Some(limit) = self.retry_limit {
            config.retry.limit = limit;
        }
    }
}

impl Cli {
    /// Loads the config file and applies command-line overrides on top.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_file_or_default(DEFAULT_CONFIG_FILE)?,
        };

        match &self.command {
            Command::Normalize(args) => args.apply(&mut config),
            Command::Rank(args) => args.apply(&mut config),
            Command::Run { normalize, rank } => {
                normalize.apply(&mut config);
                rank.apply(&mut config);
                // rank 階段讀取 normalize 的輸出
                config.rank.input = config.normalize.output.clone();
            }
        }

        Ok(config)
    }
}
