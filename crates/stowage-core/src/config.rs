//! Configuration module
//!
//! Settings are read from the environment (after loading an optional `.env`
//! file). The only setting the pipeline strictly depends on is the record
//! store table, and its absence is a valid "recorder disabled" state.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ANTHROPIC_MODEL, DEFAULT_BEDROCK_MODEL_ID, DEFAULT_BEDROCK_REGION, DEFAULT_MAX_TOKENS,
};

/// Which text-generation backend answers the tier prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceProvider {
    Bedrock,
    Anthropic,
}

impl FromStr for InferenceProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bedrock" => Ok(InferenceProvider::Bedrock),
            "anthropic" => Ok(InferenceProvider::Anthropic),
            _ => Err(anyhow::anyhow!("Invalid inference provider: {}", s)),
        }
    }
}

impl Display for InferenceProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            InferenceProvider::Bedrock => write!(f, "bedrock"),
            InferenceProvider::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// DynamoDB table receiving insight records; `None` disables the recorder
    pub record_table: Option<String>,
    pub inference_provider: InferenceProvider,
    pub bedrock_model_id: String,
    pub bedrock_region: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub max_tokens: u32,
    /// Region for the S3 and DynamoDB clients; SDK default chain when unset
    pub aws_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, localstack)
    pub s3_endpoint: Option<String>,
    pub environment: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let inference_provider = get("INFERENCE_PROVIDER")
            .map(|v| v.parse::<InferenceProvider>())
            .transpose()?
            .unwrap_or(InferenceProvider::Bedrock);

        let max_tokens = match get("INFERENCE_MAX_TOKENS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                anyhow::anyhow!("INFERENCE_MAX_TOKENS must be a positive integer: {}", e)
            })?,
            None => DEFAULT_MAX_TOKENS,
        };

        let log_format = get("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(LogFormat::Text);

        let config = Config {
            record_table: get("DYNAMODB_TABLE"),
            inference_provider,
            bedrock_model_id: get("BEDROCK_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_BEDROCK_MODEL_ID.to_string()),
            bedrock_region: get("BEDROCK_REGION")
                .unwrap_or_else(|| DEFAULT_BEDROCK_REGION.to_string()),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            anthropic_model: get("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            max_tokens,
            aws_region: get("AWS_REGION"),
            s3_endpoint: get("S3_ENDPOINT"),
            environment: get("ENVIRONMENT")
                .or_else(|| get("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_tokens == 0 {
            return Err(anyhow::anyhow!("INFERENCE_MAX_TOKENS must be greater than 0"));
        }

        if self.inference_provider == InferenceProvider::Anthropic
            && self.anthropic_api_key.is_none()
        {
            return Err(anyhow::anyhow!(
                "ANTHROPIC_API_KEY is required when INFERENCE_PROVIDER=anthropic"
            ));
        }

        if let Some(ref endpoint) = self.s3_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "S3_ENDPOINT must start with http:// or https://, got {}",
                    endpoint
                ));
            }
        }

        Ok(())
    }

    pub fn record_store_enabled(&self) -> bool {
        self.record_table.is_some()
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_without_any_variable() {
        let config = config_from(&[]).unwrap();
        assert!(config.record_table.is_none());
        assert!(!config.record_store_enabled());
        assert_eq!(config.inference_provider, InferenceProvider::Bedrock);
        assert_eq!(config.bedrock_model_id, "anthropic.claude-3-sonnet-20240229-v1:0");
        assert_eq!(config.bedrock_region, "us-east-1");
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn table_enables_recorder() {
        let config = config_from(&[("DYNAMODB_TABLE", "s3-insights")]).unwrap();
        assert_eq!(config.record_table.as_deref(), Some("s3-insights"));
        assert!(config.record_store_enabled());
    }

    #[test]
    fn empty_table_counts_as_unset() {
        let config = config_from(&[("DYNAMODB_TABLE", "  ")]).unwrap();
        assert!(!config.record_store_enabled());
    }

    #[test]
    fn anthropic_requires_api_key() {
        let err = config_from(&[("INFERENCE_PROVIDER", "anthropic")]).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config = config_from(&[
            ("INFERENCE_PROVIDER", "Anthropic"),
            ("ANTHROPIC_API_KEY", "sk-ant-test-key"),
        ])
        .unwrap();
        assert_eq!(config.inference_provider, InferenceProvider::Anthropic);
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(config_from(&[("INFERENCE_PROVIDER", "openai")]).is_err());
    }

    #[test]
    fn rejects_zero_or_garbage_max_tokens() {
        assert!(config_from(&[("INFERENCE_MAX_TOKENS", "0")]).is_err());
        assert!(config_from(&[("INFERENCE_MAX_TOKENS", "lots")]).is_err());
        let config = config_from(&[("INFERENCE_MAX_TOKENS", "512")]).unwrap();
        assert_eq!(config.max_tokens, 512);
    }

    #[test]
    fn rejects_endpoint_without_scheme() {
        assert!(config_from(&[("S3_ENDPOINT", "localhost:9000")]).is_err());
        let config = config_from(&[("S3_ENDPOINT", "http://localhost:4566")]).unwrap();
        assert_eq!(config.s3_endpoint.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn json_log_format_and_production() {
        let config =
            config_from(&[("LOG_FORMAT", "json"), ("ENVIRONMENT", "Production")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.is_production());
    }
}
