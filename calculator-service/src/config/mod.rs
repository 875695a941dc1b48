use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default outbound timeout for the model call, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default request body limit (10MB). Canvas snapshots as data URIs routinely
/// exceed axum's 2MB default.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub http: HttpSettings,
    pub scratch: ScratchSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub max_body_bytes: usize,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScratchSettings {
    /// Root directory under which per-request scratch directories are created.
    pub root: PathBuf,
}

impl CalculatorConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = common_config.is_prod();

        let default_scratch = env::temp_dir()
            .join("calculator-service")
            .to_string_lossy()
            .into_owned();

        Ok(CalculatorConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                timeout_secs: parse_positive(
                    "GEMINI_TIMEOUT_SECS",
                    &get_env(
                        "GEMINI_TIMEOUT_SECS",
                        Some(DEFAULT_TIMEOUT_SECS.to_string().as_str()),
                        is_prod,
                    )?,
                )?,
            },
            http: HttpSettings {
                max_body_bytes: parse_positive(
                    "CALCULATOR_MAX_BODY_BYTES",
                    &get_env(
                        "CALCULATOR_MAX_BODY_BYTES",
                        Some(DEFAULT_MAX_BODY_BYTES.to_string().as_str()),
                        is_prod,
                    )?,
                )?,
                cors_origins: parse_origins(&get_env("CALCULATOR_CORS_ORIGINS", Some(""), is_prod)?),
            },
            scratch: ScratchSettings {
                root: PathBuf::from(get_env(
                    "CALCULATOR_SCRATCH_DIR",
                    Some(default_scratch.as_str()),
                    is_prod,
                )?),
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a non-zero count from an environment value.
fn parse_positive<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value: T = raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "{} must be a positive integer, got {:?}: {}",
            key,
            raw,
            e
        ))
    })?;

    if value == T::default() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be greater than zero",
            key
        )));
    }

    Ok(value)
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
