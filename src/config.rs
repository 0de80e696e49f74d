// Process configuration, read once at startup from the environment
// (and `.env`, loaded by main before this runs).

use crate::core::ai::AiConfig;
use crate::core::codefix::DEFAULT_FIX_SYSTEM_PROMPT;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_FIXPY_MAX_TOKENS: u32 = 2048;
const DEFAULT_FIXPY_TEMPERATURE: f32 = 0.0;
const DEFAULT_FIXPY_TOP_P: f32 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub data_dir: PathBuf,
    /// Register commands in this guild only (instant updates while developing).
    pub dev_guild_id: Option<u64>,
    /// Users treated as administrators even without the ADMINISTRATOR permission.
    pub admin_user_ids: HashSet<u64>,
    pub anthropic_api_key: Option<String>,
    /// `None` when no model is configured for /fixpy.
    pub fixpy: Option<AiConfig>,
    pub fixpy_system_prompt: String,
    pub texts_path: Option<PathBuf>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = var("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let dev_guild_id = parse_optional(&var, "DISCORD_DEV_GUILD_ID")?;

        let admin_user_ids = match var("ADMIN_USER_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse::<u64>().map_err(|_| ConfigError::Invalid {
                        key: "ADMIN_USER_IDS",
                        value: id.to_string(),
                    })
                })
                .collect::<Result<HashSet<_>, _>>()?,
            None => HashSet::new(),
        };

        let anthropic_api_key = var("ANTHROPIC_API_KEY");

        let fixpy = match var("FIXPY_MODEL") {
            Some(_) if anthropic_api_key.is_none() => {
                tracing::warn!("FIXPY_MODEL is set but ANTHROPIC_API_KEY is missing; /fixpy is disabled");
                None
            }
            Some(model) => Some(AiConfig {
                model,
                max_tokens: parse_optional(&var, "FIXPY_MAX_TOKENS")?
                    .unwrap_or(DEFAULT_FIXPY_MAX_TOKENS),
                temperature: parse_optional(&var, "FIXPY_TEMPERATURE")?
                    .unwrap_or(DEFAULT_FIXPY_TEMPERATURE),
                top_p: parse_optional(&var, "FIXPY_TOP_P")?.unwrap_or(DEFAULT_FIXPY_TOP_P),
            }),
            None => None,
        };

        let fixpy_system_prompt = if let Some(path) = var("FIXPY_SYSTEM_PROMPT_FILE") {
            std::fs::read_to_string(&path).unwrap_or_else(|e| {
                tracing::warn!("Failed to read system prompt file at {}: {}", path, e);
                DEFAULT_FIX_SYSTEM_PROMPT.to_string()
            })
        } else {
            var("FIXPY_SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_FIX_SYSTEM_PROMPT.to_string())
        };

        Ok(Self {
            discord_token,
            data_dir,
            dev_guild_id,
            admin_user_ids,
            anthropic_api_key,
            fixpy,
            fixpy_system_prompt,
            texts_path: var("TEXTS_PATH").map(PathBuf::from),
        })
    }
}

fn parse_optional<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}
