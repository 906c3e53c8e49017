use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VibeError};

/// Runtime configuration.
///
/// Priority (highest first): environment variables, `--config` TOML file,
/// built-in defaults. The provider credential comes from `AIMLAPI_KEY` only;
/// its absence is not an error, it switches the service into degraded
/// template-only mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Advisory request ceiling shown in usage reports; never enforced.
    pub request_limit: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3001".into(),
            api_base: "https://api.aimlapi.com/v1".into(),
            model: "gpt-4".into(),
            temperature: 0.7,
            max_tokens: 8000,
            timeout_secs: 300,
            request_limit: 100,
            api_key: None,
        }
    }
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut cfg: Config = match path {
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw)
                    .map_err(|e| VibeError::Config(format!("failed to parse {p}: {e}")))?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_nonempty("AIMLAPI_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = env_nonempty("AIMLAPI_BASE_URL") {
            self.api_base = v;
        }
        if let Some(v) = env_nonempty("AIMLAPI_MODEL") {
            self.model = v;
        }
        if let Some(v) = env_nonempty("VIBEBUILD_BIND") {
            self.bind = v;
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}
