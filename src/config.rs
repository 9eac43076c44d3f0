use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
    #[serde(default = "default_skills_table")]
    pub skills_table: String,
    #[serde(default = "default_reviews_table")]
    pub reviews_table: String,
    #[serde(default = "default_matches_table")]
    pub matches_table: String,
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_skills_table() -> String { "skills".to_string() }
fn default_reviews_table() -> String { "reviews".to_string() }
fn default_matches_table() -> String { "matches".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
    pub candidate_pool_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_level_step_penalty")]
    pub level_step_penalty: f64,
    #[serde(default = "default_neutral_trust")]
    pub neutral_trust: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            level_step_penalty: default_level_step_penalty(),
            neutral_trust: default_neutral_trust(),
        }
    }
}

impl ScoringSettings {
    pub fn to_weights(&self) -> ScoringWeights {
        ScoringWeights {
            level: self.weights.level,
            trust: self.weights.trust,
            level_step_penalty: self.level_step_penalty,
            neutral_trust: self.neutral_trust,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_level_weight")]
    pub level: f64,
    #[serde(default = "default_trust_weight")]
    pub trust: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            level: default_level_weight(),
            trust: default_trust_weight(),
        }
    }
}

fn default_level_weight() -> f64 { 0.7 }
fn default_trust_weight() -> f64 { 0.3 }
fn default_level_step_penalty() -> f64 { 25.0 }
fn default_neutral_trust() -> f64 { 60.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with MAVEN_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., MAVEN__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MAVEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MAVEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would silently break ranking
    ///
    /// A NaN weight zeroes every score and a zero limit empties every
    /// response, so both fail startup instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoring = [
            ("scoring.weights.level", self.scoring.weights.level),
            ("scoring.weights.trust", self.scoring.weights.trust),
            ("scoring.level_step_penalty", self.scoring.level_step_penalty),
            ("scoring.neutral_trust", self.scoring.neutral_trust),
        ];
        for (key, value) in scoring {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "{} must be a finite, non-negative number (got {})",
                    key, value
                )));
            }
        }

        let limits = [
            ("matching.default_limit", self.matching.default_limit.map(usize::from)),
            ("matching.max_limit", self.matching.max_limit.map(usize::from)),
            ("matching.candidate_pool_size", self.matching.candidate_pool_size),
        ];
        for (key, value) in limits {
            if value == Some(0) {
                return Err(ConfigError::Message(format!("{} must be at least 1", key)));
            }
        }

        Ok(())
    }
}

/// Apply the conventional Supabase environment variables on top of the config
///
/// SUPABASE_URL and SUPABASE_SERVICE_KEY are what the platform's other
/// services export, so they win over the file values.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Ok(api_key) = env::var("SUPABASE_SERVICE_KEY") {
        builder = builder.set_override("supabase.api_key", api_key)?;
    }

    builder.build()
}
