use serde::{Deserialize, Serialize};
use std::fs;

use evohold_arena::benchmark::{DEFAULT_DUPLICATE_SETS, DEFAULT_HANDS_PER_OPPONENT};
use evohold_genetics::mutation::{DEFAULT_BASE_RATE, DEFAULT_BASE_STRENGTH};

pub const CONFIG_ENV: &str = "EVOHOLD_CONFIG";
pub const DEFAULT_STORE: &str = "solutions";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub hands: u32,
    pub duplicate_sets: u32,
    pub workers: Option<usize>,
    pub store: String,
    pub mutation_rate: f64,
    pub mutation_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub hands: ValueSource,
    pub duplicate_sets: ValueSource,
    pub workers: ValueSource,
    pub store: ValueSource,
    pub mutation_rate: ValueSource,
    pub mutation_strength: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            hands: ValueSource::Default,
            duplicate_sets: ValueSource::Default,
            workers: ValueSource::Default,
            store: ValueSource::Default,
            mutation_rate: ValueSource::Default,
            mutation_strength: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            hands: DEFAULT_HANDS_PER_OPPONENT,
            duplicate_sets: DEFAULT_DUPLICATE_SETS,
            workers: None,
            store: DEFAULT_STORE.into(),
            mutation_rate: DEFAULT_BASE_RATE,
            mutation_strength: DEFAULT_BASE_STRENGTH,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", name, raw)))
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env_value(CONFIG_ENV) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.hands {
            cfg.hands = v;
            sources.hands = ValueSource::File;
        }
        if let Some(v) = f.duplicate_sets {
            cfg.duplicate_sets = v;
            sources.duplicate_sets = ValueSource::File;
        }
        if let Some(v) = f.workers {
            cfg.workers = Some(v);
            sources.workers = ValueSource::File;
        }
        if let Some(v) = f.store {
            cfg.store = v;
            sources.store = ValueSource::File;
        }
        if let Some(v) = f.mutation_rate {
            cfg.mutation_rate = v;
            sources.mutation_rate = ValueSource::File;
        }
        if let Some(v) = f.mutation_strength {
            cfg.mutation_strength = v;
            sources.mutation_strength = ValueSource::File;
        }
    }

    if let Some(seed) = env_value("EVOHOLD_SEED") {
        cfg.seed = Some(parse_env("seed", &seed)?);
        sources.seed = ValueSource::Env;
    }
    if let Some(hands) = env_value("EVOHOLD_HANDS") {
        cfg.hands = parse_env("hands", &hands)?;
        sources.hands = ValueSource::Env;
    }
    if let Some(sets) = env_value("EVOHOLD_SETS") {
        cfg.duplicate_sets = parse_env("duplicate_sets", &sets)?;
        sources.duplicate_sets = ValueSource::Env;
    }
    if let Some(workers) = env_value("EVOHOLD_WORKERS") {
        cfg.workers = Some(parse_env("workers", &workers)?);
        sources.workers = ValueSource::Env;
    }
    if let Some(store) = env_value("EVOHOLD_STORE") {
        cfg.store = store;
        sources.store = ValueSource::Env;
    }
    if let Some(rate) = env_value("EVOHOLD_MUTATION_RATE") {
        cfg.mutation_rate = parse_env("mutation_rate", &rate)?;
        sources.mutation_rate = ValueSource::Env;
    }
    if let Some(strength) = env_value("EVOHOLD_MUTATION_STRENGTH") {
        cfg.mutation_strength = parse_env("mutation_strength", &strength)?;
        sources.mutation_strength = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    hands: Option<u32>,
    #[serde(default)]
    duplicate_sets: Option<u32>,
    #[serde(default)]
    workers: Option<usize>,
    #[serde(default)]
    store: Option<String>,
    #[serde(default)]
    mutation_rate: Option<f64>,
    #[serde(default)]
    mutation_strength: Option<f64>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.duplicate_sets == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: duplicate_sets must be >=1".into(),
        ));
    }
    if cfg.hands < 2 * cfg.duplicate_sets {
        return Err(ConfigError::Invalid(
            "Invalid configuration: hands must cover one duplicate pair per set".into(),
        ));
    }
    if cfg.workers == Some(0) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: workers must be >0".into(),
        ));
    }
    if cfg.store.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: store must not be empty".into(),
        ));
    }
    if !(cfg.mutation_rate.is_finite() && (0.0..=1.0).contains(&cfg.mutation_rate)) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: mutation_rate must be within [0, 1]".into(),
        ));
    }
    if !(cfg.mutation_strength.is_finite() && cfg.mutation_strength >= 0.0) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: mutation_strength must be >=0".into(),
        ));
    }
    Ok(())
}
