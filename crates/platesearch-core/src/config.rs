//! Configuration loader and typed settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_SEARCH__RA_SCALING=cos-dec`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use crate::builder::{BuilderOptions, OrGroupMerge, RaScaling};
use crate::error::ConfigError;
use crate::types::SkyPosition;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    /// Wrap an already assembled figment, e.g. from an inline TOML string.
    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    /// All sections, with defaults for anything not configured.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        match env {
            "prod" | "production" => {
                let settings = self.settings()?;
                if settings.resolver.kind == ResolverKind::Static {
                    tracing::warn!("production config uses the static object-name resolver");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
    pub resolver: ResolverConfig,
}

impl Settings {
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr is empty".to_string()));
        }
        if self.resolver.kind == ResolverKind::Sesame && self.resolver.sesame_url.trim().is_empty() {
            return Err(ConfigError::Invalid("resolver.sesame_url is empty".to_string()));
        }
        if self.resolver.timeout_secs == 0 {
            return Err(ConfigError::Invalid("resolver.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "0.0.0.0:8080".to_string() }
    }
}

/// Locations of the plate and archive JSON documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub plates_path: String,
    pub archives_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { plates_path: "./data/plates".to_string(), archives_path: "./data/archives".to_string() }
    }
}

impl DataConfig {
    pub fn plates_dir(&self) -> PathBuf { expand_path(&self.plates_path) }
    pub fn archives_dir(&self) -> PathBuf { expand_path(&self.archives_path) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: u64,
    pub ra_scaling: RaScaling,
    pub or_merge: OrGroupMerge,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 50, ra_scaling: RaScaling::default(), or_merge: OrGroupMerge::default() }
    }
}

impl SearchConfig {
    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions { ra_scaling: self.ra_scaling, or_merge: self.or_merge }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    #[default]
    Sesame,
    Static,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub kind: ResolverKind,
    pub sesame_url: String,
    pub timeout_secs: u64,
    /// Name table for the static resolver, keyed by object name.
    pub objects: BTreeMap<String, SkyPosition>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::default(),
            sesame_url: "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A".to_string(),
            timeout_secs: 10,
            objects: BTreeMap::new(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
