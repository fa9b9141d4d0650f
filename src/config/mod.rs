use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::sink::DefaultSink;

mod args;

pub use args::Args;

#[derive(Deserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    #[serde(alias = "Stderr")]
    Stderr,
    #[serde(alias = "Log")]
    Log,
    #[serde(alias = "Disabled", alias = "disable", alias = "off")]
    Disabled,
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct SinkConfig {
    #[serde(default, alias = "Kind")]
    pub kind: SinkKind,
}

impl SinkConfig {
    pub fn sink(&self) -> DefaultSink {
        match self.kind {
            SinkKind::Stderr => DefaultSink::Stderr,
            SinkKind::Log => DefaultSink::Log,
            SinkKind::Disabled => DefaultSink::Disabled,
        }
    }
}

#[derive(Deserialize, Clone, Default, Debug)]
pub struct AuthConfig {
    #[serde(default, alias = "Realm")]
    pub realm: String,

    /// username => password
    #[serde(default, alias = "Users")]
    pub users: HashMap<String, String>,
}

impl AuthConfig {
    fn autofix(&mut self) {
        self.realm = self.realm.trim().to_string();
        if self.realm.is_empty() {
            self.realm = "httpipe".to_string();
        }
    }

    pub fn enabled(&self) -> bool {
        !self.users.is_empty()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default, alias = "LogLevel", alias = "loglevel")]
    pub log_level: Option<String>,

    #[serde(default, alias = "Sink")]
    pub sink: SinkConfig,

    #[serde(default, alias = "Auth")]
    pub auth: Option<AuthConfig>,

    /// Wraps the app in the access logger.
    #[serde(default = "default_logger", alias = "Logger", alias = "access_log")]
    pub logger: bool,
}

fn default_logger() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            sink: SinkConfig::default(),
            auth: None,
            logger: default_logger(),
        }
    }
}

impl Config {
    pub fn from_toml(txt: &str) -> Result<Self> {
        let mut config = toml::from_str::<Self>(txt).map_err(|e| Error::Config(e.to_string()))?;
        config.autofix()?;
        Ok(config)
    }

    pub fn load(fp: &str) -> Result<Self> {
        let txt = std::fs::read_to_string(fp)?;
        Self::from_toml(&txt)
    }

    pub fn autofix(&mut self) -> Result<()> {
        if let Some(level) = self.log_level.as_ref() {
            let level = level.trim();
            if level.is_empty() {
                self.log_level = None;
            } else if log::LevelFilter::from_str(level).is_err() {
                return Err(Error::Config(format!("unknown log level `{}`", level)));
            }
        }

        if let Some(auth) = self.auth.as_mut() {
            auth.autofix();
        }
        Ok(())
    }

    pub fn level(&self) -> log::LevelFilter {
        match self.log_level.as_ref() {
            Some(level) => log::LevelFilter::from_str(level.trim()).unwrap_or(log::LevelFilter::Info),
            None => log::LevelFilter::Info,
        }
    }
}
