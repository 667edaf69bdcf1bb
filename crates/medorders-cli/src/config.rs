// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use log::LevelFilter;
use medorders_app::{DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE, OptionalColumn};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const APP_NAME: &str = "medorders";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_PATH_ENV: &str = "MEDORDERS_CONFIG_PATH";
const LOG_PATH_ENV: &str = "MEDORDERS_LOG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub table: TableSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: Server::default(),
            table: TableSettings::default(),
            log: LogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSettings {
    pub page_size: Option<i64>,
    pub search_debounce: Option<String>,
    pub default_columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSettings {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [server], [table], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.server.base_url
            && base_url.trim().is_empty()
        {
            bail!("server.base_url in {} must not be empty", path.display());
        }

        if let Some(timeout) = &self.server.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "server.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(page_size) = self.table.page_size
            && !(1..=i64::from(u32::MAX)).contains(&page_size)
        {
            bail!(
                "table.page_size in {} must be at least 1, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(debounce) = &self.table.search_debounce {
            parse_duration(debounce)
                .with_context(|| format!("table.search_debounce in {}", path.display()))?;
        }

        self.default_columns()
            .with_context(|| format!("table.default_columns in {}", path.display()))?;
        self.log_level()
            .with_context(|| format!("log.level in {}", path.display()))?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim()
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.server.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn page_size(&self) -> u32 {
        self.table
            .page_size
            .and_then(|size| u32::try_from(size).ok())
            .filter(|size| *size >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn search_debounce(&self) -> Result<Duration> {
        match &self.table.search_debounce {
            Some(raw) => parse_duration(raw),
            None => Ok(DEFAULT_SEARCH_DEBOUNCE),
        }
    }

    pub fn default_columns(&self) -> Result<Vec<OptionalColumn>> {
        let Some(names) = &self.table.default_columns else {
            return Ok(Vec::new());
        };
        names
            .iter()
            .map(|name| {
                OptionalColumn::parse(name.trim()).ok_or_else(|| {
                    anyhow!(
                        "unknown column {name:?}; expected one of: {}",
                        OptionalColumn::ALL
                            .iter()
                            .map(|column| column.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })
            })
            .collect()
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        let raw = self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        LevelFilter::from_str(raw.trim()).map_err(|_| {
            anyhow!("invalid log level {raw:?}; use one of: off, error, warn, info, debug, trace")
        })
    }

    /// Config value first, then the environment, then the platform data dir.
    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.path {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = env::var_os(LOG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].path or {LOG_PATH_ENV}")
        })?;
        Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# medorders config\n# Place this file at: {}\n\nversion = 1\n\n[server]\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[table]\npage_size = {}\nsearch_debounce = \"300ms\"\n# Any of: contact, patientTags, notes\ndefault_columns = []\n\n[log]\n# Optional. Default is the platform data dir (for example ~/.local/share/medorders/medorders.log)\n# path = \"/absolute/path/to/medorders.log\"\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_PAGE_SIZE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 5s)")
}
