//! Application configuration
//!
//! Build-time variables come from env files in the project directory, read
//! in this order (later files win):
//! `.env`, `.env.local`, `.env.{mode}`, `.env.{mode}.local`.
//! `VITE_`-prefixed process environment variables override all files. Only
//! `VITE_`-prefixed keys are kept.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;
use crate::Result;

const ENV_PREFIX: &str = "VITE_";

const APP_TITLE: &str = "VITE_GLOB_APP_TITLE";
const BASE_API: &str = "VITE_BASE_API";
const PUBLIC_PATH: &str = "VITE_PUBLIC_PATH";
const VERBOSE: &str = "VITE_VERBOSE";
const PORT: &str = "VITE_PORT";

/// A normalized env value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Bool(bool),
    Number(u64),
    Text(String),
}

impl EnvValue {
    /// `"true"`/`"false"` become booleans, `VITE_PORT` becomes a number,
    /// anything else stays text
    fn wrap(key: &str, raw: String) -> Result<Self> {
        match raw.as_str() {
            "true" => return Ok(EnvValue::Bool(true)),
            "false" => return Ok(EnvValue::Bool(false)),
            _ => {}
        }

        if key == PORT {
            return raw
                .trim()
                .parse()
                .map(EnvValue::Number)
                .map_err(|_| CoreError::Config(format!("{} must be a number, got {:?}", key, raw)));
        }

        Ok(EnvValue::Text(raw))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EnvValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            EnvValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnvValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnvValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvValue::Bool(b) => write!(f, "{}", b),
            EnvValue::Number(n) => write!(f, "{}", n),
            EnvValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Application title shown in the document title
    pub app_title: String,
    /// Base address for outbound requests
    pub base_api: String,
    /// Public base path the router history is rooted at
    pub public_path: String,
    /// Verbose diagnostics
    pub verbose: bool,
    vars: BTreeMap<String, EnvValue>,
}

impl Config {
    /// Load configuration for `mode` from the env files in `dir` and the
    /// process environment
    pub fn load(mode: &str, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut vars = BTreeMap::new();

        let files = [
            ".env".to_string(),
            ".env.local".to_string(),
            format!(".env.{}", mode),
            format!(".env.{}.local", mode),
        ];

        for file in &files {
            let path = dir.join(file);
            if !path.is_file() {
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            tracing::debug!(path = %path.display(), "Loaded env file");
            vars.extend(parse_env_file(&content));
        }

        vars.extend(process_vars(std::env::vars_os())?);

        Self::from_vars(vars)
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut wrapped = BTreeMap::new();
        for (key, value) in vars {
            let key = key.into();
            if !key.starts_with(ENV_PREFIX) {
                continue;
            }
            let value = EnvValue::wrap(&key, value.into())?;
            wrapped.insert(key, value);
        }

        let app_title = required(&wrapped, APP_TITLE)?;

        let base_api = required(&wrapped, BASE_API)?;
        Url::parse(&base_api)
            .map_err(|e| CoreError::Config(format!("{} is not a valid URL: {}", BASE_API, e)))?;

        let public_path = wrapped
            .get(PUBLIC_PATH)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "/".to_string());

        let verbose = match wrapped.get(VERBOSE) {
            None => false,
            Some(value) => value.as_bool().ok_or_else(|| {
                CoreError::Config(format!(
                    "{} must be true or false, got {:?}",
                    VERBOSE,
                    value.to_string()
                ))
            })?,
        };

        Ok(Self {
            app_title,
            base_api,
            public_path,
            verbose,
            vars: wrapped,
        })
    }

    /// Any normalized `VITE_` variable, including the build-tool flags
    pub fn var(&self, key: &str) -> Option<&EnvValue> {
        self.vars.get(key)
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// `VITE_` entries of the process environment. Unrelated variables are
/// skipped even when they are not valid Unicode.
fn process_vars<I>(vars: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut exposed = Vec::new();
    for (key, value) in vars {
        let Some(key) = key.to_str().filter(|k| k.starts_with(ENV_PREFIX)) else {
            continue;
        };
        let value = value
            .into_string()
            .map_err(|_| CoreError::Config(format!("{} is not valid UTF-8", key)))?;
        exposed.push((key.to_string(), value));
    }
    Ok(exposed)
}

fn required(vars: &BTreeMap<String, EnvValue>, key: &str) -> Result<String> {
    vars.get(key)
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CoreError::Config(format!("{} is not set", key)))
}

/// Parse `KEY=VALUE` lines
fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }

            Some((key.to_string(), unquote(value.trim())))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 {
        if value.starts_with('"') && value.ends_with('"') {
            return value[1..value.len() - 1].replace("\\n", "\n");
        }
        if value.starts_with('\'') && value.ends_with('\'') {
            return value[1..value.len() - 1].to_string();
        }
    }

    // Trailing comment on an unquoted value
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end().to_string(),
        None => value.to_string(),
    }
}
