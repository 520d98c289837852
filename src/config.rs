//! Runtime configuration, resolved once at process start.
//!
//! Every setting comes from an environment variable with a built-in default.
//! The resulting [`Config`] is passed by value into the pipeline; nothing
//! below `main` reads the environment on its own.

use std::env;

use reqwest::Url;
use tracing::warn;

use crate::error::ConfigError;

/// Environment variable holding the API key unless overridden.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default completion service root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default branch that change-level commands diff against.
pub const DEFAULT_BASE_BRANCH: &str = "master";

// Variables read by `from_lookup`
const API_KEY_ENV_VAR: &str = "GITAI_API_KEY_ENV";
const BASE_URL_ENV_VAR: &str = "GITAI_BASE_URL";
const MODEL_ENV_VAR: &str = "GITAI_MODEL";
const BASE_BRANCH_ENV_VAR: &str = "GITAI_BASE_BRANCH";

/// Resolved settings for one gitai invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the environment variable the API key was read from.
    pub api_key_env: String,
    /// API key value; `None` when the variable is unset or blank.
    pub api_key: Option<String>,
    /// Root URL of the chat completions API.
    pub base_url: Url,
    /// Model override applied to every task. `None` uses per-task defaults.
    pub model: Option<String>,
    /// Reference that `mr` commands diff against when no `--base` is given.
    pub base_branch: String,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key_env = non_empty(&lookup, API_KEY_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());

        let api_key = lookup(&api_key_env).filter(|key| !key.trim().is_empty());

        let raw_url = non_empty(&lookup, BASE_URL_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_url)?;

        let model = non_empty(&lookup, MODEL_ENV_VAR);

        let base_branch = non_empty(&lookup, BASE_BRANCH_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());

        Ok(Self {
            api_key_env,
            api_key,
            base_url,
            model,
            base_branch,
        })
    }

    /// Apply a model override from the command line, if one was given.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = Some(model);
        }
        self
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        Some(_) => {
            warn!("{} is set but empty, using default", name);
            None
        }
        None => None,
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}', expected http or https", url.scheme()),
        });
    }

    Ok(url)
}
