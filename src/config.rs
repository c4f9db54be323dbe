//! Configuration management for the agents.
//!
//! Configuration is read once from environment variables (a `.env` file is
//! loaded by the binaries first):
//! - `LLM_API_KEY` - Required. API key for the chat-completions endpoint.
//! - `LLM_BASE_URL` - Optional. Endpoint root. Defaults to `https://api.openai.com/v1`.
//! - `LLM_MODEL` - Optional. Model name. Defaults to `gpt-4o-mini`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `20`.
//!
//! Brainstorming agent:
//! - `IDEA_AGENT_MODEL` - Optional. Overrides `LLM_MODEL`.
//! - `MAX_SAMPLED_FILES` - Optional. Files sampled per run, 1-15. Defaults to `5`.
//! - `DEFAULT_SEARCH_PATHS` - Optional. Comma-separated roots used when no paths are given.
//! - `IDEA_AGENT_PROJECT_ROOT` - Optional. Project root; defaults to the enclosing git checkout.
//! - `IDEA_AGENT_DOC_EXTENSIONS` / `IDEA_AGENT_SOURCE_EXTENSIONS` - Optional. Comma-separated.
//!
//! Gmail triage agent:
//! - `GMAIL_CREDENTIALS_PATH` - Optional. OAuth client file. Defaults to `credentials/credentials.json`.
//! - `GMAIL_TOKEN_PATH` - Optional. Stored token. Defaults to `credentials/token.json`.
//! - `GMAIL_USER_ID` - Optional. Gmail API user. Defaults to `me`.
//! - `GMAIL_ACCOUNT_EMAIL` - Optional. Account label. Defaults to `GMAIL_USER_ID`.
//! - `GMAIL_MAX_MESSAGES` - Optional. Messages per run, 1-20. Defaults to `5`.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::llm::OpenAiCompatClient;
use crate::sampler::{FileClasses, PathResolver, SnippetSampler};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_ITERATIONS: usize = 20;
const DEFAULT_SEARCH_PATHS: &str = "examples,use-cases,CLAUDE.md,INITIAL.md";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Chat-completions endpoint settings shared by both agents.
#[derive(Clone)]
pub struct LlmConfig {
    /// API key for the endpoint
    pub api_key: String,

    /// Endpoint root, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl LlmConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("LLM_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("LLM_API_KEY".to_string()))?;

        Ok(Self {
            api_key,
            base_url: lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_iterations: parse_or(lookup, "MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?,
        })
    }

    pub fn client(&self) -> OpenAiCompatClient {
        OpenAiCompatClient::with_base_url(self.api_key.clone(), self.base_url.clone())
    }
}

/// Brainstorming agent configuration.
#[derive(Debug, Clone)]
pub struct BrainstormConfig {
    pub llm: LlmConfig,

    /// Upper bound on how many files are sampled per run
    pub max_sampled_files: usize,

    /// Roots crawled when the caller gives none
    pub default_search_paths: Vec<String>,

    /// Project root override; `None` means the enclosing git checkout
    pub project_root: Option<PathBuf>,

    /// Extension classes searched under directory roots
    pub file_classes: FileClasses,
}

impl BrainstormConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `LLM_API_KEY` is not set, and
    /// `ConfigError::InvalidValue` for unparsable or out-of-range numbers.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut llm = LlmConfig::from_lookup(&lookup)?;
        if let Some(model) = lookup("IDEA_AGENT_MODEL").filter(|m| !m.trim().is_empty()) {
            llm.model = model;
        }

        let max_sampled_files = parse_or(&lookup, "MAX_SAMPLED_FILES", 5)?;
        check_range("MAX_SAMPLED_FILES", max_sampled_files, 1, 15)?;

        let default_search_paths = split_csv(
            &lookup("DEFAULT_SEARCH_PATHS").unwrap_or_else(|| DEFAULT_SEARCH_PATHS.to_string()),
        );

        let defaults = FileClasses::default();
        let file_classes = FileClasses::new(
            lookup("IDEA_AGENT_DOC_EXTENSIONS")
                .map(|v| split_csv(&v))
                .unwrap_or(defaults.documentation),
            lookup("IDEA_AGENT_SOURCE_EXTENSIONS")
                .map(|v| split_csv(&v))
                .unwrap_or(defaults.source),
        );

        Ok(Self {
            llm,
            max_sampled_files,
            default_search_paths,
            project_root: lookup("IDEA_AGENT_PROJECT_ROOT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            file_classes,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(llm: LlmConfig, project_root: PathBuf) -> Self {
        Self {
            llm,
            max_sampled_files: 5,
            default_search_paths: split_csv(DEFAULT_SEARCH_PATHS),
            project_root: Some(project_root),
            file_classes: FileClasses::default(),
        }
    }

    /// Path resolver honouring the project root override.
    pub fn resolver(&self) -> PathResolver {
        match &self.project_root {
            Some(root) => PathResolver::new(root.clone(), crate::sampler::agent_root()),
            None => PathResolver::discover(),
        }
    }

    pub fn sampler(&self) -> SnippetSampler {
        SnippetSampler::new(self.resolver(), self.file_classes.clone())
    }

    /// Caller paths, or the configured defaults when there are none.
    pub fn resolved_paths(&self, paths: &[String]) -> Vec<String> {
        let cleaned: Vec<String> = paths
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if cleaned.is_empty() {
            self.default_search_paths.clone()
        } else {
            cleaned
        }
    }

    /// Caller limit, or the configured default when it is zero.
    pub fn resolved_limit(&self, max_files: usize) -> usize {
        if max_files == 0 {
            self.max_sampled_files
        } else {
            max_files
        }
    }
}

/// Gmail triage agent configuration.
#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub llm: LlmConfig,

    /// OAuth client credentials downloaded from Google Cloud
    pub credentials_path: PathBuf,

    /// Stored OAuth token
    pub token_path: PathBuf,

    /// Identifier passed to the Gmail API (usually `me`)
    pub user_id: String,

    /// Human-friendly label for the triaged account
    pub account_email: String,

    /// How many open emails to look at per run
    pub max_messages: usize,
}

impl GmailConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `LLM_API_KEY` is not set, and
    /// `ConfigError::InvalidValue` for unparsable or out-of-range numbers.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm = LlmConfig::from_lookup(&lookup)?;

        let max_messages = parse_or(&lookup, "GMAIL_MAX_MESSAGES", 5)?;
        check_range("GMAIL_MAX_MESSAGES", max_messages, 1, 20)?;

        let user_id = lookup("GMAIL_USER_ID").unwrap_or_else(|| "me".to_string());
        let account_email = lookup("GMAIL_ACCOUNT_EMAIL").unwrap_or_else(|| user_id.clone());

        Ok(Self {
            llm,
            credentials_path: lookup("GMAIL_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("credentials/credentials.json")),
            token_path: lookup("GMAIL_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("credentials/token.json")),
            user_id,
            account_email,
            max_messages,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}

fn check_range(key: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("{} is outside {}..={}", value, min, max),
        ));
    }
    Ok(())
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
