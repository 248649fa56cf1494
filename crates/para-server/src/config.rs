use std::path::PathBuf;
use std::time::Duration;

use para_core::openai::{ChatClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_SERVICE_NAME: &str = "PARA-AI Backend";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

/// How the vocabulary generator picks its term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSelection {
    First,
    Random,
    Seeded(u64),
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub client: ChatClientConfig,
    pub model: String,
}

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Name reported by `GET /`.
    pub service_name: String,
    pub backend: BackendKind,
    /// Replacement tagging lexicon. `None` uses the bundled one.
    pub lexicon_path: Option<PathBuf>,
    pub term_selection: TermSelection,
    /// Present only when `backend` is `Remote`.
    pub remote: Option<RemoteConfig>,
    /// Requests per second allowed on `/generate`. `None` disables limiting.
    pub rate_limit_rps: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PARA_BIND_ADDR` (default "0.0.0.0:8000")
    /// - `PARA_SERVICE_NAME` (default "PARA-AI Backend")
    /// - `PARA_BACKEND`: "local" (default) or "remote"
    /// - `PARA_LEXICON_PATH`: tagging lexicon file
    /// - `PARA_TERM_SELECTION`: "random" (default), "first" or "seeded"
    /// - `PARA_TERM_SEED`: seed for "seeded" (default 0)
    /// - `RATE_LIMIT_RPS`: positive integer
    ///
    /// Remote backend:
    /// - `MISTRAL_API_KEY` (required)
    /// - `MISTRAL_BASE_URL`, `MISTRAL_MODEL`
    /// - `REMOTE_TIMEOUT_SECS` (default 30), `REMOTE_MAX_RETRIES` (default 2)
    /// - `REMOTE_RETRY_INITIAL_MS` (default 200), `REMOTE_RETRY_MAX_MS` (default 5000)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match var("PARA_BACKEND").as_deref().map(str::trim) {
            None | Some("local") => BackendKind::Local,
            Some("remote") => BackendKind::Remote,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "PARA_BACKEND must be \"local\" or \"remote\", got {other:?}"
                )))
            }
        };

        let term_selection = match var("PARA_TERM_SELECTION").as_deref().map(str::trim) {
            None | Some("random") => TermSelection::Random,
            Some("first") => TermSelection::First,
            Some("seeded") => TermSelection::Seeded(parse_var(&var, "PARA_TERM_SEED")?.unwrap_or(0)),
            Some(other) => {
                return Err(AppError::Config(format!(
                    "PARA_TERM_SELECTION must be \"random\", \"first\" or \"seeded\", got {other:?}"
                )))
            }
        };

        let remote = match backend {
            BackendKind::Local => None,
            BackendKind::Remote => Some(remote_config(&var)?),
        };

        let rate_limit_rps = parse_var::<u32, _>(&var, "RATE_LIMIT_RPS")?.filter(|&n| n > 0);

        Ok(Self {
            bind_addr: var("PARA_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            service_name: var("PARA_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            backend,
            lexicon_path: var("PARA_LEXICON_PATH").map(PathBuf::from),
            term_selection,
            remote,
            rate_limit_rps,
        })
    }
}

fn remote_config<F>(var: &F) -> Result<RemoteConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = var("MISTRAL_API_KEY").ok_or_else(|| {
        AppError::Config(
            "MISTRAL_API_KEY environment variable is required for PARA_BACKEND=remote"
                .to_string(),
        )
    })?;

    let base_url = var("MISTRAL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let mut client = ChatClientConfig::new(api_key.trim()).with_base_url(&base_url);
    if let Some(secs) = parse_var::<u64, _>(var, "REMOTE_TIMEOUT_SECS")? {
        client.timeout = Duration::from_secs(secs);
    }
    if let Some(retries) = parse_var(var, "REMOTE_MAX_RETRIES")? {
        client.max_retries = retries;
    }
    if let Some(ms) = parse_var::<u64, _>(var, "REMOTE_RETRY_INITIAL_MS")? {
        client.initial_backoff = Duration::from_millis(ms);
    }
    if let Some(ms) = parse_var::<u64, _>(var, "REMOTE_RETRY_MAX_MS")? {
        client.max_backoff = Duration::from_millis(ms);
    }

    Ok(RemoteConfig {
        client,
        model: var("MISTRAL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    })
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_backend() {
        let config = load(&[]).expect("config");
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.term_selection, TermSelection::Random);
        assert!(config.remote.is_none());
        assert!(config.lexicon_path.is_none());
        assert!(config.rate_limit_rps.is_none());
    }

    #[test]
    fn remote_backend_requires_api_key() {
        let err = load(&[("PARA_BACKEND", "remote")]).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("MISTRAL_API_KEY")));

        let err = load(&[("PARA_BACKEND", "remote"), ("MISTRAL_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn remote_backend_settings() {
        let config = load(&[
            ("PARA_BACKEND", "remote"),
            ("MISTRAL_API_KEY", "secret"),
            ("MISTRAL_BASE_URL", "http://localhost:9000/v1/"),
            ("MISTRAL_MODEL", "mistral-large"),
            ("REMOTE_TIMEOUT_SECS", "5"),
            ("REMOTE_MAX_RETRIES", "0"),
        ])
        .expect("config");
        let remote = config.remote.expect("remote config");
        assert_eq!(remote.model, "mistral-large");
        assert_eq!(remote.client.api_key, "secret");
        assert_eq!(remote.client.base_url, "http://localhost:9000/v1");
        assert_eq!(remote.client.timeout, Duration::from_secs(5));
        assert_eq!(remote.client.max_retries, 0);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(load(&[("PARA_BACKEND", "cloud")]).is_err());
        assert!(load(&[("RATE_LIMIT_RPS", "fast")]).is_err());
        assert!(load(&[("PARA_TERM_SELECTION", "seeded"), ("PARA_TERM_SEED", "x")]).is_err());
    }

    #[test]
    fn term_selection_and_rate_limit() {
        let config = load(&[
            ("PARA_TERM_SELECTION", "seeded"),
            ("PARA_TERM_SEED", "42"),
            ("RATE_LIMIT_RPS", "0"),
            ("PARA_LEXICON_PATH", "/etc/para/lexicon.tsv"),
        ])
        .expect("config");
        assert_eq!(config.term_selection, TermSelection::Seeded(42));
        assert!(config.rate_limit_rps.is_none());
        assert_eq!(
            config.lexicon_path.as_deref(),
            Some(std::path::Path::new("/etc/para/lexicon.tsv"))
        );
    }
}
