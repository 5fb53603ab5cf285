//! Answer client configuration.
//!
//! Native builds read environment variables. Web builds read the same keys
//! from the page's `localStorage`.

use super::types::SolveError;

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for SolverTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeouts: SolverTimeouts,
}

// Keep the key out of logs
impl std::fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl SolverConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SOLVER_API_KEY_ENV`: names the env var holding the key (default `GEMINI_API_KEY`)
    /// - `SOLVER_MODEL`: default `gemini-2.0-flash`
    /// - `SOLVER_BASE_URL`: default Generative Language API base URL
    /// - `SOLVER_REQUEST_TIMEOUT_SECS`: default 120
    /// - `SOLVER_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// Required: the variable named by `SOLVER_API_KEY_ENV`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::MissingApiKey`] when the key variable is unset or empty.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, SolveError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Web version of [`from_env`](Self::from_env): the same keys, read from
    /// `window.localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::MissingApiKey`] when storage is unavailable or
    /// holds no key.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Result<Self, SolveError> {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        Self::from_lookup(|key| storage.as_ref().and_then(|s| s.get_item(key).ok().flatten()))
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::MissingApiKey`] when the key variable is unset or
    /// empty, [`SolveError::ConfigParse`] for an unusable base URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SolveError> {
        let key_var = lookup("SOLVER_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = lookup(&key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SolveError::MissingApiKey { var: key_var.clone() })?;

        let model = lookup("SOLVER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = lookup("SOLVER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(SolveError::ConfigParse(format!(
                "SOLVER_BASE_URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let parse_u64 = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };
        let timeouts = SolverTimeouts {
            request_secs: parse_u64("SOLVER_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64("SOLVER_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, model, base_url, timeouts })
    }
}
