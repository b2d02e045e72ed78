//! Configuration (layered: code > env > defaults).

use std::fmt;
use std::time::Duration;

use bon::Builder;

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Context window used when none is configured or the configured value is unusable.
pub const DEFAULT_CONTEXT_WINDOW: u32 = 32_768;
/// Deadline for the connect/headers phase of a chat request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Settings for one Ollama chat handler.
///
/// ```
/// use ollama_bridge::config::OllamaConfig;
///
/// let config = OllamaConfig::builder()
///     .model_id("gpt-oss:20b")
///     .think(true)
///     .build();
/// assert_eq!(config.base_url, "http://localhost:11434");
/// assert_eq!(config.num_ctx, 32_768);
/// ```
#[derive(Clone, Builder)]
pub struct OllamaConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into)]
    pub model_id: String,
    /// Sent as a bearer token when present.
    #[builder(into)]
    pub api_key: Option<String>,
    #[builder(default = DEFAULT_CONTEXT_WINDOW)]
    pub num_ctx: u32,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    /// Ask thinking-capable models to return `thinking` alongside `content`.
    #[builder(default)]
    pub think: bool,
}

impl fmt::Debug for OllamaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaConfig")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("num_ctx", &self.num_ctx)
            .field("request_timeout", &self.request_timeout)
            .field("think", &self.think)
            .finish()
    }
}

impl OllamaConfig {
    /// Load from environment variables (`OLLAMA_BASE_URL`, `OLLAMA_MODEL`, ...).
    ///
    /// A `.env` file is honoured if present. Unset or unparsable values fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            base_url: var("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_id: var("OLLAMA_MODEL").unwrap_or_default(),
            api_key: var("OLLAMA_API_KEY"),
            num_ctx: var("OLLAMA_NUM_CTX")
                .map(|v| parse_num_ctx(&v))
                .unwrap_or(DEFAULT_CONTEXT_WINDOW),
            request_timeout: var("OLLAMA_REQUEST_TIMEOUT_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(timeout_from_millis)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            think: var("OLLAMA_THINK").map(|v| parse_flag(&v)).unwrap_or(false),
        }
    }

    /// Chat endpoint derived from the base URL.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

/// Parse a context-window setting, falling back to the default on garbage or zero.
pub fn parse_num_ctx(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_CONTEXT_WINDOW,
    }
}

/// A zero timeout means "use the default".
pub fn timeout_from_millis(ms: u64) -> Duration {
    if ms == 0 {
        DEFAULT_REQUEST_TIMEOUT
    } else {
        Duration::from_millis(ms)
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
