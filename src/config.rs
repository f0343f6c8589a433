use crate::error::{Error, Result};

/// Default OpenAI-compatible embeddings endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default embedding model.
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Dimensionality requested from the embeddings endpoint.
const DEFAULT_DIMENSIONS: u32 = 1536;

/// Explicit embedding API configuration.
///
/// Resolved once at startup and passed by value into the embedding
/// client; no component reads credentials from the process environment
/// at call time.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimensions: u32,
}

impl ApiConfig {
    /// Resolve the configuration from, in order of priority:
    /// 1. An explicit key (from --api-key)
    /// 2. The OPENAI_API_KEY environment variable
    ///
    /// A missing key is a fatal configuration error; no index work is
    /// attempted without one.
    pub fn resolve(explicit_key: Option<&str>, model: Option<&str>) -> Result<Self> {
        let api_key = if let Some(key) = explicit_key {
            key.to_string()
        } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            key
        } else {
            return Err(Error::Config(
                "no API key given; pass --api-key or set OPENAI_API_KEY".into(),
            ));
        };

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }
}
