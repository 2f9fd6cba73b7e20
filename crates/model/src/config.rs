/// Configuration for the HTTP model clients.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API base endpoint (e.g. `https://generativelanguage.googleapis.com/v1beta`).
    pub endpoint: String,
    /// Model to use (e.g. `gemini-2.0-flash-exp-image-generation`).
    pub model: String,
    /// API key for authentication.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Temperature for sampling.
    pub temperature: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Top-p nucleus sampling cutoff.
    pub top_p: f64,
    /// Maximum tokens in the response.
    pub max_output_tokens: u32,
}

impl ModelConfig {
    /// Create a config for the given endpoint, model, and API key.
    ///
    /// Defaults match the upstream generation settings: 30s timeout,
    /// temperature 0.4, top-k 32, top-p 0.95, 2048 output tokens.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout_seconds: 30,
            temperature: 0.4,
            top_k: 32,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum tokens in the response.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}
