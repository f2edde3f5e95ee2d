use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub resorts_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Politeness delay between candidate URLs of one resort.
    pub candidate_delay_ms: u64,
    /// Politeness delay between resorts in a batch run.
    pub resort_delay_ms: u64,
    pub forecast_api_key: Option<String>,
    pub forecast_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("resorts_path", &self.resorts_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("candidate_delay_ms", &self.candidate_delay_ms)
            .field("resort_delay_ms", &self.resort_delay_ms)
            .field(
                "forecast_api_key",
                &self.forecast_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("forecast_base_url", &self.forecast_base_url)
            .finish()
    }
}
